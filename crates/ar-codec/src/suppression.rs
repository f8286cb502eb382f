//! Suppression block expand/flatten.
//!
//! Expanding goes through [`Recurrence`], so a declaration that lacks the
//! schedule or recurrence values its type needs is rejected before any
//! request body is built.

use ar_core::{Error, RecurrenceType, Result, SuppressionConfig, SuppressionSchedule};
use std::collections::BTreeSet;

use crate::schedule::{join_timestamp, parse_rfc3339, Recurrence, Window};
use crate::schema::{ScheduleBlock, SuppressionBlock};
use crate::weekday::{weekday_index, weekday_name};

/// Validate a declared suppression block into a typed [`Recurrence`].
pub fn recurrence_from_block(block: &SuppressionBlock) -> Result<Recurrence> {
    let recurrence_type = block.recurrence_type;

    let Some(schedule) = block.schedule.first() else {
        if recurrence_type == RecurrenceType::Always {
            return Ok(Recurrence::Always);
        }
        return Err(Error::Validation(
            "`schedule` block must be set when `recurrence_type` is Once, Daily, Weekly or Monthly"
                .into(),
        ));
    };

    let mut problems = recurrence_list_problems(recurrence_type, schedule);
    if !problems.is_empty() {
        return Err(Error::Validation(problems.remove(0)));
    }

    if recurrence_type == RecurrenceType::Always {
        tracing::debug!("ignoring `schedule` block for Always recurrence");
        return Ok(Recurrence::Always);
    }

    let window = Window::new(
        parse_rfc3339(&schedule.start_date_utc)?,
        parse_rfc3339(&schedule.end_date_utc)?,
    )?;

    match recurrence_type {
        RecurrenceType::Always => Ok(Recurrence::Always),
        RecurrenceType::Once => Ok(Recurrence::Once(window)),
        RecurrenceType::Daily => Ok(Recurrence::Daily(window)),
        RecurrenceType::Weekly => {
            let days = expand_weekly(&schedule.recurrence_weekly)?;
            if days.is_empty() {
                return Err(Error::Validation(
                    "`recurrence_weekly` must be set and should have at least one element when `recurrence_type` is Weekly"
                        .into(),
                ));
            }
            Ok(Recurrence::Weekly { window, days })
        }
        RecurrenceType::Monthly => {
            if schedule.recurrence_monthly.is_empty() {
                return Err(Error::Validation(
                    "`recurrence_monthly` must be set and should have at least one element when `recurrence_type` is Monthly"
                        .into(),
                ));
            }
            if let Some(day) = schedule
                .recurrence_monthly
                .iter()
                .find(|d| !(1..=31).contains(*d))
            {
                return Err(Error::Validation(format!(
                    "`recurrence_monthly` values must be between 1 and 31, got {day}"
                )));
            }
            Ok(Recurrence::Monthly {
                window,
                days: schedule.recurrence_monthly.clone(),
            })
        }
    }
}

/// Weekly and monthly values are exclusive and each belongs to its own type.
pub(crate) fn recurrence_list_problems(
    recurrence_type: RecurrenceType,
    schedule: &ScheduleBlock,
) -> Vec<String> {
    let mut problems = Vec::new();
    let weekly = !schedule.recurrence_weekly.is_empty();
    let monthly = !schedule.recurrence_monthly.is_empty();

    if weekly && monthly {
        problems.push("`recurrence_weekly` and `recurrence_monthly` cannot both be set".to_string());
    }
    if weekly && recurrence_type != RecurrenceType::Weekly {
        problems.push(format!(
            "`recurrence_weekly` is only valid when `recurrence_type` is Weekly, got {recurrence_type}"
        ));
    }
    if monthly && recurrence_type != RecurrenceType::Monthly {
        problems.push(format!(
            "`recurrence_monthly` is only valid when `recurrence_type` is Monthly, got {recurrence_type}"
        ));
    }
    problems
}

fn expand_weekly(names: &[String]) -> Result<BTreeSet<i32>> {
    names
        .iter()
        .map(|name| {
            weekday_index(name).ok_or_else(|| {
                Error::Validation(format!(
                    "`recurrence_weekly` value {name:?} is not a weekday name"
                ))
            })
        })
        .collect()
}

/// Expand a declared suppression block into the wire config.
pub fn expand_suppression(block: &SuppressionBlock) -> Result<SuppressionConfig> {
    Ok(recurrence_from_block(block)?.to_config())
}

/// Flatten the remote suppression config; `None` yields an empty list.
pub fn flatten_suppression(config: Option<&SuppressionConfig>) -> Vec<SuppressionBlock> {
    let Some(config) = config else {
        return Vec::new();
    };

    vec![SuppressionBlock {
        recurrence_type: config.recurrence_type,
        schedule: flatten_schedule(config.schedule.as_ref(), config.recurrence_type),
    }]
}

fn flatten_schedule(
    schedule: Option<&SuppressionSchedule>,
    recurrence_type: RecurrenceType,
) -> Vec<ScheduleBlock> {
    let Some(schedule) = schedule else {
        return Vec::new();
    };

    let recurrence_weekly = if recurrence_type == RecurrenceType::Weekly {
        flatten_weekly(&schedule.recurrence_values)
    } else {
        Vec::new()
    };

    let recurrence_monthly = if recurrence_type == RecurrenceType::Monthly {
        schedule.recurrence_values.iter().copied().collect()
    } else {
        BTreeSet::new()
    };

    vec![ScheduleBlock {
        start_date_utc: flatten_instant(schedule.start_date.as_deref(), schedule.start_time.as_deref()),
        end_date_utc: flatten_instant(schedule.end_date.as_deref(), schedule.end_time.as_deref()),
        recurrence_weekly,
        recurrence_monthly,
    }]
}

fn flatten_weekly(values: &[i32]) -> Vec<String> {
    let indices: BTreeSet<i32> = values.iter().copied().collect();
    indices
        .into_iter()
        .filter_map(|i| {
            let name = weekday_name(i);
            if name.is_none() {
                tracing::warn!("ignoring unknown weekday index {} in remote schedule", i);
            }
            name
        })
        .map(str::to_string)
        .collect()
}

fn flatten_instant(date: Option<&str>, time: Option<&str>) -> String {
    let (Some(date), Some(time)) = (date, time) else {
        return String::new();
    };

    join_timestamp(date, time).unwrap_or_else(|e| {
        tracing::warn!("{}", e);
        String::new()
    })
}
