//! Weekday name/index table.
//!
//! The API encodes weekly recurrence as 0-based day indices starting on
//! Sunday. [`WEEKDAYS`] maps index to name and [`WEEKDAY_INDEX`] is its
//! reverse.

use phf::phf_map;

/// Weekday names by API index.
pub const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Reverse of [`WEEKDAYS`].
pub static WEEKDAY_INDEX: phf::Map<&'static str, i32> = phf_map! {
    "Sunday" => 0,
    "Monday" => 1,
    "Tuesday" => 2,
    "Wednesday" => 3,
    "Thursday" => 4,
    "Friday" => 5,
    "Saturday" => 6,
};

/// Index of a weekday name; names are case-sensitive.
pub fn weekday_index(name: &str) -> Option<i32> {
    WEEKDAY_INDEX.get(name).copied()
}

/// Name of a weekday index, `None` outside `0..=6`.
pub fn weekday_name(index: i32) -> Option<&'static str> {
    usize::try_from(index)
        .ok()
        .and_then(|i| WEEKDAYS.get(i))
        .copied()
}
