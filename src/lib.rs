//! actionrule - declarative management of Azure Monitor action rules
//!
//! This library crate exposes the core functionality for integration testing.

pub mod apply;
pub mod azure;
pub mod config;
pub mod plan;
pub mod resource;
pub mod state;
