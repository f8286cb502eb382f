//! Access to the AlertsManagement action rules REST API.

mod client;

pub use client::*;
