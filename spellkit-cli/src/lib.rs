//! SPELLKIT command-line library exports.

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod worksheet;
