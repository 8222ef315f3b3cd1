//! Terminal front end: one module per command group.

pub mod config;
mod prompt;
pub mod printers;
pub mod wizard;
