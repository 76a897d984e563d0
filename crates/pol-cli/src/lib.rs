//! CLI library components for the county politics pipeline.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
