//! Shared utilities for the county pipeline crates.
//!
//! This crate provides the bridge between [`pol_model::Dataset`] and Polars
//! `DataFrame`s, along with `AnyValue` helpers used by the join stage.

pub mod polars;

pub use polars::{any_to_value, dataset_to_frame, format_numeric, frame_to_dataset};
