//! Turns raw online-course logs (events and submissions) into a supervised
//! dataset: per-user features X from each user's first days of activity and
//! a pass/fail label y from their full history.
//!
//! - [`time`] buckets epoch seconds into calendar days
//! - [`interactions`] merges both logs into one ordered interaction log
//! - [`window`] keeps each user's first N days
//! - [`features`] builds X
//! - [`labels`] builds y
//! - [`pipeline`] composes them into [`get_x_y`]

pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod features;
pub mod interactions;
pub mod labels;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod time;
pub mod window;

pub use config::PipelineConfig;
pub use error::{DatasetError, Result};
pub use interactions::{Action, InteractionRecord};
pub use models::{EventRecord, FeatureTable, LabelSet, SubmissionRecord, Timestamped};
pub use pipeline::get_x_y;
