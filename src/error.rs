//! Error types for the planner.
//!
//! `FieldError` covers parsing of the enumerated task fields and doubles as
//! the clap value-parser error. `PlannerError` is what store and planner
//! operations return.

use thiserror::Error;

use crate::task::TaskId;

/// A day or hour label that is not a member of its enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown day '{0}' (expected Monday..Sunday)")]
    InvalidDay(String),

    #[error("invalid hour '{0}' (expected HH:00 between 00:00 and 23:00)")]
    InvalidHour(String),
}

/// Errors raised while loading, mutating or persisting the task list.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Task {0} not found")]
    UnknownTask(TaskId),
}
