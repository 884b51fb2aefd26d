//! Task data structures.
//!
//! A `Task` is an activity pinned to one weekday and one hour. A `TaskDraft`
//! is the scratch copy bound to whichever form is open.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields::{Day, Hour};

/// Stable task identifier, assigned at creation and never reused while the
/// task exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An activity in the weekly grid.
///
/// Records written before ids existed deserialize with id 0; the planner
/// assigns them real ids on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub day: Day,
    pub time: Hour,
}

impl Task {
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            day: draft.day,
            time: draft.time,
        }
    }

    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            day: self.day,
            time: self.time,
        }
    }

    /// True when the task belongs in the given grid cell.
    pub fn in_slot(&self, day: Day, hour: Hour) -> bool {
        self.day == day && self.time == hour
    }
}

/// The editable fields of a task, without identity.
///
/// The default is the blank create form: Monday at 00:00.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub day: Day,
    pub time: Hour,
}

impl TaskDraft {
    /// Blank draft pinned to a particular slot.
    pub fn at(day: Day, time: Hour) -> Self {
        TaskDraft {
            day,
            time,
            ..TaskDraft::default()
        }
    }
}
