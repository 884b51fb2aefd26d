//! The task store and its form state.
//!
//! `Planner` owns the authoritative task list, mirrors every mutation to the
//! backing `KvStore` as a full-list write, and tracks which form is open.
//! Both the TUI and the CLI commands go through the same open/edit/submit
//! cycle, so there is exactly one mutator.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::{FieldError, PlannerError};
use crate::fields::{Day, FormField, Hour};
use crate::store::KvStore;
use crate::task::{Task, TaskDraft, TaskId};
use crate::week::slot_tasks;

/// Key the task list is stored under.
pub const TASKS_KEY: &str = "tasks";
/// Key an unparseable task list is moved to so the next write cannot lose it.
pub const CORRUPT_TASKS_KEY: &str = "tasks.corrupt";

/// Which form, if any, is open. Only one can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Closed,
    Creating(TaskDraft),
    Editing { id: TaskId, draft: TaskDraft },
}

/// Task list plus form state over a key-value store.
#[derive(Debug)]
pub struct Planner<S: KvStore> {
    store: S,
    tasks: Vec<Task>,
    form: FormState,
}

impl<S: KvStore> Planner<S> {
    /// Load the task list from the store.
    ///
    /// An absent list starts empty. A malformed list also starts empty; its
    /// raw text is stashed under `CORRUPT_TASKS_KEY`. Records without an id,
    /// or with a duplicate id, are given fresh ids.
    pub fn load(mut store: S) -> Self {
        let tasks = match store.get(TASKS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => tasks,
                Err(e) => {
                    warn!(error = %e, "stored task list is malformed, starting empty");
                    if let Err(e) = store.set(CORRUPT_TASKS_KEY, &raw) {
                        warn!(error = %e, "could not stash malformed task list");
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read task list, starting empty");
                Vec::new()
            }
        };

        let mut planner = Planner {
            store,
            tasks,
            form: FormState::Closed,
        };
        planner.assign_missing_ids();
        info!(tasks = planner.tasks.len(), "loaded tasks");
        planner
    }

    fn assign_missing_ids(&mut self) {
        let mut seen = HashSet::new();
        let missing: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.id.0 == 0 || !seen.insert(t.id))
            .map(|(i, _)| i)
            .collect();
        for i in missing {
            self.tasks[i].id = self.next_id();
        }
    }

    /// Generate the next available task ID.
    ///
    /// Normally one past the highest id. Once the highest id is `u64::MAX`
    /// the lowest unused id is handed out instead.
    fn next_id(&self) -> TaskId {
        let max = self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0);
        if let Some(id) = max.checked_add(1) {
            return TaskId(id);
        }
        let used: HashSet<u64> = self.tasks.iter().map(|t| t.id.0).collect();
        TaskId((1..u64::MAX).find(|id| !used.contains(id)).unwrap_or(u64::MAX))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// The draft bound to the open form, if any.
    pub fn draft(&self) -> Option<&TaskDraft> {
        match &self.form {
            FormState::Closed => None,
            FormState::Creating(draft) | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Tasks in one grid cell, in list order.
    pub fn tasks_in_slot(&self, day: Day, hour: Hour) -> Vec<&Task> {
        slot_tasks(&self.tasks, day, hour)
    }

    /// Open the create form with a blank draft.
    pub fn open_create_form(&mut self) {
        self.open_create_form_with(TaskDraft::default());
    }

    /// Open the create form with a given starting draft.
    pub fn open_create_form_with(&mut self, draft: TaskDraft) {
        self.form = FormState::Creating(draft);
    }

    /// Open the edit form for a task, copying it into the draft.
    pub fn open_edit_form(&mut self, id: TaskId) -> Result<(), PlannerError> {
        let task = self.get(id).ok_or(PlannerError::UnknownTask(id))?;
        self.form = FormState::Editing {
            id,
            draft: task.to_draft(),
        };
        Ok(())
    }

    /// Set one field of the open draft.
    ///
    /// Day and time values must parse; on failure the draft keeps its old
    /// value. Does nothing when no form is open.
    pub fn update_draft_field(&mut self, field: FormField, value: &str) -> Result<(), FieldError> {
        let draft = match &mut self.form {
            FormState::Closed => {
                debug!(?field, "draft update with no open form ignored");
                return Ok(());
            }
            FormState::Creating(draft) | FormState::Editing { draft, .. } => draft,
        };
        match field {
            FormField::Title => draft.title = value.to_string(),
            FormField::Description => draft.description = value.to_string(),
            FormField::Day => draft.day = value.parse()?,
            FormField::Time => draft.time = value.parse()?,
        }
        Ok(())
    }

    /// Append the create draft as a new task and close the form.
    ///
    /// Returns `None` when the create form is not open. A failed write leaves
    /// the list and the form untouched.
    pub fn submit_create(&mut self) -> Result<Option<TaskId>, PlannerError> {
        let FormState::Creating(draft) = &self.form else {
            debug!("submit_create with no create form open ignored");
            return Ok(None);
        };
        let id = self.next_id();
        let mut updated = self.tasks.clone();
        updated.push(Task::from_draft(id, draft.clone()));
        self.commit(updated)?;
        info!(%id, "created task");
        Ok(Some(id))
    }

    /// Overwrite the edited task with the draft and close the form.
    ///
    /// Returns `None` when no task is being edited.
    pub fn submit_edit(&mut self) -> Result<Option<TaskId>, PlannerError> {
        let FormState::Editing { id, draft } = &self.form else {
            debug!("submit_edit with no active selection ignored");
            return Ok(None);
        };
        let id = *id;
        let Some(pos) = self.position(id) else {
            warn!(%id, "edited task no longer exists");
            self.form = FormState::Closed;
            return Ok(None);
        };
        let mut updated = self.tasks.clone();
        updated[pos] = Task::from_draft(id, draft.clone());
        self.commit(updated)?;
        info!(%id, "updated task");
        Ok(Some(id))
    }

    /// Remove the task being edited and close the form.
    ///
    /// Returns the removed task, or `None` when no task is being edited.
    pub fn delete_current(&mut self) -> Result<Option<Task>, PlannerError> {
        let FormState::Editing { id, .. } = &self.form else {
            debug!("delete with no active selection ignored");
            return Ok(None);
        };
        let id = *id;
        let Some(pos) = self.position(id) else {
            warn!(%id, "deleted task no longer exists");
            self.form = FormState::Closed;
            return Ok(None);
        };
        let mut updated = self.tasks.clone();
        let removed = updated.remove(pos);
        self.commit(updated)?;
        info!(%id, "deleted task");
        Ok(Some(removed))
    }

    /// Discard the create draft.
    pub fn close_create_form(&mut self) {
        if matches!(self.form, FormState::Creating(_)) {
            self.form = FormState::Closed;
        }
    }

    /// Discard the edit draft and the selection.
    pub fn close_edit_form(&mut self) {
        if matches!(self.form, FormState::Editing { .. }) {
            self.form = FormState::Closed;
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Persist the full list, then adopt it and close the form.
    fn commit(&mut self, updated: Vec<Task>) -> Result<(), PlannerError> {
        let data = serde_json::to_string(&updated)?;
        self.store.set(TASKS_KEY, &data)?;
        self.tasks = updated;
        self.form = FormState::Closed;
        Ok(())
    }
}
