//! Task form handling for the terminal user interface.
//!
//! `TaskForm` holds the widget-side state of the create/edit modal: the two
//! text inputs, the day and hour selectors, and which field has focus. The
//! app pushes every change into the planner's draft, so the form never owns
//! task data beyond what is on screen.

use crate::fields::{Day, FormField, Hour};
use crate::task::TaskDraft;
use crate::tui::input::InputField;

/// Widget state for the create/edit modal.
#[derive(Clone, Debug)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub day: Day,
    pub time: Hour,
    pub current_field: FormField,
}

impl TaskForm {
    /// Create a form showing the given draft, focused on the title.
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self {
            title: InputField::with_value(&draft.title),
            description: InputField::with_value(&draft.description),
            day: draft.day,
            time: draft.time,
            current_field: FormField::Title,
        }
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        let idx = self.field_index();
        self.current_field = FormField::ALL[(idx + 1) % FormField::ALL.len()];
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        let idx = self.field_index();
        self.current_field = FormField::ALL[(idx + FormField::ALL.len() - 1) % FormField::ALL.len()];
    }

    fn field_index(&self) -> usize {
        FormField::ALL
            .iter()
            .position(|&f| f == self.current_field)
            .unwrap_or(0)
    }

    /// The focused text input, if the focused field is a text field.
    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Day | FormField::Time => None,
        }
    }

    /// Handle character input for the currently active field.
    ///
    /// Newlines are only accepted by the description.
    pub fn handle_char(&mut self, c: char) {
        if c == '\n' && self.current_field != FormField::Description {
            return;
        }
        if let Some(input) = self.active_input() {
            input.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(input) = self.active_input() {
            input.handle_delete();
        }
    }

    pub fn handle_home(&mut self) {
        if let Some(input) = self.active_input() {
            input.move_cursor_home();
        }
    }

    pub fn handle_end(&mut self) {
        if let Some(input) = self.active_input() {
            input.move_cursor_end();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            FormField::Title | FormField::Description => {
                if let Some(input) = self.active_input() {
                    if right {
                        input.move_cursor_right();
                    } else {
                        input.move_cursor_left();
                    }
                }
            }
            FormField::Day => {
                self.day = if right { self.day.next() } else { self.day.prev() };
            }
            FormField::Time => {
                self.time = if right { self.time.next() } else { self.time.prev() };
            }
        }
    }

    /// Current text of a field, as it would be written into the draft.
    pub fn value_of(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.value.clone(),
            FormField::Description => self.description.value.clone(),
            FormField::Day => self.day.label().to_string(),
            FormField::Time => self.time.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_cycle_wraps() {
        let mut form = TaskForm::from_draft(&TaskDraft::default());
        assert_eq!(form.current_field, FormField::Title);
        form.prev_field();
        assert_eq!(form.current_field, FormField::Time);
        form.next_field();
        form.next_field();
        assert_eq!(form.current_field, FormField::Description);
    }

    #[test]
    fn test_selectors_cycle() {
        let mut form = TaskForm::from_draft(&TaskDraft::default());
        form.current_field = FormField::Day;
        form.handle_left_right(false);
        assert_eq!(form.day, Day::Sunday);
        form.current_field = FormField::Time;
        form.handle_left_right(false);
        assert_eq!(form.value_of(FormField::Time), "23:00");
        form.handle_left_right(true);
        form.handle_left_right(true);
        assert_eq!(form.value_of(FormField::Time), "01:00");
    }

    #[test]
    fn test_left_right_moves_text_cursor() {
        let mut form = TaskForm::from_draft(&TaskDraft::default());
        for c in "abc".chars() {
            form.handle_char(c);
        }
        form.handle_left_right(false);
        form.handle_left_right(false);
        form.handle_char('X');
        assert_eq!(form.title.value, "aXbc");
        form.handle_left_right(true);
        form.handle_char('Y');
        assert_eq!(form.title.value, "aXbYc");
    }

    #[test]
    fn test_newline_only_in_description() {
        let mut form = TaskForm::from_draft(&TaskDraft::default());
        form.handle_char('a');
        form.handle_char('\n');
        assert_eq!(form.title.value, "a");
        form.next_field();
        form.handle_char('b');
        form.handle_char('\n');
        form.handle_char('c');
        assert_eq!(form.description.value, "b\nc");
        form.next_field();
        form.handle_char('x');
        form.handle_backspace();
        assert_eq!(form.value_of(FormField::Day), "Monday");
    }
}
