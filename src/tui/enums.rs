//! Enumerations for TUI state management.

/// Which screen the terminal user interface is showing.
///
/// The form itself lives in the planner's `FormState`; `Form` here only says
/// the modal is on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Week,
    Form,
    ConfirmDelete,
    Help,
}
