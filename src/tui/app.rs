//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which draws the week grid, moves
//! the grid cursor, and drives the planner's create/edit/delete cycle from
//! key events. All task data lives in the `Planner`; the app only keeps
//! cursor and widget state.

use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::error;

use crate::error::PlannerError;
use crate::fields::{Day, FormField, Hour};
use crate::planner::{FormState, Planner};
use crate::store::{FileStore, KvStore};
use crate::task::{TaskDraft, TaskId};
use crate::tui::{
    colors::{DARK_RED, GOLD, HEADER_BLUE, TASK_BLUE},
    enums::AppState,
    task_form::TaskForm,
    utils::{centered_fixed, centered_rect},
};
use crate::week::{cell_label, truncate};

/// Main application state for the terminal user interface.
pub struct App<S: KvStore> {
    state: AppState,
    planner: Planner<S>,
    cursor_day: Day,
    cursor_hour: Hour,
    /// Which of the stacked tasks in the cursor cell is selected.
    stack_index: usize,
    grid_state: TableState,
    task_form: TaskForm,
    status_message: String,
}

impl App<FileStore> {
    /// Create a new App, loading the planner from the store file.
    pub fn new(db_path: &Path) -> Result<Self, PlannerError> {
        let store = FileStore::open(db_path)?;
        let now = Local::now();
        let mut app = App::with_planner(Planner::load(store));
        app.cursor_day = Day::from(now.weekday());
        app.cursor_hour = Hour::new(now.hour() as u8).unwrap_or_default();
        Ok(app)
    }
}

impl<S: KvStore> App<S> {
    pub fn with_planner(planner: Planner<S>) -> Self {
        App {
            state: AppState::Week,
            planner,
            cursor_day: Day::Monday,
            cursor_hour: Hour::default(),
            stack_index: 0,
            grid_state: TableState::default(),
            task_form: TaskForm::from_draft(&TaskDraft::default()),
            status_message: String::new(),
        }
    }

    /// Set a status message to display in the status bar.
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn move_cursor(&mut self, day: Day, hour: Hour) {
        if (day, hour) != (self.cursor_day, self.cursor_hour) {
            self.cursor_day = day;
            self.cursor_hour = hour;
            self.stack_index = 0;
        }
    }

    /// Id of the selected task in the cursor cell, if the cell is not empty.
    fn selected_task_id(&self) -> Option<TaskId> {
        let slot = self.planner.tasks_in_slot(self.cursor_day, self.cursor_hour);
        let last = slot.len().checked_sub(1)?;
        slot.get(self.stack_index.min(last)).map(|t| t.id)
    }

    /// Put the cursor on a task's cell and select it within its stack.
    fn focus_task(&mut self, id: TaskId) {
        if let Some(task) = self.planner.get(id) {
            let (day, hour) = (task.day, task.time);
            self.move_cursor(day, hour);
            self.stack_index = self
                .planner
                .tasks_in_slot(day, hour)
                .iter()
                .position(|t| t.id == id)
                .unwrap_or(0);
        }
    }

    /// Show the modal for whatever form the planner has open.
    fn show_form(&mut self) {
        if let Some(draft) = self.planner.draft() {
            self.task_form = TaskForm::from_draft(draft);
            self.state = AppState::Form;
        }
    }

    /// Open the create form pinned to the cursor cell.
    fn open_create(&mut self) {
        self.planner
            .open_create_form_with(TaskDraft::at(self.cursor_day, self.cursor_hour));
        self.show_form();
    }

    fn open_edit(&mut self, id: TaskId) {
        match self.planner.open_edit_form(id) {
            Ok(()) => self.show_form(),
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn is_editing(&self) -> bool {
        matches!(self.planner.form(), FormState::Editing { .. })
    }

    /// Push the focused form field into the planner's draft.
    fn sync_draft(&mut self) {
        let field = self.task_form.current_field;
        let value = self.task_form.value_of(field);
        if let Err(e) = self.planner.update_draft_field(field, &value) {
            self.set_status_message(format!("Error: {e}"));
        }
    }

    /// Handle keyboard input when the week grid has focus.
    ///
    /// Returns true if the application should quit.
    fn handle_week_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.cursor_hour.value() > 0 {
                    self.move_cursor(self.cursor_day, self.cursor_hour.prev());
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if usize::from(self.cursor_hour.value()) + 1 < Hour::COUNT {
                    self.move_cursor(self.cursor_day, self.cursor_hour.next());
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.cursor_day != Day::Monday {
                    self.move_cursor(self.cursor_day.prev(), self.cursor_hour);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.cursor_day != Day::Sunday {
                    self.move_cursor(self.cursor_day.next(), self.cursor_hour);
                }
            }
            KeyCode::Tab => {
                let count = self.planner.tasks_in_slot(self.cursor_day, self.cursor_hour).len();
                if count > 1 {
                    self.stack_index = (self.stack_index.min(count - 1) + 1) % count;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_task_id() {
                Some(id) => self.open_edit(id),
                None => self.open_create(),
            },
            KeyCode::Char('a') => self.open_create(),
            KeyCode::Char('?') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the create or edit form.
    fn handle_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match key {
            KeyCode::Esc => {
                self.planner.close_create_form();
                self.planner.close_edit_form();
                self.state = AppState::Week;
                self.set_status_message("Cancelled".to_string());
            }
            KeyCode::Char('s') if ctrl => self.save_form(),
            KeyCode::Char('d') if ctrl => {
                if self.is_editing() {
                    self.state = AppState::ConfirmDelete;
                }
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => {
                self.task_form.handle_left_right(false);
                self.sync_draft();
            }
            KeyCode::Right => {
                self.task_form.handle_left_right(true);
                self.sync_draft();
            }
            KeyCode::Home => self.task_form.handle_home(),
            KeyCode::End => self.task_form.handle_end(),
            KeyCode::Backspace => {
                self.task_form.handle_backspace();
                self.sync_draft();
            }
            KeyCode::Delete => {
                self.task_form.handle_delete();
                self.sync_draft();
            }
            KeyCode::Enter => {
                if self.task_form.current_field == FormField::Description {
                    self.task_form.handle_char('\n');
                    self.sync_draft();
                } else {
                    self.save_form();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                self.task_form.handle_char(c);
                self.sync_draft();
            }
            _ => {}
        }
    }

    /// Submit whichever form is open. On failure the form stays open.
    fn save_form(&mut self) {
        let is_edit = self.is_editing();
        let result = if is_edit {
            self.planner.submit_edit()
        } else {
            self.planner.submit_create()
        };
        match result {
            Ok(Some(id)) => {
                self.state = AppState::Week;
                self.focus_task(id);
                self.set_status_message(
                    if is_edit { "Task updated" } else { "Task created" }.to_string(),
                );
            }
            Ok(None) => self.state = AppState::Week,
            Err(e) => {
                error!(error = %e, "saving task failed");
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    /// Handle keyboard input in the delete confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                match self.planner.delete_current() {
                    Ok(Some(task)) => {
                        self.state = AppState::Week;
                        self.set_status_message(format!("Deleted '{}'", task.title));
                    }
                    Ok(None) => self.state = AppState::Week,
                    Err(e) => {
                        error!(error = %e, "deleting task failed");
                        self.state = AppState::Form;
                        self.set_status_message(format!("Error deleting task: {e}"));
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::Form;
            }
            _ => {}
        }
    }

    /// Dispatch one key press according to the current screen.
    ///
    /// Returns true if the application should quit.
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status_message.clear();
        match self.state {
            AppState::Week => return self.handle_week_input(key, modifiers),
            AppState::Form => self.handle_form_input(key, modifiers),
            AppState::ConfirmDelete => self.handle_confirm_input(key),
            AppState::Help => self.state = AppState::Week,
        }
        false
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let now = Local::now();
        let header_text = Line::from(vec![
            Span::styled("WEEKLY PLANNER", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                now.format("%A %Y-%m-%d %H:%M").to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]);
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    /// Render the 7x24 grid. Cells are derived from the task list on every draw.
    fn render_week(&mut self, f: &mut Frame, area: Rect) {
        let now = Local::now();
        let today = Day::from(now.weekday());
        let this_hour = Hour::new(now.hour() as u8);
        let narrow = area.width < 100;

        let header_cells = std::iter::once(Cell::from("Hour")).chain(Day::ALL.iter().map(|&day| {
            let label = if narrow { day.short() } else { day.label() };
            let style = if day == today {
                Style::default().bg(HEADER_BLUE).fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Cell::from(label).style(style)
        }));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = Hour::all()
            .map(|hour| {
                let hour_style = if Some(hour) == this_hour {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let mut cells = vec![Cell::from(hour.label()).style(hour_style)];
                for day in Day::ALL {
                    let slot = self.planner.tasks_in_slot(day, hour);
                    let is_cursor = day == self.cursor_day && hour == self.cursor_hour;
                    let text = match slot.len() {
                        n if n > 1 && is_cursor => {
                            let k = self.stack_index.min(n - 1);
                            format!("[{}/{}] {}", k + 1, n, slot[k].title)
                        }
                        _ => cell_label(&slot),
                    };
                    let mut style = if slot.is_empty() {
                        Style::default()
                    } else {
                        Style::default().bg(TASK_BLUE).fg(Color::White)
                    };
                    if is_cursor {
                        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                    }
                    cells.push(Cell::from(text).style(style));
                }
                Row::new(cells)
            })
            .collect();

        let widths = std::iter::once(Constraint::Length(6))
            .chain(Day::ALL.iter().map(|_| Constraint::Fill(1)))
            .collect::<Vec<_>>();

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Week ({} tasks) - Press '?' for help",
                self.planner.tasks().len()
            )));

        // Selecting the cursor row keeps it scrolled into view.
        self.grid_state.select(Some(usize::from(self.cursor_hour.value())));
        f.render_stateful_widget(table, area, &mut self.grid_state);
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let is_edit = self.is_editing();
        let popup = centered_fixed(64, 21, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(if is_edit { "Edit Activity" } else { "Add Activity" })
            .border_style(Style::default().fg(HEADER_BLUE));
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(6), // Description
                Constraint::Length(3), // Day
                Constraint::Length(3), // Time
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let focus_style = |field: FormField| {
            if self.task_form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        let title_input = Paragraph::new(self.task_form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Title")
                .border_style(focus_style(FormField::Title)),
        );
        f.render_widget(title_input, chunks[0]);

        let (desc_line, desc_col) = self.task_form.description.cursor_line_col();
        let desc_visible = usize::from(chunks[1].height.saturating_sub(2)).max(1);
        let desc_scroll = desc_line.saturating_sub(desc_visible - 1);
        let description_input = Paragraph::new(self.task_form.description.value.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Description (Enter for new line)")
                    .border_style(focus_style(FormField::Description)),
            )
            .scroll((desc_scroll as u16, 0));
        f.render_widget(description_input, chunks[1]);

        let day_selector = Paragraph::new(format!("◀ {} ▶", self.task_form.day)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Day")
                .border_style(focus_style(FormField::Day)),
        );
        f.render_widget(day_selector, chunks[2]);

        let time_selector = Paragraph::new(format!("◀ {} ▶", self.task_form.time)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Time")
                .border_style(focus_style(FormField::Time)),
        );
        f.render_widget(time_selector, chunks[3]);

        let help_text = if is_edit {
            "Tab/↑↓: Navigate  ←→: Change day/time  Enter/Ctrl+S: Save  Ctrl+D: Delete  Esc: Cancel"
        } else {
            "Tab/↑↓: Navigate  ←→: Change day/time  Enter/Ctrl+S: Save  Esc: Cancel"
        };
        let instructions = Paragraph::new(help_text).wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[4]);

        if self.state != AppState::Form {
            return;
        }
        let cursor = match self.task_form.current_field {
            FormField::Title => Some((chunks[0], 0, self.task_form.title.cursor)),
            FormField::Description => Some((chunks[1], desc_line - desc_scroll, desc_col)),
            FormField::Day | FormField::Time => None,
        };
        if let Some((chunk, line, col)) = cursor {
            let max_x = chunk.x + chunk.width.saturating_sub(2);
            let x = (chunk.x + 1 + col as u16).min(max_x);
            f.set_cursor_position((x, chunk.y + 1 + line as u16));
        }
    }

    /// Render a confirmation dialog for deleting the edited task.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let title = self.planner.draft().map(|d| d.title.as_str()).unwrap_or("");
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this activity?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(truncate(title, 40)),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the help screen with keyboard shortcuts.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(vec![Span::styled("Weekly Planner Help", bold)]),
            Line::from(""),
            Line::from(vec![Span::styled("Week Grid:", bold)]),
            Line::from("  ←↓↑→ / hjkl  Move between days and hours"),
            Line::from("  Tab          Cycle through activities sharing a cell"),
            Line::from("  Enter/Space  Edit the selected activity (or add one to an empty cell)"),
            Line::from("  a            Add a new activity"),
            Line::from("  ?/F1         Show this help"),
            Line::from("  q/Esc/Ctrl+C Quit"),
            Line::from(""),
            Line::from(vec![Span::styled("Activity Form:", bold)]),
            Line::from("  Tab/↑↓       Move between fields"),
            Line::from("  ←→           Change day and time"),
            Line::from("  Enter        Save (new line in the description)"),
            Line::from("  Ctrl+S       Save from any field"),
            Line::from("  Ctrl+D       Delete the activity being edited"),
            Line::from("  Esc          Cancel without saving"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Week => {
                    let count = self.planner.tasks_in_slot(self.cursor_day, self.cursor_hour).len();
                    format!(
                        "{} {} | {} here | a: Add  Enter: Open  ?: Help  q: Quit",
                        self.cursor_day,
                        self.cursor_hour,
                        count
                    )
                }
                AppState::Form if self.is_editing() => "Edit Activity".to_string(),
                AppState::Form => "Add Activity".to_string(),
                AppState::ConfirmDelete => "Confirm Delete".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(HEADER_BLUE).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_header(f, chunks[0]);
        match self.state {
            AppState::Week => self.render_week(f, chunks[1]),
            AppState::Form => {
                self.render_week(f, chunks[1]);
                self.render_task_form(f, chunks[1]);
            }
            AppState::ConfirmDelete => {
                self.render_week(f, chunks[1]);
                self.render_task_form(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
            AppState::Help => self.render_help(f, chunks[1]),
        }
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemoryStore> {
        App::with_planner(Planner::load(MemoryStore::default()))
    }

    fn press(app: &mut App<MemoryStore>, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE)
    }

    fn ctrl(app: &mut App<MemoryStore>, c: char) -> bool {
        app.handle_key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    /// Adds "Study"/"Math" on Tuesday 09:00 through the add form.
    fn add_study(app: &mut App<MemoryStore>) {
        press(app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::Form);
        type_text(app, "Study");
        press(app, KeyCode::Tab);
        type_text(app, "Math");
        press(app, KeyCode::Tab);
        press(app, KeyCode::Right);
        press(app, KeyCode::Tab);
        for _ in 0..9 {
            press(app, KeyCode::Right);
        }
        ctrl(app, 's');
    }

    #[test]
    fn test_add_flow_creates_task_and_focuses_it() {
        let mut app = app();
        add_study(&mut app);

        assert_eq!(app.state, AppState::Week);
        let tasks = app.planner.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Study");
        assert_eq!(tasks[0].description, "Math");
        assert_eq!(tasks[0].day, Day::Tuesday);
        assert_eq!(tasks[0].time.label(), "09:00");
        assert_eq!((app.cursor_day, app.cursor_hour.value()), (Day::Tuesday, 9));
        assert!(screen(&mut app).contains("Study"));
    }

    #[test]
    fn test_escape_discards_draft() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Nope");
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.state, AppState::Week);
        assert!(app.planner.tasks().is_empty());
        assert_eq!(app.planner.form(), &FormState::Closed);
    }

    #[test]
    fn test_enter_in_description_adds_newline() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "one");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "two");
        assert_eq!(app.state, AppState::Form);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.planner.tasks()[0].description, "one\ntwo");
    }

    #[test]
    fn test_edit_and_delete_from_grid() {
        let mut app = app();
        add_study(&mut app);

        press(&mut app, KeyCode::Enter);
        assert!(app.is_editing());
        assert_eq!(app.task_form.title.value, "Study");
        type_text(&mut app, " hard");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.planner.tasks()[0].title, "Study hard");

        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 'd');
        assert_eq!(app.state, AppState::ConfirmDelete);
        assert!(screen(&mut app).contains("Delete this activity?"));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::Form);
        assert_eq!(app.planner.tasks().len(), 1);

        ctrl(&mut app, 'd');
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state, AppState::Week);
        assert!(app.planner.tasks().is_empty());
    }

    #[test]
    fn test_add_key_seeds_cursor_slot() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('a'));
        let draft = app.planner.draft().unwrap();
        assert_eq!((draft.day, draft.time.value()), (Day::Tuesday, 2));
        assert!(draft.title.is_empty());
    }

    #[test]
    fn test_delete_is_unavailable_in_add_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        ctrl(&mut app, 'd');
        assert_eq!(app.state, AppState::Form);
    }

    #[test]
    fn test_enter_on_empty_cell_seeds_slot() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        let draft = app.planner.draft().unwrap();
        assert_eq!(draft.day, Day::Wednesday);
        assert_eq!(draft.time.value(), 1);
    }

    #[test]
    fn test_tab_cycles_stacked_tasks() {
        let mut app = app();
        for title in ["First", "Second"] {
            press(&mut app, KeyCode::Char('a'));
            type_text(&mut app, title);
            press(&mut app, KeyCode::Enter);
        }
        // Saving focused the second task; step off the cell and back.
        assert_eq!(app.stack_index, 1);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        let ids: Vec<TaskId> = app.planner.tasks().iter().map(|t| t.id).collect();
        assert_eq!(app.selected_task_id(), Some(ids[0]));
        assert!(screen(&mut app).contains("[1/2] First"));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_task_id(), Some(ids[1]));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.task_form.title.value, "Second");
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_task_id(), Some(ids[0]));
    }

    #[test]
    fn test_cursor_stays_inside_grid() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Left);
        assert_eq!((app.cursor_day, app.cursor_hour.value()), (Day::Monday, 0));
        for _ in 0..40 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Right);
        }
        assert_eq!((app.cursor_day, app.cursor_hour.value()), (Day::Sunday, 23));
    }

    #[test]
    fn test_failed_save_keeps_form_open() {
        let mut store = MemoryStore::default();
        store.fail_writes = true;
        let mut app = App::with_planner(Planner::load(store));
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Lost?");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Form);
        assert!(app.status_message.starts_with("Error"));
        assert_eq!(app.planner.draft().map(|d| d.title.as_str()), Some("Lost?"));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::Help);
        assert!(screen(&mut app).contains("Weekly Planner Help"));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Week);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(ctrl(&mut app, 'c'));
    }
}
