//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Task activators in the grid
pub const TASK_BLUE: Color = Color::Rgb(59, 130, 246);
/// Header, status bar and today's column
pub const HEADER_BLUE: Color = Color::Rgb(30, 64, 175);
/// Focused form field
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Delete confirmation
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
