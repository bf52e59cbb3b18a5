//! Border chrome shared by the field editors.

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

/// Create a bordered block for a field.
///
/// Red when the field failed validation, cyan when focused, dark gray
/// otherwise.  Invalid wins over focused so errors stay visible while the
/// user corrects them.
pub fn field_block(label: &str, focused: bool, invalid: bool) -> Block<'_> {
    let color = if invalid {
        Color::Red
    } else if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    Block::new()
        .borders(Borders::ALL)
        .title(label)
        .border_style(Style::default().fg(color))
}
