//! Terminal User Interface
//!
//! Presentation shell for the riddle hunt using ratatui

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::NoticeLevel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the game
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
    pub border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            info: Color::Blue,
            border: Color::DarkGray,
            header: Color::Magenta,
        }
    }
}

impl Theme {
    /// Color for a notice level
    pub fn level_color(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Info => self.info,
            NoticeLevel::Success => self.success,
            NoticeLevel::Warning => self.warning,
            NoticeLevel::Error => self.alert,
        }
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// Smaller logo for header
pub const SMALL_LOGO: &str = " VENDETA ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════╗
║                   CONTROLS                    ║
╠═══════════════════════════════════════════════╣
║  s / Enter   Scan the code for this clue      ║
║  ?           Toggle this help                 ║
║  Esc         Close help                       ║
║  q           Quit                             ║
╠═══════════════════════════════════════════════╣
║                  SCANNER                      ║
╠═══════════════════════════════════════════════╣
║  Type or paste the code, Enter to scan        ║
║  Esc cancels the scan                         ║
╠═══════════════════════════════════════════════╣
║              CAMERA PERMISSION                ║
╠═══════════════════════════════════════════════╣
║  y / Enter   Allow camera access              ║
║  n / Esc     Deny                             ║
╚═══════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Clue
            Constraint::Length(3), // Notice
            Constraint::Length(1), // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the clue area layout (clue + progress + action hint)
pub fn create_clue_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Clue text
            Constraint::Length(2), // Progress
            Constraint::Length(1), // Action hint
        ])
        .split(area)
        .to_vec()
}

/// A rectangle of at most `width` x `height` centered in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 20, 5);
        let popup = centered_rect(60, 10, area);
        assert_eq!(popup, area);

        let popup = centered_rect(10, 3, Rect::new(0, 0, 30, 9));
        assert_eq!(popup, Rect::new(10, 3, 10, 3));
    }
}
