//! Custom widgets for the game UI

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A progress bar showing solved riddles
pub struct ProgressBar {
    solved: usize,
    total: usize,
    label: String,
    color: Color,
    complete_color: Color,
}

impl ProgressBar {
    pub fn new(label: &str, solved: usize, total: usize) -> Self {
        Self {
            solved: solved.min(total),
            total,
            label: label.to_string(),
            color: Color::Cyan,
            complete_color: Color::Green,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn complete_color(mut self, color: Color) -> Self {
        self.complete_color = color;
        self
    }

    /// Filled cells for a bar `width` cells wide
    fn filled(&self, width: u16) -> u16 {
        if self.total == 0 {
            return 0;
        }
        ((self.solved * width as usize) / self.total) as u16
    }
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let color = if self.total > 0 && self.solved == self.total {
            self.complete_color
        } else {
            self.color
        };

        let label = format!("{}: {}/{}", self.label, self.solved, self.total);
        buf.set_stringn(
            area.x,
            area.y,
            &label,
            area.width as usize,
            Style::default().fg(color),
        );

        if area.height > 1 {
            let bar_y = area.y + 1;
            let inner = area.width - 2;
            let filled = self.filled(inner);

            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(color));
            }
            for x in filled..inner {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}
