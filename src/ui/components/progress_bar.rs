use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Pass progress. When every question fits in at least one cell the bar is
/// drawn as one segment per question, with the current question highlighted.
pub struct ProgressBar<'a> {
    pub label: String,
    pub index: usize,
    pub total: usize,
    pub percent: u8,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, index: usize, total: usize, percent: u8, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            index,
            total,
            percent: percent.min(100),
            theme,
        }
    }

    fn cell_style(&self, offset: u16, width: u16) -> Style {
        let colors = &self.theme.colors;
        let filled = Style::default().fg(colors.bg()).bg(colors.bar_filled());
        let empty = Style::default().fg(colors.fg()).bg(colors.bar_empty());

        if self.total == 0 {
            return empty;
        }
        if self.total <= width as usize {
            let question = offset as usize * self.total / width as usize;
            return if question < self.index {
                filled
            } else if question == self.index {
                Style::default().fg(colors.bg()).bg(colors.accent())
            } else {
                empty
            };
        }
        let filled_width = (width as u32 * self.percent as u32 / 100) as u16;
        if offset < filled_width { filled } else { empty }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for offset in 0..inner.width {
            let style = self.cell_style(offset, inner.width);
            buf[(inner.x + offset, inner.y)].set_style(style);
        }

        let label = format!("{}%", self.percent);
        let label_x = inner.x + inner.width.saturating_sub(label.len() as u16 + 1);
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
