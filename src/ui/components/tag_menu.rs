use milestone_quiz::bank::QuestionBank;
use milestone_quiz::engine::filter::{TagFilter, available_filters, filter_bank};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub filter: TagFilter,
    pub count: usize,
}

/// Bank selector: `all` plus every tag, with question counts.
pub struct TagMenu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> TagMenu<'a> {
    pub fn new(bank: &QuestionBank, theme: &'a Theme) -> Self {
        let items = available_filters(bank)
            .into_iter()
            .map(|filter| {
                let count = filter_bank(bank, &filter).len();
                MenuItem { filter, count }
            })
            .collect();
        Self {
            items,
            selected: 0,
            theme,
        }
    }

    pub fn select_filter(&mut self, filter: &TagFilter) {
        if let Some(i) = self.items.iter().position(|item| &item.filter == filter) {
            self.selected = i;
        }
    }

    pub fn selected_filter(&self) -> Option<&TagFilter> {
        self.items.get(self.selected).map(|item| &item.filter)
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &TagMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Bank ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "Filter by tag",
            Style::default().fg(colors.text_muted()),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        // Keep the selection visible on short terminals
        let visible = layout[1].height as usize;
        let skip = if visible == 0 {
            0
        } else {
            self.selected.saturating_sub(visible - 1)
        };

        let lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .skip(skip)
            .take(visible)
            .map(|(i, item)| {
                let is_selected = i == self.selected;
                let indicator = if is_selected { ">" } else { " " };
                let style = Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    });
                Line::from(vec![
                    Span::styled(format!(" {indicator} {:<14}", item.filter.as_str()), style),
                    Span::styled(
                        format!("{:>4} questions", item.count),
                        Style::default().fg(colors.text_muted()),
                    ),
                ])
            })
            .collect();

        Paragraph::new(lines).render(layout[1], buf);
    }
}
