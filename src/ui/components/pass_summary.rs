use milestone_quiz::session::PassSummary;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct PassSummaryView<'a> {
    pub summary: &'a PassSummary,
    pub theme: &'a Theme,
}

impl<'a> PassSummaryView<'a> {
    pub fn new(summary: &'a PassSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for PassSummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.summary;

        let block = Block::bordered()
            .title(" Pass Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let acc_color = if s.accuracy >= 90.0 {
            colors.success()
        } else if s.accuracy >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} \u{00b7} {} questions", s.filter, s.total),
                Style::default().fg(colors.text_muted()),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Ratio:    ", Style::default().fg(colors.fg())),
                Span::styled(
                    s.ratio.as_str(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Accuracy: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{:.0}%", s.accuracy),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Missed:   ", Style::default().fg(colors.fg())),
                Span::styled(
                    s.missed.to_string(),
                    Style::default().fg(if s.missed == 0 {
                        colors.success()
                    } else {
                        colors.error()
                    }),
                ),
            ]),
            Line::from(""),
        ];

        let next_step = if s.is_perfect() {
            " Nothing to review. [r] Restart all"
        } else {
            " [m] Review missed  [r] Restart all"
        };
        lines.push(Line::from(Span::styled(
            next_step,
            Style::default().fg(colors.accent()),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}
