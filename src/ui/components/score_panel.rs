use milestone_quiz::session::QuizSession;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct ScorePanel<'a> {
    session: &'a QuizSession,
    theme: &'a Theme,
}

impl<'a> ScorePanel<'a> {
    pub fn new(session: &'a QuizSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for ScorePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Score ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.text_muted());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let row = |name: &'static str, v: String, style: Style| {
            Line::from(vec![Span::styled(format!(" {name:<10}"), label), Span::styled(v, style)])
        };

        let missed_pass = self.session.missed_this_pass().len();
        let pending_review = self.session.review_count();

        let lines = vec![
            row("Bank", self.session.filter().to_string(), Style::default().fg(colors.accent())),
            Line::from(""),
            row("Correct", self.session.correct_count().to_string(), value),
            row("Attempted", self.session.attempted_count().to_string(), value),
            row("Ratio", self.session.ratio_display(), value),
            Line::from(""),
            row(
                "Missed",
                missed_pass.to_string(),
                Style::default().fg(if missed_pass == 0 {
                    colors.success()
                } else {
                    colors.error()
                }),
            ),
            row("To review", pending_review.to_string(), Style::default().fg(colors.warning())),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}
