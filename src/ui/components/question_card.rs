use milestone_quiz::session::QuizSession;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub const EMPTY_SET_MESSAGE: &str =
    "No questions in this bank yet. Use Restart to reload all questions.";

/// `A`, `B`, ... for choice positions.
pub fn choice_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

pub struct QuestionCard<'a> {
    session: &'a QuizSession,
    choice_cursor: usize,
    show_rationale: bool,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        session: &'a QuizSession,
        choice_cursor: usize,
        show_rationale: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            choice_cursor,
            show_rationale,
            theme,
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(question) = self.session.current() else {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    EMPTY_SET_MESSAGE,
                    Style::default().fg(colors.warning()),
                )),
            ];
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .render(inner, buf);
            return;
        };

        let revealed = self.session.is_revealed();
        let selected = self.session.selected_choice();
        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            question.stem.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));
        if !question.tags.is_empty() {
            lines.push(Line::from(Span::styled(
                format!(" {} ", question.tags.join(" \u{2022} ")),
                Style::default()
                    .fg(colors.text_muted())
                    .bg(colors.tag_pill_bg()),
            )));
        }
        lines.push(Line::from(""));

        for (i, choice) in question.choices.iter().enumerate() {
            let is_correct = question.is_correct(i);
            let is_selected = selected == Some(i);

            let (marker, marker_style) = if revealed && is_correct {
                ("\u{2714} ", Style::default().fg(colors.success()))
            } else if revealed && is_selected {
                ("\u{2718} ", Style::default().fg(colors.error()))
            } else {
                ("  ", Style::default())
            };

            let text_style = if revealed {
                if is_correct {
                    Style::default().fg(colors.success())
                } else if is_selected {
                    Style::default().fg(colors.error())
                } else {
                    Style::default().fg(colors.text_muted())
                }
            } else if i == self.choice_cursor {
                Style::default()
                    .fg(colors.choice_cursor_fg())
                    .bg(colors.choice_cursor_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            lines.push(Line::from(vec![
                Span::styled(marker, marker_style),
                Span::styled(format!("{}. {choice}", choice_label(i)), text_style),
            ]));
        }

        lines.push(Line::from(""));
        match self.session.last_answer_correct() {
            Some(true) => lines.push(Line::from(Span::styled(
                "Correct",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ))),
            Some(false) => lines.push(Line::from(Span::styled(
                "Incorrect",
                Style::default()
                    .fg(colors.error())
                    .add_modifier(Modifier::BOLD),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Press a letter to check your answer.",
                Style::default().fg(colors.text_muted()),
            ))),
        }

        if revealed && self.show_rationale && !question.rationale.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(
                    "Explanation: ",
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(question.rationale.as_str(), Style::default().fg(colors.fg())),
            ]));
        }

        if self.session.is_complete() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "End of quiz.",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use milestone_quiz::bank::QuestionBank;
    use milestone_quiz::session::RestartMode;
    use milestone_quiz::TagFilter;

    use super::*;

    fn render_text(session: &QuizSession) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 90, 30);
        let mut buf = Buffer::empty(area);
        QuestionCard::new(session, 0, true, &theme).render(area, &mut buf);
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn session() -> QuizSession {
        let json = r#"[{"id": "q1", "stem": "Sits without support?", "choices": ["4 months", "6 months"],
            "answer_index": 1, "rationale": "Tripod sitting at 6 months.", "tags": ["gross", "recall"]}]"#;
        QuizSession::new(Arc::new(QuestionBank::from_json(json).unwrap()))
    }

    #[test]
    fn test_choice_labels() {
        assert_eq!(choice_label(0), 'A');
        assert_eq!(choice_label(3), 'D');
    }

    #[test]
    fn test_renders_stem_choices_and_hint() {
        let text = render_text(&session());
        assert!(text.contains("Sits without support?"));
        assert!(text.contains("A. 4 months"));
        assert!(text.contains("B. 6 months"));
        assert!(text.contains("gross \u{2022} recall"));
        assert!(text.contains("Press a letter"));
    }

    #[test]
    fn test_renders_feedback_after_wrong_answer() {
        let mut s = session();
        s.answer(0);
        let text = render_text(&s);
        assert!(text.contains("Incorrect"));
        assert!(text.contains("Explanation: Tripod sitting at 6 months."));
        assert!(text.contains("End of quiz."));
    }

    #[test]
    fn test_renders_empty_state() {
        let mut s = session();
        s.restart(RestartMode::Filter(Some(TagFilter::Tag("social".into()))));
        let text = render_text(&s);
        assert!(text.contains("No questions in this bank yet."));
    }
}
