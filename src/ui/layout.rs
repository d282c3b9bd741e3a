use ratatui::layout::{Constraint, Flex, Layout, Rect};

const SIDEBAR_MIN_WIDTH: u16 = 100;
const PROGRESS_MIN_BODY_HEIGHT: u16 = 12;
const PROGRESS_HEIGHT: u16 = 3;
const CARD_MIN_HEIGHT: u16 = 6;
const INLINE_SUMMARY_HEIGHT: u16 = 9;
const SCORE_PANEL_HEIGHT: u16 = 10;
const FOOTER_MAX_LINES: u16 = 3;
const POPUP_MIN_WIDTH: u16 = 48;
const POPUP_MIN_HEIGHT: u16 = 14;

/// Regions of one quiz frame.
///
/// Wide terminals get a sidebar holding the score panel, with the pass
/// summary stacked under it. Narrower ones show the score in the header and
/// the summary under the question card. The progress row is dropped when the
/// body is too short to fit it alongside a readable card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuizLayout {
    pub header: Rect,
    pub progress: Option<Rect>,
    pub card: Rect,
    pub score: Option<Rect>,
    pub summary: Option<Rect>,
    pub footer: Rect,
}

impl QuizLayout {
    pub fn new(area: Rect, footer_lines: usize, with_summary: bool) -> Self {
        let footer_height = (footer_lines as u16).clamp(1, FOOTER_MAX_LINES);
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(CARD_MIN_HEIGHT),
            Constraint::Length(footer_height),
        ])
        .areas(area);

        let (column, score, side_summary) = if area.width >= SIDEBAR_MIN_WIDTH {
            let [column, side] =
                Layout::horizontal([Constraint::Percentage(72), Constraint::Percentage(28)])
                    .areas(body);
            if with_summary {
                let [score, summary] =
                    Layout::vertical([Constraint::Length(SCORE_PANEL_HEIGHT), Constraint::Min(0)])
                        .areas(side);
                (column, Some(score), Some(summary))
            } else {
                (column, Some(side), None)
            }
        } else {
            (body, None, None)
        };

        let show_progress = column.height >= PROGRESS_MIN_BODY_HEIGHT;
        let inline_summary = with_summary && score.is_none();

        let mut rows = Vec::with_capacity(3);
        if show_progress {
            rows.push(Constraint::Length(PROGRESS_HEIGHT));
        }
        rows.push(Constraint::Min(CARD_MIN_HEIGHT));
        if inline_summary {
            rows.push(Constraint::Length(INLINE_SUMMARY_HEIGHT));
        }
        let split = Layout::vertical(rows).split(column);

        let mut next = split.iter().copied();
        let progress = if show_progress { next.next() } else { None };
        let card = next.next().unwrap_or(column);
        let summary = if inline_summary { next.next() } else { side_summary };

        Self {
            header,
            progress,
            card,
            score,
            summary,
            footer,
        }
    }

    pub fn has_sidebar(&self) -> bool {
        self.score.is_some()
    }
}

/// Greedily pack footer hints into lines no wider than `width`, two spaces
/// between hints and one leading space per line.
pub fn pack_hints(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines: Vec<String> = Vec::new();
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 2 + hint.chars().count() <= width => {
                line.push_str("  ");
                line.push_str(hint);
            }
            _ => lines.push(format!(" {hint}")),
        }
    }
    lines
}

/// Centered overlay covering the given share of `area`, never smaller than a
/// readable minimum unless `area` itself is.
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let share = |len: u16, percent: u16| (u32::from(len) * u32::from(percent.min(100)) / 100) as u16;
    let width = share(area.width, percent_x).max(POPUP_MIN_WIDTH).min(area.width);
    let height = share(area.height, percent_y).max(POPUP_MIN_HEIGHT).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
