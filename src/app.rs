use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use milestone_quiz::bank::QuestionBank;
use milestone_quiz::config::Config;
use milestone_quiz::engine::filter::TagFilter;
use milestone_quiz::session::{
    AnswerOutcome, IgnoreReason, PassSummary, QuizSession, RestartMode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::ui::components::tag_menu::TagMenu;
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Quiz,
    TagSelect,
    Help,
}

pub struct App {
    pub screen: AppScreen,
    pub session: QuizSession,
    pub config: Config,
    pub theme: &'static Theme,
    pub tag_menu: TagMenu<'static>,
    pub choice_cursor: usize,
    pub last_summary: Option<PassSummary>,
    pub status: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        bank: Arc<QuestionBank>,
        config: Config,
        theme: &'static Theme,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let tag_menu = TagMenu::new(&bank, theme);
        let mut session = QuizSession::with_rng(bank, rng);

        let initial = TagFilter::parse(&config.default_filter);
        if initial != TagFilter::All {
            session.restart(RestartMode::Filter(Some(initial)));
        }

        let mut app = Self {
            screen: AppScreen::Quiz,
            session,
            config,
            theme,
            tag_menu,
            choice_cursor: 0,
            last_summary: None,
            status: None,
            should_quit: false,
        };
        app.tag_menu.select_filter(app.session.filter());
        app
    }

    pub fn choice_count(&self) -> usize {
        self.session.current().map_or(0, |q| q.choices.len())
    }

    pub fn cursor_up(&mut self) {
        self.choice_cursor = self.choice_cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let count = self.choice_count();
        if count > 0 {
            self.choice_cursor = (self.choice_cursor + 1).min(count - 1);
        }
    }

    pub fn choose(&mut self, choice: usize) {
        let outcome = self.session.answer(choice);
        if outcome == AnswerOutcome::Ignored(IgnoreReason::ChoiceOutOfRange) {
            self.set_status("No such choice");
        }
        if !outcome.was_scored() {
            return;
        }
        self.choice_cursor = choice;
        if self.session.is_complete() {
            let summary = PassSummary::from_session(&self.session);
            match serde_json::to_string(&summary) {
                Ok(json) => info!("pass complete: {json}"),
                Err(err) => warn!("pass complete, summary not serialisable: {err}"),
            }
            self.last_summary = Some(summary);
        }
    }

    pub fn choose_at_cursor(&mut self) {
        self.choose(self.choice_cursor);
    }

    pub fn next_question(&mut self) {
        if self.session.advance() {
            self.choice_cursor = 0;
        }
    }

    pub fn restart(&mut self, mode: RestartMode) {
        if self.session.attempted_count() > 0 && !self.session.is_complete() {
            let summary = PassSummary::from_session(&self.session);
            info!(
                "pass abandoned: filter={} ratio={} unanswered={}",
                summary.filter,
                summary.ratio,
                summary.unanswered()
            );
        }

        // An empty bank stays empty on reshuffle, so plain restart reloads everything.
        let mode = if mode == RestartMode::Filter(None) && self.session.is_empty() {
            RestartMode::Filter(Some(TagFilter::All))
        } else {
            mode
        };
        let reviewing = mode == RestartMode::ReviewMissed;
        let pending = self.session.review_count();
        self.session.restart(mode);

        self.choice_cursor = 0;
        self.last_summary = None;
        self.screen = AppScreen::Quiz;
        self.tag_menu.select_filter(self.session.filter());

        if reviewing && pending == 0 {
            self.set_status("Nothing missed yet, reshuffled the current bank");
        } else if self.session.is_empty() {
            self.set_status("No questions match this bank");
        }
    }

    pub fn open_tag_menu(&mut self) {
        self.tag_menu.select_filter(self.session.filter());
        self.screen = AppScreen::TagSelect;
    }

    pub fn apply_tag_selection(&mut self) {
        let filter = self.tag_menu.selected_filter().cloned();
        self.restart(RestartMode::Filter(filter));
    }

    pub fn toggle_help(&mut self) {
        self.screen = match self.screen {
            AppScreen::Help => AppScreen::Quiz,
            _ => AppScreen::Help,
        };
    }

    pub fn set_status(&mut self, message: &str) {
        self.status = Some((message.to_string(), Instant::now()));
    }

    pub fn tick(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > STATUS_TTL)
        {
            self.status = None;
        }
    }
}
