use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::bank::{Question, QuestionBank, QuestionId};
use crate::engine::filter::{TagFilter, filter_bank};
use crate::engine::scoring;
use crate::engine::shuffle::shuffle;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartMode {
    /// Reshuffle the given filter's questions, or the current filter's when `None`.
    Filter(Option<TagFilter>),
    /// Replay only the questions missed so far.
    ReviewMissed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyRevealed,
    NoQuestion,
    ChoiceOutOfRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { answer_index: usize },
    Ignored(IgnoreReason),
}

impl AnswerOutcome {
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }

    pub fn was_scored(self) -> bool {
        !matches!(self, AnswerOutcome::Ignored(_))
    }
}

/// One user's pass through a filtered, shuffled slice of the bank.
///
/// The bank is shared read-only; everything else is owned by the session, so
/// any number of sessions can run side by side. Randomness comes from `R`,
/// which tests replace with a seeded generator.
pub struct QuizSession<R: Rng = SmallRng> {
    bank: Arc<QuestionBank>,
    rng: R,
    filter: TagFilter,
    active_set: Vec<Question>,
    index: usize,
    selected_choice: Option<usize>,
    revealed: bool,
    correct_count: usize,
    attempted_count: usize,
    missed_ids: Vec<QuestionId>,
}

impl QuizSession<SmallRng> {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self::with_rng(bank, SmallRng::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(bank: Arc<QuestionBank>, mut rng: R) -> Self {
        let filter = TagFilter::All;
        let active_set = build_pass(&bank, &filter, &mut rng);
        Self {
            bank,
            rng,
            filter,
            active_set,
            index: 0,
            selected_choice: None,
            revealed: false,
            correct_count: 0,
            attempted_count: 0,
            missed_ids: Vec::new(),
        }
    }

    pub fn restart(&mut self, mode: RestartMode) {
        match mode {
            RestartMode::Filter(filter) => {
                if let Some(filter) = filter {
                    self.filter = filter;
                }
                self.active_set = build_pass(&self.bank, &self.filter, &mut self.rng);
                info!(
                    "restart: filter={} questions={}",
                    self.filter,
                    self.active_set.len()
                );
            }
            RestartMode::ReviewMissed => {
                let missed: HashSet<&QuestionId> = self.missed_ids.iter().collect();
                let candidates: Vec<&Question> = self
                    .bank
                    .questions()
                    .iter()
                    .filter(|q| missed.contains(&q.id))
                    .collect();

                self.active_set = if candidates.is_empty() {
                    info!(
                        "review missed: nothing missed, reshuffling filter={}",
                        self.filter
                    );
                    build_pass(&self.bank, &self.filter, &mut self.rng)
                } else {
                    info!("review missed: questions={}", candidates.len());
                    shuffle(&candidates, &mut self.rng)
                        .into_iter()
                        .cloned()
                        .collect()
                };
                self.missed_ids.clear();
            }
        }

        self.index = 0;
        self.selected_choice = None;
        self.revealed = false;
        self.correct_count = 0;
        self.attempted_count = 0;
    }

    pub fn answer(&mut self, choice: usize) -> AnswerOutcome {
        if self.revealed {
            debug!("answer {choice} ignored: already revealed");
            return AnswerOutcome::Ignored(IgnoreReason::AlreadyRevealed);
        }
        let Some(question) = self.active_set.get(self.index) else {
            debug!("answer {choice} ignored: no question");
            return AnswerOutcome::Ignored(IgnoreReason::NoQuestion);
        };
        if choice >= question.choices.len() {
            debug!(
                "answer {choice} ignored: question {} has {} choices",
                question.id,
                question.choices.len()
            );
            return AnswerOutcome::Ignored(IgnoreReason::ChoiceOutOfRange);
        }

        let outcome = if question.is_correct(choice) {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                answer_index: question.answer_index,
            }
        };
        let id = question.id.clone();

        self.selected_choice = Some(choice);
        self.revealed = true;
        self.attempted_count += 1;
        if outcome.is_correct() {
            self.correct_count += 1;
        } else {
            self.missed_ids.push(id.clone());
        }
        debug!("answer {choice} to {id}: {outcome:?}");
        outcome
    }

    /// Move to the next question. Returns `false` at the last question.
    pub fn advance(&mut self) -> bool {
        if self.active_set.is_empty() || self.is_last() {
            return false;
        }
        self.index += 1;
        self.selected_choice = None;
        self.revealed = false;
        true
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    pub fn active_set(&self) -> &[Question] {
        &self.active_set
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn selected_choice(&self) -> Option<usize> {
        self.selected_choice
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn attempted_count(&self) -> usize {
        self.attempted_count
    }

    pub fn missed_ids(&self) -> &[QuestionId] {
        &self.missed_ids
    }

    /// Ids missed since the last restart. Every scored wrong answer appends
    /// exactly one id, so these are the trailing `attempted - correct` entries.
    pub fn missed_this_pass(&self) -> &[QuestionId] {
        let misses = self.attempted_count - self.correct_count;
        &self.missed_ids[self.missed_ids.len() - misses..]
    }

    /// Distinct questions a review-missed restart would replay.
    pub fn review_count(&self) -> usize {
        self.missed_ids
            .iter()
            .filter(|id| self.bank.contains(id))
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn current(&self) -> Option<&Question> {
        self.active_set.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.active_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_set.is_empty()
    }

    pub fn is_last(&self) -> bool {
        !self.active_set.is_empty() && self.index == self.active_set.len() - 1
    }

    pub fn is_complete(&self) -> bool {
        self.is_last() && self.revealed
    }

    pub fn progress_percent(&self) -> u8 {
        scoring::progress_percent(self.index, self.active_set.len())
    }

    pub fn ratio_display(&self) -> String {
        scoring::ratio_display(self.correct_count, self.attempted_count)
    }

    pub fn position_label(&self) -> String {
        if self.active_set.is_empty() {
            return "No questions".to_string();
        }
        format!("Question {} of {}", self.index + 1, self.active_set.len())
    }

    /// Whether the revealed answer was right; `None` until revealed.
    pub fn last_answer_correct(&self) -> Option<bool> {
        if !self.revealed {
            return None;
        }
        let question = self.current()?;
        self.selected_choice.map(|c| question.is_correct(c))
    }
}

fn build_pass<R: Rng>(bank: &QuestionBank, filter: &TagFilter, rng: &mut R) -> Vec<Question> {
    let filtered = filter_bank(bank, filter);
    shuffle(&filtered, rng).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::tests::question;

    fn bank() -> Arc<QuestionBank> {
        Arc::new(
            QuestionBank::new(vec![
                question("q1", 0, &["recall"]),
                question("q2", 1, &["recall", "fine"]),
                question("q3", 2, &["gross"]),
                question("q4", 3, &[]),
            ])
            .unwrap(),
        )
    }

    fn session(seed: u64) -> QuizSession<SmallRng> {
        QuizSession::with_rng(bank(), SmallRng::seed_from_u64(seed))
    }

    fn wrong_choice(q: &Question) -> usize {
        (q.answer_index + 1) % q.choices.len()
    }

    fn answer_current(s: &mut QuizSession<SmallRng>, correct: bool) -> AnswerOutcome {
        let q = s.current().unwrap().clone();
        let choice = if correct { q.answer_index } else { wrong_choice(&q) };
        s.answer(choice)
    }

    #[test]
    fn test_new_session_starts_on_full_bank() {
        let s = session(1);
        assert_eq!(s.filter(), &TagFilter::All);
        assert_eq!(s.len(), 4);
        assert_eq!(s.index(), 0);
        assert_eq!(s.selected_choice(), None);
        assert!(!s.is_revealed());
        assert_eq!(s.attempted_count(), 0);
        assert_eq!(s.correct_count(), 0);
        assert!(s.missed_ids().is_empty());
        assert_eq!(s.ratio_display(), "0/0");
        assert_eq!(s.progress_percent(), 0);
        assert_eq!(s.position_label(), "Question 1 of 4");
    }

    #[test]
    fn test_correct_answer_reveals_and_scores() {
        let mut s = session(2);
        let outcome = answer_current(&mut s, true);
        assert_eq!(outcome, AnswerOutcome::Correct);
        assert!(s.is_revealed());
        assert_eq!(s.correct_count(), 1);
        assert_eq!(s.attempted_count(), 1);
        assert!(s.missed_ids().is_empty());
        assert_eq!(s.last_answer_correct(), Some(true));
        assert_eq!(s.ratio_display(), "1/1");
    }

    #[test]
    fn test_wrong_answer_records_miss() {
        let mut s = session(3);
        let q = s.current().unwrap().clone();
        let outcome = s.answer(wrong_choice(&q));
        assert_eq!(
            outcome,
            AnswerOutcome::Incorrect {
                answer_index: q.answer_index
            }
        );
        assert_eq!(s.selected_choice(), Some(wrong_choice(&q)));
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.attempted_count(), 1);
        assert_eq!(s.missed_ids(), &[q.id.clone()]);
        assert_eq!(s.last_answer_correct(), Some(false));
    }

    #[test]
    fn test_answer_is_idempotent_once_revealed() {
        let mut s = session(4);
        answer_current(&mut s, false);
        let selected = s.selected_choice();
        let missed = s.missed_ids().to_vec();
        for choice in 0..6 {
            assert_eq!(
                s.answer(choice),
                AnswerOutcome::Ignored(IgnoreReason::AlreadyRevealed)
            );
        }
        assert_eq!(s.selected_choice(), selected);
        assert_eq!(s.attempted_count(), 1);
        assert_eq!(s.correct_count(), 0);
        assert_eq!(s.missed_ids(), missed.as_slice());
    }

    #[test]
    fn test_out_of_range_choice_is_rejected() {
        let mut s = session(5);
        assert_eq!(
            s.answer(4),
            AnswerOutcome::Ignored(IgnoreReason::ChoiceOutOfRange)
        );
        assert!(!s.is_revealed());
        assert_eq!(s.attempted_count(), 0);
        assert_eq!(s.selected_choice(), None);
    }

    #[test]
    fn test_advance_resets_selection_not_counters() {
        let mut s = session(6);
        answer_current(&mut s, false);
        assert!(s.advance());
        assert_eq!(s.index(), 1);
        assert_eq!(s.selected_choice(), None);
        assert!(!s.is_revealed());
        assert_eq!(s.attempted_count(), 1);
        assert_eq!(s.missed_ids().len(), 1);
        assert_eq!(s.progress_percent(), 25);
    }

    #[test]
    fn test_advance_stops_at_last_question() {
        let mut s = session(7);
        for _ in 0..10 {
            s.advance();
            assert!(s.index() < s.len());
        }
        assert_eq!(s.index(), 3);
        assert!(s.is_last());
        assert!(!s.advance());
        assert_eq!(s.index(), 3);
    }

    #[test]
    fn test_complete_requires_last_and_revealed() {
        let mut s = session(8);
        while s.advance() {}
        assert!(!s.is_complete());
        answer_current(&mut s, true);
        assert!(s.is_complete());
        // advancing out of the complete state is impossible
        assert!(!s.advance());
        assert!(s.is_complete());
    }

    #[test]
    fn test_attempted_equals_correct_plus_pass_misses() {
        let mut s = session(9);
        let mut step = 0;
        loop {
            answer_current(&mut s, step % 2 == 0);
            assert_eq!(
                s.attempted_count(),
                s.correct_count() + s.missed_this_pass().len()
            );
            step += 1;
            if !s.advance() {
                break;
            }
        }
        assert_eq!(s.attempted_count(), 4);
        assert_eq!(s.correct_count(), 2);
    }

    #[test]
    fn test_filter_restart_keeps_missed_ids() {
        let mut s = session(10);
        answer_current(&mut s, false);
        let missed = s.missed_ids().to_vec();

        s.restart(RestartMode::Filter(Some(TagFilter::Tag("recall".into()))));
        assert_eq!(s.filter(), &TagFilter::Tag("recall".into()));
        assert_eq!(s.len(), 2);
        assert!(s.active_set().iter().all(|q| q.has_tag("recall")));
        assert_eq!(s.missed_ids(), missed.as_slice());
        assert!(s.missed_this_pass().is_empty());
        assert_eq!(s.attempted_count(), 0);
        assert_eq!(s.correct_count(), 0);
        assert!(!s.is_revealed());
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_filter_restart_without_tag_keeps_current_filter() {
        let mut s = session(11);
        s.restart(RestartMode::Filter(Some(TagFilter::Tag("gross".into()))));
        s.restart(RestartMode::Filter(None));
        assert_eq!(s.filter(), &TagFilter::Tag("gross".into()));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_review_missed_replays_missed_set_once_each() {
        let mut s = session(12);
        // miss everything in the first pass
        loop {
            answer_current(&mut s, false);
            if !s.advance() {
                break;
            }
        }
        // second pass over the same filter, miss the first question again
        s.restart(RestartMode::Filter(None));
        answer_current(&mut s, false);
        assert_eq!(s.missed_ids().len(), 5);
        assert_eq!(s.review_count(), 4);

        s.restart(RestartMode::ReviewMissed);
        assert_eq!(s.len(), 4);
        assert_eq!(s.review_count(), 0);
        let mut ids: Vec<&str> = s.active_set().iter().map(|q| q.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["q1", "q2", "q3", "q4"]);
        assert!(s.missed_ids().is_empty());
        assert_eq!(s.filter(), &TagFilter::All);
    }

    #[test]
    fn test_review_missed_with_nothing_missed_falls_back_to_filter() {
        let mut s = session(13);
        s.restart(RestartMode::Filter(Some(TagFilter::Tag("recall".into()))));
        s.restart(RestartMode::ReviewMissed);
        assert_eq!(s.len(), 2);
        assert!(s.active_set().iter().all(|q| q.has_tag("recall")));
        assert_eq!(s.filter(), &TagFilter::Tag("recall".into()));
    }

    #[test]
    fn test_empty_filter_is_no_questions_state() {
        let mut s = session(14);
        s.restart(RestartMode::Filter(Some(TagFilter::Tag("nonexistent_tag".into()))));
        assert!(s.is_empty());
        assert!(s.current().is_none());
        assert_eq!(s.progress_percent(), 0);
        assert!(!s.is_complete());
        assert!(!s.is_last());
        assert_eq!(s.position_label(), "No questions");
        assert_eq!(
            s.answer(0),
            AnswerOutcome::Ignored(IgnoreReason::NoQuestion)
        );
        assert_eq!(s.attempted_count(), 0);
        assert!(!s.advance());
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_review_missed_with_empty_fallback_stays_empty() {
        let mut s = session(15);
        s.restart(RestartMode::Filter(Some(TagFilter::Tag("nonexistent_tag".into()))));
        s.restart(RestartMode::ReviewMissed);
        assert!(s.is_empty());
    }

    #[test]
    fn test_sessions_are_independent() {
        let shared = bank();
        let mut a = QuizSession::with_rng(Arc::clone(&shared), SmallRng::seed_from_u64(1));
        let b = QuizSession::with_rng(Arc::clone(&shared), SmallRng::seed_from_u64(1));
        answer_current(&mut a, false);
        a.advance();
        assert_eq!(b.index(), 0);
        assert_eq!(b.attempted_count(), 0);
        assert!(b.missed_ids().is_empty());
        assert_eq!(shared.len(), 4);
    }
}
