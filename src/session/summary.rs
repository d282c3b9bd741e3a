use rand::Rng;
use serde::Serialize;

use crate::engine::scoring;
use crate::session::quiz::QuizSession;

/// Snapshot of a pass, shown on the end-of-quiz screen and written to the log.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PassSummary {
    pub filter: String,
    pub total: usize,
    pub attempted: usize,
    pub correct: usize,
    pub missed: usize,
    pub accuracy: f64,
    pub ratio: String,
    pub completed: bool,
}

impl PassSummary {
    pub fn from_session<R: Rng>(session: &QuizSession<R>) -> Self {
        let attempted = session.attempted_count();
        let correct = session.correct_count();
        Self {
            filter: session.filter().to_string(),
            total: session.len(),
            attempted,
            correct,
            missed: session.missed_this_pass().len(),
            accuracy: scoring::accuracy_percent(correct, attempted),
            ratio: session.ratio_display(),
            completed: session.is_complete(),
        }
    }

    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.attempted)
    }

    pub fn is_perfect(&self) -> bool {
        self.attempted > 0 && self.missed == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::bank::QuestionBank;
    use crate::bank::tests::question;

    fn session() -> QuizSession<SmallRng> {
        let bank = QuestionBank::new(vec![
            question("q1", 0, &["fine"]),
            question("q2", 1, &["fine"]),
            question("q3", 2, &["gross"]),
        ])
        .unwrap();
        QuizSession::with_rng(Arc::new(bank), SmallRng::seed_from_u64(5))
    }

    #[test]
    fn test_summary_of_fresh_pass() {
        let summary = PassSummary::from_session(&session());
        assert_eq!(summary.filter, "all");
        assert_eq!(summary.total, 3);
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.ratio, "0/0");
        assert_eq!(summary.accuracy, 100.0);
        assert_eq!(summary.unanswered(), 3);
        assert!(!summary.completed);
        assert!(!summary.is_perfect());
    }

    #[test]
    fn test_summary_of_completed_pass() {
        let mut s = session();
        loop {
            let q = s.current().unwrap();
            let choice = if q.id.as_str() == "q2" {
                0
            } else {
                q.answer_index
            };
            s.answer(choice);
            if !s.advance() {
                break;
            }
        }
        let summary = PassSummary::from_session(&s);
        assert!(summary.completed);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.missed, 1);
        assert_eq!(summary.ratio, "2/3");
        assert!((summary.accuracy - 66.666).abs() < 0.01);
        assert_eq!(summary.unanswered(), 0);
    }
}
