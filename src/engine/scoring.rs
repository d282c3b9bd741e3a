pub const ZERO_RATIO: &str = "0/0";

pub fn progress_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (index.min(total) * 100 / total) as u8
}

pub fn ratio_display(correct: usize, attempted: usize) -> String {
    if attempted == 0 {
        return ZERO_RATIO.to_string();
    }
    format!("{correct}/{attempted}")
}

/// Percentage of attempts answered correctly; 100 before any attempt.
pub fn accuracy_percent(correct: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        return 100.0;
    }
    (correct as f64 / attempted as f64 * 100.0).clamp(0.0, 100.0)
}
