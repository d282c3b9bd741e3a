use std::fmt;

use crate::bank::{Question, QuestionBank};

pub const ALL_TAG: &str = "all";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    /// Parse a user-facing tag name. `"all"` (any case) and the empty string
    /// mean no filter.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(ALL_TAG) {
            TagFilter::All
        } else {
            TagFilter::Tag(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TagFilter::All => ALL_TAG,
            TagFilter::Tag(tag) => tag,
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tag(tag) => question.has_tag(tag),
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Questions matching `filter`, in bank order.
pub fn filter_bank<'a>(bank: &'a QuestionBank, filter: &TagFilter) -> Vec<&'a Question> {
    bank.questions()
        .iter()
        .filter(|q| filter.matches(q))
        .collect()
}

/// `all` followed by every tag in the bank.
pub fn available_filters(bank: &QuestionBank) -> Vec<TagFilter> {
    std::iter::once(TagFilter::All)
        .chain(bank.tags().into_iter().map(TagFilter::Tag))
        .collect()
}
