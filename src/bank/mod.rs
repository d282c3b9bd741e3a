use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/banks/"]
struct BankAssets;

pub const DEFAULT_BUNDLED_BANK: &str = "milestones";

/// Stable question identifier. Bank files may carry ids as strings or
/// integers; both are normalised to text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => QuestionId(s),
            RawId::Int(n) => QuestionId(n.to_string()),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub stem: String,
    pub choices: Vec<String>,
    pub answer_index: usize,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Question {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer_index
    }
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("question bank not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read question bank {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no bundled question bank named '{0}'")]
    UnknownBundled(String),
    #[error("question bank is empty")]
    Empty,
    #[error("question at position {position} has a blank id")]
    BlankId { position: usize },
    #[error("duplicate question id '{id}'")]
    DuplicateId { id: QuestionId },
    #[error("question '{id}' has {count} choice(s), at least 2 are required")]
    TooFewChoices { id: QuestionId, count: usize },
    #[error("question '{id}' answer_index {answer_index} is out of range for {choices} choices")]
    AnswerOutOfRange {
        id: QuestionId,
        answer_index: usize,
        choices: usize,
    },
}

/// Immutable, validated sequence of questions. Loaded once and shared
/// across sessions behind an `Arc`.
#[derive(Clone, Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        validate(&questions)?;
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    pub fn load(path: &Path) -> Result<Self, BankError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                BankError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                BankError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&content)
    }

    pub fn bundled(name: &str) -> Result<Self, BankError> {
        let file = BankAssets::get(&format!("{name}.json"))
            .ok_or_else(|| BankError::UnknownBundled(name.to_string()))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|_| BankError::UnknownBundled(name.to_string()))?;
        Self::from_json(content)
    }

    pub fn bundled_names() -> Vec<String> {
        let mut names: Vec<String> = BankAssets::iter()
            .filter_map(|f| f.strip_suffix(".json").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.get(id).is_some()
    }

    /// Every distinct tag, in the order it first appears in the bank.
    pub fn tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for tag in self.questions.iter().flat_map(|q| q.tags.iter()) {
            if seen.insert(tag.as_str()) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        self.tags()
            .into_iter()
            .map(|tag| {
                let count = self.questions.iter().filter(|q| q.has_tag(&tag)).count();
                (tag, count)
            })
            .collect()
    }
}

fn validate(questions: &[Question]) -> Result<(), BankError> {
    if questions.is_empty() {
        return Err(BankError::Empty);
    }

    let mut ids = HashSet::new();
    for (position, q) in questions.iter().enumerate() {
        if q.id.as_str().trim().is_empty() {
            return Err(BankError::BlankId { position });
        }
        if !ids.insert(&q.id) {
            return Err(BankError::DuplicateId { id: q.id.clone() });
        }
        if q.choices.len() < 2 {
            return Err(BankError::TooFewChoices {
                id: q.id.clone(),
                count: q.choices.len(),
            });
        }
        if q.answer_index >= q.choices.len() {
            return Err(BankError::AnswerOutOfRange {
                id: q.id.clone(),
                answer_index: q.answer_index,
                choices: q.choices.len(),
            });
        }
    }
    Ok(())
}
