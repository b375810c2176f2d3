use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::settings::{QuizSettings, SettingsError};

/// A single multiple-choice question as stored in the question document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Prompt shown above the options. May contain inline markup.
    #[serde(rename = "question")]
    pub prompt: String,
    /// Answer options in document order.
    pub options: Vec<String>,
    /// Text of the correct option. Must match one entry of `options` exactly.
    pub answer: String,
    /// Hint revealed by the schedule while the question is open.
    pub hint: String,
    /// Secondary hint shown in the feedback dialog after a wrong answer.
    #[serde(rename = "hint2")]
    pub secondary_hint: String,
    /// Correct answers recorded before this document was exported.
    #[serde(default)]
    pub correct_count: u32,
    /// Epoch milliseconds of previously recorded correct answers.
    #[serde(default)]
    pub answer_times: Vec<u64>,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    fn validate(&self, position: usize) -> Result<(), QuestionError> {
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                position,
                count: self.options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption {
                    position,
                    option: option.clone(),
                });
            }
        }

        if !self.has_option(&self.answer) {
            return Err(QuestionError::AnswerNotInOptions {
                position,
                answer: self.answer.clone(),
            });
        }

        Ok(())
    }
}

/// On-disk layout of a question document.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizDocument {
    #[serde(default)]
    pub settings: QuizSettings,
    pub questions: Vec<Question>,
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionError {
    #[error("question document contains no questions")]
    Empty,
    #[error("question {position} has {count} options but at least 2 are required")]
    TooFewOptions { position: usize, count: usize },
    #[error("question {position} lists option {option:?} more than once")]
    DuplicateOption { position: usize, option: String },
    #[error("question {position} expects answer {answer:?} which is not one of its options")]
    AnswerNotInOptions { position: usize, answer: String },
    #[error("invalid quiz settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("failed to read question document at {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse question document at {path}: {source}")]
    ParseError {
        path: String,
        source: serde_json::Error,
    },
}

impl PartialEq for QuestionError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (
                Self::TooFewOptions {
                    position: left,
                    count: left_count,
                },
                Self::TooFewOptions {
                    position: right,
                    count: right_count,
                },
            ) => left == right && left_count == right_count,
            (
                Self::DuplicateOption {
                    position: left,
                    option: left_option,
                },
                Self::DuplicateOption {
                    position: right,
                    option: right_option,
                },
            ) => left == right && left_option == right_option,
            (
                Self::AnswerNotInOptions {
                    position: left,
                    answer: left_answer,
                },
                Self::AnswerNotInOptions {
                    position: right,
                    answer: right_answer,
                },
            ) => left == right && left_answer == right_answer,
            (Self::InvalidSettings(left), Self::InvalidSettings(right)) => left == right,
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            (Self::ParseError { path: left, .. }, Self::ParseError { path: right, .. }) => {
                left == right
            }
            _ => false,
        }
    }
}

impl Eq for QuestionError {}

/// Validated, read-only collection of questions loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    settings: QuizSettings,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        Self::with_settings(QuizSettings::default(), questions)
    }

    pub fn with_settings(
        settings: QuizSettings,
        questions: Vec<Question>,
    ) -> Result<Self, QuestionError> {
        settings.validate()?;

        if questions.is_empty() {
            return Err(QuestionError::Empty);
        }

        for (position, question) in questions.iter().enumerate() {
            question.validate(position + 1)?;
        }

        Ok(Self {
            settings,
            questions,
        })
    }

    /// Parses a JSON question document. `origin` names the source in errors.
    pub fn from_json(origin: &str, json: &str) -> Result<Self, QuestionError> {
        let document: QuizDocument =
            serde_json::from_str(json).map_err(|source| QuestionError::ParseError {
                path: origin.to_string(),
                source,
            })?;

        let bank = Self::with_settings(document.settings, document.questions)?;
        log::debug!("loaded {} questions from {}", bank.len(), origin);
        Ok(bank)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuestionError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| QuestionError::ReadError {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json(&path.display().to_string(), &data)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
