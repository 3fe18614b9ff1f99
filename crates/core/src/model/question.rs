use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Placeholder token marking where the answer belongs in a sentence.
pub const GAP_MARKER: &str = "[BLANK]";

/// Number of options every complete question offers.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question must have exactly 4 options, found {found}")]
    WrongOptionCount { found: usize },

    #[error("option {slot} is empty")]
    EmptyOption { slot: usize },

    #[error("option \"{0}\" appears more than once")]
    DuplicateOption(String),

    #[error("no correct answer selected")]
    MissingCorrectAnswer,

    #[error("correct answer \"{0}\" is not one of the options")]
    CorrectAnswerNotAnOption(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown exam type: {0}")]
    UnknownExamType(String),
}

//
// ─── CLASSIFICATION ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| QuestionError::UnknownDifficulty(s.to_owned()))
    }
}

/// Exam a question is modelled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExamType {
    #[default]
    #[serde(rename = "TOEFL")]
    Toefl,
    #[serde(rename = "SAT")]
    Sat,
}

impl ExamType {
    pub const ALL: [ExamType; 2] = [Self::Toefl, Self::Sat];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExamType::Toefl => "TOEFL",
            ExamType::Sat => "SAT",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| QuestionError::UnknownExamType(s.to_owned()))
    }
}

//
// ─── EXPLANATION ───────────────────────────────────────────────────────────────
//

/// Feedback shown once an answer has been submitted.
///
/// `rule` may contain markdown; rendering it is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Explanation {
    pub rule: String,
    pub example: String,
    pub common_mistake: String,
}

impl Explanation {
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        example: impl Into<String>,
        common_mistake: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            example: example.into(),
            common_mistake: common_mistake.into(),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A fill-in-the-gap multiple-choice question.
///
/// Fields are public so the editor can hold half-written questions; use
/// [`Question::new`] or [`Question::validate`] to enforce the option invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub sentence: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: Explanation,
    pub difficulty: Difficulty,
    pub category: String,
    pub exam_type: ExamType,
}

impl Question {
    /// Creates a complete question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the options are not four distinct non-empty
    /// strings or the correct answer is not one of them.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        sentence: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
        explanation: Explanation,
        difficulty: Difficulty,
        category: impl Into<String>,
        exam_type: ExamType,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            id,
            sentence: sentence.into(),
            options,
            correct_answer: correct_answer.into(),
            explanation,
            difficulty,
            category: category.into(),
            exam_type,
        };
        question.validate()?;
        Ok(question)
    }

    /// A blank question for the editor: four empty options, no answer.
    ///
    /// Not valid until filled in; see [`Question::is_complete`].
    #[must_use]
    pub fn placeholder(id: QuestionId) -> Self {
        Self {
            id,
            sentence: String::new(),
            options: vec![String::new(); OPTION_COUNT],
            correct_answer: String::new(),
            explanation: Explanation::default(),
            difficulty: Difficulty::default(),
            category: String::new(),
            exam_type: ExamType::default(),
        }
    }

    /// Checks the option invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                found: self.options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(OPTION_COUNT);
        for (slot, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption { slot });
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        if self.correct_answer.is_empty() {
            return Err(QuestionError::MissingCorrectAnswer);
        }
        if !self.has_option(&self.correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption(
                self.correct_answer.clone(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Compares by string content, so it survives option reordering.
    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        !self.correct_answer.is_empty() && self.correct_answer == option
    }

    /// Splits the sentence around the first gap marker.
    #[must_use]
    pub fn sentence_parts(&self) -> Option<(&str, &str)> {
        self.sentence.split_once(GAP_MARKER)
    }

    /// Returns the sentence with the gap marker replaced by `option`.
    ///
    /// Sentences without a marker are returned unchanged.
    #[must_use]
    pub fn fill_gap(&self, option: &str) -> String {
        match self.sentence_parts() {
            Some((before, after)) => format!("{before}{option}{after}"),
            None => self.sentence.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
