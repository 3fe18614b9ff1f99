use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{BankId, QuestionId};
use crate::model::question::{Question, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("bank name cannot be empty")]
    EmptyName,

    #[error("bank must contain at least one question")]
    Empty,

    #[error("question id {0} appears more than once")]
    DuplicateQuestionId(QuestionId),

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// A named, ordered collection of questions.
///
/// Always holds at least one question, and question ids are unique within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    id: BankId,
    name: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Creates a new bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyName` if the name is blank, `BankError::Empty`
    /// if there are no questions, `BankError::DuplicateQuestionId` if ids
    /// collide and `BankError::InvalidQuestion` for the first incomplete question.
    pub fn new(
        id: BankId,
        name: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, BankError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BankError::EmptyName);
        }
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            if !seen.insert(&question.id) {
                return Err(BankError::DuplicateQuestionId(question.id.clone()));
            }
            question
                .validate()
                .map_err(|source| BankError::InvalidQuestion { index, source })?;
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            questions,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &BankId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when the bank holds no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.id.is_default()
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Field-by-field structural copy that shares nothing with `self`.
    ///
    /// Drafts opened in the editor start from this copy.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            id: BankId::new(self.id.as_str()),
            name: self.name.as_str().to_owned(),
            questions: self.questions.iter().map(copy_question).collect(),
        }
    }

    /// Consumes the bank, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (BankId, String, Vec<Question>) {
        (self.id, self.name, self.questions)
    }
}

fn copy_question(question: &Question) -> Question {
    Question {
        id: QuestionId::new(question.id.as_str()),
        sentence: question.sentence.as_str().to_owned(),
        options: question.options.iter().map(|o| o.as_str().to_owned()).collect(),
        correct_answer: question.correct_answer.as_str().to_owned(),
        explanation: crate::model::Explanation::new(
            question.explanation.rule.as_str(),
            question.explanation.example.as_str(),
            question.explanation.common_mistake.as_str(),
        ),
        difficulty: question.difficulty,
        category: question.category.as_str().to_owned(),
        exam_type: question.exam_type,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
