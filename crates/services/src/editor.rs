use grammar_core::model::{
    BankError, BankId, Difficulty, ExamType, Explanation, OPTION_COUNT, Question, QuestionBank,
    QuestionId,
};

use crate::bank_store::{BankStore, StoreMutation};
use crate::error::EditorError;

/// Name given to freshly created drafts.
pub const NEW_BANK_NAME: &str = "新题库";

const SAMPLE_SENTENCE: &str = "This is a [BLANK] sentence.";
const SAMPLE_OPTIONS: [&str; OPTION_COUNT] = ["test", "sample", "demo", "example"];
const NEW_QUESTION_SENTENCE: &str = "New [BLANK] sentence.";

/// Partial update for one draft question. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub sentence: Option<String>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
    pub rule: Option<String>,
    pub example: Option<String>,
    pub common_mistake: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub exam_type: Option<ExamType>,
}

impl QuestionPatch {
    fn apply(self, question: &mut Question) {
        if let Some(sentence) = self.sentence {
            question.sentence = sentence;
        }
        if let Some(options) = self.options {
            question.options = options;
        }
        if let Some(correct_answer) = self.correct_answer {
            question.correct_answer = correct_answer;
        }
        if let Some(rule) = self.rule {
            question.explanation.rule = rule;
        }
        if let Some(example) = self.example {
            question.explanation.example = example;
        }
        if let Some(common_mistake) = self.common_mistake {
            question.explanation.common_mistake = common_mistake;
        }
        if let Some(difficulty) = self.difficulty {
            question.difficulty = difficulty;
        }
        if let Some(category) = self.category {
            question.category = category;
        }
        if let Some(exam_type) = self.exam_type {
            question.exam_type = exam_type;
        }
    }
}

/// An editable copy of a custom bank.
///
/// Questions may be half-written while editing; the bank invariants are
/// only enforced by [`BankEditor::validate`] and [`BankEditor::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankEditor {
    id: BankId,
    name: String,
    questions: Vec<Question>,
}

impl BankEditor {
    /// A brand-new draft with one sample question whose answer is not chosen yet.
    #[must_use]
    pub fn new_draft() -> Self {
        let sample = Question {
            id: QuestionId::new("1"),
            sentence: SAMPLE_SENTENCE.to_owned(),
            options: SAMPLE_OPTIONS.iter().map(|o| (*o).to_owned()).collect(),
            correct_answer: String::new(),
            explanation: Explanation::default(),
            difficulty: Difficulty::Beginner,
            category: "General".to_owned(),
            exam_type: ExamType::Toefl,
        };
        Self {
            id: BankId::generate(),
            name: NEW_BANK_NAME.to_owned(),
            questions: vec![sample],
        }
    }

    /// Opens a private copy of `bank` for editing.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::DefaultBankReadOnly` for the built-in bank.
    pub fn open_draft(bank: &QuestionBank) -> Result<Self, EditorError> {
        if bank.is_default() {
            return Err(EditorError::DefaultBankReadOnly);
        }
        let (id, name, questions) = bank.deep_copy().into_parts();
        Ok(Self {
            id,
            name,
            questions,
        })
    }

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

    /// # Errors
    ///
    /// Returns `EditorError::IndexOutOfRange` for an unknown index.
    pub fn question(&self, index: usize) -> Result<&Question, EditorError> {
        self.questions.get(index).ok_or(EditorError::IndexOutOfRange {
            index,
            len: self.questions.len(),
        })
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut Question, EditorError> {
        let len = self.questions.len();
        self.questions
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Appends a blank question and returns its index.
    pub fn add_question(&mut self) -> usize {
        let mut question = Question::placeholder(QuestionId::generate());
        question.sentence = NEW_QUESTION_SENTENCE.to_owned();
        question.difficulty = Difficulty::Intermediate;
        question.exam_type = ExamType::Toefl;
        self.questions.push(question);
        self.questions.len() - 1
    }

    /// Merges `patch` into the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::IndexOutOfRange` for an unknown index.
    pub fn update_question(&mut self, index: usize, patch: QuestionPatch) -> Result<(), EditorError> {
        patch.apply(self.question_mut(index)?);
        Ok(())
    }

    /// Rewrites a single option slot.
    ///
    /// If the correct answer no longer matches any option it is cleared, so
    /// the learner has to pick it again.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::IndexOutOfRange` or `EditorError::OptionSlotOutOfRange`.
    pub fn set_option(
        &mut self,
        index: usize,
        slot: usize,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        if slot >= OPTION_COUNT {
            return Err(EditorError::OptionSlotOutOfRange { slot });
        }
        let question = self.question_mut(index)?;
        if question.options.len() < OPTION_COUNT {
            question.options.resize(OPTION_COUNT, String::new());
        }
        question.options[slot] = value.into();

        if !question.correct_answer.is_empty() && !question.has_option(&question.correct_answer) {
            question.correct_answer.clear();
        }
        Ok(())
    }

    /// Options the correct answer may currently be chosen from.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::IndexOutOfRange` for an unknown index.
    pub fn correct_answer_choices(&self, index: usize) -> Result<Vec<&str>, EditorError> {
        let question = self.question(index)?;
        Ok(question
            .options
            .iter()
            .map(String::as_str)
            .filter(|option| !option.trim().is_empty())
            .collect())
    }

    /// Removes and returns the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::LastQuestion` if it is the only question left,
    /// or `EditorError::IndexOutOfRange` for an unknown index.
    pub fn remove_question(&mut self, index: usize) -> Result<Question, EditorError> {
        self.question(index)?;
        if self.questions.len() == 1 {
            return Err(EditorError::LastQuestion);
        }
        Ok(self.questions.remove(index))
    }

    /// Checks the draft against the bank invariants.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Invalid` carrying the first problem found.
    pub fn validate(&self) -> Result<(), EditorError> {
        self.to_bank().map(|_| ())
    }

    /// Builds the bank this draft would commit.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Invalid` if the draft is incomplete.
    pub fn to_bank(&self) -> Result<QuestionBank, EditorError> {
        Ok(QuestionBank::new(
            self.id.clone(),
            self.name.clone(),
            self.questions.clone(),
        )?)
    }

    /// Validates the draft and saves it through `store`.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Invalid` if the draft is incomplete; nothing is
    /// written in that case.
    pub async fn commit(&self, store: &mut BankStore) -> Result<StoreMutation, EditorError> {
        let bank = self.to_bank()?;
        log::info!("committing bank {} ({} question(s))", bank.id(), bank.len());
        Ok(store.upsert(bank).await)
    }

    /// Index of the first question that still fails validation, if any.
    #[must_use]
    pub fn first_incomplete(&self) -> Option<usize> {
        match self.validate() {
            Err(EditorError::Invalid(BankError::InvalidQuestion { index, .. })) => Some(index),
            _ => None,
        }
    }
}
