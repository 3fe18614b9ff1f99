//! JSON wire format for persisted custom banks.
//!
//! The blob is an array of bank records with camelCase field names
//! (`correctAnswer`, `commonMistake`, `examType`). The default bank is never
//! written.

use std::collections::HashSet;

use grammar_core::model::{
    BankId, Difficulty, ExamType, Explanation, Question, QuestionBank, QuestionId,
};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRecord {
    pub rule: String,
    pub example: String,
    pub common_mistake: String,
}

/// Persisted shape for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: String,
    pub sentence: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: ExplanationRecord,
    pub difficulty: Difficulty,
    pub category: String,
    pub exam_type: ExamType,
}

/// Persisted shape for a bank.
///
/// This mirrors the domain `QuestionBank` so the store can serialize it
/// without leaking wire concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRecord {
    pub id: String,
    pub name: String,
    pub questions: Vec<QuestionRecord>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id.as_str().to_owned(),
            sentence: question.sentence.clone(),
            options: question.options.clone(),
            correct_answer: question.correct_answer.clone(),
            explanation: ExplanationRecord {
                rule: question.explanation.rule.clone(),
                example: question.explanation.example.clone(),
                common_mistake: question.explanation.common_mistake.clone(),
            },
            difficulty: question.difficulty,
            category: question.category.clone(),
            exam_type: question.exam_type,
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `grammar_core::Error` if the id is blank or the options are invalid.
    pub fn into_question(self) -> Result<Question, grammar_core::Error> {
        let id: QuestionId = self.id.parse()?;
        let question = Question::new(
            id,
            self.sentence,
            self.options,
            self.correct_answer,
            Explanation::new(
                self.explanation.rule,
                self.explanation.example,
                self.explanation.common_mistake,
            ),
            self.difficulty,
            self.category,
            self.exam_type,
        )?;
        Ok(question)
    }
}

impl BankRecord {
    #[must_use]
    pub fn from_bank(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id().as_str().to_owned(),
            name: bank.name().to_owned(),
            questions: bank
                .questions()
                .iter()
                .map(QuestionRecord::from_question)
                .collect(),
        }
    }

    /// Convert the record back into a domain `QuestionBank`.
    ///
    /// # Errors
    ///
    /// Returns `grammar_core::Error` if any question or the bank itself fails validation.
    pub fn into_bank(self) -> Result<QuestionBank, grammar_core::Error> {
        let id: BankId = self.id.parse()?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QuestionBank::new(id, self.name, questions)?)
    }
}

fn schema<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Schema(e.to_string())
}

/// Serialize every non-default bank, preserving order.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if JSON encoding fails.
pub fn encode_banks<'a>(
    banks: impl IntoIterator<Item = &'a QuestionBank>,
) -> Result<Vec<u8>, StorageError> {
    let records: Vec<BankRecord> = banks
        .into_iter()
        .filter(|bank| !bank.is_default())
        .map(BankRecord::from_bank)
        .collect();
    serde_json::to_vec(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse and validate a persisted blob.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::Schema` when a record violates the bank invariants, claims
/// the reserved default id, or repeats another bank's id.
pub fn decode_banks(bytes: &[u8]) -> Result<Vec<QuestionBank>, StorageError> {
    let records: Vec<BankRecord> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    let mut banks = Vec::with_capacity(records.len());
    for record in records {
        let bank_id = record.id.clone();
        let bank = record
            .into_bank()
            .map_err(|e| schema(format!("bank {bank_id}: {e}")))?;
        if bank.is_default() {
            return Err(schema("persisted bank uses the reserved default id"));
        }
        if !seen.insert(bank.id().clone()) {
            return Err(schema(format!("bank id {bank_id} appears more than once")));
        }
        banks.push(bank);
    }
    Ok(banks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_core::default_bank;

    fn custom_bank(id: &str, name: &str) -> QuestionBank {
        let question = Question::new(
            QuestionId::new("q1"),
            "The committee suggested that the proposal [BLANK] again.",
            vec![
                "be reviewed".into(),
                "is reviewed".into(),
                "was reviewed".into(),
                "reviewed".into(),
            ],
            "be reviewed",
            Explanation::new("subjunctive", "I suggest that he be on time.", "using 'is'"),
            Difficulty::Advanced,
            "Subjunctive Mood",
            ExamType::Toefl,
        )
        .unwrap();
        QuestionBank::new(BankId::new(id), name, vec![question]).unwrap()
    }

    #[test]
    fn encode_skips_default_bank_and_uses_wire_names() {
        let banks = vec![default_bank(), custom_bank("b1", "Mine")];
        let bytes = encode_banks(&banks).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 1);
        let question = &array[0]["questions"][0];
        assert_eq!(question["correctAnswer"], "be reviewed");
        assert_eq!(question["explanation"]["commonMistake"], "using 'is'");
        assert_eq!(question["examType"], "TOEFL");
        assert_eq!(question["difficulty"], "Advanced");
    }

    #[test]
    fn decode_reproduces_encoded_banks() {
        let banks = vec![custom_bank("b1", "First"), custom_bank("b2", "Second")];
        let decoded = decode_banks(&encode_banks(&banks).unwrap()).unwrap();
        assert_eq!(decoded, banks);
    }

    #[test]
    fn decode_accepts_legacy_blob_shape() {
        let blob = br#"[{"id":"1718000000000","name":"My bank","questions":[{
            "id":"1","sentence":"This is a [BLANK] sentence.",
            "options":["test","sample","demo","example"],"correctAnswer":"test",
            "explanation":{"rule":"","example":"","commonMistake":""},
            "difficulty":"Beginner","category":"General","examType":"SAT"}]}]"#;
        let banks = decode_banks(blob).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].name(), "My bank");
        assert_eq!(banks[0].questions()[0].exam_type, ExamType::Sat);
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let err = decode_banks(b"{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn decode_rejects_schema_violations() {
        let empty = br#"[{"id":"b1","name":"Empty","questions":[]}]"#;
        assert!(matches!(decode_banks(empty), Err(StorageError::Schema(_))));

        let reserved = encode_banks(&[custom_bank("b1", "x")])
            .map(|bytes| String::from_utf8(bytes).unwrap().replace("\"b1\"", "\"default\""))
            .unwrap();
        assert!(matches!(
            decode_banks(reserved.as_bytes()),
            Err(StorageError::Schema(_))
        ));

        let twice = encode_banks(&[custom_bank("b1", "x"), custom_bank("b1", "y")]).unwrap();
        assert!(matches!(decode_banks(&twice), Err(StorageError::Schema(_))));
    }
}
