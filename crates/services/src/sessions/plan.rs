use rand::Rng;
use rand::rng;
use rand::seq::SliceRandom;

use grammar_core::model::{BankId, Question, QuestionBank};

/// A shuffled run through one bank's questions.
///
/// Owns its own copies, so later edits to the bank do not leak in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub bank_id: BankId,
    pub bank_name: String,
    pub questions: Vec<Question>,
}

impl Session {
    /// Number of questions in this session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds a session by shuffling a bank's question order and each
/// question's option order.
pub struct SessionBuilder<'a> {
    bank: &'a QuestionBank,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    /// Build with the thread-local generator.
    #[must_use]
    pub fn build(self) -> Session {
        let mut rng = rng();
        self.build_with_rng(&mut rng)
    }

    /// Build with a caller-supplied generator, e.g. a seeded one in tests.
    ///
    /// Correct answers are matched by text, so reordering options keeps them valid.
    #[must_use]
    pub fn build_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> Session {
        let mut questions: Vec<Question> = self.bank.questions().to_vec();
        questions.shuffle(rng);
        for question in &mut questions {
            question.options.shuffle(rng);
        }
        log::debug!(
            "built session of {} question(s) from bank {}",
            questions.len(),
            self.bank.id()
        );

        Session {
            bank_id: self.bank.id().clone(),
            bank_name: self.bank.name().to_owned(),
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_core::default_bank;
    use grammar_core::model::{Difficulty, ExamType, Explanation, QuestionId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn single_question_bank() -> QuestionBank {
        let question = Question::new(
            QuestionId::new("1"),
            "[BLANK] tired, she still finished the report.",
            vec![
                "Although".into(),
                "Despite".into(),
                "Because".into(),
                "Unless".into(),
            ],
            "Although",
            Explanation::default(),
            Difficulty::Intermediate,
            "Conjunctions",
            ExamType::Toefl,
        )
        .unwrap();
        QuestionBank::new(BankId::new("solo"), "Solo", vec![question]).unwrap()
    }

    fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
        let mut items = items.to_vec();
        items.sort();
        items
    }

    #[test]
    fn session_keeps_every_question_once() {
        let bank = default_bank();
        let session = SessionBuilder::new(&bank).build();

        assert_eq!(session.len(), bank.len());
        assert_eq!(session.bank_id, *bank.id());
        assert_eq!(session.bank_name, bank.name());

        let source: Vec<&str> = bank.questions().iter().map(|q| q.id.as_str()).collect();
        let shuffled: Vec<&str> = session.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(sorted(&source), sorted(&shuffled));
    }

    #[test]
    fn options_are_permuted_and_answers_kept() {
        let bank = default_bank();
        let mut rng = StdRng::seed_from_u64(7);
        let session = SessionBuilder::new(&bank).build_with_rng(&mut rng);

        for question in &session.questions {
            let source = bank.question(&question.id).unwrap();
            assert_eq!(sorted(&question.options), sorted(&source.options));
            assert_eq!(question.correct_answer, source.correct_answer);
            assert!(question.has_option(&question.correct_answer));
            assert_eq!(question.sentence, source.sentence);
        }
    }

    #[test]
    fn source_bank_is_not_mutated() {
        let bank = default_bank();
        let before = bank.clone();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let _ = SessionBuilder::new(&bank).build_with_rng(&mut rng);
        }
        assert_eq!(bank, before);
    }

    #[test]
    fn single_question_bank_yields_single_question_session() {
        let bank = single_question_bank();
        let session = SessionBuilder::new(&bank).build();
        assert_eq!(session.len(), 1);
        assert_eq!(session.questions[0].id, QuestionId::new("1"));
    }

    #[test]
    fn option_shuffle_is_roughly_uniform() {
        let bank = single_question_bank();
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 24_000;

        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for _ in 0..trials {
            let session = SessionBuilder::new(&bank).build_with_rng(&mut rng);
            *counts.entry(session.questions[0].options.clone()).or_default() += 1;
        }

        // 4! orderings, each expected ~1000 times.
        assert_eq!(counts.len(), 24);
        for (order, count) in &counts {
            assert!(
                (700..=1300).contains(count),
                "ordering {order:?} appeared {count} times"
            );
        }
    }

    #[test]
    fn repeated_builds_are_independent() {
        let bank = default_bank();
        let mut rng = StdRng::seed_from_u64(1);
        let orders: Vec<Vec<QuestionId>> = (0..20)
            .map(|_| {
                SessionBuilder::new(&bank)
                    .build_with_rng(&mut rng)
                    .questions
                    .into_iter()
                    .map(|q| q.id)
                    .collect()
            })
            .collect();
        assert!(orders.windows(2).any(|pair| pair[0] != pair[1]));
    }
}
