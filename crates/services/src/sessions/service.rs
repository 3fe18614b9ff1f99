use grammar_core::model::{BankId, Question, Score, UserAnswer};

use super::plan::{Session, SessionBuilder};
use super::progress::SessionProgress;
use crate::bank_store::BankStore;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Where the quiz currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for the learner to pick (and possibly change) an option.
    AwaitingSelection { selected: Option<String> },
    /// The current question has been graded; feedback is showing.
    Submitted,
    /// Every question has been answered.
    Finished,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// Drives one practice run: select, submit, advance, repeat.
///
/// Transitions that do not apply to the current phase are ignored and
/// reported through their return value.
#[derive(Debug, Clone)]
pub struct QuizSession {
    session: Session,
    index: usize,
    phase: QuizPhase,
    answers: Vec<UserAnswer>,
}

impl QuizSession {
    /// Starts a quiz over the bank with `bank_id`, or the built-in bank if
    /// no such bank exists.
    #[must_use]
    pub fn start(store: &BankStore, bank_id: &BankId) -> Self {
        let bank = store.get(bank_id);
        if bank.id() != bank_id {
            log::debug!("bank {bank_id} not found; practicing {} instead", bank.id());
        }
        Self::new(SessionBuilder::new(bank).build())
    }

    /// Wraps an already built session. An empty session starts finished.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let phase = if session.is_empty() {
            QuizPhase::Finished
        } else {
            QuizPhase::AwaitingSelection { selected: None }
        };
        Self {
            session,
            index: 0,
            phase,
            answers: Vec::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[must_use]
    pub fn bank_id(&self) -> &BankId {
        &self.session.bank_id
    }

    #[must_use]
    pub fn bank_name(&self) -> &str {
        &self.session.bank_name
    }

    /// Session length, fixed when the session was built.
    #[must_use]
    pub fn total(&self) -> usize {
        self.session.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// The question being asked, or `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_finished() {
            return None;
        }
        self.session.questions.get(self.index)
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<&str> {
        match &self.phase {
            QuizPhase::AwaitingSelection { selected } => selected.as_deref(),
            QuizPhase::Submitted | QuizPhase::Finished => None,
        }
    }

    #[must_use]
    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn last_answer(&self) -> Option<&UserAnswer> {
        self.answers.last()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.session.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total();
        SessionProgress {
            position: (self.index + 1).min(total),
            total,
            answered: self.answers.len(),
            correct: self.correct_count(),
            is_finished: self.is_finished(),
        }
    }

    /// Final score; only available once the session is finished.
    #[must_use]
    pub fn score(&self) -> Option<Score> {
        self.is_finished()
            .then(|| Score::from_answers(&self.answers, self.total()))
    }

    /// Questions answered incorrectly, paired with the recorded answer.
    #[must_use]
    pub fn mistakes(&self) -> Vec<(&Question, &UserAnswer)> {
        self.answers
            .iter()
            .filter(|answer| !answer.is_correct)
            .filter_map(|answer| {
                self.session
                    .questions
                    .iter()
                    .find(|q| q.id == answer.question_id)
                    .map(|q| (q, answer))
            })
            .collect()
    }

    /// Chooses `option` for the current question, replacing any earlier choice.
    ///
    /// Returns `false` (and changes nothing) after submission or when the
    /// option is not offered by the current question.
    pub fn select_option(&mut self, option: &str) -> bool {
        let offered = self
            .session
            .questions
            .get(self.index)
            .is_some_and(|q| q.has_option(option));

        let QuizPhase::AwaitingSelection { selected } = &mut self.phase else {
            log::debug!("ignoring selection in phase {:?}", self.phase);
            return false;
        };
        if !offered {
            log::debug!("ignoring selection of unknown option {option:?}");
            return false;
        }
        *selected = Some(option.to_owned());
        true
    }

    /// Grades the current selection and records it.
    ///
    /// Returns the recorded answer, or `None` when there is nothing to submit.
    pub fn submit(&mut self) -> Option<&UserAnswer> {
        let QuizPhase::AwaitingSelection {
            selected: Some(selected),
        } = &self.phase
        else {
            log::debug!("ignoring submit in phase {:?}", self.phase);
            return None;
        };
        let question = self.session.questions.get(self.index)?;

        let answer = UserAnswer::grade(question, selected.as_str());
        self.answers.push(answer);
        self.phase = QuizPhase::Submitted;
        self.answers.last()
    }

    /// Moves past a submitted question. Returns `false` if nothing was submitted.
    pub fn advance(&mut self) -> bool {
        if self.phase != QuizPhase::Submitted {
            log::debug!("ignoring advance in phase {:?}", self.phase);
            return false;
        }

        if self.is_last_question() {
            self.phase = QuizPhase::Finished;
            log::debug!(
                "session on bank {} finished at {}/{}",
                self.session.bank_id,
                self.correct_count(),
                self.total()
            );
        } else {
            self.index += 1;
            self.phase = QuizPhase::AwaitingSelection { selected: None };
        }
        true
    }

    /// Starts over with a fresh shuffle of the bank as it is now in `store`.
    pub fn restart(&mut self, store: &BankStore, bank_id: &BankId) {
        *self = Self::start(store, bank_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grammar_core::model::{
        Difficulty, ExamType, Explanation, PerformanceTier, QuestionBank, QuestionId,
    };
    use std::sync::Arc;
    use storage::repository::InMemoryStore;

    fn although_question(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            "[BLANK] tired, she still finished the report.",
            vec![
                "Although".into(),
                "Despite".into(),
                "Because".into(),
                "Unless".into(),
            ],
            "Although",
            Explanation::new("conjunction", "Although it rained...", "Despite she was"),
            Difficulty::Intermediate,
            "Conjunctions",
            ExamType::Toefl,
        )
        .unwrap()
    }

    fn session_of(ids: &[&str]) -> QuizSession {
        let questions = ids.iter().map(|id| although_question(id)).collect();
        QuizSession::new(Session {
            bank_id: BankId::new("b"),
            bank_name: "B".into(),
            questions,
        })
    }

    #[test]
    fn correct_answer_finishes_with_full_score() {
        let mut quiz = session_of(&["1"]);
        assert!(quiz.select_option("Although"));
        assert_eq!(quiz.selected_option(), Some("Although"));

        let answer = quiz.submit().cloned().unwrap();
        assert!(answer.is_correct);
        assert_eq!(quiz.phase(), &QuizPhase::Submitted);
        assert!(quiz.is_last_question());

        assert!(quiz.advance());
        assert_eq!(quiz.phase(), &QuizPhase::Finished);
        let score = quiz.score().unwrap();
        assert_eq!((score.correct(), score.total()), (1, 1));
        assert_eq!(score.tier(), PerformanceTier::Excellent);
        assert!(quiz.current_question().is_none());
    }

    #[test]
    fn wrong_answer_is_recorded_as_selected() {
        let mut quiz = session_of(&["1"]);
        quiz.select_option("Despite");
        let answer = quiz.submit().unwrap();
        assert!(!answer.is_correct);
        assert_eq!(answer.selected_option, "Despite");
        assert_eq!(quiz.current_question().unwrap().correct_answer, "Although");

        assert_eq!(quiz.mistakes().len(), 1);
        quiz.advance();
        assert_eq!(quiz.score().unwrap().correct(), 0);
    }

    #[test]
    fn selection_can_change_before_submit() {
        let mut quiz = session_of(&["1"]);
        quiz.select_option("Despite");
        quiz.select_option("Although");
        assert!(quiz.submit().unwrap().is_correct);
    }

    #[test]
    fn selection_after_submit_does_not_change_answer() {
        let mut quiz = session_of(&["1", "2"]);
        quiz.select_option("Because");
        quiz.submit();

        assert!(!quiz.select_option("Although"));
        assert_eq!(quiz.answers().len(), 1);
        assert_eq!(quiz.last_answer().unwrap().selected_option, "Because");
    }

    #[test]
    fn unknown_option_and_empty_submit_are_ignored() {
        let mut quiz = session_of(&["1"]);
        assert!(!quiz.select_option("Whereas"));
        assert!(quiz.selected_option().is_none());
        assert!(quiz.submit().is_none());
        assert!(!quiz.advance());
        assert!(quiz.answers().is_empty());
        assert!(quiz.score().is_none());
    }

    #[test]
    fn advance_moves_to_next_question_with_clear_selection() {
        let mut quiz = session_of(&["1", "2", "3"]);
        quiz.select_option("Although");
        quiz.submit();
        quiz.advance();

        assert_eq!(quiz.current_index(), 1);
        assert_eq!(
            quiz.phase(),
            &QuizPhase::AwaitingSelection { selected: None }
        );
        let progress = quiz.progress();
        assert_eq!(progress.position, 2);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.correct, 1);
        assert!(!progress.is_finished);
    }

    #[test]
    fn score_counts_only_correct_answers() {
        let mut quiz = session_of(&["1", "2", "3"]);
        for choice in ["Although", "Unless", "Although"] {
            quiz.select_option(choice);
            quiz.submit();
            quiz.advance();
        }
        let score = quiz.score().unwrap();
        assert_eq!(score.to_string(), "2/3");
        assert_eq!(quiz.progress().position, 3);
        assert!(!quiz.select_option("Although"));
    }

    #[test]
    fn empty_session_starts_finished() {
        let quiz = QuizSession::new(Session {
            bank_id: BankId::new("b"),
            bank_name: "B".into(),
            questions: Vec::new(),
        });
        assert!(quiz.is_finished());
        assert_eq!(quiz.score().unwrap().total(), 0);
    }

    #[tokio::test]
    async fn restart_rebuilds_from_live_store() {
        let mut store = BankStore::initialize(Arc::new(InMemoryStore::new())).await;
        let bank_id = BankId::new("mine");
        let bank = QuestionBank::new(bank_id.clone(), "Mine", vec![although_question("1")]).unwrap();
        let _ = store.upsert(bank).await;

        let mut quiz = QuizSession::start(&store, &bank_id);
        assert_eq!(quiz.total(), 1);
        quiz.select_option("Although");
        quiz.submit();

        let grown = QuestionBank::new(
            bank_id.clone(),
            "Mine",
            vec![although_question("1"), although_question("2")],
        )
        .unwrap();
        let _ = store.upsert(grown).await;
        assert_eq!(quiz.total(), 1);

        quiz.restart(&store, &bank_id);
        assert_eq!(quiz.total(), 2);
        assert_eq!(quiz.current_index(), 0);
        assert!(quiz.answers().is_empty());
        assert_eq!(
            quiz.phase(),
            &QuizPhase::AwaitingSelection { selected: None }
        );
    }

    #[tokio::test]
    async fn start_with_unknown_bank_uses_default() {
        let store = BankStore::initialize(Arc::new(InMemoryStore::new())).await;
        let quiz = QuizSession::start(&store, &BankId::new("gone"));
        assert!(quiz.bank_id().is_default());
        assert_eq!(quiz.total(), 5);
    }
}
