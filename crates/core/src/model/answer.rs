use std::fmt;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// One submitted answer within a session. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAnswer {
    pub question_id: QuestionId,
    pub selected_option: String,
    pub is_correct: bool,
}

impl UserAnswer {
    /// Grades `selected` against the question's correct answer.
    #[must_use]
    pub fn grade(question: &Question, selected: impl Into<String>) -> Self {
        let selected_option = selected.into();
        let is_correct = question.is_correct(&selected_option);
        Self {
            question_id: question.id.clone(),
            selected_option,
            is_correct,
        }
    }
}

//
// ─── SCORE ─────────────────────────────────────────────────────────────────────
//

/// Final result of a practice run: correct answers out of session length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct: usize,
    total: usize,
}

impl Score {
    #[must_use]
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct: correct.min(total),
            total,
        }
    }

    /// Counts the correct entries of an answer log against a session length.
    #[must_use]
    pub fn from_answers(answers: &[UserAnswer], total: usize) -> Self {
        Self::new(answers.iter().filter(|a| a.is_correct).count(), total)
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction in `[0, 1]`; zero for an empty session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.ratio() * 100.0
    }

    #[must_use]
    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::for_score(self)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}

/// Coarse band used to pick the encouragement shown with a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    /// Every answer correct.
    Excellent,
    /// At least 80%.
    Great,
    /// At least 60%.
    Good,
    KeepPracticing,
}

impl PerformanceTier {
    #[must_use]
    pub fn for_score(score: &Score) -> Self {
        if score.total() > 0 && score.correct() == score.total() {
            return Self::Excellent;
        }
        let pct = score.percentage();
        if pct >= 80.0 {
            Self::Great
        } else if pct >= 60.0 {
            Self::Good
        } else {
            Self::KeepPracticing
        }
    }

    /// Static bilingual message for the result screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            PerformanceTier::Excellent => {
                "卓越！你已经完全掌握了这些复杂的语法结构。/ Excellent! You have mastered these complex structures."
            }
            PerformanceTier::Great => {
                "太棒了！你的语法基础非常扎实，继续保持。/ Great job! Your grammar foundation is very solid."
            }
            PerformanceTier::Good => {
                "做得好！你对大多数结构都有很好的理解。/ Well done! You have a good understanding."
            }
            PerformanceTier::KeepPracticing => {
                "继续努力！语法辨析需要不断的练习和积累。/ Keep practicing! Mastery takes time and repetition."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, ExamType, Explanation};

    fn question() -> Question {
        Question::new(
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
        .unwrap()
    }

    #[test]
    fn grade_marks_correct_and_incorrect() {
        let q = question();
        let right = UserAnswer::grade(&q, "Although");
        assert!(right.is_correct);
        assert_eq!(right.question_id, QuestionId::new("1"));

        let wrong = UserAnswer::grade(&q, "Despite");
        assert!(!wrong.is_correct);
        assert_eq!(wrong.selected_option, "Despite");
    }

    #[test]
    fn score_counts_correct_answers() {
        let q = question();
        let answers = vec![
            UserAnswer::grade(&q, "Although"),
            UserAnswer::grade(&q, "Unless"),
            UserAnswer::grade(&q, "Although"),
        ];
        let score = Score::from_answers(&answers, 4);
        assert_eq!(score.correct(), 2);
        assert_eq!(score.total(), 4);
        assert_eq!(score.to_string(), "2/4");
        assert!((score.percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tiers_follow_percentage_bands() {
        assert_eq!(Score::new(5, 5).tier(), PerformanceTier::Excellent);
        assert_eq!(Score::new(4, 5).tier(), PerformanceTier::Great);
        assert_eq!(Score::new(3, 5).tier(), PerformanceTier::Good);
        assert_eq!(Score::new(2, 5).tier(), PerformanceTier::KeepPracticing);
        assert_eq!(Score::new(0, 0).tier(), PerformanceTier::KeepPracticing);
        assert!(PerformanceTier::Excellent.message().contains("Excellent"));
    }
}
