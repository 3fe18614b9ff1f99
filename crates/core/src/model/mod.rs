mod answer;
mod bank;
mod ids;
mod question;

pub use ids::{BankId, DEFAULT_BANK_ID, ParseIdError, QuestionId};

pub use answer::{PerformanceTier, Score, UserAnswer};
pub use bank::{BankError, QuestionBank};
pub use question::{
    Difficulty, ExamType, Explanation, GAP_MARKER, OPTION_COUNT, Question, QuestionError,
};
