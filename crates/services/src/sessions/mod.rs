mod plan;
mod progress;
mod service;

// Public API of the quiz subsystem.
pub use plan::{Session, SessionBuilder};
pub use progress::SessionProgress;
pub use service::{QuizPhase, QuizSession};
