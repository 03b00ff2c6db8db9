mod history;
mod loader;
mod phase;
mod service;
mod verifier;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use history::HistoryLog;
pub use loader::QuestionLoader;
pub use phase::{Answered, SessionPhase};
pub use service::{CheckTicket, Delivery, LoadTicket, PracticeSession};
pub use verifier::AnswerVerifier;
pub use workflow::{Completion, InFlight, PracticeLoopService};
