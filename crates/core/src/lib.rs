#![forbid(unsafe_code)]

pub mod codec;
pub mod explain;
pub mod feedback;
pub mod model;
pub mod time;

pub use codec::{DisplayForm, EncodedValue, decode, encode};
pub use feedback::{Cue, Feedback, FeedbackColor, Outcome, Presentation};
pub use time::Clock;
