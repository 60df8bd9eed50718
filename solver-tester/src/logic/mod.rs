pub mod policy;
pub mod reports;
pub mod tester;

pub use policy::{AnswerPolicy, AnswerStrategy, PolicyDecision};
pub use tester::*;
