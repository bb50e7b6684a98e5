//! Query resolution: a reasoning engine choosing tools in a bounded loop.
//!
//! The [`QueryResolver`] asks a [`ReasoningEngine`] for the next step, runs the
//! chosen tool from the [`ToolRegistry`](crate::tools::ToolRegistry), records
//! the observation and repeats until the engine answers or the iteration limit
//! is reached.

mod engine;
mod memory;
mod react;
mod resolver;
mod types;

pub use engine::{NextStep, ReasoningEngine, ThinkContext};
pub use memory::{render_turns, ConversationBuffer, ConversationMemory};
pub use react::{ReactEngine, ReactOutputParser};
pub use resolver::{QueryResolver, EMPTY_ANSWER_FALLBACK};
pub use types::{Query, ResolutionResult, ResolutionStep, Role, Termination, Turn};
