//! The tool-calling agent loop.
//!
//! One user turn runs as:
//!
//! 1. **Send** the conversation and every tool schema to the provider
//! 2. **Record** the assistant response in history, untouched
//! 3. **If tool calls**: run them in order, append all results as one
//!    user message, and go back to step 1
//! 4. **If text only**: the turn is done
//!
//! The loop also stops when the iteration budget runs out, when the model
//! returns nothing usable, when a model call fails or times out, and when
//! the shared [`Interrupt`] is raised.

pub mod interrupt;
pub mod loop_runner;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use interrupt::Interrupt;
pub use loop_runner::{AgentLoop, DEFAULT_CALL_TIMEOUT, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_TOKENS};
pub use turn::{TurnEvent, TurnResult};
