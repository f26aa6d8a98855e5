//! The step-protocol agent loop — the heart of Stepwright.
//!
//! The model answers in single JSON steps and the host acts on each one:
//!
//! 1. **Seed** the transcript with the system prompt and the user's request
//! 2. **Ask** the model for the next step, sending the whole transcript
//! 3. **Record** the raw reply, then validate it
//! 4. **If TOOL**: run the tool and append its output as an OBSERVE step
//! 5. **If OUTPUT**: hand the content back to the caller
//!
//! START and THINK steps only advance the loop. Anything that is not a valid
//! step ends the run.

pub mod loop_runner;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use loop_runner::{AgentLoop, RunReport};
pub use prompt::system_prompt;
