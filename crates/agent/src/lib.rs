//! The agent loops.
//!
//! Both loops drive a hosted model through a textual tag protocol:
//!
//! - [`ReactAgent`] asks the model to think, emit `<tool_call>` blocks and
//!   finally a `<response>`; tool results are fed back as observations.
//! - [`ReflectionAgent`] alternates a generator and a critic over two
//!   bounded histories until the critic emits its stop sentinel.
//!
//! The provider is injected; neither agent builds clients or reads
//! credentials.

pub mod patterns;
pub mod prompts;

pub use patterns::{
    ReactAgent, ReactOutcome, ReactTermination, ReflectionAgent, ReflectionOutcome,
    ReflectionTermination, Sampling,
};
