//! # Agentic Core
//!
//! Domain types, traits, and error definitions shared by the ReAct and
//! reflection agents. The loops in `agentic-agent` only ever see the
//! structured values defined here; all free-text parsing of model output
//! happens in [`tags`].
//!
//! ## Layout
//!
//! - [`message`]: role-tagged chat messages
//! - [`tags`]: `<tag>...</tag>` extraction from model text
//! - [`history`]: capacity-bounded chat history with eviction policies
//! - [`tool`]: tool descriptors, argument validation, and the registry
//! - [`provider`]: the completion gateway abstraction

pub mod error;
pub mod history;
pub mod message;
pub mod provider;
pub mod tags;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use history::{ChatHistory, EvictionPolicy};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tags::{TagContent, extract_tag_content};
pub use tool::{
    Arguments, ParamSpec, ParamType, ToolBuilder, ToolCall, ToolDescriptor, ToolFn, ToolRegistry,
};
