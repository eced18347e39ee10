//! Agent patterns: structured loops over tagged model output.
//!
//! 1. **ReAct**: Thought → Action → Observation with registered tools
//! 2. **Reflection**: generate → critique, repeated until the critic accepts

pub mod react;
pub mod reflection;

pub use react::{ReactAgent, ReactOutcome, ReactTermination};
pub use reflection::{ReflectionAgent, ReflectionOutcome, ReflectionTermination};

use agentic_core::history::ChatHistory;
use agentic_core::provider::{Provider, ProviderRequest};

/// Sampling settings shared by both agents.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sampling {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Send the whole history to the provider and return the reply text.
pub(crate) async fn request_completion(
    provider: &dyn Provider,
    model: &str,
    sampling: Sampling,
    history: &ChatHistory,
) -> agentic_core::Result<String> {
    let request = ProviderRequest {
        model: model.to_string(),
        messages: history.to_vec(),
        temperature: sampling.temperature,
        max_tokens: sampling.max_tokens,
    };
    let response = provider.complete(request).await?;
    Ok(response.content)
}

#[cfg(test)]
pub(crate) mod test_helpers;
