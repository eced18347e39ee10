//! Shared test helpers for pattern tests.

use agentic_core::error::ProviderError;
use agentic_core::message::Message;
use agentic_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use std::sync::Mutex;

/// A mock provider that replays a sequence of scripted replies.
///
/// Each call to `complete` returns the next reply in the queue and records
/// the request it was given. Once the script runs out every call fails
/// with an `ApiError`.
pub struct SequentialMockProvider {
    responses: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every request seen so far, oldest first.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The message list of the `n`th call.
    pub fn messages_of(&self, n: usize) -> Vec<Message> {
        self.requests.lock().unwrap()[n].messages.clone()
    }
}

#[async_trait::async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        let model = request.model.clone();
        requests.push(request);

        let Some(content) = self.responses.get(index) else {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!(
                    "SequentialMockProvider: no more responses (call #{index}, have {})",
                    self.responses.len()
                ),
            });
        };

        Ok(ProviderResponse {
            content: content.clone(),
            model,
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
        })
    }
}

/// A `<tool_call>` block as the model would write it.
pub fn tool_call_block(name: &str, arguments: serde_json::Value, id: i64) -> String {
    format!(
        "<tool_call>{}</tool_call>",
        serde_json::json!({"name": name, "arguments": arguments, "id": id})
    )
}
