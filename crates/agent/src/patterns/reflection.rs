//! Reflection pattern: generate → critique → revise.
//!
//! Two fixed-first histories run side by side. The generator sees its own
//! previous draft and the latest critique; the critic sees the drafts as
//! user turns and its own critiques as assistant turns. Only the system
//! prompt and the most recent turns fit in each window.
//!
//! The loop stops as soon as a critique contains the stop sentinel, or
//! after `n_steps` generate/critique pairs. Either way the answer is the
//! last generation.

use agentic_config::AppConfig;
use agentic_core::error::Error;
use agentic_core::history::ChatHistory;
use agentic_core::message::Message;
use agentic_core::provider::Provider;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Sampling, request_completion};
use crate::prompts::{BASE_GENERATION_SYSTEM_PROMPT, BASE_REFLECTION_SYSTEM_PROMPT};

pub const DEFAULT_HISTORY_CAPACITY: usize = 3;
pub const DEFAULT_STOP_SENTINEL: &str = "<OK>";

/// A self-critiquing agent.
pub struct ReflectionAgent {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: Sampling,
    history_capacity: usize,
    stop_sentinel: String,
}

/// How a reflection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionTermination {
    /// The critic accepted a generation.
    StopSentinel,
    /// The step budget ran out.
    StepsExhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionOutcome {
    /// The last generation.
    pub answer: String,
    /// Generate/critique pairs played.
    pub steps: usize,
    pub termination: ReflectionTermination,
}

impl ReflectionAgent {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            sampling: Sampling::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            stop_sentinel: DEFAULT_STOP_SENTINEL.into(),
        }
    }

    /// Create an agent with the model, window and sentinel from config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, config.reflection_model())
            .with_history_capacity(config.reflection.history_capacity)
            .with_stop_sentinel(config.reflection.stop_sentinel.clone())
            .with_sampling(Sampling {
                temperature: config.default_temperature,
                max_tokens: config.default_max_tokens,
            })
    }

    /// Window size of each history, system prompt included. Must be at least 2.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_stop_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.stop_sentinel = sentinel.into();
        self
    }

    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.sampling.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.sampling.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run up to `n_steps` generate/critique pairs and return the last
    /// generation. The prompts are prefixes placed before the built-in
    /// role instructions.
    pub async fn run(
        &self,
        user_message: &str,
        generation_system_prompt: &str,
        reflection_system_prompt: &str,
        n_steps: usize,
    ) -> agentic_core::Result<String> {
        let outcome = self
            .run_detailed(
                user_message,
                generation_system_prompt,
                reflection_system_prompt,
                n_steps,
            )
            .await?;
        Ok(outcome.answer)
    }

    /// Like [`run`](Self::run), also reporting how the loop ended.
    pub async fn run_detailed(
        &self,
        user_message: &str,
        generation_system_prompt: &str,
        reflection_system_prompt: &str,
        n_steps: usize,
    ) -> agentic_core::Result<ReflectionOutcome> {
        if n_steps == 0 {
            return Err(Error::config("n_steps must be at least 1"));
        }
        if self.stop_sentinel.is_empty() {
            return Err(Error::config("stop sentinel must not be empty"));
        }

        let mut generation_history = ChatHistory::fixed_first(
            [
                Message::system(format!(
                    "{generation_system_prompt}{BASE_GENERATION_SYSTEM_PROMPT}"
                )),
                Message::user(user_message),
            ],
            self.history_capacity,
        )?;
        let mut reflection_history = ChatHistory::fixed_first(
            [Message::system(format!(
                "{reflection_system_prompt}{BASE_REFLECTION_SYSTEM_PROMPT}"
            ))],
            self.history_capacity,
        )?;

        info!(
            model = %self.model,
            n_steps,
            capacity = self.history_capacity,
            "Reflection loop starting"
        );

        let mut generation = String::new();
        for step in 1..=n_steps {
            debug!(step, total_steps = n_steps, "Reflection step");

            generation = self.complete(&generation_history).await?;
            generation_history.push(Message::assistant(generation.clone()));
            reflection_history.push(Message::user(generation.clone()));

            let critique = self.complete(&reflection_history).await?;
            if critique.contains(self.stop_sentinel.as_str()) {
                info!(step, sentinel = %self.stop_sentinel, "Stop sentinel found");
                return Ok(ReflectionOutcome {
                    answer: generation,
                    steps: step,
                    termination: ReflectionTermination::StopSentinel,
                });
            }

            debug!(step, critique_len = critique.len(), "Critique received");
            generation_history.push(Message::user(critique.clone()));
            reflection_history.push(Message::assistant(critique));
        }

        warn!(n_steps, "Reflection steps exhausted without the stop sentinel");
        Ok(ReflectionOutcome {
            answer: generation,
            steps: n_steps,
            termination: ReflectionTermination::StepsExhausted,
        })
    }

    async fn complete(&self, history: &ChatHistory) -> agentic_core::Result<String> {
        request_completion(self.provider.as_ref(), &self.model, self.sampling, history).await
    }
}
