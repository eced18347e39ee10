//! ReAct pattern: Thought → Action → Observation loop.
//!
//! Each round the model sees the full history and answers with free text.
//! A `<response>` tag ends the run. Otherwise every `<tool_call>` block is
//! parsed, validated and dispatched in document order, and the results are
//! appended as a single observation message keyed by call id.
//!
//! Recoverable tool failures (malformed JSON, unknown tool, bad argument)
//! are reported back to the model in place of a result so it can correct
//! itself. A tool that fails while running aborts the run.
//!
//! If the round budget runs out, one last completion is requested and its
//! raw text is returned.

use agentic_config::AppConfig;
use agentic_core::error::ToolError;
use agentic_core::history::ChatHistory;
use agentic_core::message::{Message, Role};
use agentic_core::provider::Provider;
use agentic_core::tags::extract_tag_content;
use agentic_core::tool::{ToolCall, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{Sampling, request_completion};
use crate::prompts;

/// A tool-using agent speaking the ReAct tag protocol.
pub struct ReactAgent {
    provider: Arc<dyn Provider>,
    model: String,
    tools: Arc<ToolRegistry>,
    /// Caller prefix; the protocol instructions are appended per run.
    system_prompt: String,
    sampling: Sampling,
}

/// How a ReAct run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactTermination {
    /// The model produced a `<response>` tag.
    FinalResponse,
    /// The round budget ran out; the answer is the fallback completion.
    RoundsExhausted,
    /// No tools are registered, so a single plain completion was made.
    NoTools,
}

/// The result of a ReAct execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactOutcome {
    /// The final answer text.
    pub answer: String,
    /// Rounds played (the fallback call is not a round).
    pub rounds: usize,
    /// Tool invocations that ran to completion.
    pub tool_calls_made: usize,
    pub termination: ReactTermination,
}

impl ReactAgent {
    /// Create a new ReAct agent.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            tools,
            system_prompt: String::new(),
            sampling: Sampling::default(),
        }
    }

    /// Create an agent with the model, prompt prefix and sampling from config.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self::new(provider, config.react_model(), tools)
            .with_system_prompt(config.react.system_prompt.clone())
            .with_sampling(Sampling {
                temperature: config.default_temperature,
                max_tokens: config.default_max_tokens,
            })
    }

    /// Set the prefix placed before the protocol instructions.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
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

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.sampling.max_tokens = Some(max);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer `user_message`, using at most `max_rounds` rounds.
    pub async fn run(&self, user_message: &str, max_rounds: usize) -> agentic_core::Result<String> {
        Ok(self.run_detailed(user_message, max_rounds).await?.answer)
    }

    /// Like [`run`](Self::run), also reporting how the loop ended.
    pub async fn run_detailed(
        &self,
        user_message: &str,
        max_rounds: usize,
    ) -> agentic_core::Result<ReactOutcome> {
        let question = Message::tagged(Role::User, user_message, "question");

        if self.tools.is_empty() {
            info!(model = %self.model, "No tools registered, answering directly");
            let history = ChatHistory::unbounded([Message::system(&self.system_prompt), question]);
            let answer = self.complete(&history).await?;
            return Ok(ReactOutcome {
                answer,
                rounds: 0,
                tool_calls_made: 0,
                termination: ReactTermination::NoTools,
            });
        }

        let system = prompts::react_system_prompt(&self.system_prompt, &self.tools.signatures());
        let mut history = ChatHistory::unbounded([Message::system(system), question]);
        let mut tool_calls_made = 0usize;

        info!(
            model = %self.model,
            max_rounds,
            tools = self.tools.len(),
            "ReAct loop starting"
        );

        for round in 1..=max_rounds {
            debug!(round, "ReAct round");

            let completion = self.complete(&history).await?;

            if let Some(answer) = extract_tag_content(&completion, "response").first() {
                info!(round, tool_calls_made, "ReAct loop completed");
                return Ok(ReactOutcome {
                    answer: answer.to_string(),
                    rounds: round,
                    tool_calls_made,
                    termination: ReactTermination::FinalResponse,
                });
            }

            if let Some(thought) = extract_tag_content(&completion, "thought").first() {
                debug!(round, thought, "Agent thought");
            }
            let tool_calls = extract_tag_content(&completion, "tool_call");

            // Raw text goes back in so partial or malformed tags stay visible.
            history.push(Message::assistant(completion));

            if !tool_calls.found {
                debug!(round, "Round produced no response and no tool calls");
                continue;
            }

            let observations = self.dispatch(&tool_calls.content, &mut tool_calls_made)?;
            let rendered = observations.render();
            debug!(round, observations = %rendered, "Observations");
            history.push(Message::user(rendered));
        }

        warn!(max_rounds, "ReAct rounds exhausted without a response");
        let answer = self.complete(&history).await?;

        Ok(ReactOutcome {
            answer,
            rounds: max_rounds,
            tool_calls_made,
            termination: ReactTermination::RoundsExhausted,
        })
    }

    /// Run every tool call block of one round, in order.
    fn dispatch(
        &self,
        blocks: &[String],
        tool_calls_made: &mut usize,
    ) -> agentic_core::Result<Observations> {
        let mut observations = Observations::default();

        for (index, block) in blocks.iter().enumerate() {
            let call = match ToolCall::parse(block) {
                Ok(call) => call,
                Err(e) => {
                    warn!(block = index, error = %e, "Skipping malformed tool call");
                    observations.record(format!("malformed_{index}"), failure(&e));
                    continue;
                }
            };

            let outcome = self.tools.prepare(&call).and_then(|(tool, validated)| {
                debug!(
                    tool = %tool.name(),
                    id = validated.id,
                    arguments = ?validated.arguments,
                    "Dispatching tool call"
                );
                tool.invoke(&validated.arguments)
            });

            match outcome {
                Ok(result) => {
                    *tool_calls_made += 1;
                    observations.record(call.id.to_string(), result);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(tool = %call.name, id = call.id, error = %e, "Tool call rejected");
                    observations.record(call.id.to_string(), failure(&e));
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(observations)
    }

    async fn complete(&self, history: &ChatHistory) -> agentic_core::Result<String> {
        request_completion(self.provider.as_ref(), &self.model, self.sampling, history).await
    }
}

fn failure(error: &ToolError) -> Value {
    serde_json::json!({ "error": error.to_string() })
}

/// Results of one round, keyed by call id in dispatch order.
///
/// A repeated id overwrites the earlier result but keeps its position.
#[derive(Debug, Default)]
struct Observations(Vec<(String, Value)>);

impl Observations {
    fn record(&mut self, key: String, value: Value) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Compact JSON object text.
    fn render(&self) -> String {
        let entries: Vec<String> = self
            .0
            .iter()
            .map(|(key, value)| format!("{}:{}", Value::String(key.clone()), value))
            .collect();
        format!("{{{}}}", entries.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_helpers::{SequentialMockProvider, tool_call_block};
    use agentic_core::tool::{ParamType, ToolDescriptor};
    use agentic_core::{Error, ProviderError};
    use serde_json::json;
    use std::sync::Mutex;

    /// `add(a:int, b:int)` that records every argument set it receives.
    fn add_tool(seen: Arc<Mutex<Vec<(i64, i64)>>>) -> ToolDescriptor {
        ToolDescriptor::builder("add")
            .description("Adds two integers.")
            .param("a", ParamType::Int)
            .param("b", ParamType::Int)
            .build(move |args| {
                let (a, b) = (args.int("a")?, args.int("b")?);
                seen.lock().unwrap().push((a, b));
                Ok(json!(a + b))
            })
            .unwrap()
    }

    fn failing_tool() -> ToolDescriptor {
        ToolDescriptor::builder("explode")
            .param("x", ParamType::Int)
            .build(|_| Err(ToolError::execution("disk on fire")))
            .unwrap()
    }

    fn agent_with(
        provider: &Arc<SequentialMockProvider>,
        tools: Vec<ToolDescriptor>,
    ) -> ReactAgent {
        ReactAgent::new(
            provider.clone(),
            "mock-model",
            Arc::new(ToolRegistry::from_tools(tools).unwrap()),
        )
    }

    #[tokio::test]
    async fn response_on_first_round_ends_the_loop() {
        let provider = Arc::new(SequentialMockProvider::new(["<response>42</response>"]));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let agent = agent_with(&provider, vec![add_tool(seen.clone())]);

        let outcome = agent.run_detailed("What is 6*7?", 10).await.unwrap();

        assert_eq!(outcome.answer, "42");
        assert_eq!(outcome.rounds, 1);
        assert_eq!(outcome.termination, ReactTermination::FinalResponse);
        assert_eq!(provider.call_count(), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn tool_call_arguments_are_coerced_before_invocation() {
        let provider = Arc::new(SequentialMockProvider::new([
            r#"<thought>add them</thought><tool_call>{"name":"add","arguments":{"a":"2","b":"3"},"id":0}</tool_call>"#,
            "<response>5</response>",
        ]));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let agent = agent_with(&provider, vec![add_tool(seen.clone())]);

        let outcome = agent.run_detailed("2 + 3?", 10).await.unwrap();

        assert_eq!(outcome.answer, "5");
        assert_eq!(outcome.tool_calls_made, 1);
        assert_eq!(provider.call_count(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![(2, 3)]);

        let second = provider.messages_of(1);
        assert_eq!(second.len(), 4);
        assert_eq!(second[1].content, "<question>2 + 3?</question>");
        assert_eq!(second[2].role, Role::Assistant);
        assert!(second[2].content.contains("<tool_call>"));
        assert_eq!(second[3].role, Role::User);
        assert_eq!(second[3].content, r#"{"0":5}"#);
    }

    #[tokio::test]
    async fn system_prompt_embeds_tool_signatures() {
        let provider = Arc::new(SequentialMockProvider::new(["<response>ok</response>"]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())])
            .with_system_prompt("You are a calculator.");

        agent.run("hi", 10).await.unwrap();

        let system = &provider.messages_of(0)[0];
        assert_eq!(system.role, Role::System);
        assert!(system.content.starts_with("You are a calculator.\n"));
        let tools = extract_tag_content(&system.content, "tools");
        let sig: Value = serde_json::from_str(tools.first().unwrap()).unwrap();
        assert_eq!(sig["name"], "add");
        assert_eq!(sig["parameters"]["properties"]["a"]["type"], "int");
    }

    #[tokio::test]
    async fn repeated_runs_do_not_accumulate_instructions() {
        let provider = Arc::new(SequentialMockProvider::new([
            "<response>a</response>",
            "<response>b</response>",
        ]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        agent.run("first", 10).await.unwrap();
        agent.run("second", 10).await.unwrap();

        assert_eq!(
            provider.messages_of(0)[0].content,
            provider.messages_of(1)[0].content
        );
    }

    #[tokio::test]
    async fn no_tools_makes_one_plain_call() {
        let provider = Arc::new(SequentialMockProvider::new([
            "<thought>hm</thought>plain answer",
        ]));
        let agent = agent_with(&provider, vec![]).with_system_prompt("Be kind.");

        let outcome = agent.run_detailed("hello", 10).await.unwrap();

        assert_eq!(outcome.answer, "<thought>hm</thought>plain answer");
        assert_eq!(outcome.termination, ReactTermination::NoTools);
        assert_eq!(provider.call_count(), 1);
        let messages = provider.messages_of(0);
        assert_eq!(messages[0].content, "Be kind.");
        assert_eq!(messages[1].content, "<question>hello</question>");
    }

    #[tokio::test]
    async fn exhausted_rounds_fall_back_to_raw_completion() {
        let provider = Arc::new(SequentialMockProvider::new([
            "<thought>one</thought>",
            "<thought>two</thought>",
            "<thought>three</thought>",
            "final <response>not extracted</response> text",
        ]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        let outcome = agent.run_detailed("loop", 3).await.unwrap();

        assert_eq!(outcome.termination, ReactTermination::RoundsExhausted);
        assert_eq!(outcome.rounds, 3);
        assert_eq!(outcome.answer, "final <response>not extracted</response> text");
        assert_eq!(provider.call_count(), 4);
        // system + question + three assistant turns
        assert_eq!(provider.messages_of(3).len(), 5);
    }

    #[tokio::test]
    async fn empty_round_keeps_looping() {
        let provider = Arc::new(SequentialMockProvider::new([
            "I am not following the protocol",
            "<response>done</response>",
        ]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        let outcome = agent.run_detailed("q", 10).await.unwrap();

        assert_eq!(outcome.answer, "done");
        assert_eq!(outcome.rounds, 2);
        assert_eq!(provider.messages_of(1).len(), 3);
    }

    #[tokio::test]
    async fn malformed_block_is_reported_and_siblings_still_run() {
        let reply = format!(
            "<tool_call>{{not json</tool_call>{}",
            tool_call_block("add", json!({"a": 1, "b": 1}), 1)
        );
        let provider = Arc::new(SequentialMockProvider::new([
            reply.as_str(),
            "<response>2</response>",
        ]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        let outcome = agent.run_detailed("1+1", 10).await.unwrap();
        assert_eq!(outcome.tool_calls_made, 1);

        let observation: Value =
            serde_json::from_str(&provider.messages_of(1)[3].content).unwrap();
        assert!(
            observation["malformed_0"]["error"]
                .as_str()
                .unwrap()
                .contains("Malformed tool call")
        );
        assert_eq!(observation["1"], 2);
    }

    #[tokio::test]
    async fn unknown_tool_is_fed_back_as_observation() {
        let provider = Arc::new(SequentialMockProvider::new([
            tool_call_block("nope", json!({}), 0),
            "<response>sorry</response>".to_string(),
        ]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        assert_eq!(agent.run("q", 10).await.unwrap(), "sorry");
        assert_eq!(
            provider.messages_of(1)[3].content,
            r#"{"0":{"error":"Tool not found: nope"}}"#
        );
    }

    #[tokio::test]
    async fn bad_argument_is_fed_back_without_invoking() {
        let provider = Arc::new(SequentialMockProvider::new([
            tool_call_block("add", json!({"a": "abc", "b": 1}), 0),
            "<response>retrying</response>".to_string(),
        ]));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let agent = agent_with(&provider, vec![add_tool(seen.clone())]);

        agent.run("q", 10).await.unwrap();

        assert!(seen.lock().unwrap().is_empty());
        let observation: Value =
            serde_json::from_str(&provider.messages_of(1)[3].content).unwrap();
        let error = observation["0"]["error"].as_str().unwrap();
        assert!(error.contains("'a'"));
        assert!(error.contains("add"));
    }

    #[tokio::test]
    async fn observations_keep_dispatch_order() {
        let reply = format!(
            "{}\n{}",
            tool_call_block("add", json!({"a": 10, "b": 1}), 7),
            tool_call_block("add", json!({"a": 1, "b": 1}), 2),
        );
        let provider = Arc::new(SequentialMockProvider::new([
            reply.as_str(),
            "<response>ok</response>",
        ]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        let outcome = agent.run_detailed("q", 10).await.unwrap();

        assert_eq!(outcome.tool_calls_made, 2);
        assert_eq!(provider.messages_of(1)[3].content, r#"{"7":11,"2":2}"#);
    }

    #[tokio::test]
    async fn execution_failure_aborts_the_run() {
        let provider = Arc::new(SequentialMockProvider::new([
            tool_call_block("explode", json!({"x": 1}), 0),
            "<response>unreachable</response>".to_string(),
        ]));
        let agent = agent_with(&provider, vec![failing_tool()]);

        let err = agent.run("q", 10).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Tool(ToolError::ExecutionFailed { ref tool_name, ref reason })
                if tool_name == "explode" && reason == "disk on fire"
        ));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn gateway_failure_is_fatal() {
        let provider = Arc::new(SequentialMockProvider::new(Vec::<String>::new()));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())]);

        let err = agent.run("q", 10).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::ApiError { .. })));
    }

    #[tokio::test]
    async fn sampling_settings_reach_the_provider() {
        let provider = Arc::new(SequentialMockProvider::new(["<response>x</response>"]));
        let agent = agent_with(&provider, vec![add_tool(Arc::default())])
            .with_temperature(0.2)
            .with_max_tokens(128);

        agent.run("q", 1).await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.model, "mock-model");
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(128));
    }

    #[test]
    fn from_config_uses_react_section() {
        let mut config = AppConfig::default();
        config.react.model = Some("llama-react".into());
        config.react.system_prompt = "prefix".into();
        config.default_temperature = Some(0.1);

        let provider = Arc::new(SequentialMockProvider::new(Vec::<String>::new()));
        let agent = ReactAgent::from_config(provider, Arc::new(ToolRegistry::new()), &config);

        assert_eq!(agent.model(), "llama-react");
        assert_eq!(agent.system_prompt, "prefix");
        assert_eq!(agent.sampling.temperature, Some(0.1));
    }

    #[test]
    fn observation_rendering_overwrites_in_place() {
        let mut obs = Observations::default();
        obs.record("1".into(), json!("a"));
        obs.record("0".into(), json!("b"));
        obs.record("1".into(), json!("c"));
        assert_eq!(obs.render(), r#"{"1":"c","0":"b"}"#);
        assert_eq!(Observations::default().render(), "{}");
    }
}
