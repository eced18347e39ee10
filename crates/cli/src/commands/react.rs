//! `agentic react`: answer a question with the built-in tools.

use agentic_agent::ReactAgent;
use std::sync::Arc;

pub async fn run(
    message: String,
    max_rounds: Option<usize>,
    system_prompt: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, provider) = super::load()?;
    let tools = Arc::new(agentic_tools::default_registry()?);

    let mut agent = ReactAgent::from_config(provider, tools, &config);
    if let Some(prompt) = system_prompt {
        agent = agent.with_system_prompt(prompt);
    }
    let max_rounds = max_rounds.unwrap_or(config.react.max_rounds);

    let outcome = agent.run_detailed(&message, max_rounds).await?;
    tracing::info!(
        rounds = outcome.rounds,
        tool_calls = outcome.tool_calls_made,
        termination = ?outcome.termination,
        "ReAct finished"
    );

    println!("{}", outcome.answer);
    Ok(())
}
