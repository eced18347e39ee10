//! `agentic reflect`: generate, critique and revise.

use agentic_agent::ReflectionAgent;

pub async fn run(
    message: String,
    steps: Option<usize>,
    generation_prompt: Option<String>,
    reflection_prompt: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, provider) = super::load()?;
    let agent = ReflectionAgent::from_config(provider, &config);

    let generation_prompt =
        generation_prompt.unwrap_or_else(|| config.reflection.generation_system_prompt.clone());
    let reflection_prompt =
        reflection_prompt.unwrap_or_else(|| config.reflection.reflection_system_prompt.clone());
    let n_steps = steps.unwrap_or(config.reflection.n_steps);

    let outcome = agent
        .run_detailed(&message, &generation_prompt, &reflection_prompt, n_steps)
        .await?;
    tracing::info!(
        steps = outcome.steps,
        termination = ?outcome.termination,
        "Reflection finished"
    );

    println!("{}", outcome.answer);
    Ok(())
}
