//! `agentic tools`: list the built-in tools.

use agentic_core::tool::ToolRegistry;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = agentic_tools::default_registry()?;
    print!("{}", render(&registry));
    Ok(())
}

fn render(registry: &ToolRegistry) -> String {
    let mut out = format!("Built-in tools ({})\n\n", registry.len());
    for tool in registry.iter() {
        let params: Vec<String> = tool
            .parameters()
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        out.push_str(&format!("  {}({})\n", tool.name(), params.join(", ")));
        if !tool.description().is_empty() {
            out.push_str(&format!("      {}\n", tool.description()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_tool_with_typed_params() {
        let registry = agentic_tools::default_registry().unwrap();
        let text = render(&registry);
        assert!(text.starts_with("Built-in tools (5)"));
        assert!(text.contains("sum_two_elements(a: int, b: int)"));
        assert!(text.contains("get_current_weather(location: str, unit: str)"));
    }
}
