//! Built-in tool implementations for the ReAct agent.
//!
//! Small, deterministic tools: integer arithmetic, a natural log, an
//! expression calculator, and an offline weather stub. Each module exposes
//! a `tool()` constructor returning a ready [`ToolDescriptor`].

pub mod arithmetic;
pub mod calculator;
pub mod weather;

use agentic_core::Result;
use agentic_core::tool::{ToolDescriptor, ToolRegistry};

/// Every built-in tool, in the order they appear in the system prompt.
pub fn builtin_tools() -> Result<Vec<ToolDescriptor>> {
    Ok(vec![
        arithmetic::sum_tool()?,
        arithmetic::multiply_tool()?,
        arithmetic::log_tool()?,
        calculator::tool()?,
        weather::tool()?,
    ])
}

/// Create a registry holding all built-in tools.
pub fn default_registry() -> Result<ToolRegistry> {
    ToolRegistry::from_tools(builtin_tools()?)
}
