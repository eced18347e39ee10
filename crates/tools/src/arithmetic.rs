//! Integer arithmetic and logarithm tools.

use agentic_core::Result;
use agentic_core::error::ToolError;
use agentic_core::tool::{ParamType, ToolDescriptor};
use serde_json::json;

/// `sum_two_elements(a: int, b: int)`
pub fn sum_tool() -> Result<ToolDescriptor> {
    ToolDescriptor::builder("sum_two_elements")
        .description("Computes the sum of two integers a and b.")
        .param("a", ParamType::Int)
        .param("b", ParamType::Int)
        .build(|args| {
            let (a, b) = (args.int("a")?, args.int("b")?);
            a.checked_add(b)
                .map(|sum| json!(sum))
                .ok_or_else(|| ToolError::execution(format!("{a} + {b} overflows")))
        })
}

/// `multiply_two_elements(a: int, b: int)`
pub fn multiply_tool() -> Result<ToolDescriptor> {
    ToolDescriptor::builder("multiply_two_elements")
        .description("Computes the product of two integers a and b.")
        .param("a", ParamType::Int)
        .param("b", ParamType::Int)
        .build(|args| {
            let (a, b) = (args.int("a")?, args.int("b")?);
            a.checked_mul(b)
                .map(|product| json!(product))
                .ok_or_else(|| ToolError::execution(format!("{a} * {b} overflows")))
        })
}

/// `compute_log(x: float)`, the natural logarithm.
pub fn log_tool() -> Result<ToolDescriptor> {
    ToolDescriptor::builder("compute_log")
        .description("Computes the natural logarithm of a positive number x.")
        .param("x", ParamType::Float)
        .build(|args| {
            let x = args.float("x")?;
            if x <= 0.0 {
                return Err(ToolError::execution(format!(
                    "logarithm undefined for x = {x}"
                )));
            }
            Ok(json!(x.ln()))
        })
}
