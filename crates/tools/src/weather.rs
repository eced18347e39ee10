//! `get_current_weather` tool: an offline stub.
//!
//! Readings are derived from a hash of the location name, so the same
//! location always reports the same weather and the ReAct loop can be
//! exercised end-to-end without network access.

use agentic_core::Result;
use agentic_core::error::ToolError;
use agentic_core::tool::{ParamType, ToolDescriptor};
use serde::Serialize;

pub fn tool() -> Result<ToolDescriptor> {
    ToolDescriptor::builder("get_current_weather")
        .description(
            "Gets the current weather in a location. unit is 'C' for Celsius or 'F' for Fahrenheit.",
        )
        .param("location", ParamType::Str)
        .param("unit", ParamType::Str)
        .build(|args| {
            let location = args.str("location")?.trim();
            if location.is_empty() {
                return Err(ToolError::execution("location must not be empty"));
            }
            let unit = Unit::parse(args.str("unit")?)?;
            tracing::debug!(location, ?unit, "Weather lookup");
            serde_json::to_value(reading(location, unit))
                .map_err(|e| ToolError::execution(e.to_string()))
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    Celsius,
    Fahrenheit,
}

impl Unit {
    fn parse(raw: &str) -> std::result::Result<Self, ToolError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "c" | "celsius" | "metric" => Ok(Self::Celsius),
            "f" | "fahrenheit" | "imperial" => Ok(Self::Fahrenheit),
            other => Err(ToolError::execution(format!(
                "unknown unit '{other}', expected 'C' or 'F'"
            ))),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

#[derive(Debug, Serialize)]
struct Reading {
    location: String,
    temperature: f64,
    unit: &'static str,
    conditions: &'static str,
    humidity: u32,
}

const CONDITIONS: [&str; 6] = [
    "clear",
    "partly cloudy",
    "overcast",
    "light rain",
    "thunderstorms",
    "foggy",
];

fn reading(location: &str, unit: Unit) -> Reading {
    let hash = location
        .to_lowercase()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));

    let celsius = f64::from(hash % 40) - 5.0;
    let temperature = match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    };

    Reading {
        location: location.to_string(),
        temperature: (temperature * 10.0).round() / 10.0,
        unit: unit.label(),
        conditions: CONDITIONS[(hash as usize / 7) % CONDITIONS.len()],
        humidity: 30 + hash % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentic_core::tool::Arguments;

    fn args(location: &str, unit: &str) -> Arguments {
        Arguments::new().with("location", location).with("unit", unit)
    }

    #[test]
    fn deterministic_per_location() {
        let tool = tool().unwrap();
        let a = tool.invoke(&args("Hanoi", "C")).unwrap();
        let b = tool.invoke(&args("hanoi", "celsius")).unwrap();
        assert_eq!(a["temperature"], b["temperature"]);
        assert_eq!(a["location"], "Hanoi");
        assert_eq!(a["unit"], "C");
    }

    #[test]
    fn fahrenheit_conversion() {
        let tool = tool().unwrap();
        let c = tool.invoke(&args("Tokyo", "C")).unwrap()["temperature"]
            .as_f64()
            .unwrap();
        let f = tool.invoke(&args("Tokyo", "F")).unwrap()["temperature"]
            .as_f64()
            .unwrap();
        assert!((f - (c * 9.0 / 5.0 + 32.0)).abs() < 0.11);
    }

    #[test]
    fn unknown_unit_fails() {
        let tool = tool().unwrap();
        let err = tool.invoke(&args("Paris", "K")).unwrap_err();
        assert!(err.to_string().contains("unknown unit"));
    }

    #[test]
    fn empty_location_fails() {
        let tool = tool().unwrap();
        assert!(tool.invoke(&args("  ", "C")).is_err());
    }
}
