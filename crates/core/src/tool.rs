//! Tools: named callables the model can invoke through `<tool_call>` blocks.
//!
//! A [`ToolDescriptor`] pairs a callable with an explicit parameter schema
//! declared at registration time. Every call coming from model text is
//! validated against that schema (unknown names rejected, loosely typed
//! values coerced) before the callable runs.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result, ToolError};

/// The primitive parameter types a tool may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Str,
    Bool,
    Float,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Int => "int",
            ParamType::Str => "str",
            ParamType::Bool => "bool",
            ParamType::Float => "float",
        }
    }

    /// Whether `value` already has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::Int => value.is_i64(),
            ParamType::Str => value.is_string(),
            ParamType::Bool => value.is_boolean(),
            ParamType::Float => value.is_f64(),
        }
    }

    /// Convert `value` to this type. Values that already match are returned
    /// unchanged, so coercion is idempotent.
    pub fn coerce(&self, value: &Value) -> std::result::Result<Value, String> {
        if self.matches(value) {
            return Ok(value.clone());
        }

        let fail = || format!("cannot convert {} {value} to {}", kind(value), self.as_str());

        match (self, value) {
            (ParamType::Int, Value::Number(n)) => {
                if n.is_u64() {
                    return Err(format!("{n} is out of range for int"));
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(Value::from(f.trunc() as i64))
                    }
                    _ => Err(fail()),
                }
            }
            (ParamType::Int, Value::Bool(b)) => Ok(Value::from(i64::from(*b))),
            (ParamType::Int, Value::String(s)) => {
                s.trim().parse::<i64>().map(Value::from).map_err(|_| fail())
            }

            (ParamType::Float, Value::Number(n)) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(fail),
            (ParamType::Float, Value::Bool(b)) => Ok(float_value(if *b { 1.0 } else { 0.0 })),
            (ParamType::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(fail),

            (ParamType::Str, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (ParamType::Str, Value::Bool(b)) => Ok(Value::String(b.to_string())),
            (ParamType::Str, Value::Array(_) | Value::Object(_)) => {
                Ok(Value::String(value.to_string()))
            }

            (ParamType::Bool, Value::Number(n)) => {
                Ok(Value::Bool(n.as_f64().is_some_and(|f| f != 0.0)))
            }
            (ParamType::Bool, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "n" | "off" | "" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },

            _ => Err(fail()),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A declared parameter: name plus primitive type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

/// Keyword arguments of a tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn int(&self, name: &str) -> std::result::Result<i64, ToolError> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| missing(name, ParamType::Int))
    }

    pub fn float(&self, name: &str) -> std::result::Result<f64, ToolError> {
        self.get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| missing(name, ParamType::Float))
    }

    pub fn str(&self, name: &str) -> std::result::Result<&str, ToolError> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| missing(name, ParamType::Str))
    }

    pub fn bool(&self, name: &str) -> std::result::Result<bool, ToolError> {
        self.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| missing(name, ParamType::Bool))
    }
}

fn missing(name: &str, ty: ParamType) -> ToolError {
    ToolError::execution(format!("argument '{name}' is missing or not a {ty}"))
}

/// A request to execute a tool, as written by the model inside
/// `<tool_call>...</tool_call>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to execute
    pub name: String,

    /// Raw keyword arguments
    #[serde(default)]
    pub arguments: Arguments,

    /// Model-assigned id, increasing within one round
    pub id: i64,
}

impl ToolCall {
    /// Decode one `<tool_call>` body.
    pub fn parse(body: &str) -> std::result::Result<Self, ToolError> {
        serde_json::from_str(body).map_err(|e| ToolError::Parse(e.to_string()))
    }
}

/// The function behind a tool.
pub type ToolFn =
    Arc<dyn Fn(&Arguments) -> std::result::Result<Value, ToolError> + Send + Sync>;

/// A registered tool: name, description, declared schema, and callable.
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParamSpec>,
    callable: ToolFn,
}

impl ToolDescriptor {
    /// Start declaring a tool.
    pub fn builder(name: impl Into<String>) -> ToolBuilder {
        ToolBuilder {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParamSpec] {
        &self.parameters
    }

    /// Declared type of a parameter.
    pub fn param_type(&self, name: &str) -> Option<ParamType> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.ty)
    }

    /// The JSON signature embedded in the ReAct system prompt.
    pub fn signature(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), serde_json::json!({ "type": p.ty })))
            .collect();

        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": { "properties": properties },
        })
    }

    /// Check every argument against the schema and coerce mistyped values.
    ///
    /// Fails on arguments the tool does not declare, on declared parameters
    /// the call leaves out, and on values that cannot be converted.
    pub fn validate(&self, call: &ToolCall) -> std::result::Result<ToolCall, ToolError> {
        let mut arguments = Arguments::new();

        for (arg, value) in call.arguments.iter() {
            let ty = self
                .param_type(arg)
                .ok_or_else(|| self.argument_error(arg, "not a parameter of this tool"))?;
            let coerced = ty
                .coerce(value)
                .map_err(|reason| self.argument_error(arg, reason))?;
            arguments.insert(arg.clone(), coerced);
        }

        if let Some(absent) = self
            .parameters
            .iter()
            .find(|p| arguments.get(&p.name).is_none())
        {
            return Err(self.argument_error(&absent.name, "missing required argument"));
        }

        Ok(ToolCall {
            name: call.name.clone(),
            arguments,
            id: call.id,
        })
    }

    /// Run the callable. Any failure comes back as `ExecutionFailed`
    /// carrying this tool's name.
    pub fn invoke(&self, arguments: &Arguments) -> std::result::Result<Value, ToolError> {
        (self.callable)(arguments).map_err(|e| {
            let reason = match e {
                ToolError::ExecutionFailed { reason, .. } => reason,
                other => other.to_string(),
            };
            ToolError::ExecutionFailed {
                tool_name: self.name.clone(),
                reason,
            }
        })
    }

    fn argument_error(&self, argument: &str, reason: impl Into<String>) -> ToolError {
        ToolError::ArgumentType {
            tool_name: self.name.clone(),
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Declares a tool's schema before attaching its callable.
#[derive(Debug, Clone)]
pub struct ToolBuilder {
    name: String,
    description: String,
    parameters: Vec<ParamSpec>,
}

impl ToolBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.parameters.push(ParamSpec {
            name: name.into(),
            ty,
        });
        self
    }

    /// Attach the callable and check the declaration.
    pub fn build<F>(self, callable: F) -> Result<ToolDescriptor>
    where
        F: Fn(&Arguments) -> std::result::Result<Value, ToolError> + Send + Sync + 'static,
    {
        if !is_identifier(&self.name) {
            return Err(Error::config(format!(
                "invalid tool name '{}': use letters, digits and underscores",
                self.name
            )));
        }

        for (i, param) in self.parameters.iter().enumerate() {
            if !is_identifier(&param.name) {
                return Err(Error::config(format!(
                    "tool {}: invalid parameter name '{}'",
                    self.name, param.name
                )));
            }
            if self.parameters[..i].iter().any(|p| p.name == param.name) {
                return Err(Error::config(format!(
                    "tool {}: parameter '{}' declared twice",
                    self.name, param.name
                )));
            }
        }

        Ok(ToolDescriptor {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            callable: Arc::new(callable),
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A registry of available tools, keyed by name.
///
/// The ReAct agent uses this to:
/// 1. Render tool signatures into the system prompt
/// 2. Look up and validate tools when the model requests them
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolDescriptor>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of descriptors.
    pub fn from_tools(tools: impl IntoIterator<Item = ToolDescriptor>) -> Result<Self> {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: ToolDescriptor) -> Result<()> {
        if self.tools.contains_key(tool.name()) {
            return Err(Error::config(format!(
                "tool '{}' is already registered",
                tool.name()
            )));
        }
        self.order.push(tool.name().to_string());
        self.tools.insert(tool.name().to_string(), tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Get a tool by name, failing with `NotFound`.
    pub fn lookup(&self, name: &str) -> std::result::Result<&ToolDescriptor, ToolError> {
        self.get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Look up the tool a call names and validate the call against it.
    pub fn prepare(
        &self,
        call: &ToolCall,
    ) -> std::result::Result<(&ToolDescriptor, ToolCall), ToolError> {
        let tool = self.lookup(&call.name)?;
        let validated = tool.validate(call)?;
        Ok((tool, validated))
    }

    /// Tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Every tool signature as one JSON object per line.
    pub fn signatures(&self) -> String {
        self.iter()
            .map(|t| t.signature().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
