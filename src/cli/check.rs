//! Compile statements and print their compiled form

use serde_json::Value as Json;
use tracing::debug;

use super::CliError;
use crate::{
    convert::json_to_value,
    engine::QueryEngine,
    error::QueryError,
    output::statement_to_json,
    value::Value,
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The statement to compile
    pub query: String,
    /// Parameter bindings, in the order given
    pub params: Vec<(String, String)>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only validate syntax, don't compile
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Statement compiled; parameters still unbound render as `"@name"`
    Compiled(Json),
}

/// Splits `name=value` into its parts. The name may carry a leading `@`.
pub fn parse_param(raw: &str) -> Result<(String, String), CliError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| CliError::InvalidParam(raw.to_string()))?;
    let name = name.trim().trim_start_matches('@');
    if name.is_empty() {
        return Err(CliError::InvalidParam(raw.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parameter values are read as JSON, falling back to a plain string.
fn param_value(raw: &str) -> Value {
    serde_json::from_str::<Json>(raw)
        .map(json_to_value)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Execute a quill check operation
pub fn execute_check(engine: &QueryEngine, options: &CheckOptions) -> Result<CheckResult, CliError> {
    let query = options.query.trim();
    let statement = engine.parse(query)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    if statement.params().is_empty() {
        if let Some((name, _)) = options.params.first() {
            return Err(QueryError::UnknownParameter(name.clone()).into());
        }
        let compiled = engine.compile(query)?;
        return Ok(CheckResult::Compiled(statement_to_json(&compiled)));
    }

    let mut prepared = engine.prepare(query)?;
    for (name, raw) in &options.params {
        prepared.bind(name, param_value(raw))?;
    }
    let output = if prepared.params().is_ready() {
        statement_to_json(&prepared.resolve()?)
    } else {
        debug!(unbound = ?prepared.params().unbound(), "printing template");
        statement_to_json(prepared.template())
    };
    Ok(CheckResult::Compiled(output))
}
