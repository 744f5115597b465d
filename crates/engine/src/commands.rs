//! Command registry – the JSON call surface over a [`Calculator`].
//!
//! Commands are registered by name and invoked with JSON input/output, so
//! the CLI, the daemon and scenarios all drive the engine the same way.

use crate::calculator::Calculator;
use crate::error::CalcError;
use crate::key::{parse_keys, Key};
use crate::operator::Operator;
use crate::types::*;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// Signature for all engine commands.
pub type CommandHandler = fn(Value, &mut Calculator) -> Result<Value, CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CommandError::InvalidInput(_) => ErrorCode::InvalidInput,
            CommandError::Calc(CalcError::InvalidLiteral(_)) => ErrorCode::InvalidLiteral,
            CommandError::Calc(CalcError::InvalidDigit(_)) => ErrorCode::InvalidInput,
            CommandError::Calc(CalcError::UnknownKey(_)) => ErrorCode::UnknownKey,
            CommandError::Other(_) => ErrorCode::InternalError,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            handlers: HashMap::new(),
        };
        reg.register("digit", cmd_digit);
        reg.register("operator", cmd_operator);
        reg.register("backspace", cmd_backspace);
        reg.register("clear_entry", cmd_clear_entry);
        reg.register("clear_all", cmd_clear_all);
        reg.register("press", cmd_press);
        reg.register("state", cmd_state);
        reg.register("operators", cmd_operators);
        reg
    }

    pub fn register(&mut self, name: &str, handler: CommandHandler) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Execute a command by name and return a full CommandResult.
    pub fn execute(&self, name: &str, args: Value, calc: &mut Calculator) -> CommandResult {
        let run_id = new_run_id();
        let start = Instant::now();

        let handler = match self.handlers.get(name) {
            Some(h) => h,
            None => {
                return result_err(
                    "call",
                    name,
                    &run_id,
                    elapsed_us(start),
                    ErrorCode::UnknownCommand,
                    format!("unknown command: {}", name),
                );
            }
        };

        match handler(args, calc) {
            Ok(data) => {
                let mut r = result_ok("call", name, &run_id, elapsed_us(start));
                r.data = Some(data);
                r
            }
            Err(e) => {
                tracing::debug!(command = name, error = %e, "command failed");
                result_err(
                    "call",
                    name,
                    &run_id,
                    elapsed_us(start),
                    e.error_code(),
                    e.to_string(),
                )
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn elapsed_us(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

fn str_field<'a>(args: &'a Value, field: &str) -> Result<&'a str, CommandError> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| CommandError::InvalidInput(format!("missing '{}' string field", field)))
}

fn snapshot_value(calc: &Calculator) -> Result<Value, CommandError> {
    serde_json::to_value(calc.snapshot()).map_err(|e| CommandError::Other(e.to_string()))
}

// ===========================================================================
// Built-in commands
// ===========================================================================

/// `digit` – type one digit or decimal point.
///
/// Args: `{ "key": "7" }`
fn cmd_digit(args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    let key = str_field(&args, "key")?;
    let mut chars = key.chars();
    let c = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(CommandError::InvalidInput(format!(
                "'key' must be a single character, got {:?}",
                key
            )))
        }
    };
    calc.press_digit(c)?;
    snapshot_value(calc)
}

/// `operator` – press a non-digit button by symbol or alias.
///
/// Args: `{ "symbol": "×" }`
fn cmd_operator(args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    let op: Operator = str_field(&args, "symbol")?.parse()?;
    calc.press_operator(op)?;
    snapshot_value(calc)
}

fn cmd_backspace(_args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    calc.backspace();
    snapshot_value(calc)
}

fn cmd_clear_entry(_args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    calc.clear_entry();
    snapshot_value(calc)
}

fn cmd_clear_all(_args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    calc.clear_all();
    snapshot_value(calc)
}

/// `press` – feed a whitespace-separated key string.
///
/// Args: `{ "keys": "3 + 4 × 2 =" }`
///
/// The whole string is tokenized before any key is pressed; presses stop at
/// the first key the calculator rejects.
fn cmd_press(args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    let keys: Vec<Key> = parse_keys(str_field(&args, "keys")?)?;
    calc.press_all(&keys)?;
    snapshot_value(calc)
}

/// `state` – current snapshot without pressing anything.
fn cmd_state(_args: Value, calc: &mut Calculator) -> Result<Value, CommandError> {
    snapshot_value(calc)
}

/// `operators` – the dispatch table.
///
/// Returns: `[{ "symbol": "+", "aliases": ["add"], "kind": "binary" }, ...]`
fn cmd_operators(_args: Value, _calc: &mut Calculator) -> Result<Value, CommandError> {
    let rows: Vec<Value> = Operator::all()
        .map(|op| {
            serde_json::json!({
                "symbol": op.symbol(),
                "aliases": op.def().aliases,
                "kind": op.kind(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::OPERATORS;

    #[test]
    fn test_press_command() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        let result = reg.execute("press", serde_json::json!({ "keys": "3 + 4 × 2 =" }), &mut calc);
        assert_eq!(result.status, Status::Pass);
        let data = result.data.unwrap();
        assert_eq!(data["display"], "14");
        assert_eq!(data["history"], "");
    }

    #[test]
    fn test_unknown_command() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        let result = reg.execute("nonexistent", serde_json::json!({}), &mut calc);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.error.unwrap().code, ErrorCode::UnknownCommand);
    }

    #[test]
    fn test_digit_and_operator_commands() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();

        let r = reg.execute("digit", serde_json::json!({ "key": "9" }), &mut calc);
        assert_eq!(r.status, Status::Pass);

        let r = reg.execute("operator", serde_json::json!({ "symbol": "sqrt" }), &mut calc);
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.data.unwrap()["pending"], "√");

        let r = reg.execute("digit", serde_json::json!({ "key": "12" }), &mut calc);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_missing_field() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        let r = reg.execute("press", serde_json::json!({}), &mut calc);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_error_codes_from_engine() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();

        let r = reg.execute("press", serde_json::json!({ "keys": "1 ( 2" }), &mut calc);
        assert_eq!(r.error.unwrap().code, ErrorCode::UnknownKey);
        // Tokenizing failed, nothing was pressed.
        assert_eq!(calc.display(), "0");

        let r = reg.execute("press", serde_json::json!({ "keys": "1..2 +" }), &mut calc);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidLiteral);
        assert_eq!(calc.display(), "1..2");
    }

    #[test]
    fn test_clear_commands() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        reg.execute("press", serde_json::json!({ "keys": "7 + 8" }), &mut calc);

        let r = reg.execute("clear_entry", Value::Null, &mut calc);
        let data = r.data.unwrap();
        assert_eq!(data["display"], "0");
        assert_eq!(data["accumulator"], 7.0);

        let r = reg.execute("clear_all", Value::Null, &mut calc);
        let data = r.data.unwrap();
        assert_eq!(data["accumulator"], 0.0);
        assert_eq!(data["pending"], "=");
    }

    #[test]
    fn test_operators_command_lists_table() {
        let mut calc = Calculator::new();
        let reg = CommandRegistry::new();
        let r = reg.execute("operators", Value::Null, &mut calc);
        let rows = r.data.unwrap();
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), OPERATORS.len());
        assert_eq!(rows[0]["symbol"], "+");
        assert_eq!(rows[0]["kind"], "binary");
    }

    #[test]
    fn test_list_commands() {
        let reg = CommandRegistry::new();
        let names = reg.list();
        assert!(names.contains(&"press"));
        assert!(names.contains(&"backspace"));
        assert!(names.contains(&"state"));
    }
}
