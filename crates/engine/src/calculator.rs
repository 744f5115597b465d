//! The accumulator state machine.
//!
//! A [`Calculator`] is either *entering* (the next digit replaces the entry
//! buffer) or *appending* (the next digit extends it). Pressing an operator
//! while appending folds the typed literal into the accumulator under the
//! operator that was pending, strictly left to right, with no precedence.

use crate::config::EngineConfig;
use crate::error::{CalcError, CalcResult};
use crate::format::format_display;
use crate::key::{is_entry_char, Key};
use crate::operator::Operator;
use serde::Serialize;

/// Glyph placed in the entry buffer when a negative literal is started.
pub const MINUS_GLYPH: char = '−';

/// Renderer-agnostic calculator state.
#[derive(Debug, Clone)]
pub struct Calculator {
    config: EngineConfig,
    accumulator: f64,
    pending: Operator,
    entry: String,
    entry_start: bool,
    history: Vec<String>,
}

/// Everything a front end needs to redraw after a key press.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub display: String,
    pub history: String,
    /// `null` in JSON when NaN or infinite.
    pub accumulator: f64,
    pub pending: Operator,
    pub entry_start: bool,
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            pending: Operator::Equals,
            entry: "0".to_string(),
            entry_start: true,
            history: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Observable state
    // -----------------------------------------------------------------------

    pub fn display(&self) -> &str {
        &self.entry
    }

    pub fn history_text(&self) -> String {
        self.history.join(" ")
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn pending(&self) -> Operator {
        self.pending
    }

    /// `true` when the next digit starts a fresh literal.
    pub fn is_entry_start(&self) -> bool {
        self.entry_start
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.entry.clone(),
            history: self.history_text(),
            accumulator: self.accumulator,
            pending: self.pending,
            entry_start: self.entry_start,
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn press(&mut self, key: Key) -> CalcResult<()> {
        match key {
            Key::Digit(c) => self.press_digit(c),
            Key::Operator(op) => self.press_operator(op),
            Key::Backspace => {
                self.backspace();
                Ok(())
            }
            Key::ClearEntry => {
                self.clear_entry();
                Ok(())
            }
            Key::ClearAll => {
                self.clear_all();
                Ok(())
            }
        }
    }

    pub fn press_all(&mut self, keys: &[Key]) -> CalcResult<()> {
        keys.iter().try_for_each(|k| self.press(*k))
    }

    /// Type a digit or decimal point.
    pub fn press_digit(&mut self, c: char) -> CalcResult<()> {
        if !is_entry_char(c) {
            return Err(CalcError::InvalidDigit(c));
        }

        if self.entry_start {
            self.entry = c.to_string();
            self.entry_start = false;
        } else {
            if let Some(max) = self.config.max_entry_len {
                if self.entry.chars().count() >= max {
                    tracing::debug!(max, entry = %self.entry, "entry buffer full, key ignored");
                    return Ok(());
                }
            }
            self.entry.push(c);
        }

        self.history.push(c.to_string());
        Ok(())
    }

    /// Press any non-digit button.
    pub fn press_operator(&mut self, op: Operator) -> CalcResult<()> {
        if self.entry_start {
            if op == Operator::Subtract {
                // Start a negative literal instead of subtracting.
                self.entry = MINUS_GLYPH.to_string();
                self.entry_start = false;
            } else {
                self.pending = op;
            }
        } else {
            let operand = parse_entry(&self.entry)?;
            self.apply(operand);
            self.pending = op;
            self.entry_start = true;
        }

        if op == Operator::Equals {
            self.history.clear();
        } else {
            self.history.push(op.symbol().to_string());
        }
        Ok(())
    }

    /// Drop the last typed character; an emptied buffer falls back to `"0"`.
    pub fn backspace(&mut self) {
        if self.entry.pop().is_some() && self.entry.is_empty() {
            self.entry = "0".to_string();
            self.entry_start = true;
        }
    }

    /// Discard the literal being typed, keep the running total.
    pub fn clear_entry(&mut self) {
        self.entry = "0".to_string();
        self.entry_start = true;
    }

    /// Return to the power-on state.
    pub fn clear_all(&mut self) {
        self.accumulator = 0.0;
        self.pending = Operator::Equals;
        self.history.clear();
        self.clear_entry();
    }

    fn apply(&mut self, operand: f64) {
        let before = self.accumulator;
        self.accumulator = self.pending.apply(before, operand);
        tracing::debug!(
            op = %self.pending,
            accumulator = before,
            operand,
            result = self.accumulator,
            "applied pending operator"
        );
        self.entry = format_display(self.accumulator, self.config.precision);
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the entry buffer, accepting the display minus glyph as a sign.
pub fn parse_entry(entry: &str) -> CalcResult<f64> {
    let normalized = entry.replacen(MINUS_GLYPH, "-", 1);
    normalized.parse::<f64>().map_err(|_| {
        tracing::warn!(entry, "entry buffer is not a number");
        CalcError::InvalidLiteral(entry.to_string())
    })
}
