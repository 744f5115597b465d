//! Keypad events and their textual spellings.

use crate::error::{CalcError, CalcResult};
use crate::operator::Operator;
use std::fmt;
use std::str::FromStr;

pub const BACKSPACE_SYMBOL: &str = "⌫";
pub const CLEAR_ENTRY_SYMBOL: &str = "CE";
pub const CLEAR_ALL_SYMBOL: &str = "C";

/// One button press forwarded by a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `0`-`9` or `.`
    Digit(char),
    Operator(Operator),
    Backspace,
    ClearEntry,
    ClearAll,
}

pub fn is_entry_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

impl FromStr for Key {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if is_entry_char(c) {
                return Ok(Key::Digit(c));
            }
        }
        match s {
            BACKSPACE_SYMBOL | "back" | "bs" => Ok(Key::Backspace),
            CLEAR_ENTRY_SYMBOL | "ce" => Ok(Key::ClearEntry),
            CLEAR_ALL_SYMBOL | "AC" | "ac" | "clear" => Ok(Key::ClearAll),
            other => other.parse().map(Key::Operator),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(c) => write!(f, "{}", c),
            Key::Operator(op) => write!(f, "{}", op),
            Key::Backspace => f.write_str(BACKSPACE_SYMBOL),
            Key::ClearEntry => f.write_str(CLEAR_ENTRY_SYMBOL),
            Key::ClearAll => f.write_str(CLEAR_ALL_SYMBOL),
        }
    }
}

/// Split a whitespace-separated key string into presses.
///
/// A token made only of digits and points (`"42"`, `"3.5"`) expands to one
/// press per character, so `"12 + 30 ="` is six presses.
pub fn parse_keys(input: &str) -> CalcResult<Vec<Key>> {
    let mut keys = Vec::new();
    for token in input.split_whitespace() {
        if token.chars().all(is_entry_char) {
            keys.extend(token.chars().map(Key::Digit));
        } else {
            keys.push(token.parse()?);
        }
    }
    Ok(keys)
}
