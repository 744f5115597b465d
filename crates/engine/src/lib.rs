//! Engine crate – the keypad calculator core.
//!
//! This crate holds the accumulator state machine, the operator table and
//! display formatting. It does NOT depend on any UI toolkit, so the same
//! engine backs every front end and the headless CLI.

pub mod calculator;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod key;
pub mod operator;
pub mod scenario;
pub mod types;

// Re-exports for convenience
pub use calculator::{Calculator, Snapshot};
pub use commands::CommandRegistry;
pub use config::EngineConfig;
pub use error::{CalcError, CalcResult};
pub use key::{parse_keys, Key};
pub use operator::Operator;
pub use types::{CommandResult, ErrorCode, ErrorInfo, Status};
