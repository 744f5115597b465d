/// Result type for calculator state transitions.
pub type CalcResult<T> = Result<T, CalcError>;

/// Invariant violations raised by the engine.
///
/// None of these leave the calculator half-updated: every transition
/// validates its input before touching state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("invalid numeric literal: {0:?}")]
    InvalidLiteral(String),

    #[error("not a digit or decimal point: {0:?}")]
    InvalidDigit(char),

    #[error("unknown key: {0:?}")]
    UnknownKey(String),
}
