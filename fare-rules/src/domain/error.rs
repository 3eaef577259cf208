//! Domain error types.
//!
//! These errors describe why a single rule row could not be interpreted.
//! They are row-level: the loader reports them and moves on to the next row.

/// Errors raised while parsing conditions, states and OD classifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FareError {
    /// A clause did not match the `key op value` grammar
    #[error("invalid condition: {0:?}")]
    InvalidCondition(String),

    /// A state used a non-equality comparator, an unknown key, or set a key twice
    #[error("invalid state key: {0}")]
    InvalidKey(String),

    /// An OD mode column is not `mode`, `zone`, `stop` or `stoparea`
    #[error("unknown OD kind: {0:?}")]
    UnknownOdKind(String),
}
