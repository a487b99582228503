//! Error types for simulation operations.

use thiserror::Error;

/// Result type for simulation operations.
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Errors surfaced synchronously to the caller of the offending operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A creation call was rejected by validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Utilization was requested for a terminal without storage.
    #[error("terminal {0} has zero capacity")]
    DegenerateTerminal(String),
    /// No entity with the given identifier exists.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    /// The origin terminal cannot stage another container.
    #[error("terminal {0} is full")]
    TerminalFull(String),
    /// A time computation left the representable calendar range.
    #[error("time overflow: {0}")]
    TimeOverflow(String),
    /// An invariant broke during a tick; the tick was not committed.
    #[error("consistency fault: {0}")]
    ConsistencyFault(String),
}
