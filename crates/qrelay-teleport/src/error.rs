//! Error types for the relay crate.

use qrelay_hal::HalError;
use qrelay_ir::{IrError, QubitId};
use thiserror::Error;

/// Result type for relay operations.
pub type TeleportResult<T> = Result<T, TeleportError>;

/// Errors raised while wiring or analysing a relay.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TeleportError {
    /// Two of the relay's qubit roles were given the same qubit.
    #[error("Relay {first} and {second} must be distinct qubits, both are {qubit}")]
    DuplicateQubit {
        /// Role of the first occurrence.
        first: &'static str,
        /// Role of the second occurrence.
        second: &'static str,
        /// The shared qubit.
        qubit: QubitId,
    },

    /// The classical register cannot hold both measurement outcomes.
    #[error("Classical register '{name}' has {len} slot(s), the relay needs at least 2")]
    RegisterTooSmall {
        /// Register name.
        name: String,
        /// Number of slots it has.
        len: usize,
    },

    /// A named register is missing from the circuit or result.
    #[error("Register '{0}' not found")]
    RegisterNotFound(String),

    /// Circuit construction error.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Execution or result error.
    #[error(transparent)]
    Hal(#[from] HalError),
}
