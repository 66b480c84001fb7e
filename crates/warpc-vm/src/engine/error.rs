//! Errors that fail a launch.
//!
//! Lane-local faults (an out-of-bounds active lane, an integer division by
//! zero) abort the whole operation: a launch either completes for every lane
//! or fails uniformly.

use warpc_core::{Dtype, TypeError};

use super::memory::BufferId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// Operand types rejected by the resolver.
    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("lane {lane} accesses {buffer}[{index}] outside a buffer of {len} elements")]
    OutOfBounds {
        lane: usize,
        buffer: BufferId,
        index: usize,
        len: usize,
    },

    #[error("no buffer {0}")]
    UnknownBuffer(BufferId),

    #[error("expected {expected} lanes, found {found}")]
    LaneCountMismatch { expected: usize, found: usize },

    #[error("expected {expected} values, found {found}")]
    DtypeMismatch { expected: Dtype, found: Dtype },

    #[error("integer division by zero in lane {lane}")]
    DivisionByZero { lane: usize },

    #[error("`{text}` is not a valid {dtype} literal")]
    InvalidLiteral { text: String, dtype: Dtype },

    #[error("`{0}` is not a mask bit (expected 1/0, t/f or true/false)")]
    InvalidMask(String),
}
