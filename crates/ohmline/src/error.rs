//! Error types for ohmline operations.
//!
//! Two layers:
//!
//! - [`DrawError`] is returned by every placement and backend call. A failed
//!   `add` leaves the cursor untouched; the backend may already hold
//!   primitives from earlier calls, so a build is treated as aborted.
//! - [`OhmlineError`] wraps it together with I/O, script and export failures
//!   for applications such as the command line.

use std::{io, ops::Range};

use thiserror::Error;

use ohmline_core::identifier::Id;

/// Errors raised while resolving or emitting a placement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// An anchor or snap target names a pin the backend cannot resolve.
    #[error("pin `{pin}` of `{reference}` not found")]
    PinNotFound { reference: String, pin: String },

    /// `pop` or `peek` on an empty position stack.
    #[error("position stack is empty")]
    EmptyStack,

    /// A descriptor sets both an anchor and a point override.
    #[error("placement sets both an anchor and a point override")]
    AmbiguousOverride,

    /// A connector length that is not a positive, finite number.
    #[error("invalid segment length {0}")]
    InvalidLength(f64),

    /// An anchor names a junction that was never added.
    #[error("junction `{0}` not found")]
    JunctionNotFound(Id),

    /// The backend has no library part with this name.
    #[error("symbol `{0}` not found in library")]
    SymbolNotFound(String),

    /// `last_reference` before any reference was issued for the key.
    #[error("no reference issued yet for `{0}`")]
    ReferenceNotFound(String),

    /// The counter for a prefix has no numbers left.
    #[error("reference counter for `{0}` is exhausted")]
    CounterExhausted(String),

    /// A snap target that is not a finite coordinate.
    #[error("invalid snap target {0}")]
    InvalidTarget(f64),

    /// A reference pattern such as `R[1..` could not be parsed.
    #[error("invalid reference pattern `{0}`")]
    InvalidPattern(String),

    /// Any other failure reported by a backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// The main error type for ohmline applications.
#[derive(Debug, Error)]
pub enum OhmlineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Draw(#[from] DrawError),

    /// A drawing script or library file failed to parse.
    #[error("{message}")]
    Script {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for OhmlineError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl OhmlineError {
    /// Creates a `Script` error from a TOML error and the text it came from.
    pub fn new_script_error(err: &toml::de::Error, src: impl Into<String>) -> Self {
        Self::Script {
            message: err.message().to_string(),
            span: err.span(),
            src: src.into(),
        }
    }
}
