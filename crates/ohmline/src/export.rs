//! Output formats for a finished [`Schematic`].
//!
//! # Available Backends
//!
//! - [`svg`] - SVG plot via [`svg::SvgExporter`]
//!
//! Export operations return [`Error`], which converts into
//! [`OhmlineError::Export`](crate::OhmlineError::Export).

pub mod svg;

use crate::schematic::Schematic;

/// Converts a schematic into an output format.
pub trait Exporter {
    type Output;

    /// # Errors
    ///
    /// Returns [`Error::Render`] if the schematic cannot be converted, or
    /// [`Error::Io`] if writing the output fails.
    fn export_schematic(&mut self, schematic: &Schematic) -> Result<Self::Output, Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    Render(String),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
