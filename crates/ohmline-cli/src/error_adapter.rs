//! Error adapter for converting OhmlineError to miette diagnostics.
//!
//! Script and configuration parse errors carry their source text and the
//! byte range TOML rejected, so they render with a labelled snippet. Every
//! other variant renders as a plain message with a diagnostic code.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use ohmline::{DrawError, OhmlineError};

/// Adapter for a TOML parse failure.
pub struct ScriptAdapter<'a> {
    message: &'a str,
    span: Option<&'a Range<usize>>,
    src: &'a str,
}

impl<'a> ScriptAdapter<'a> {
    pub fn new(message: &'a str, span: Option<&'a Range<usize>>, src: &'a str) -> Self {
        Self { message, span, src }
    }
}

impl fmt::Debug for ScriptAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptAdapter")
            .field("message", &self.message)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for ScriptAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // TOML messages end with a newline.
        f.write_str(self.message.trim_end())
    }
}

impl std::error::Error for ScriptAdapter<'_> {}

impl MietteDiagnostic for ScriptAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("ohmline::script"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let span = SourceSpan::new(span.start.into(), span.len());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some("here".to_string()), span),
        )))
    }
}

/// Adapter for [`OhmlineError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a OhmlineError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            OhmlineError::Io(_) => "ohmline::io",
            OhmlineError::Draw(_) => "ohmline::draw",
            OhmlineError::Script { .. } => "ohmline::script",
            OhmlineError::Export(_) => "ohmline::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let OhmlineError::Draw(err) = &self.0 else {
            return None;
        };
        let help = match err {
            DrawError::EmptyStack => "every `pop` or `peek` needs an earlier `push`",
            DrawError::AmbiguousOverride => "use either an `at_pin`/`at_junction` anchor or `at`",
            DrawError::PinNotFound { .. } => "the symbol must be placed before its pins are used",
            DrawError::SymbolNotFound(_) => "`ohmline search <term>` lists the available symbols",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parse failure with a source snippet.
    Script(ScriptAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Script(s) => fmt::Display::fmt(s, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Script(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Script(s) => s.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Script(s) => s.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Script(s) => s.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Script(s) => s.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Converts an [`OhmlineError`] into the reports to render.
pub fn to_reportables(err: &OhmlineError) -> Vec<Reportable<'_>> {
    match err {
        OhmlineError::Script { message, span, src } => {
            vec![Reportable::Script(ScriptAdapter::new(
                message,
                span.as_ref(),
                src,
            ))]
        }
        other => vec![Reportable::Error(ErrorAdapter(other))],
    }
}
