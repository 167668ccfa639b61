//! Reference designators: auto numbering and pattern matching.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;

use crate::error::DrawError;

/// Issues `R1`, `R2`, ... per prefix.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCounter {
    // Last number issued per prefix.
    issued: IndexMap<String, u32>,
}

impl ReferenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// [`DrawError::CounterExhausted`] once `u32::MAX` has been issued for `key`.
    pub fn next(&mut self, key: &str) -> Result<String, DrawError> {
        let counter = self.issued.entry(key.to_string()).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| DrawError::CounterExhausted(key.to_string()))?;
        Ok(format!("{key}{counter}"))
    }

    /// The next call to [`next`](Self::next) for `key` returns number `next`.
    pub fn set(&mut self, key: &str, next: u32) {
        self.issued.insert(key.to_string(), next.saturating_sub(1));
    }

    pub fn last(&self, key: &str) -> Result<String, DrawError> {
        match self.issued.get(key) {
            Some(&n) if n > 0 => Ok(format!("{key}{n}")),
            _ => Err(DrawError::ReferenceNotFound(key.to_string())),
        }
    }
}

/// Splits `R12` into `("R", 12)`.
pub fn split_reference(reference: &str) -> Option<(&str, u32)> {
    let digits_at = reference.find(|c: char| c.is_ascii_digit())?;
    let (prefix, number) = reference.split_at(digits_at);
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    number.parse().ok().map(|n| (prefix, n))
}

/// Selects placed symbols by reference.
///
/// | Pattern | Matches |
/// |---------|---------|
/// | `R5` | exactly `R5` |
/// | `R[1..10]` | `R1` through `R10` |
/// | `R[3..]` | `R3` and above |
/// | `R[..4]` | up to `R4` |
///
/// ```
/// use ohmline::schematic::ReferencePattern;
///
/// let pattern: ReferencePattern = "C[2..4]".parse().unwrap();
/// assert!(pattern.matches("C3"));
/// assert!(!pattern.matches("C5"));
/// assert!(!pattern.matches("R3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferencePattern {
    Exact(String),
    Range {
        prefix: String,
        start: Option<u32>,
        end: Option<u32>,
    },
}

impl ReferencePattern {
    pub fn matches(&self, reference: &str) -> bool {
        match self {
            ReferencePattern::Exact(exact) => exact == reference,
            ReferencePattern::Range { prefix, start, end } => {
                let Some((found_prefix, number)) = split_reference(reference) else {
                    return false;
                };
                found_prefix == prefix
                    && start.is_none_or(|start| number >= start)
                    && end.is_none_or(|end| number <= end)
            }
        }
    }
}

impl FromStr for ReferencePattern {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DrawError::InvalidPattern(s.to_string());

        let Some((prefix, rest)) = s.split_once('[') else {
            if s.is_empty() || s.contains(']') {
                return Err(invalid());
            }
            return Ok(ReferencePattern::Exact(s.to_string()));
        };
        let range = rest.strip_suffix(']').ok_or_else(invalid)?;
        let (start, end) = range.split_once("..").ok_or_else(invalid)?;
        if prefix.is_empty() {
            return Err(invalid());
        }

        let bound = |text: &str| -> Result<Option<u32>, DrawError> {
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(|_| invalid())
            }
        };
        let (start, end) = (bound(start)?, bound(end)?);
        if start.is_none() && end.is_none() {
            return Err(invalid());
        }

        Ok(ReferencePattern::Range {
            prefix: prefix.to_string(),
            start,
            end,
        })
    }
}

impl fmt::Display for ReferencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferencePattern::Exact(exact) => write!(f, "{exact}"),
            ReferencePattern::Range { prefix, start, end } => {
                write!(f, "{prefix}[")?;
                if let Some(start) = start {
                    write!(f, "{start}")?;
                }
                write!(f, "..")?;
                if let Some(end) = end {
                    write!(f, "{end}")?;
                }
                write!(f, "]")
            }
        }
    }
}
