//! Interned identifiers for named schematic items.
//!
//! [`Id`] is a cheap `Copy` handle to a string stored once in a process-wide
//! interner. Junctions use it as their identity so that later placements can
//! anchor to them by name.

use std::{
    convert::Infallible,
    fmt,
    str::FromStr,
    sync::{Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Runs `f` with exclusive access to the interner.
fn with_interner<T>(f: impl FnOnce(&mut DefaultStringInterner) -> T) -> T {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut interner)
}

/// String-interned identifier.
///
/// # Examples
///
/// ```
/// use ohmline_core::identifier::Id;
///
/// let tap = Id::new("vcc_tap");
/// assert_eq!(tap, "vcc_tap");
/// assert_eq!(tap, Id::new("vcc_tap"));
///
/// // Generated names for unnamed junctions
/// assert_eq!(Id::from_anonymous(3), "__dot3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates an identifier for the `idx`-th unnamed item.
    pub fn from_anonymous(idx: usize) -> Self {
        Self::new(&format!("__dot{idx}"))
    }

    /// Returns true if this id was created by [`Id::from_anonymous`].
    pub fn is_anonymous(self) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .is_some_and(|name| name.starts_with("__dot"))
        })
    }

    /// Returns an owned copy of the interned string.
    pub fn as_string(self) -> String {
        with_interner(|interner| interner.resolve(self.0).unwrap_or_default().to_string())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl FromStr for Id {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
