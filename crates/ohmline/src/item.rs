//! Drawable items.
//!
//! Each item carries a [`Transform`] and is consumed by one
//! [`Draw::add`](crate::Draw::add) call:
//!
//! | Item | Moves the cursor by default | Backend call |
//! |------|-----------------------------|--------------|
//! | [`Wire`] | yes, `length` along `direction` | `emit_wire` |
//! | [`Junction`] | no | `emit_junction` |
//! | [`NoConnect`] | no | `emit_no_connect` |
//! | [`Label`] | no | `emit_label` |
//! | [`Symbol`] | no | `emit_symbol` |

use indexmap::IndexMap;

use ohmline_core::identifier::Id;

use crate::transform::{Place, Transform};

/// Broad item category seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Wire,
    Junction,
    NoConnect,
    Label,
    Symbol,
}

impl ItemKind {
    /// Connectors are the only items that advance along their direction.
    pub fn is_connector(self) -> bool {
        matches!(self, ItemKind::Wire)
    }
}

/// A straight wire segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wire {
    transform: Transform,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A connection dot.
///
/// Its position is fixed when it is added. A named junction can later be
/// used as an anchor or snap target ([`Place::at_junction`]); unnamed ones
/// get a generated name that is available through
/// [`Draw::last_junction`](crate::Draw::last_junction).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Junction {
    transform: Transform,
    id: Option<Id>,
    pushed: bool,
}

impl Junction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the junction so later items can anchor to it.
    pub fn named(mut self, id: impl Into<Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Also push the junction's position onto the cursor stack.
    pub fn pushed(mut self) -> Self {
        self.pushed = true;
        self
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn is_pushed(&self) -> bool {
        self.pushed
    }
}

/// A no-connect flag on an unused pin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoConnect {
    transform: Transform,
}

impl NoConnect {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A net label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    transform: Transform,
    text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            transform: Transform::default(),
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A placed library symbol.
///
/// `pin` selects the pin that lands on the placement origin, `"1"` unless
/// changed. Properties keep their insertion order.
///
/// ```
/// use ohmline::{Place, Symbol};
///
/// let r = Symbol::new("R1", "Device:R")
///     .value("10k")
///     .property("Footprint", "Resistor_SMD:R_0603")
///     .rotate(90.0);
/// assert_eq!(r.unit(), 1);
/// assert_eq!(r.pin(), "1");
/// assert_eq!(r.properties()["Footprint"], "Resistor_SMD:R_0603");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    transform: Transform,
    reference: String,
    library: String,
    value: String,
    unit: u32,
    pin: String,
    properties: IndexMap<String, String>,
}

impl Symbol {
    pub fn new(reference: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            transform: Transform::default(),
            reference: reference.into(),
            library: library.into(),
            value: String::new(),
            unit: 1,
            pin: "1".to_string(),
            properties: IndexMap::new(),
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Unit of a multi-unit part, starting at 1.
    pub fn with_unit(mut self, unit: u32) -> Self {
        self.unit = unit;
        self
    }

    /// Pin placed on the origin.
    pub fn anchor_pin(mut self, pin: impl ToString) -> Self {
        self.pin = pin.to_string();
        self
    }

    /// Adds or replaces a property. Replacing keeps the original position.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn value_str(&self) -> &str {
        &self.value
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}

macro_rules! impl_place {
    ($($item:ty),+ $(,)?) => {
        $(
            impl Place for $item {
                fn transform(&self) -> &Transform {
                    &self.transform
                }

                fn map_transform(mut self, f: impl FnOnce(Transform) -> Transform) -> Self {
                    self.transform = f(std::mem::take(&mut self.transform));
                    self
                }
            }
        )+
    };
}

impl_place!(Wire, Junction, NoConnect, Label, Symbol);

/// Any drawable item.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Wire(Wire),
    Junction(Junction),
    NoConnect(NoConnect),
    Label(Label),
    Symbol(Symbol),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Wire(_) => ItemKind::Wire,
            Item::Junction(_) => ItemKind::Junction,
            Item::NoConnect(_) => ItemKind::NoConnect,
            Item::Label(_) => ItemKind::Label,
            Item::Symbol(_) => ItemKind::Symbol,
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            Item::Wire(item) => item.transform(),
            Item::Junction(item) => item.transform(),
            Item::NoConnect(item) => item.transform(),
            Item::Label(item) => item.transform(),
            Item::Symbol(item) => item.transform(),
        }
    }
}

impl From<Wire> for Item {
    fn from(item: Wire) -> Self {
        Item::Wire(item)
    }
}

impl From<Junction> for Item {
    fn from(item: Junction) -> Self {
        Item::Junction(item)
    }
}

impl From<NoConnect> for Item {
    fn from(item: NoConnect) -> Self {
        Item::NoConnect(item)
    }
}

impl From<Label> for Item {
    fn from(item: Label) -> Self {
        Item::Label(item)
    }
}

impl From<Symbol> for Item {
    fn from(item: Symbol) -> Self {
        Item::Symbol(item)
    }
}
