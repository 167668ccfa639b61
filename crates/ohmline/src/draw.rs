//! The drawing cursor.
//!
//! [`Draw`] owns a backend, the current position, a stack of saved
//! positions and the registry of junctions added so far. Every
//! [`add`](Draw::add) resolves one item, makes exactly one emit call on the
//! backend and then moves the cursor to the resolved destination. A failed
//! `add` leaves position, stack and registry as they were.
//!
//! ```
//! use ohmline::{Draw, Junction, Place, Wire, schematic::Schematic};
//!
//! let mut draw = Draw::new(Schematic::default());
//! draw.set_position((0.0, 0.0));
//! draw.add(Wire::new().right())?
//!     .add(Junction::new().named("tap"))?
//!     .add(Wire::new().down().length(5.08))?;
//!
//! assert_eq!(draw.junction("tap")?.x(), 2.54);
//! # Ok::<(), ohmline::DrawError>(())
//! ```

use indexmap::IndexMap;
use log::{debug, info};

use ohmline_core::{
    geometry::{Direction, GRID_UNIT, Point},
    identifier::Id,
};

use crate::{
    backend::{Backend, SymbolPlacement},
    config::DrawConfig,
    error::DrawError,
    item::{Item, Junction, Wire},
    resolve::{Placement, Resolver},
    transform::{Anchor, AxisTarget, Place},
};

/// A junction as recorded by the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenJunction {
    id: Id,
    point: Point,
}

impl FrozenJunction {
    pub fn id(&self) -> Id {
        self.id
    }

    pub fn point(&self) -> Point {
        self.point
    }
}

/// Drawing cursor over a [`Backend`].
#[derive(Debug)]
pub struct Draw<B: Backend> {
    backend: B,
    position: Point,
    stack: Vec<Point>,
    junctions: IndexMap<Id, Point>,
    last_junction: Option<FrozenJunction>,
    // Next number tried for an unnamed junction.
    anonymous: usize,
    unit: f64,
}

impl<B: Backend> Draw<B> {
    /// Starts at `(0, 0)` with a one grid unit default length.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            position: Point::default(),
            stack: Vec::new(),
            junctions: IndexMap::new(),
            last_junction: None,
            anonymous: 0,
            unit: GRID_UNIT,
        }
    }

    /// Starts at the configured origin with the configured default length.
    pub fn from_config(backend: B, config: &DrawConfig) -> Self {
        let mut draw = Self::new(backend);
        draw.position = config.origin();
        draw.unit = config.unit();
        draw
    }

    /// Current cursor position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves the cursor without drawing anything.
    pub fn set_position(&mut self, point: impl Into<Point>) -> &mut Self {
        self.position = point.into();
        self
    }

    /// Length used by wires that do not set one.
    pub fn unit(&self) -> f64 {
        self.unit
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Resolves `item`, emits it and moves the cursor to its destination.
    ///
    /// # Errors
    ///
    /// Resolution errors ([`DrawError::PinNotFound`],
    /// [`DrawError::JunctionNotFound`], [`DrawError::AmbiguousOverride`],
    /// [`DrawError::InvalidLength`]) are returned before the backend sees
    /// anything. Backend errors are returned as-is. In both cases the cursor
    /// state is unchanged.
    pub fn add(&mut self, item: impl Into<Item>) -> Result<&mut Self, DrawError> {
        let item = item.into();
        let kind = item.kind();
        let placement = Resolver::new(&self.backend, &self.junctions, self.unit).resolve(
            kind,
            self.position,
            item.transform(),
        )?;

        self.emit(&item, &placement)?;

        if let Item::Junction(junction) = &item {
            self.freeze_junction(junction, placement.destination());
        }

        debug!(
            kind:?,
            origin:? = placement.origin(),
            destination:? = placement.destination();
            "Placed item"
        );
        self.position = placement.destination();
        Ok(self)
    }

    fn emit(&mut self, item: &Item, placement: &Placement) -> Result<(), DrawError> {
        let at = placement.destination();
        match item {
            Item::Wire(_) => self.backend.emit_wire(placement.origin(), at),
            Item::Junction(_) => self.backend.emit_junction(at),
            Item::NoConnect(_) => self.backend.emit_no_connect(at),
            Item::Label(label) => {
                self.backend
                    .emit_label(label.text(), at, label.transform().angle())
            }
            Item::Symbol(symbol) => self.backend.emit_symbol(SymbolPlacement {
                reference: symbol.reference(),
                value: symbol.value_str(),
                library: symbol.library(),
                unit: symbol.unit(),
                at: placement.origin(),
                pin: symbol.pin(),
                angle: symbol.transform().angle(),
                mirror: symbol.transform().mirror(),
                x_override: placement.x_snap(),
                y_override: placement.y_snap(),
                properties: symbol.properties(),
            }),
        }
    }

    fn freeze_junction(&mut self, junction: &Junction, point: Point) {
        let id = match junction.id() {
            Some(id) => id,
            None => self.anonymous_id(),
        };
        if self.junctions.insert(id, point).is_some() {
            debug!(id:% = id; "Junction name reused, later anchors use the new position");
        }
        self.last_junction = Some(FrozenJunction { id, point });
        if junction.is_pushed() {
            self.stack.push(point);
        }
    }

    /// A generated name no junction uses yet.
    fn anonymous_id(&mut self) -> Id {
        loop {
            let id = Id::from_anonymous(self.anonymous);
            self.anonymous += 1;
            if !self.junctions.contains_key(&id) {
                return id;
            }
        }
    }

    /// Saves the current position.
    pub fn push(&mut self) -> &mut Self {
        self.stack.push(self.position);
        self
    }

    /// Removes and returns the most recently saved position.
    ///
    /// The cursor itself does not move.
    pub fn pop(&mut self) -> Result<Point, DrawError> {
        self.stack.pop().ok_or(DrawError::EmptyStack)
    }

    /// Returns the most recently saved position without removing it.
    pub fn peek(&self) -> Result<Point, DrawError> {
        self.stack.last().copied().ok_or(DrawError::EmptyStack)
    }

    /// Number of saved positions.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Frozen position of a junction added earlier.
    pub fn junction(&self, id: impl Into<Id>) -> Result<Point, DrawError> {
        let id = id.into();
        self.junctions
            .get(&id)
            .copied()
            .ok_or(DrawError::JunctionNotFound(id))
    }

    /// The junction added most recently.
    pub fn last_junction(&self) -> Option<FrozenJunction> {
        self.last_junction
    }

    /// All junctions in the order they were added.
    pub fn junctions(&self) -> impl Iterator<Item = (Id, Point)> + '_ {
        self.junctions.iter().map(|(id, point)| (*id, *point))
    }

    pub fn next_reference(&mut self, key: &str) -> Result<String, DrawError> {
        self.backend.next_reference(key)
    }

    pub fn set_counter(&mut self, key: &str, next: u32) -> &mut Self {
        self.backend.set_counter(key, next);
        self
    }

    pub fn last_reference(&self, key: &str) -> Result<String, DrawError> {
        self.backend.last_reference(key)
    }

    /// Draws a feedback loop from one pin to another.
    ///
    /// The path leaves `from` along the loop's direction for its height,
    /// runs across to the x of `to`, then back to `to`. Both pins are looked
    /// up before anything is drawn.
    pub fn feedback(&mut self, feedback: &Feedback) -> Result<&mut Self, DrawError> {
        let (from_ref, from_pin) = &feedback.from;
        let (to_ref, to_pin) = &feedback.to;
        if !feedback.height.is_finite() || feedback.height <= 0.0 {
            return Err(DrawError::InvalidLength(feedback.height));
        }
        self.backend.pin_position(from_ref, from_pin)?;
        self.backend.pin_position(to_ref, to_pin)?;

        let target = AxisTarget::Pin {
            reference: to_ref.clone(),
            pin: to_pin.clone(),
        };

        if feedback.dot_start {
            self.add(Junction::new().at_pin(from_ref.as_str(), from_pin))?;
        }
        self.add(
            Wire::new()
                .at_pin(from_ref.as_str(), from_pin)
                .direction(feedback.direction)
                .length(feedback.height),
        )?
        .add(Wire::new().tox(target.clone()))?
        .add(Wire::new().toy(target))?;
        if feedback.dot_end {
            self.add(Junction::new())?;
        }

        info!(from = from_ref.as_str(), to = to_ref.as_str(); "Drew feedback loop");
        Ok(self)
    }
}

/// A three-segment loop between two pins, see [`Draw::feedback`].
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    from: (String, String),
    to: (String, String),
    direction: Direction,
    height: f64,
    dot_start: bool,
    dot_end: bool,
}

impl Feedback {
    /// Loop from `from` to `to`, going up by 5.08 by default.
    pub fn new(from: Anchor, to: Anchor) -> Result<Self, DrawError> {
        Ok(Self {
            from: pin_of(from)?,
            to: pin_of(to)?,
            direction: Direction::Up,
            height: 2.0 * GRID_UNIT,
            dot_start: false,
            dot_end: false,
        })
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Places junctions at the start and/or end of the loop.
    pub fn dots(mut self, start: bool, end: bool) -> Self {
        self.dot_start = start;
        self.dot_end = end;
        self
    }
}

fn pin_of(anchor: Anchor) -> Result<(String, String), DrawError> {
    match anchor {
        Anchor::Pin { reference, pin } => Ok((reference, pin)),
        Anchor::Junction(id) => Err(DrawError::Backend(format!(
            "feedback needs pin endpoints, got junction `{id}`"
        ))),
    }
}
