//! In-memory schematic backend.
//!
//! [`Schematic`] implements [`Backend`] by recording every emitted primitive
//! in order. Symbols are resolved against a [`SymbolLibrary`] when they are
//! emitted, so each placed symbol carries its absolute pin positions and
//! the netlist, BOM and SVG plot can be derived without the library.
//!
//! # Symbol placement
//!
//! A symbol is placed so that its anchor pin lands on the requested point:
//! `origin = at - T(anchor offset)` where `T` mirrors and then rotates the
//! library offset. A two-pin symbol with an x or y snap target is instead
//! centred between the anchor point and the target, and lead wires are
//! emitted on both sides.

mod library;
mod reference;

pub use library::{LibraryPin, LibrarySymbol, SymbolLibrary, transform_offset};
pub use reference::{ReferenceCounter, ReferencePattern, split_reference};

use indexmap::IndexMap;
use log::{debug, info, warn};

use ohmline_core::geometry::{Bounds, MirrorAxis, Point};

use crate::{
    backend::{Backend, SymbolPlacement},
    error::DrawError,
};

/// A symbol pin at its absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPin {
    number: String,
    name: String,
    at: Point,
}

impl PlacedPin {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn at(&self) -> Point {
        self.at
    }
}

/// One unit of a symbol as placed on the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSymbol {
    reference: String,
    value: String,
    library: String,
    unit: u32,
    origin: Point,
    angle: f64,
    mirror: Option<MirrorAxis>,
    power: bool,
    body: Option<Bounds>,
    pins: Vec<PlacedPin>,
    properties: IndexMap<String, String>,
}

impl PlacedSymbol {
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn mirror(&self) -> Option<MirrorAxis> {
        self.mirror
    }

    pub fn is_power(&self) -> bool {
        self.power
    }

    /// Body rectangle on the sheet.
    pub fn body(&self) -> Option<Bounds> {
        self.body
    }

    pub fn pins(&self) -> &[PlacedPin] {
        &self.pins
    }

    pub fn pin(&self, number: &str) -> Option<&PlacedPin> {
        self.pins.iter().find(|pin| pin.number == number)
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}

/// A drawing primitive in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Wire { from: Point, to: Point },
    Junction(Point),
    NoConnect(Point),
    Label { text: String, at: Point, angle: f64 },
    Symbol(PlacedSymbol),
}

/// The reference [`Backend`].
#[derive(Debug, Clone)]
pub struct Schematic {
    library: SymbolLibrary,
    primitives: Vec<Primitive>,
    references: ReferenceCounter,
}

impl Default for Schematic {
    /// An empty schematic over the built-in library.
    fn default() -> Self {
        Self::new(SymbolLibrary::builtin())
    }
}

impl Schematic {
    pub fn new(library: SymbolLibrary) -> Self {
        Self {
            library,
            primitives: Vec::new(),
            references: ReferenceCounter::new(),
        }
    }

    pub fn library(&self) -> &SymbolLibrary {
        &self.library
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn symbols(&self) -> impl Iterator<Item = &PlacedSymbol> {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Symbol(symbol) => Some(symbol),
            _ => None,
        })
    }

    pub fn wires(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.primitives.iter().filter_map(|primitive| match primitive {
            Primitive::Wire { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    /// All primitive coordinates, for sizing a plot.
    pub fn bounds(&self) -> Option<Bounds> {
        let points = self.primitives.iter().flat_map(|primitive| match primitive {
            Primitive::Wire { from, to } => vec![*from, *to],
            Primitive::Junction(at) | Primitive::NoConnect(at) => vec![*at],
            Primitive::Label { at, .. } => vec![*at],
            Primitive::Symbol(symbol) => {
                let mut points: Vec<Point> = symbol.pins.iter().map(|pin| pin.at).collect();
                if let Some(body) = symbol.body {
                    points.extend([body.min_point(), body.max_point()]);
                }
                points.push(symbol.origin);
                points
            }
        });
        Bounds::from_points(points)
    }

    /// Sets `key` on every placed symbol whose reference matches `pattern`.
    /// Returns how many units were changed.
    pub fn set_property(
        &mut self,
        pattern: &ReferencePattern,
        key: &str,
        value: &str,
    ) -> usize {
        let mut changed = 0;
        for primitive in &mut self.primitives {
            let Primitive::Symbol(symbol) = primitive else {
                continue;
            };
            if pattern.matches(&symbol.reference) {
                symbol
                    .properties
                    .insert(key.to_string(), value.to_string());
                changed += 1;
            }
        }
        if changed == 0 {
            warn!(pattern:% = pattern, key; "Property matched no symbol");
        }
        changed
    }

    fn push_wire(&mut self, from: Point, to: Point) {
        if from.coincides(to) {
            return;
        }
        self.primitives.push(Primitive::Wire { from, to });
    }
}

impl Backend for Schematic {
    fn pin_position(&self, reference: &str, pin: &str) -> Result<Point, DrawError> {
        self.symbols()
            .filter(|symbol| symbol.reference == reference)
            .find_map(|symbol| symbol.pin(pin))
            .map(PlacedPin::at)
            .ok_or_else(|| DrawError::PinNotFound {
                reference: reference.to_string(),
                pin: pin.to_string(),
            })
    }

    /// Zero-length wires are dropped.
    fn emit_wire(&mut self, from: Point, to: Point) -> Result<(), DrawError> {
        self.push_wire(from, to);
        Ok(())
    }

    fn emit_junction(&mut self, at: Point) -> Result<(), DrawError> {
        self.primitives.push(Primitive::Junction(at));
        Ok(())
    }

    fn emit_no_connect(&mut self, at: Point) -> Result<(), DrawError> {
        self.primitives.push(Primitive::NoConnect(at));
        Ok(())
    }

    fn emit_label(&mut self, text: &str, at: Point, angle: f64) -> Result<(), DrawError> {
        self.primitives.push(Primitive::Label {
            text: text.to_string(),
            at,
            angle,
        });
        Ok(())
    }

    fn emit_symbol(&mut self, placement: SymbolPlacement<'_>) -> Result<(), DrawError> {
        let part = self
            .library
            .get(placement.library)
            .ok_or_else(|| DrawError::SymbolNotFound(placement.library.to_string()))?;

        if placement.unit == 0 || placement.unit > part.units() {
            return Err(DrawError::Backend(format!(
                "`{}` has no unit {} (units: {})",
                part.name(),
                placement.unit,
                part.units()
            )));
        }
        if self
            .symbols()
            .any(|s| s.reference == placement.reference && s.unit == placement.unit)
        {
            return Err(DrawError::Backend(format!(
                "`{}` unit {} is already placed",
                placement.reference, placement.unit
            )));
        }

        let anchor = part
            .pin(placement.unit, placement.pin)
            .ok_or_else(|| DrawError::PinNotFound {
                reference: placement.reference.to_string(),
                pin: placement.pin.to_string(),
            })?;
        let transform = |offset: Point| transform_offset(offset, placement.angle, placement.mirror);

        let unit_pins: Vec<&LibraryPin> = part.unit_pins(placement.unit).collect();
        let span_target = match (placement.x_override, placement.y_override) {
            (Some(x), _) => Some(placement.at.with_x(x)),
            (None, Some(y)) => Some(placement.at.with_y(y)),
            (None, None) => None,
        };

        let (origin, leads) = match (span_target, unit_pins.as_slice()) {
            (Some(target), [first, second]) => {
                let other = if first.number() == anchor.number() {
                    second
                } else {
                    first
                };
                let pin_span = transform(anchor.offset()).distance(transform(other.offset()));
                let distance = placement.at.distance(target);
                if distance + 1e-9 < pin_span {
                    return Err(DrawError::Backend(format!(
                        "`{}` needs {pin_span:.3} mm but only {distance:.3} mm are available",
                        placement.reference
                    )));
                }
                let centre = placement.at.midpoint(target);
                let pins_centre = transform(anchor.offset().midpoint(other.offset()));
                let origin = centre - pins_centre;
                let mut ends = [
                    origin + transform(anchor.offset()),
                    origin + transform(other.offset()),
                ];
                if ends[1].distance(placement.at) < ends[0].distance(placement.at) {
                    ends.swap(0, 1);
                }
                let leads = [(placement.at, ends[0]), (ends[1], target)];
                (origin, Some(leads))
            }
            (Some(_), _) => {
                return Err(DrawError::Backend(format!(
                    "only two-pin symbols can span to a target, `{}` has {} pins",
                    placement.reference,
                    unit_pins.len()
                )));
            }
            (None, _) => (placement.at - transform(anchor.offset()), None),
        };

        let pins = unit_pins
            .iter()
            .map(|pin| PlacedPin {
                number: pin.number().to_string(),
                name: pin.name().to_string(),
                at: origin + transform(pin.offset()),
            })
            .collect();
        let body = part.body().and_then(|body| {
            let corners = [
                body.min_point(),
                body.max_point(),
                Point::new(body.min_x(), body.max_y()),
                Point::new(body.max_x(), body.min_y()),
            ];
            Bounds::from_points(corners.map(|corner| origin + transform(corner)))
        });

        let symbol = PlacedSymbol {
            reference: placement.reference.to_string(),
            value: placement.value.to_string(),
            library: placement.library.to_string(),
            unit: placement.unit,
            origin,
            angle: placement.angle,
            mirror: placement.mirror,
            power: part.is_power(),
            body,
            pins,
            properties: placement.properties.clone(),
        };
        debug!(reference = placement.reference, origin:?; "Placed symbol");

        self.primitives.push(Primitive::Symbol(symbol));
        if let Some(leads) = leads {
            for (from, to) in leads {
                self.push_wire(from, to);
            }
        }
        Ok(())
    }

    fn next_reference(&mut self, key: &str) -> Result<String, DrawError> {
        let reference = self.references.next(key)?;
        info!(reference:%; "Issued reference");
        Ok(reference)
    }

    fn set_counter(&mut self, key: &str, next: u32) {
        self.references.set(key, next);
    }

    fn last_reference(&self, key: &str) -> Result<String, DrawError> {
        self.references.last(key)
    }
}
