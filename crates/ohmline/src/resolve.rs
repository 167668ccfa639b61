//! Placement resolution.
//!
//! [`Resolver::resolve`] turns a [`Transform`] into absolute coordinates.
//! It is pure: it only reads pin positions from the backend and frozen
//! junction positions from the registry, and never emits anything.
//!
//! # Precedence
//!
//! The *origin* is taken from the first of:
//!
//! 1. the anchor (a pin position or a frozen junction),
//! 2. the point override,
//! 3. the cursor.
//!
//! The *destination* is then the first of:
//!
//! 1. `(x_override, origin.y)`,
//! 2. `(origin.x, y_override)`,
//! 3. for connectors, `origin + unit(direction) * length`,
//! 4. the origin itself.
//!
//! A point override therefore places point-like items exactly at the point,
//! while a wire uses it as its start and still advances along its direction.
//! Setting both an anchor and a point override is rejected.

use indexmap::IndexMap;
use log::{debug, trace};

use ohmline_core::{geometry::Point, identifier::Id};

use crate::{
    backend::Backend,
    error::DrawError,
    item::ItemKind,
    transform::{Anchor, AxisTarget, Transform},
};

/// The outcome of resolving one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    origin: Point,
    destination: Point,
    x_snap: Option<f64>,
    y_snap: Option<f64>,
}

impl Placement {
    /// The point the placement is computed from.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The point the cursor moves to.
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Resolved x snap value, if one decided the destination.
    pub fn x_snap(&self) -> Option<f64> {
        self.x_snap
    }

    /// Resolved y snap value, if one decided the destination.
    pub fn y_snap(&self) -> Option<f64> {
        self.y_snap
    }
}

/// Resolves transforms against a backend and a junction registry.
pub struct Resolver<'a, B: Backend + ?Sized> {
    backend: &'a B,
    junctions: &'a IndexMap<Id, Point>,
    default_length: f64,
}

impl<'a, B: Backend + ?Sized> Resolver<'a, B> {
    pub fn new(backend: &'a B, junctions: &'a IndexMap<Id, Point>, default_length: f64) -> Self {
        Self {
            backend,
            junctions,
            default_length,
        }
    }

    /// Computes origin and destination of an item of `kind` drawn from `cursor`.
    ///
    /// # Errors
    ///
    /// - [`DrawError::AmbiguousOverride`] if the transform has both an anchor
    ///   and a point override.
    /// - [`DrawError::PinNotFound`] / [`DrawError::JunctionNotFound`] if an
    ///   anchor or snap target cannot be found.
    /// - [`DrawError::InvalidLength`] for a connector whose length is not
    ///   positive.
    pub fn resolve(
        &self,
        kind: ItemKind,
        cursor: Point,
        transform: &Transform,
    ) -> Result<Placement, DrawError> {
        let origin = match (transform.anchor(), transform.point_override()) {
            (Some(_), Some(_)) => return Err(DrawError::AmbiguousOverride),
            (Some(anchor), None) => self.anchor_position(anchor)?,
            (None, Some(point)) => point,
            (None, None) => cursor,
        };

        let x_snap = transform
            .x_override()
            .map(|target| self.target_position(target).map(Point::x))
            .transpose()?;
        // The x snap wins; the y target is not looked up at all then.
        let y_snap = match (x_snap, transform.y_override()) {
            (None, Some(target)) => Some(self.target_position(target)?.y()),
            (Some(_), Some(_)) => {
                debug!(kind:?; "Both x and y snap set, using x");
                None
            }
            _ => None,
        };

        let destination = if let Some(x) = x_snap {
            origin.with_x(x)
        } else if let Some(y) = y_snap {
            origin.with_y(y)
        } else if kind.is_connector() {
            let length = transform.length().unwrap_or(self.default_length);
            if !length.is_finite() || length <= 0.0 {
                return Err(DrawError::InvalidLength(length));
            }
            origin.add_point(transform.direction().unit_vector().scale(length))
        } else {
            origin
        };

        trace!(kind:?, cursor:?, origin:?, destination:?; "Resolved placement");

        Ok(Placement {
            origin,
            destination,
            x_snap,
            y_snap,
        })
    }

    fn anchor_position(&self, anchor: &Anchor) -> Result<Point, DrawError> {
        match anchor {
            Anchor::Pin { reference, pin } => self.backend.pin_position(reference, pin),
            Anchor::Junction(id) => self.junction_position(*id),
        }
    }

    fn target_position(&self, target: &AxisTarget) -> Result<Point, DrawError> {
        match target {
            AxisTarget::Value(value) if !value.is_finite() => {
                Err(DrawError::InvalidTarget(*value))
            }
            AxisTarget::Value(value) => Ok(Point::new(*value, *value)),
            AxisTarget::Point(point) => [point.x(), point.y()]
                .into_iter()
                .find(|value| !value.is_finite())
                .map_or(Ok(*point), |value| Err(DrawError::InvalidTarget(value))),
            AxisTarget::Pin { reference, pin } => self.backend.pin_position(reference, pin),
            AxisTarget::Junction(id) => self.junction_position(*id),
        }
    }

    fn junction_position(&self, id: Id) -> Result<Point, DrawError> {
        self.junctions
            .get(&id)
            .copied()
            .ok_or(DrawError::JunctionNotFound(id))
    }
}
