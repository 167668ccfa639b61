//! Placement descriptors attached to every drawable item.
//!
//! A [`Transform`] records *how* an item should be placed relative to the
//! drawing cursor: rotation, drawing direction, segment length, an optional
//! anchor and optional coordinate overrides. Nothing is resolved here; pin
//! and junction references stay symbolic until the item is added to a
//! [`Draw`](crate::Draw), so an anchor and a snap target can be combined on
//! the same item.
//!
//! The fluent mutators live on the [`Place`] trait, which every item
//! implements, so they read the same on wires, labels and symbols:
//!
//! ```
//! use ohmline::{Place, Wire, transform::AxisTarget};
//!
//! let wire = Wire::new()
//!     .at_pin("R1", 2)
//!     .down()
//!     .tox(AxisTarget::pin("C1", 1));
//! assert!(wire.transform().anchor().is_some());
//! assert!(wire.transform().x_override().is_some());
//! ```

use ohmline_core::{
    geometry::{Direction, MirrorAxis, Point},
    identifier::Id,
};

/// The place an item starts from instead of the live cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum Anchor {
    /// A pin of a placed symbol, looked up through the backend.
    Pin { reference: String, pin: String },
    /// A previously added junction, at its frozen position.
    Junction(Id),
}

impl Anchor {
    pub fn pin(reference: impl Into<String>, pin: impl ToString) -> Self {
        Self::Pin {
            reference: reference.into(),
            pin: pin.to_string(),
        }
    }
}

/// Target of a `tox`/`toy` snap. Only one coordinate of the resolved point
/// is used.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisTarget {
    Value(f64),
    Point(Point),
    Pin { reference: String, pin: String },
    Junction(Id),
}

impl AxisTarget {
    pub fn pin(reference: impl Into<String>, pin: impl ToString) -> Self {
        Self::Pin {
            reference: reference.into(),
            pin: pin.to_string(),
        }
    }
}

impl From<f64> for AxisTarget {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl From<Point> for AxisTarget {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

impl From<Id> for AxisTarget {
    fn from(id: Id) -> Self {
        Self::Junction(id)
    }
}

impl From<Anchor> for AxisTarget {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::Pin { reference, pin } => Self::Pin { reference, pin },
            Anchor::Junction(id) => Self::Junction(id),
        }
    }
}

/// Placement attributes of one item.
///
/// Defaults: angle 0, direction right, length taken from the drawing
/// (one grid unit unless configured), no anchor, no overrides, no mirror.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform {
    angle: f64,
    direction: Direction,
    length: Option<f64>,
    anchor: Option<Anchor>,
    x_override: Option<AxisTarget>,
    y_override: Option<AxisTarget>,
    point_override: Option<Point>,
    mirror: Option<MirrorAxis>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation in degrees, counter-clockwise.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Explicit segment length, `None` when the drawing default applies.
    pub fn length(&self) -> Option<f64> {
        self.length
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn x_override(&self) -> Option<&AxisTarget> {
        self.x_override.as_ref()
    }

    pub fn y_override(&self) -> Option<&AxisTarget> {
        self.y_override.as_ref()
    }

    pub fn point_override(&self) -> Option<Point> {
        self.point_override
    }

    pub fn mirror(&self) -> Option<MirrorAxis> {
        self.mirror
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_x_override(mut self, target: AxisTarget) -> Self {
        self.x_override = Some(target);
        self
    }

    pub fn with_y_override(mut self, target: AxisTarget) -> Self {
        self.y_override = Some(target);
        self
    }

    pub fn with_point_override(mut self, point: Point) -> Self {
        self.point_override = Some(point);
        self
    }

    pub fn with_mirror(mut self, axis: MirrorAxis) -> Self {
        self.mirror = Some(axis);
        self
    }
}

/// Fluent placement mutators shared by every item.
///
/// Each call consumes the item and returns it, so an item is configured in
/// one expression and then handed to [`Draw::add`](crate::Draw::add).
pub trait Place: Sized {
    fn transform(&self) -> &Transform;

    fn map_transform(self, f: impl FnOnce(Transform) -> Transform) -> Self;

    /// Rotation in degrees.
    fn rotate(self, angle: f64) -> Self {
        self.map_transform(|t| t.with_angle(angle))
    }

    fn direction(self, direction: Direction) -> Self {
        self.map_transform(|t| t.with_direction(direction))
    }

    fn up(self) -> Self {
        self.direction(Direction::Up)
    }

    fn down(self) -> Self {
        self.direction(Direction::Down)
    }

    fn left(self) -> Self {
        self.direction(Direction::Left)
    }

    fn right(self) -> Self {
        self.direction(Direction::Right)
    }

    /// Segment length in millimetres.
    fn length(self, length: f64) -> Self {
        self.map_transform(|t| t.with_length(length))
    }

    /// Start from a pin of a placed symbol.
    fn at_pin(self, reference: impl Into<String>, pin: impl ToString) -> Self {
        let anchor = Anchor::pin(reference, pin);
        self.map_transform(|t| t.with_anchor(anchor))
    }

    /// Start from a junction added earlier.
    fn at_junction(self, id: impl Into<Id>) -> Self {
        let id = id.into();
        self.map_transform(|t| t.with_anchor(Anchor::Junction(id)))
    }

    /// Start from (or, for point-like items, sit at) an absolute point.
    fn at(self, point: impl Into<Point>) -> Self {
        let point = point.into();
        self.map_transform(|t| t.with_point_override(point))
    }

    /// End at the x coordinate of `target`, keeping the origin's y.
    fn tox(self, target: impl Into<AxisTarget>) -> Self {
        let target = target.into();
        self.map_transform(|t| t.with_x_override(target))
    }

    /// End at the y coordinate of `target`, keeping the origin's x.
    fn toy(self, target: impl Into<AxisTarget>) -> Self {
        let target = target.into();
        self.map_transform(|t| t.with_y_override(target))
    }

    fn mirror(self, axis: MirrorAxis) -> Self {
        self.map_transform(|t| t.with_mirror(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_defaults() {
        let transform = Transform::new();
        assert_eq!(transform.angle(), 0.0);
        assert_eq!(transform.direction(), Direction::Right);
        assert_eq!(transform.length(), None);
        assert!(transform.anchor().is_none());
        assert!(transform.x_override().is_none());
        assert!(transform.y_override().is_none());
        assert!(transform.point_override().is_none());
        assert!(transform.mirror().is_none());
    }

    #[test]
    fn test_builders_compose() {
        let transform = Transform::new()
            .with_direction(Direction::Down)
            .with_length(5.08)
            .with_anchor(Anchor::pin("U1", "VCC"))
            .with_x_override(AxisTarget::Value(40.0))
            .with_mirror(MirrorAxis::Y);

        assert_eq!(transform.direction(), Direction::Down);
        assert_eq!(transform.length(), Some(5.08));
        assert_eq!(
            transform.anchor(),
            Some(&Anchor::Pin {
                reference: "U1".to_string(),
                pin: "VCC".to_string()
            })
        );
        assert_eq!(transform.x_override(), Some(&AxisTarget::Value(40.0)));
        assert_eq!(transform.mirror(), Some(MirrorAxis::Y));
    }

    #[test]
    fn test_numeric_pins_are_stringified() {
        assert_eq!(
            Anchor::pin("R1", 2),
            Anchor::Pin {
                reference: "R1".to_string(),
                pin: "2".to_string()
            }
        );
    }

    #[test]
    fn test_axis_target_conversions() {
        assert_eq!(AxisTarget::from(3.0), AxisTarget::Value(3.0));
        assert_eq!(
            AxisTarget::from(Point::new(1.0, 2.0)),
            AxisTarget::Point(Point::new(1.0, 2.0))
        );
        assert_eq!(
            AxisTarget::from(Id::new("tap")),
            AxisTarget::Junction(Id::new("tap"))
        );
        assert_eq!(
            AxisTarget::from(Anchor::pin("C1", 1)),
            AxisTarget::pin("C1", 1)
        );
    }

    #[test]
    fn test_later_direction_wins() {
        let transform = Transform::new()
            .with_direction(Direction::Up)
            .with_direction(Direction::Left);
        assert_eq!(transform.direction(), Direction::Left);
    }
}
