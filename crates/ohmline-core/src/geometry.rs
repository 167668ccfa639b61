//! Geometric primitives for schematic placement.
//!
//! This module provides the coordinate types used throughout ohmline to
//! track the drawing cursor, resolve pin positions and size rendered output.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in schematic grid units
//! - [`Direction`] - One of the four drawing directions with its unit vector
//! - [`MirrorAxis`] - The axis a symbol is mirrored about
//! - [`Bounds`] - An axis-aligned bounding box
//!
//! # Coordinate System
//!
//! ohmline uses the schematic (and SVG) convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the sheet at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward, so [`Direction::Up`] moves toward smaller y
//!
//! Coordinates are millimetres; one grid unit is [`GRID_UNIT`] (0.1 inch).

use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The default grid pitch in millimetres (0.1 inch).
pub const GRID_UNIT: f64 = 2.54;

/// A 2D point representing a position on the schematic sheet.
///
/// Points are immutable values; every operation returns a new point.
/// When (de)serialized a point is written as a two-element array `[x, y]`.
///
/// # Examples
///
/// ```
/// # use ohmline_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f64 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Rotates the point around the origin by `degrees`, counter-clockwise
    /// as seen on the sheet.
    ///
    /// Quarter turns are computed exactly so that grid-aligned pins stay
    /// on the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ohmline_core::geometry::Point;
    /// // A pin to the right of the origin ends up above it.
    /// let pin = Point::new(3.81, 0.0).rotate(90.0);
    /// assert_eq!(pin, Point::new(0.0, -3.81));
    /// ```
    pub fn rotate(self, degrees: f64) -> Self {
        let (sin, cos) = quarter_turn(degrees).unwrap_or_else(|| degrees.to_radians().sin_cos());
        Self {
            x: self.x * cos + self.y * sin,
            y: -self.x * sin + self.y * cos,
        }
    }

    /// Mirrors the point about the given axis through the origin.
    pub fn mirror(self, axis: MirrorAxis) -> Self {
        match axis {
            MirrorAxis::X => Self {
                x: self.x,
                y: -self.y,
            },
            MirrorAxis::Y => Self {
                x: -self.x,
                y: self.y,
            },
        }
    }

    /// Returns a key that compares equal for points closer than 0.001.
    pub fn grid_key(self) -> (i64, i64) {
        (
            (self.x * 1000.0).round() as i64,
            (self.y * 1000.0).round() as i64,
        )
    }

    /// Checks whether two points coincide at 0.001 resolution.
    pub fn coincides(self, other: Point) -> bool {
        self.grid_key() == other.grid_key()
    }
}

/// Exact `(sin, cos)` for multiples of 90 degrees.
fn quarter_turn(degrees: f64) -> Option<(f64, f64)> {
    let normalized = degrees.rem_euclid(360.0);
    match normalized {
        n if n == 0.0 => Some((0.0, 1.0)),
        n if n == 90.0 => Some((1.0, 0.0)),
        n if n == 180.0 => Some((0.0, -1.0)),
        n if n == 270.0 => Some((-1.0, 0.0)),
        _ => None,
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.add_point(rhs)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.sub_point(rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", round3(self.x), round3(self.y))
    }
}

/// Rounds a coordinate to three decimals for display and serialization.
pub fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid printing `-0`.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Error returned when parsing a [`Direction`] or [`MirrorAxis`] fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} `{value}`")]
pub struct ParseGeometryError {
    kind: &'static str,
    value: String,
}

/// The direction a connector is drawn in.
///
/// # Examples
///
/// ```
/// # use ohmline_core::geometry::{Direction, Point};
/// assert_eq!(Direction::default(), Direction::Right);
/// assert_eq!(Direction::Up.unit_vector(), Point::new(0.0, -1.0));
/// assert_eq!("down".parse::<Direction>().unwrap(), Direction::Down);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Unit vector for this direction. Up is negative y.
    pub fn unit_vector(self) -> Point {
        match self {
            Direction::Right => Point::new(1.0, 0.0),
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Up => Point::new(0.0, -1.0),
            Direction::Down => Point::new(0.0, 1.0),
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Returns true for left and right.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Direction {
    type Err = ParseGeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseGeometryError {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// Mirror axis of a placed symbol.
///
/// [`MirrorAxis::X`] flips the symbol about the horizontal axis (top and
/// bottom swap), [`MirrorAxis::Y`] flips it about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorAxis {
    X,
    Y,
}

impl fmt::Display for MirrorAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorAxis::X => write!(f, "x"),
            MirrorAxis::Y => write!(f, "y"),
        }
    }
}

impl FromStr for MirrorAxis {
    type Err = ParseGeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(MirrorAxis::X),
            "y" => Ok(MirrorAxis::Y),
            _ => Err(ParseGeometryError {
                kind: "mirror axis",
                value: s.to_string(),
            }),
        }
    }
}

/// An axis-aligned rectangle defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Creates bounds from two corners in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest bounds containing all points, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| acc.include_point(p)))
    }

    pub fn min_point(self) -> Point {
        self.min
    }

    pub fn max_point(self) -> Point {
        self.max
    }

    pub fn min_x(self) -> f64 {
        self.min.x
    }

    pub fn min_y(self) -> f64 {
        self.min.y
    }

    pub fn max_x(self) -> f64 {
        self.max.x
    }

    pub fn max_y(self) -> f64 {
        self.max.y
    }

    pub fn width(self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Grows the bounds to contain `point`.
    pub fn include_point(self, point: Point) -> Self {
        Self {
            min: Point::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    /// Smallest bounds containing both.
    pub fn merge(self, other: Bounds) -> Self {
        self.include_point(other.min).include_point(other.max)
    }

    /// Moves the bounds by `offset`.
    pub fn translate(self, offset: Point) -> Self {
        Self {
            min: self.min.add_point(offset),
            max: self.max.add_point(offset),
        }
    }

    /// Expands every side by `padding`.
    pub fn add_padding(self, padding: f64) -> Self {
        Self {
            min: Point::new(self.min.x - padding, self.min.y - padding),
            max: Point::new(self.max.x + padding, self.max.y + padding),
        }
    }

    /// Checks whether `point` is inside or on the edge.
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}
