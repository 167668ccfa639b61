//! Stroke definitions for rendered schematic primitives.
//!
//! # Overview
//!
//! - [`StrokeDefinition`]: color, width, dash style, cap and join of a line
//! - [`StrokeStyle`]: solid, dashed, dotted or a custom dash pattern
//! - [`StrokeCap`] / [`StrokeJoin`]: line end and corner rendering
//! - [`apply_stroke!`](crate::apply_stroke!): writes a stroke onto an SVG element
//!
//! Wires, symbol bodies and no-connect markers all share this type so a
//! single style section in the configuration drives the whole plot.
//!
//! ```
//! use ohmline_core::{color::Color, style::{StrokeDefinition, StrokeCap}};
//! use svg::node::element as svg_element;
//!
//! let stroke = StrokeDefinition::solid(Color::new("darkgreen").unwrap(), 0.254)
//!     .with_cap(StrokeCap::Round);
//! let line = svg_element::Line::new()
//!     .set("x1", 0.0)
//!     .set("y1", 0.0)
//!     .set("x2", 2.54)
//!     .set("y2", 0.0);
//! let line = ohmline_core::apply_stroke!(line, &stroke);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Dash pattern of a stroke.
///
/// Patterns are expressed in sheet millimetres:
/// - `Solid`: no dasharray attribute
/// - `Dashed`: "1,0.5"
/// - `Dotted`: "0.2,0.4"
/// - `Custom(pattern)`: the provided dasharray
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            "" => Err("empty stroke style".to_string()),
            // Anything else is taken as a raw dasharray
            _ => Ok(Self::Custom(s.to_string())),
        }
    }
}

impl TryFrom<String> for StrokeStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrokeStyle> for String {
    fn from(style: StrokeStyle) -> Self {
        match style {
            StrokeStyle::Solid => "solid".to_string(),
            StrokeStyle::Dashed => "dashed".to_string(),
            StrokeStyle::Dotted => "dotted".to_string(),
            StrokeStyle::Custom(pattern) => pattern,
        }
    }
}

impl StrokeStyle {
    /// SVG `stroke-dasharray` value, or `None` for solid lines.
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("1,0.5".to_string()),
            Self::Dotted => Some("0.2,0.4".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// How line endpoints are rendered (`stroke-linecap`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// How line corners are rendered (`stroke-linejoin`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A complete stroke: color, width in millimetres, dash style, cap and join.
///
/// Deserializes from a table where every field is optional:
///
/// ```
/// use ohmline_core::style::{StrokeDefinition, StrokeStyle};
///
/// let stroke: StrokeDefinition = toml::from_str(r#"
///     color = "blue"
///     style = "dashed"
/// "#).unwrap();
/// assert_eq!(*stroke.style(), StrokeStyle::Dashed);
/// assert_eq!(stroke.width(), 0.1524);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeDefinition {
    color: Color,
    width: f64,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a stroke with the given color and width and default style.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates a solid stroke.
    pub fn solid(color: Color, width: f64) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke.
    pub fn dashed(color: Color, width: f64) -> Self {
        Self::new(color, width).with_style(StrokeStyle::Dashed)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: StrokeJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for StrokeDefinition {
    /// Black, 6 mil (0.1524 mm), solid.
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 0.1524,
            style: StrokeStyle::default(),
            cap: StrokeCap::default(),
            join: StrokeJoin::default(),
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// Sets color, opacity, width, line cap, line join and, for non-solid styles,
/// the dash pattern.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
            .set("stroke-linejoin", $stroke.join().to_svg_value());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 0.1524);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.cap(), StrokeCap::Butt);
        assert_eq!(stroke.join(), StrokeJoin::Miter);
    }

    #[test]
    fn test_stroke_builders() {
        let color = Color::new("red").unwrap();
        let stroke = StrokeDefinition::dashed(color, 0.3)
            .with_cap(StrokeCap::Round)
            .with_join(StrokeJoin::Bevel);

        assert_eq!(stroke.width(), 0.3);
        assert_eq!(*stroke.style(), StrokeStyle::Dashed);
        assert_eq!(stroke.cap(), StrokeCap::Round);
        assert_eq!(stroke.join(), StrokeJoin::Bevel);
    }

    #[test]
    fn test_stroke_style_parse() {
        assert_eq!("dotted".parse::<StrokeStyle>(), Ok(StrokeStyle::Dotted));
        assert_eq!(
            "2,1".parse::<StrokeStyle>(),
            Ok(StrokeStyle::Custom("2,1".to_string()))
        );
        assert!("".parse::<StrokeStyle>().is_err());
    }

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(), Some("1,0.5".to_string()));
        assert_eq!(
            StrokeStyle::Custom("3,1".to_string()).to_svg_value(),
            Some("3,1".to_string())
        );
    }

    #[test]
    fn test_stroke_deserialize_partial_table() {
        let stroke: StrokeDefinition = toml::from_str(
            r#"
            width = 0.25
            cap = "round"
            "#,
        )
        .unwrap();

        assert_eq!(stroke.width(), 0.25);
        assert_eq!(stroke.cap(), StrokeCap::Round);
        assert_eq!(stroke.color(), Color::default());
    }

    #[test]
    fn test_apply_stroke_sets_attributes() {
        let stroke = StrokeDefinition::dashed(Color::new("blue").unwrap(), 0.5);
        let line = crate::apply_stroke!(svg::node::element::Line::new(), &stroke);
        let rendered = line.to_string();

        assert!(rendered.contains(r#"stroke-width="0.5""#));
        assert!(rendered.contains(r#"stroke-dasharray="1,0.5""#));
        assert!(rendered.contains(r#"stroke-linecap="butt""#));
    }
}
