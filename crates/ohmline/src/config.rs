//! Configuration types for drawing and plotting schematics.
//!
//! All types implement [`serde::Deserialize`] with defaults for every field,
//! so a configuration file only needs the values it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining draw and style settings.
//! - [`DrawConfig`] - Start position of the cursor and the default segment length.
//! - [`StyleConfig`] - Colors, strokes and scale of the SVG plot.
//!
//! # Example
//!
//! ```
//! # use ohmline::config::AppConfig;
//! let config: AppConfig = toml::from_str(r#"
//!     [draw]
//!     origin = [10.0, 10.0]
//!
//!     [style]
//!     background_color = "white"
//! "#).unwrap();
//! assert_eq!(config.draw().origin().x(), 10.0);
//! assert_eq!(config.draw().unit(), 2.54);
//! ```

use serde::Deserialize;

use ohmline_core::{
    color::Color,
    geometry::{GRID_UNIT, Point},
    style::StrokeDefinition,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    draw: DrawConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(draw: DrawConfig, style: StyleConfig) -> Self {
        Self { draw, style }
    }

    /// Returns the drawing configuration.
    pub fn draw(&self) -> &DrawConfig {
        &self.draw
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Cursor defaults for a new drawing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Initial cursor position.
    origin: Point,

    /// Segment length used when a wire does not set one.
    unit: f64,
}

impl DrawConfig {
    pub fn new(origin: Point, unit: f64) -> Self {
        Self { origin, unit }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }
}

impl Default for DrawConfig {
    /// One inch from the sheet corner, 0.1 inch grid.
    fn default() -> Self {
        Self {
            origin: Point::new(25.4, 25.4),
            unit: GRID_UNIT,
        }
    }
}

/// Visual styling of the SVG plot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background fill; transparent when unset.
    background_color: Option<Color>,

    /// Wires and no-connect markers.
    wire: StrokeDefinition,

    /// Symbol bodies and pin stubs.
    symbol: StrokeDefinition,

    junction_color: Color,

    text_color: Color,

    /// Label and reference text height in millimetres.
    font_size: f64,

    junction_radius: f64,

    /// Margin around the drawing in millimetres.
    padding: f64,

    /// Pixels per millimetre for the width/height attributes.
    scale: f64,
}

impl StyleConfig {
    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn wire(&self) -> &StrokeDefinition {
        &self.wire
    }

    pub fn symbol(&self) -> &StrokeDefinition {
        &self.symbol
    }

    pub fn junction_color(&self) -> Color {
        self.junction_color
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn junction_radius(&self) -> f64 {
        self.junction_radius
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        let green = Color::new("#008400").expect("valid CSS color");
        let maroon = Color::new("#840000").expect("valid CSS color");
        Self {
            background_color: None,
            wire: StrokeDefinition::solid(green, 0.1524),
            symbol: StrokeDefinition::solid(maroon, 0.254),
            junction_color: green,
            text_color: Color::default(),
            font_size: 1.27,
            junction_radius: 0.4572,
            padding: 2.54,
            scale: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.draw().origin(), Point::new(25.4, 25.4));
        assert_eq!(config.draw().unit(), GRID_UNIT);
        assert!(config.style().background_color().is_none());
        assert_eq!(config.style().scale(), 4.0);
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [draw]
            unit = 1.27

            [style]
            background_color = "white"
            wire = { width = 0.3 }
            "#,
        )
        .unwrap();

        assert_eq!(config.draw().origin(), Point::new(25.4, 25.4));
        assert_eq!(config.draw().unit(), 1.27);
        assert_eq!(
            config.style().background_color(),
            Some(Color::new("white").unwrap())
        );
        assert_eq!(config.style().wire().width(), 0.3);
        assert_eq!(config.style().symbol().width(), 0.254);
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let result = toml::from_str::<AppConfig>(
            r#"
            [style]
            text_color = "nope"
            "#,
        );
        assert!(result.is_err());
    }
}
