//! Color handling for rendered schematics
//!
//! [`Color`] wraps `DynamicColor` from the color crate. It parses any CSS
//! color string and (de)serializes as that string, so it can be used directly
//! in configuration files.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use serde::{Deserialize, Serialize};

/// A CSS color.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Parses a CSS color string such as `"#ff0000"`, `"rgb(255, 0, 0)"` or `"red"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ohmline_core::color::Color;
    ///
    /// let wire = Color::new("#008000").unwrap();
    /// let junction = Color::new("darkgreen").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| format!("invalid color `{color_str}`: {err}"))
    }

    /// Returns a copy with the given alpha, between 0.0 and 1.0.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("rgb(0, 128, 0)").is_ok());

        let err = Color::new("not-a-color").unwrap_err();
        assert!(err.starts_with("invalid color `not-a-color`"));
    }

    #[test]
    fn test_color_default() {
        assert_eq!(Color::default().to_string(), "black");
    }

    #[test]
    fn test_color_with_alpha() {
        let faded = Color::new("red").unwrap().with_alpha(0.25);
        assert!((faded.alpha() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_color_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            wire: Color,
        }

        let parsed: Wrapper = toml::from_str(r#"wire = "green""#).unwrap();
        assert_eq!(parsed.wire, Color::new("green").unwrap());

        let invalid = toml::from_str::<Wrapper>(r#"wire = "greenish""#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_eq_hash() {
        let red = Color::new("red").unwrap();
        let blue = Color::new("blue").unwrap();

        let mut set = HashSet::new();
        set.insert(red);
        assert!(set.contains(&Color::new("red").unwrap()));
        assert!(!set.contains(&blue));
    }
}
