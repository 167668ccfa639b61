//! Symbol geometry used by the reference backend.
//!
//! A [`LibrarySymbol`] only knows what placement needs: where each pin sits
//! relative to the symbol origin, which unit it belongs to, and an optional
//! body rectangle for plotting. Libraries are written as TOML:
//!
//! ```toml
//! [[symbol]]
//! name = "Device:R"
//! prefix = "R"
//! body = { min = [-1.016, -2.54], max = [1.016, 2.54] }
//! pins = [
//!     { number = "1", at = [0.0, -3.81] },
//!     { number = "2", at = [0.0, 3.81] },
//! ]
//! ```

use std::{fs, path::Path};

use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;

use ohmline_core::geometry::{Bounds, MirrorAxis, Point};

use crate::error::OhmlineError;

const BUILTIN: &str = include_str!("builtin.toml");

/// One pin of a library symbol.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LibraryPin {
    number: String,
    #[serde(default)]
    name: String,
    /// 0 means the pin belongs to every unit.
    #[serde(default)]
    unit: u32,
    at: Point,
}

impl LibraryPin {
    pub fn new(number: impl Into<String>, at: Point) -> Self {
        Self {
            number: number.into(),
            name: String::new(),
            unit: 0,
            at,
        }
    }

    pub fn with_unit(mut self, unit: u32) -> Self {
        self.unit = unit;
        self
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> u32 {
        self.unit
    }

    /// Offset from the symbol origin before rotation.
    pub fn offset(&self) -> Point {
        self.at
    }

    pub fn in_unit(&self, unit: u32) -> bool {
        self.unit == 0 || self.unit == unit
    }
}

/// A part in the library.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LibrarySymbol {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    prefix: String,
    #[serde(default = "default_units")]
    units: u32,
    /// Power symbols name a global net and are left out of the BOM.
    #[serde(default)]
    power: bool,
    #[serde(default)]
    body: Option<Bounds>,
    pins: Vec<LibraryPin>,
}

fn default_units() -> u32 {
    1
}

impl LibrarySymbol {
    pub fn new(name: impl Into<String>, pins: Vec<LibraryPin>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prefix: String::new(),
            units: default_units(),
            power: false,
            body: None,
            pins,
        }
    }

    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units;
        self
    }

    pub fn with_body(mut self, body: Bounds) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_power(mut self, power: bool) -> Self {
        self.power = power;
        self
    }

    /// Library path such as `Device:R`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Reference prefix such as `R`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn is_power(&self) -> bool {
        self.power
    }

    pub fn body(&self) -> Option<Bounds> {
        self.body
    }

    pub fn pins(&self) -> &[LibraryPin] {
        &self.pins
    }

    /// Pins that belong to `unit`.
    pub fn unit_pins(&self, unit: u32) -> impl Iterator<Item = &LibraryPin> {
        self.pins.iter().filter(move |pin| pin.in_unit(unit))
    }

    pub fn pin(&self, unit: u32, number: &str) -> Option<&LibraryPin> {
        self.unit_pins(unit).find(|pin| pin.number == number)
    }
}

/// Maps a library offset onto the sheet: mirror first, then rotate.
pub fn transform_offset(offset: Point, angle: f64, mirror: Option<MirrorAxis>) -> Point {
    let mirrored = match mirror {
        Some(axis) => offset.mirror(axis),
        None => offset,
    };
    mirrored.rotate(angle)
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    symbol: Vec<LibrarySymbol>,
}

/// A set of symbols keyed by library path.
#[derive(Debug, Clone, Default)]
pub struct SymbolLibrary {
    symbols: IndexMap<String, LibrarySymbol>,
}

impl SymbolLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common passives, an op-amp, a connector and power symbols.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        // The bundled file is covered by tests.
        if let Err(err) = library.extend_from_toml(BUILTIN) {
            log::error!(err:% = err; "Bundled symbol library failed to parse");
        }
        library
    }

    /// Adds every `[[symbol]]` of a TOML document. Later definitions replace
    /// earlier ones with the same name.
    pub fn extend_from_toml(&mut self, src: &str) -> Result<usize, toml::de::Error> {
        let file: LibraryFile = toml::from_str(src)?;
        let count = file.symbol.len();
        for symbol in file.symbol {
            self.insert(symbol);
        }
        debug!(count; "Loaded library symbols");
        Ok(count)
    }

    /// Reads and adds a library file.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, OhmlineError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)?;
        let count = self
            .extend_from_toml(&src)
            .map_err(|err| OhmlineError::new_script_error(&err, src.as_str()))?;
        info!(path:? = path, count; "Loaded symbol library");
        Ok(count)
    }

    pub fn insert(&mut self, symbol: LibrarySymbol) {
        self.symbols.insert(symbol.name.clone(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&LibrarySymbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibrarySymbol> {
        self.symbols.values()
    }

    /// Symbols whose name or description contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&LibrarySymbol> {
        let term = term.to_lowercase();
        self.symbols
            .values()
            .filter(|symbol| {
                symbol.name.to_lowercase().contains(&term)
                    || symbol.description.to_lowercase().contains(&term)
            })
            .collect()
    }
}
