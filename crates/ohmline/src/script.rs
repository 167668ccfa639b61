//! TOML drawing scripts.
//!
//! A script is an ordered list of `[[draw]]` tables, each tagged by `kind`,
//! replayed against a [`Draw`] cursor:
//!
//! ```toml
//! start = [25.4, 25.4]
//!
//! [[draw]]
//! kind = "symbol"
//! reference = "R1"
//! library = "Device:R"
//! value = "10k"
//! angle = 90
//!
//! [[draw]]
//! kind = "wire"
//! at_pin = { reference = "R1", pin = 2 }
//! direction = "right"
//! length = 5.08
//!
//! [[draw]]
//! kind = "junction"
//! name = "out"
//! ```
//!
//! Every kind accepts the placement keys `angle`, `direction`, `length`,
//! `at`, `at_pin`, `at_junction`, `tox`, `toy` and `mirror`. Snap targets
//! are a number, a point, `{ reference, pin }` or `{ junction }`.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, error, info};
use serde::Deserialize;

use ohmline_core::{
    geometry::{Direction, MirrorAxis, Point},
    identifier::Id,
};

use crate::{
    config::DrawConfig,
    draw::{Draw, Feedback},
    error::{DrawError, OhmlineError},
    item::{Junction, Label, NoConnect, Symbol, Wire},
    schematic::{ReferencePattern, Schematic, SymbolLibrary},
    transform::{Anchor, AxisTarget, Place},
};

/// A pin written as `2` or `"A"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PinName {
    Number(u64),
    Name(String),
}

impl fmt::Display for PinName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinName::Number(number) => write!(f, "{number}"),
            PinName::Name(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PinRef {
    reference: String,
    pin: PinName,
}

impl PinRef {
    fn anchor(&self) -> Anchor {
        Anchor::pin(self.reference.as_str(), &self.pin)
    }
}

/// Where a `tox` or `toy` snap looks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Value(f64),
    Point(Point),
    Pin(PinRef),
    Junction { junction: String },
}

impl From<&Target> for AxisTarget {
    fn from(target: &Target) -> Self {
        match target {
            Target::Value(value) => AxisTarget::Value(*value),
            Target::Point(point) => AxisTarget::Point(*point),
            Target::Pin(pin) => AxisTarget::pin(pin.reference.as_str(), &pin.pin),
            Target::Junction { junction } => AxisTarget::Junction(Id::new(junction)),
        }
    }
}

/// Placement keys shared by every drawable kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaceArgs {
    angle: Option<f64>,
    direction: Option<Direction>,
    length: Option<f64>,
    at: Option<Point>,
    at_pin: Option<PinRef>,
    at_junction: Option<String>,
    tox: Option<Target>,
    toy: Option<Target>,
    mirror: Option<MirrorAxis>,
}

impl PlaceArgs {
    fn apply<P: Place>(&self, mut item: P) -> P {
        if let Some(angle) = self.angle {
            item = item.rotate(angle);
        }
        if let Some(direction) = self.direction {
            item = item.direction(direction);
        }
        if let Some(length) = self.length {
            item = item.length(length);
        }
        if let Some(at) = self.at {
            item = item.at(at);
        }
        if let Some(pin) = &self.at_pin {
            item = item.at_pin(pin.reference.as_str(), &pin.pin);
        }
        if let Some(junction) = &self.at_junction {
            item = item.at_junction(junction.as_str());
        }
        if let Some(target) = &self.tox {
            item = item.tox(AxisTarget::from(target));
        }
        if let Some(target) = &self.toy {
            item = item.toy(AxisTarget::from(target));
        }
        if let Some(axis) = self.mirror {
            item = item.mirror(axis);
        }
        item
    }
}

/// Where a `position` op moves the cursor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "PositionArgs")]
pub enum PositionTarget {
    Point(Point),
    Junction(String),
}

#[derive(Deserialize)]
struct PositionArgs {
    at: Option<Point>,
    junction: Option<String>,
}

impl TryFrom<PositionArgs> for PositionTarget {
    type Error = String;

    fn try_from(args: PositionArgs) -> Result<Self, Self::Error> {
        match (args.at, args.junction) {
            (Some(point), None) => Ok(PositionTarget::Point(point)),
            (None, Some(junction)) => Ok(PositionTarget::Junction(junction)),
            _ => Err("position needs exactly one of `at` or `junction`".to_string()),
        }
    }
}

fn default_unit() -> u32 {
    1
}

fn default_pin() -> PinName {
    PinName::Number(1)
}

fn default_height() -> f64 {
    5.08
}

fn default_direction() -> Direction {
    Direction::Up
}

/// One `[[draw]]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Op {
    Wire {
        #[serde(flatten)]
        place: PlaceArgs,
    },
    Junction {
        name: Option<String>,
        #[serde(default)]
        pushed: bool,
        #[serde(flatten)]
        place: PlaceArgs,
    },
    NoConnect {
        #[serde(flatten)]
        place: PlaceArgs,
    },
    Label {
        text: String,
        #[serde(flatten)]
        place: PlaceArgs,
    },
    /// Without `reference` the next number for `prefix` (or the library
    /// part's prefix) is used.
    Symbol {
        reference: Option<String>,
        prefix: Option<String>,
        library: String,
        #[serde(default)]
        value: String,
        #[serde(default = "default_unit")]
        unit: u32,
        #[serde(default = "default_pin")]
        pin: PinName,
        #[serde(default)]
        properties: IndexMap<String, String>,
        #[serde(flatten)]
        place: PlaceArgs,
    },
    /// Moves the cursor to a point or junction.
    Position {
        #[serde(flatten)]
        target: PositionTarget,
    },
    Push,
    /// Moves the cursor to the popped position.
    Pop,
    /// Moves the cursor to the saved position and keeps it saved.
    Peek,
    Counter {
        prefix: String,
        next: u32,
    },
    Property {
        pattern: String,
        key: String,
        value: String,
    },
    Feedback {
        from: PinRef,
        to: PinRef,
        #[serde(default = "default_direction")]
        direction: Direction,
        #[serde(default = "default_height")]
        height: f64,
        #[serde(default)]
        dots: bool,
    },
}

impl Op {
    fn kind(&self) -> &'static str {
        match self {
            Op::Wire { .. } => "wire",
            Op::Junction { .. } => "junction",
            Op::NoConnect { .. } => "no_connect",
            Op::Label { .. } => "label",
            Op::Symbol { .. } => "symbol",
            Op::Position { .. } => "position",
            Op::Push => "push",
            Op::Pop => "pop",
            Op::Peek => "peek",
            Op::Counter { .. } => "counter",
            Op::Property { .. } => "property",
            Op::Feedback { .. } => "feedback",
        }
    }

    fn run(&self, draw: &mut Draw<Schematic>) -> Result<(), DrawError> {
        match self {
            Op::Wire { place } => {
                draw.add(place.apply(Wire::new()))?;
            }
            Op::Junction {
                name,
                pushed,
                place,
            } => {
                let mut junction = place.apply(Junction::new());
                if let Some(name) = name {
                    junction = junction.named(name.as_str());
                }
                if *pushed {
                    junction = junction.pushed();
                }
                draw.add(junction)?;
            }
            Op::NoConnect { place } => {
                draw.add(place.apply(NoConnect::new()))?;
            }
            Op::Label { text, place } => {
                draw.add(place.apply(Label::new(text.as_str())))?;
            }
            Op::Symbol {
                reference,
                prefix,
                library,
                value,
                unit,
                pin,
                properties,
                place,
            } => {
                let reference = match reference {
                    Some(reference) => reference.clone(),
                    None => {
                        let prefix = match prefix {
                            Some(prefix) => prefix.clone(),
                            None => draw
                                .backend()
                                .library()
                                .get(library)
                                .map(|part| part.prefix().to_string())
                                .ok_or_else(|| DrawError::SymbolNotFound(library.clone()))?,
                        };
                        draw.next_reference(&prefix)?
                    }
                };
                let symbol = properties.iter().fold(
                    Symbol::new(reference, library.as_str())
                        .value(value.as_str())
                        .with_unit(*unit)
                        .anchor_pin(pin),
                    |symbol, (key, value)| symbol.property(key.as_str(), value.as_str()),
                );
                draw.add(place.apply(symbol))?;
            }
            Op::Position { target } => {
                let point = match target {
                    PositionTarget::Point(point) => *point,
                    PositionTarget::Junction(junction) => draw.junction(junction.as_str())?,
                };
                draw.set_position(point);
            }
            Op::Push => {
                draw.push();
            }
            Op::Pop => {
                let point = draw.pop()?;
                draw.set_position(point);
            }
            Op::Peek => {
                let point = draw.peek()?;
                draw.set_position(point);
            }
            Op::Counter { prefix, next } => {
                draw.set_counter(prefix, *next);
            }
            Op::Property {
                pattern,
                key,
                value,
            } => {
                let pattern: ReferencePattern = pattern.parse()?;
                draw.backend_mut().set_property(&pattern, key, value);
            }
            Op::Feedback {
                from,
                to,
                direction,
                height,
                dots,
            } => {
                let feedback = Feedback::new(from.anchor(), to.anchor())?
                    .direction(*direction)
                    .height(*height)
                    .dots(*dots, *dots);
                draw.feedback(&feedback)?;
            }
        }
        Ok(())
    }
}

/// A parsed drawing script.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Script {
    /// Extra library files, relative to the script.
    #[serde(default)]
    library: Vec<PathBuf>,

    /// Overrides the configured start position.
    start: Option<Point>,

    #[serde(default, rename = "draw")]
    ops: Vec<Op>,
}

impl Script {
    /// # Errors
    ///
    /// Returns [`OhmlineError::Script`] with the offending span.
    pub fn parse(src: &str) -> Result<Self, OhmlineError> {
        toml::from_str(src).map_err(|err| OhmlineError::new_script_error(&err, src))
    }

    pub fn libraries(&self) -> &[PathBuf] {
        &self.library
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Replays every operation in order, stopping at the first error.
    pub fn run(&self, draw: &mut Draw<Schematic>) -> Result<(), DrawError> {
        if let Some(start) = self.start {
            draw.set_position(start);
        }
        for (index, op) in self.ops.iter().enumerate() {
            let kind = op.kind();
            if let Err(err) = op.run(draw) {
                error!(index, kind, err:% = err; "Drawing operation failed");
                return Err(err);
            }
            debug!(index, kind, position:? = draw.position(); "Ran drawing operation");
        }
        info!(ops = self.ops.len(); "Script finished");
        Ok(())
    }

    /// Loads the script's libraries on top of the built-in one, then draws
    /// into a fresh schematic.
    pub fn build(&self, base_dir: &Path, config: &DrawConfig) -> Result<Schematic, OhmlineError> {
        let mut library = SymbolLibrary::builtin();
        for path in &self.library {
            library.load(base_dir.join(path))?;
        }
        let mut draw = Draw::from_config(Schematic::new(library), config);
        self.run(&mut draw)?;
        Ok(draw.into_backend())
    }
}

/// Reads, parses and builds a script file.
pub fn build_file(path: impl AsRef<Path>, config: &DrawConfig) -> Result<Schematic, OhmlineError> {
    let path = path.as_ref();
    let src = fs::read_to_string(path)?;
    let script = Script::parse(&src)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    info!(path:? = path, ops = script.ops.len(); "Loaded drawing script");
    script.build(base_dir, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{backend::Backend, netlist::Netlist};

    fn run(src: &str) -> Result<Draw<Schematic>, OhmlineError> {
        let script = Script::parse(src)?;
        let mut draw = Draw::new(Schematic::default());
        script.run(&mut draw)?;
        Ok(draw)
    }

    #[test]
    fn test_parse_ops() {
        let script = Script::parse(
            r#"
            start = [10.0, 10.0]

            [[draw]]
            kind = "wire"
            direction = "down"
            length = 5

            [[draw]]
            kind = "push"

            [[draw]]
            kind = "counter"
            prefix = "R"
            next = 10
            "#,
        )
        .unwrap();

        assert_eq!(script.start(), Some(Point::new(10.0, 10.0)));
        assert_eq!(script.ops().len(), 3);
        assert_eq!(script.ops()[1], Op::Push);
        assert!(matches!(
            &script.ops()[0],
            Op::Wire { place } if place.length == Some(5.0)
                && place.direction == Some(Direction::Down)
        ));
    }

    #[test]
    fn test_syntax_error_has_span() {
        let err = Script::parse("[[draw]]\nkind = \"warp\n").unwrap_err();
        match err {
            OhmlineError::Script { span, src, .. } => {
                assert!(span.is_some());
                assert!(src.contains("warp"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_divider() {
        let draw = run(
            r#"
            start = [0.0, 0.0]

            [[draw]]
            kind = "symbol"
            library = "Device:R"
            value = "10k"

            [[draw]]
            kind = "junction"
            at_pin = { reference = "R1", pin = 2 }
            name = "mid"

            [[draw]]
            kind = "symbol"
            library = "Device:R"
            value = "4k7"
            at_junction = "mid"

            [[draw]]
            kind = "label"
            text = "VOUT"
            at_junction = "mid"
            "#,
        )
        .unwrap();

        let schematic = draw.backend();
        assert!(schematic.pin_position("R2", "1").unwrap().coincides(Point::new(0.0, 7.62)));
        let netlist = Netlist::from_schematic(schematic);
        let vout = netlist.net("VOUT").unwrap();
        assert!(vout.contains("R1", "2"));
        assert!(vout.contains("R2", "1"));
    }

    #[test]
    fn test_snap_targets() {
        let draw = run(
            r#"
            [[draw]]
            kind = "junction"
            at = [20.0, 5.0]
            name = "far"

            [[draw]]
            kind = "position"
            at = [0.0, 0.0]

            [[draw]]
            kind = "wire"
            tox = { junction = "far" }

            [[draw]]
            kind = "wire"
            toy = 12.5
            "#,
        )
        .unwrap();

        assert_eq!(draw.position(), Point::new(20.0, 12.5));
    }

    #[test]
    fn test_stack_ops() {
        let draw = run(
            r#"
            [[draw]]
            kind = "position"
            at = [1.0, 1.0]

            [[draw]]
            kind = "push"

            [[draw]]
            kind = "wire"
            direction = "right"

            [[draw]]
            kind = "peek"

            [[draw]]
            kind = "wire"
            direction = "down"

            [[draw]]
            kind = "pop"
            "#,
        )
        .unwrap();

        assert_eq!(draw.position(), Point::new(1.0, 1.0));
        assert_eq!(draw.stack_depth(), 0);
    }

    #[test]
    fn test_pop_on_empty_stack() {
        let err = run("[[draw]]\nkind = \"pop\"\n").unwrap_err();
        assert!(matches!(err, OhmlineError::Draw(DrawError::EmptyStack)));
    }

    #[test]
    fn test_properties_and_counter() {
        let draw = run(
            r#"
            [[draw]]
            kind = "counter"
            prefix = "C"
            next = 5

            [[draw]]
            kind = "symbol"
            library = "Device:C"
            properties = { Voltage = "16V" }

            [[draw]]
            kind = "symbol"
            library = "Device:C"
            at = [20.0, 0.0]

            [[draw]]
            kind = "property"
            pattern = "C[6..]"
            key = "Footprint"
            value = "C_0805"
            "#,
        )
        .unwrap();

        let symbols: Vec<_> = draw.backend().symbols().collect();
        assert_eq!(symbols[0].reference(), "C5");
        assert_eq!(symbols[0].properties().get("Voltage").unwrap(), "16V");
        assert!(symbols[0].properties().get("Footprint").is_none());
        assert_eq!(symbols[1].reference(), "C6");
        assert_eq!(symbols[1].properties().get("Footprint").unwrap(), "C_0805");
    }

    #[test]
    fn test_position_needs_one_target() {
        let missing = Script::parse("[[draw]]\nkind = \"position\"\n").unwrap_err();
        let both = Script::parse(
            "[[draw]]\nkind = \"position\"\nat = [1.0, 1.0]\njunction = \"j\"\n",
        )
        .unwrap_err();

        for err in [missing, both] {
            match err {
                OhmlineError::Script { message, .. } => {
                    assert!(message.contains("exactly one of `at` or `junction`"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_position_to_junction() {
        let draw = run(
            r#"
            [[draw]]
            kind = "junction"
            at = [7.62, 2.54]
            name = "tap"

            [[draw]]
            kind = "position"
            at = [0.0, 0.0]

            [[draw]]
            kind = "position"
            junction = "tap"
            "#,
        )
        .unwrap();
        assert_eq!(draw.position(), Point::new(7.62, 2.54));
    }
}
