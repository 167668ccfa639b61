//! Ohmline - relative placement for electronic schematics
//!
//! A schematic is described as a chain of drawing operations: go right one
//! grid unit, drop a junction, place a resistor with pin 1 on that junction,
//! run a wire to the x of another pin. [`Draw`] resolves each operation to
//! absolute coordinates and hands the result to a [`Backend`](backend::Backend).
//!
//! # Overview
//!
//! - [`transform`] - Placement descriptor and the [`Place`] builder methods.
//! - [`item`] - Wires, junctions, labels, no-connect markers and symbols.
//! - [`resolve`] - Precedence of anchors, overrides, snaps and directions.
//! - [`draw`] - The drawing cursor with its position stack.
//! - [`schematic`] - In-memory reference backend with a symbol library.
//! - [`netlist`], [`bom`] - Connectivity and parts list of a schematic.
//! - [`export`] - SVG plot.
//! - [`script`] - TOML drawing scripts.
//!
//! # Example
//!
//! ```
//! use ohmline::{Draw, Junction, Place, Symbol, Wire, netlist::Netlist, schematic::Schematic};
//!
//! let mut draw = Draw::new(Schematic::default());
//! draw.add(Symbol::new("R1", "Device:R").value("10k"))?
//!     .add(Wire::new().at_pin("R1", 2).down())?
//!     .add(Junction::new())?
//!     .add(Symbol::new("R2", "Device:R").value("4k7"))?;
//!
//! let netlist = Netlist::from_schematic(draw.backend());
//! assert!(netlist.net_of("R1", "2").unwrap().contains("R2", "1"));
//! # Ok::<(), ohmline::DrawError>(())
//! ```

pub mod backend;
pub mod bom;
pub mod config;
pub mod draw;
pub mod export;
pub mod item;
pub mod netlist;
pub mod resolve;
pub mod schematic;
pub mod script;
pub mod transform;

mod error;

#[cfg(test)]
mod test_support;

pub use ohmline_core::{color, geometry, identifier, style};

pub use draw::{Draw, Feedback};
pub use error::{DrawError, OhmlineError};
pub use item::{Item, Junction, Label, NoConnect, Symbol, Wire};
pub use transform::Place;
