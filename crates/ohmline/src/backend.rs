//! The interface between the placement engine and whatever records the
//! schematic.
//!
//! The engine never inspects a backend's state. It asks for pin positions,
//! hands over fully resolved primitives and forwards reference numbering.
//! [`Schematic`](crate::schematic::Schematic) is the in-memory
//! implementation used by the command line.

use indexmap::IndexMap;

use ohmline_core::geometry::{MirrorAxis, Point};

use crate::error::DrawError;

/// A symbol placement with every position already resolved.
#[derive(Debug, Clone, Copy)]
pub struct SymbolPlacement<'a> {
    pub reference: &'a str,
    pub value: &'a str,
    pub library: &'a str,
    pub unit: u32,
    /// Where `pin` must end up.
    pub at: Point,
    pub pin: &'a str,
    pub angle: f64,
    pub mirror: Option<MirrorAxis>,
    /// Resolved `tox` target; a two-pin part spans from `at` to this x.
    pub x_override: Option<f64>,
    /// Resolved `toy` target; a two-pin part spans from `at` to this y.
    pub y_override: Option<f64>,
    pub properties: &'a IndexMap<String, String>,
}

/// Capabilities a schematic backend provides to [`Draw`](crate::Draw).
///
/// Errors from any method are returned to the caller of `add` unchanged.
pub trait Backend {
    /// Absolute position of `pin` on the placed symbol `reference`.
    ///
    /// # Errors
    ///
    /// [`DrawError::PinNotFound`] if the symbol or pin is unknown.
    fn pin_position(&self, reference: &str, pin: &str) -> Result<Point, DrawError>;

    fn emit_wire(&mut self, from: Point, to: Point) -> Result<(), DrawError>;

    fn emit_junction(&mut self, at: Point) -> Result<(), DrawError>;

    fn emit_no_connect(&mut self, at: Point) -> Result<(), DrawError>;

    fn emit_label(&mut self, text: &str, at: Point, angle: f64) -> Result<(), DrawError>;

    fn emit_symbol(&mut self, symbol: SymbolPlacement<'_>) -> Result<(), DrawError>;

    /// Issues the next reference for a prefix, for example `"R"` gives `"R1"`, `"R2"`, ...
    ///
    /// # Errors
    ///
    /// [`DrawError::CounterExhausted`] when the prefix ran out of numbers.
    fn next_reference(&mut self, key: &str) -> Result<String, DrawError>;

    /// Makes the next reference issued for `key` use number `next`.
    fn set_counter(&mut self, key: &str, next: u32);

    /// The most recent reference issued for `key`.
    ///
    /// # Errors
    ///
    /// [`DrawError::ReferenceNotFound`] if none was issued yet.
    fn last_reference(&self, key: &str) -> Result<String, DrawError>;
}
