//! A recording backend for unit tests.

use std::collections::HashMap;

use indexmap::IndexMap;

use ohmline_core::geometry::{MirrorAxis, Point};

use crate::{
    backend::{Backend, SymbolPlacement},
    error::DrawError,
};

/// One backend call, in the order received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Wire(Point, Point),
    Junction(Point),
    NoConnect(Point),
    Label(String, Point, f64),
    Symbol {
        reference: String,
        at: Point,
        pin: String,
        angle: f64,
        mirror: Option<MirrorAxis>,
        x_override: Option<f64>,
        y_override: Option<f64>,
        properties: IndexMap<String, String>,
    },
}

#[derive(Debug, Default)]
pub struct RecordingBackend {
    pins: HashMap<(String, String), Point>,
    counters: HashMap<String, u32>,
    pub calls: Vec<Call>,
    pub fail_emits: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pin(mut self, reference: &str, pin: &str, at: Point) -> Self {
        self.pins
            .insert((reference.to_string(), pin.to_string()), at);
        self
    }

    fn record(&mut self, call: Call) -> Result<(), DrawError> {
        if self.fail_emits {
            return Err(DrawError::Backend("emit rejected".to_string()));
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Backend for RecordingBackend {
    fn pin_position(&self, reference: &str, pin: &str) -> Result<Point, DrawError> {
        self.pins
            .get(&(reference.to_string(), pin.to_string()))
            .copied()
            .ok_or_else(|| DrawError::PinNotFound {
                reference: reference.to_string(),
                pin: pin.to_string(),
            })
    }

    fn emit_wire(&mut self, from: Point, to: Point) -> Result<(), DrawError> {
        self.record(Call::Wire(from, to))
    }

    fn emit_junction(&mut self, at: Point) -> Result<(), DrawError> {
        self.record(Call::Junction(at))
    }

    fn emit_no_connect(&mut self, at: Point) -> Result<(), DrawError> {
        self.record(Call::NoConnect(at))
    }

    fn emit_label(&mut self, text: &str, at: Point, angle: f64) -> Result<(), DrawError> {
        self.record(Call::Label(text.to_string(), at, angle))
    }

    fn emit_symbol(&mut self, symbol: SymbolPlacement<'_>) -> Result<(), DrawError> {
        self.record(Call::Symbol {
            reference: symbol.reference.to_string(),
            at: symbol.at,
            pin: symbol.pin.to_string(),
            angle: symbol.angle,
            mirror: symbol.mirror,
            x_override: symbol.x_override,
            y_override: symbol.y_override,
            properties: symbol.properties.clone(),
        })
    }

    fn next_reference(&mut self, key: &str) -> Result<String, DrawError> {
        let counter = self.counters.entry(key.to_string()).or_insert(0);
        *counter = counter
            .checked_add(1)
            .ok_or_else(|| DrawError::CounterExhausted(key.to_string()))?;
        Ok(format!("{key}{counter}"))
    }

    fn set_counter(&mut self, key: &str, next: u32) {
        self.counters
            .insert(key.to_string(), next.saturating_sub(1));
    }

    fn last_reference(&self, key: &str) -> Result<String, DrawError> {
        match self.counters.get(key) {
            Some(n) if *n > 0 => Ok(format!("{key}{n}")),
            _ => Err(DrawError::ReferenceNotFound(key.to_string())),
        }
    }
}
