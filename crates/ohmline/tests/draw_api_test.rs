//! Integration tests for the Draw API
//!
//! The first half drives the cursor against a minimal backend and checks the
//! exact calls it receives. The second half builds small circuits on the
//! reference schematic backend.

use std::collections::HashMap;

use float_cmp::approx_eq;

use ohmline::{
    Draw, DrawError, Feedback, Junction, Label, Place, Symbol, Wire,
    backend::{Backend, SymbolPlacement},
    bom::Bom,
    export::{Exporter, svg::SvgExporter},
    geometry::{Direction, Point},
    netlist::Netlist,
    schematic::Schematic,
    transform::{Anchor, AxisTarget},
};

#[derive(Debug, PartialEq)]
enum Emitted {
    Wire(Point, Point),
    Junction(Point),
    Label(String, Point),
    Symbol(String, Point),
}

#[derive(Default)]
struct PinBackend {
    pins: HashMap<(String, String), Point>,
    emitted: Vec<Emitted>,
}

impl PinBackend {
    fn with_pin(mut self, reference: &str, pin: &str, at: Point) -> Self {
        self.pins.insert((reference.to_string(), pin.to_string()), at);
        self
    }
}

impl Backend for PinBackend {
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
        self.emitted.push(Emitted::Wire(from, to));
        Ok(())
    }

    fn emit_junction(&mut self, at: Point) -> Result<(), DrawError> {
        self.emitted.push(Emitted::Junction(at));
        Ok(())
    }

    fn emit_no_connect(&mut self, _at: Point) -> Result<(), DrawError> {
        Ok(())
    }

    fn emit_label(&mut self, text: &str, at: Point, _angle: f64) -> Result<(), DrawError> {
        self.emitted.push(Emitted::Label(text.to_string(), at));
        Ok(())
    }

    fn emit_symbol(&mut self, placement: SymbolPlacement<'_>) -> Result<(), DrawError> {
        self.emitted
            .push(Emitted::Symbol(placement.reference.to_string(), placement.at));
        Ok(())
    }

    fn next_reference(&mut self, key: &str) -> Result<String, DrawError> {
        Ok(format!("{key}?"))
    }

    fn set_counter(&mut self, _key: &str, _next: u32) {}

    fn last_reference(&self, key: &str) -> Result<String, DrawError> {
        Err(DrawError::ReferenceNotFound(key.to_string()))
    }
}

#[test]
fn test_wire_right_one_unit() {
    let mut draw = Draw::new(PinBackend::default());
    draw.set_position((0.0, 0.0));
    draw.add(Wire::new().right().length(2.54)).unwrap();

    assert_eq!(draw.position(), Point::new(2.54, 0.0));
    assert_eq!(
        draw.backend().emitted,
        [Emitted::Wire(Point::new(0.0, 0.0), Point::new(2.54, 0.0))]
    );
}

#[test]
fn test_junction_at_cursor() {
    let mut draw = Draw::new(PinBackend::default());
    draw.set_position((10.0, 10.0));
    draw.add(Junction::new()).unwrap();

    assert_eq!(draw.backend().emitted, [Emitted::Junction(Point::new(10.0, 10.0))]);
    let frozen = draw.last_junction().unwrap();
    assert_eq!(frozen.point(), Point::new(10.0, 10.0));
}

#[test]
fn test_wire_from_pin_down() {
    let backend = PinBackend::default().with_pin("R1", "2", Point::new(5.0, 5.0));
    let mut draw = Draw::new(backend);
    draw.set_position((40.0, -3.0));
    draw.add(Wire::new().at_pin("R1", 2).down().length(2.54))
        .unwrap();

    let [Emitted::Wire(from, to)] = draw.backend().emitted.as_slice() else {
        panic!("expected one wire, got {:?}", draw.backend().emitted);
    };
    assert_eq!(*from, Point::new(5.0, 5.0));
    assert!(to.coincides(Point::new(5.0, 7.54)));
    assert!(approx_eq!(f64, draw.position().y(), 7.54));
    assert_eq!(draw.position().x(), 5.0);
}

#[test]
fn test_wire_from_junction_with_defaults() {
    let mut draw = Draw::new(PinBackend::default());
    draw.add(Junction::new().at((8.0, 3.0)).named("j")).unwrap();
    draw.set_position((3.0, 3.0));
    draw.add(Wire::new().at_junction("j")).unwrap();

    assert!(draw.position().coincides(Point::new(10.54, 3.0)));
    let Emitted::Wire(from, _) = &draw.backend().emitted[1] else {
        panic!("expected a wire, got {:?}", draw.backend().emitted[1]);
    };
    assert_eq!(*from, Point::new(8.0, 3.0));
}

#[test]
fn test_stack_does_not_move_cursor() {
    let mut draw = Draw::new(PinBackend::default());
    draw.set_position((1.0, 2.0));
    draw.push();
    draw.add(Wire::new().up()).unwrap();

    assert_eq!(draw.peek().unwrap(), Point::new(1.0, 2.0));
    assert_eq!(draw.peek().unwrap(), Point::new(1.0, 2.0));
    assert_eq!(draw.pop().unwrap(), Point::new(1.0, 2.0));
    assert_eq!(draw.position(), Point::new(1.0, 2.0 - 2.54));
    assert_eq!(draw.pop(), Err(DrawError::EmptyStack));
}

#[test]
fn test_ambiguous_override_commits_nothing() {
    let backend = PinBackend::default().with_pin("U1", "3", Point::new(1.0, 1.0));
    let mut draw = Draw::new(backend);
    let result = draw.add(Label::new("X").at_pin("U1", 3).at((9.0, 9.0)));

    assert!(matches!(result, Err(DrawError::AmbiguousOverride)));
    assert!(draw.backend().emitted.is_empty());
    assert_eq!(draw.position(), Point::default());
}

#[test]
fn test_custom_backend_sees_symbol_origin() {
    let mut draw = Draw::new(PinBackend::default());
    draw.set_position((4.0, 4.0));
    draw.add(Symbol::new("C1", "Device:C").down()).unwrap();

    assert_eq!(
        draw.backend().emitted,
        [Emitted::Symbol("C1".to_string(), Point::new(4.0, 4.0))]
    );
}

/// Inverting amplifier around unit 1 of an LM358.
fn inverting_amplifier() -> Result<Schematic, DrawError> {
    let mut draw = Draw::new(Schematic::default());
    draw.set_position((0.0, 0.0));

    let input = draw.next_reference("R")?;
    let feedback = draw.next_reference("R")?;
    draw.add(Label::new("VIN"))?
        .add(Wire::new().right())?
        .add(
            Symbol::new(input.as_str(), "Device:R")
                .value("10k")
                .rotate(90.0)
                .property("Footprint", "R_0603"),
        )?
        .add(
            Symbol::new("U1", "Amplifier_Operational:LM358")
                .value("LM358")
                .anchor_pin(2)
                .at_pin(input.as_str(), 2),
        )?
        .add(
            Symbol::new("#PWR1", "power:GND")
                .value("GND")
                .at_pin("U1", 3),
        )?;

    draw.add(Wire::new().at_pin("U1", 1).right())?
        .add(Label::new("VOUT"))?;

    // Feedback resistor below the op-amp, closed back to the output.
    draw.add(
        Symbol::new(feedback.as_str(), "Device:R")
            .value("100k")
            .rotate(90.0)
            .property("Footprint", "R_0603")
            .at((10.16, 10.16)),
    )?
    .add(
        Wire::new()
            .at_pin("U1", 2)
            .toy(AxisTarget::pin(feedback.as_str(), 1)),
    )?;
    draw.feedback(
        &Feedback::new(Anchor::pin(feedback.as_str(), 2), Anchor::pin("U1", 1))?
            .direction(Direction::Down)
            .height(2.54),
    )?;
    Ok(draw.into_backend())
}

#[test]
fn test_inverting_amplifier_netlist() {
    let schematic = inverting_amplifier().unwrap();
    let netlist = Netlist::from_schematic(&schematic);

    let vin = netlist.net("VIN").unwrap();
    assert!(vin.contains("R1", "1"));

    let inverting_input = netlist.net_of("U1", "2").unwrap();
    assert!(inverting_input.contains("R1", "2"));
    assert!(inverting_input.contains("R2", "1"));
    assert!(!inverting_input.contains("U1", "3"));

    let gnd = netlist.net("GND").unwrap();
    assert!(gnd.contains("U1", "3"));
    let vout = netlist.net("VOUT").unwrap();
    assert!(vout.contains("U1", "1"));
    assert!(vout.contains("R2", "2"));
}

#[test]
fn test_inverting_amplifier_bom_and_plot() {
    let schematic = inverting_amplifier().unwrap();

    let bom = Bom::from_schematic(&schematic, true);
    assert_eq!(bom.quantity(), 3);
    assert_eq!(bom.lines().len(), 3);

    let plot = SvgExporter::default().export_schematic(&schematic).unwrap();
    assert!(plot.svg().contains("</svg>"));
    assert!(plot.bounds().width() > 0.0);
}

#[test]
fn test_unknown_part_is_reported() {
    let mut draw = Draw::new(Schematic::default());
    let err = draw.add(Symbol::new("X1", "Device:Flux")).unwrap_err();

    assert_eq!(err, DrawError::SymbolNotFound("Device:Flux".to_string()));
    assert!(draw.backend().primitives().is_empty());
}
