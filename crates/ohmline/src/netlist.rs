//! Connectivity extracted from a [`Schematic`].
//!
//! Points are merged when they are joined by a wire, when one lies on a
//! wire segment and carries a junction, pin, label or another wire end, when
//! labels share the same text, or when power symbols share a pin name.
//! Coordinates are compared at 0.001 mm resolution.
//!
//! Net names come from the first label on the net, then a power symbol, and
//! otherwise from the first node as `Net-(R1-Pad2)`.

use std::{cmp::Ordering, fmt};

use indexmap::{IndexMap, IndexSet};
use log::debug;
use petgraph::unionfind::UnionFind;
use serde::Serialize;

use ohmline_core::geometry::Point;

use crate::schematic::{Primitive, Schematic, split_reference};

/// A symbol pin on a net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetNode {
    reference: String,
    pin: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pin_name: String,
}

impl NetNode {
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn pin_name(&self) -> &str {
        &self.pin_name
    }
}

impl fmt::Display for NetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.reference, self.pin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Net {
    name: String,
    nodes: Vec<NetNode>,
}

impl Net {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[NetNode] {
        &self.nodes
    }

    pub fn contains(&self, reference: &str, pin: &str) -> bool {
        self.nodes
            .iter()
            .any(|node| node.reference == reference && node.pin == pin)
    }
}

/// All nets with at least one symbol pin, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Netlist {
    nets: Vec<Net>,
}

/// Interned grid positions.
#[derive(Default)]
struct PointIndex {
    keys: IndexSet<(i64, i64)>,
}

impl PointIndex {
    fn insert(&mut self, point: Point) -> usize {
        self.keys.insert_full(point.grid_key()).0
    }

    fn get(&self, point: Point) -> usize {
        // Every point is inserted before connections are made.
        self.keys.get_index_of(&point.grid_key()).unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

enum Tag<'a> {
    Pin(NetNode),
    PowerPin(&'a str),
    Label(&'a str),
}

impl Netlist {
    pub fn from_schematic(schematic: &Schematic) -> Self {
        let mut index = PointIndex::default();
        let mut wires = Vec::new();
        let mut taps = Vec::new();
        let mut tags: Vec<(Point, Tag<'_>)> = Vec::new();

        for primitive in schematic.primitives() {
            match primitive {
                Primitive::Wire { from, to } => {
                    index.insert(*from);
                    index.insert(*to);
                    wires.push((*from, *to));
                    taps.extend([*from, *to]);
                }
                Primitive::Junction(at) => {
                    index.insert(*at);
                    taps.push(*at);
                }
                Primitive::Label { text, at, .. } => {
                    index.insert(*at);
                    taps.push(*at);
                    tags.push((*at, Tag::Label(text)));
                }
                Primitive::Symbol(symbol) => {
                    for pin in symbol.pins() {
                        index.insert(pin.at());
                        taps.push(pin.at());
                        let tag = if symbol.is_power() {
                            Tag::PowerPin(pin.name())
                        } else {
                            Tag::Pin(NetNode {
                                reference: symbol.reference().to_string(),
                                pin: pin.number().to_string(),
                                pin_name: pin.name().to_string(),
                            })
                        };
                        tags.push((pin.at(), tag));
                    }
                }
                Primitive::NoConnect(_) => {}
            }
        }

        let mut sets = UnionFind::<usize>::new(index.len());
        for &(from, to) in &wires {
            let start = index.get(from);
            sets.union(start, index.get(to));
            for &tap in &taps {
                if on_segment(tap, from, to) {
                    sets.union(start, index.get(tap));
                }
            }
        }

        let mut by_label: IndexMap<&str, usize> = IndexMap::new();
        for (at, tag) in &tags {
            let key = match tag {
                Tag::Label(text) | Tag::PowerPin(text) => *text,
                Tag::Pin(_) => continue,
            };
            let point = index.get(*at);
            let first = *by_label.entry(key).or_insert(point);
            sets.union(first, point);
        }

        let mut groups: IndexMap<usize, (Option<String>, Option<String>, Vec<NetNode>)> =
            IndexMap::new();
        for (at, tag) in tags {
            let root = sets.find(index.get(at));
            let (label, power, nodes) = groups.entry(root).or_default();
            match tag {
                Tag::Label(text) => {
                    label.get_or_insert_with(|| text.to_string());
                }
                Tag::PowerPin(name) => {
                    power.get_or_insert_with(|| name.to_string());
                }
                Tag::Pin(node) => nodes.push(node),
            }
        }

        let mut nets: Vec<Net> = groups
            .into_values()
            .filter(|(_, _, nodes)| !nodes.is_empty())
            .map(|(label, power, mut nodes)| {
                nodes.sort_by(compare_nodes);
                nodes.dedup();
                let name = label
                    .or(power)
                    .unwrap_or_else(|| format!("Net-({}-Pad{})", nodes[0].reference, nodes[0].pin));
                Net { name, nodes }
            })
            .collect();
        nets.sort_by(|a, b| compare_names(&a.name, &b.name));

        debug!(nets = nets.len(), wires = wires.len(); "Extracted netlist");
        Self { nets }
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|net| net.name == name)
    }

    /// The net a pin belongs to.
    pub fn net_of(&self, reference: &str, pin: &str) -> Option<&Net> {
        self.nets.iter().find(|net| net.contains(reference, pin))
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for net in &self.nets {
            write!(f, "{}:", net.name)?;
            for node in &net.nodes {
                write!(f, " {node}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Whether `point` lies on the segment `from`..`to`, ends included.
fn on_segment(point: Point, from: Point, to: Point) -> bool {
    const EPS: f64 = 0.0005;
    let segment = to - from;
    let offset = point - from;
    let length = segment.hypot();
    if length < EPS {
        return point.coincides(from);
    }
    let cross = segment.x() * offset.y() - segment.y() * offset.x();
    if (cross / length).abs() > EPS {
        return false;
    }
    let along = (segment.x() * offset.x() + segment.y() * offset.y()) / length;
    (-EPS..=length + EPS).contains(&along)
}

/// `R2` sorts before `R10`; pin numbers compare numerically.
pub(crate) fn compare_references(a: &str, b: &str) -> Ordering {
    match (split_reference(a), split_reference(b)) {
        (Some((pa, na)), Some((pb, nb))) => pa.cmp(pb).then(na.cmp(&nb)),
        _ => a.cmp(b),
    }
}

/// Compares digit runs by value, so `N2` sorts before `N10`.
fn compare_names(mut a: &str, mut b: &str) -> Ordering {
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (da, rest_a) = split_digits(a);
                let (db, rest_b) = split_digits(b);
                let (ta, tb) = (da.trim_start_matches('0'), db.trim_start_matches('0'));
                let order = ta
                    .len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| da.len().cmp(&db.len()));
                if order != Ordering::Equal {
                    return order;
                }
                a = rest_a;
                b = rest_b;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a = &a[x.len_utf8()..];
                b = &b[y.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn compare_nodes(a: &NetNode, b: &NetNode) -> Ordering {
    compare_references(&a.reference, &b.reference).then_with(|| {
        match (a.pin.parse::<u32>(), b.pin.parse::<u32>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.pin.cmp(&b.pin),
        }
    })
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::backend::{Backend, SymbolPlacement};

    fn place(schematic: &mut Schematic, reference: &str, library: &str, at: Point, angle: f64) {
        let properties = IndexMap::new();
        schematic
            .emit_symbol(SymbolPlacement {
                reference,
                value: "",
                library,
                unit: 1,
                at,
                pin: "1",
                angle,
                mirror: None,
                x_override: None,
                y_override: None,
                properties: &properties,
            })
            .unwrap();
    }

    #[test]
    fn test_wire_joins_two_pins() {
        let mut schematic = Schematic::default();
        place(&mut schematic, "R1", "Device:R", Point::new(0.0, 0.0), 0.0);
        place(&mut schematic, "R2", "Device:R", Point::new(10.16, 0.0), 0.0);
        schematic
            .emit_wire(Point::new(0.0, 0.0), Point::new(10.16, 0.0))
            .unwrap();

        let netlist = Netlist::from_schematic(&schematic);
        let net = netlist.net_of("R1", "1").unwrap();
        assert!(net.contains("R2", "1"));
        assert_eq!(net.name(), "Net-(R1-Pad1)");
        // R1-2 and R2-2 are each on their own.
        assert_eq!(netlist.len(), 3);
    }

    #[test]
    fn test_pin_on_wire_interior() {
        let mut schematic = Schematic::default();
        schematic
            .emit_wire(Point::new(0.0, 0.0), Point::new(20.32, 0.0))
            .unwrap();
        place(&mut schematic, "R1", "Device:R", Point::new(10.16, 0.0), 0.0);
        place(&mut schematic, "R2", "Device:R", Point::new(20.32, 0.0), 0.0);

        let netlist = Netlist::from_schematic(&schematic);
        assert!(netlist.net_of("R1", "1").unwrap().contains("R2", "1"));
    }

    #[test]
    fn test_crossing_wires_without_junction_stay_apart() {
        let mut schematic = Schematic::default();
        schematic
            .emit_wire(Point::new(0.0, 5.0), Point::new(10.0, 5.0))
            .unwrap();
        schematic
            .emit_wire(Point::new(5.0, 0.0), Point::new(5.0, 10.0))
            .unwrap();
        place(&mut schematic, "R1", "Device:R", Point::new(0.0, 5.0), 0.0);
        place(&mut schematic, "R2", "Device:R", Point::new(5.0, 0.0), 0.0);

        let netlist = Netlist::from_schematic(&schematic);
        assert!(!netlist.net_of("R1", "1").unwrap().contains("R2", "1"));

        schematic.emit_junction(Point::new(5.0, 5.0)).unwrap();
        let netlist = Netlist::from_schematic(&schematic);
        assert!(netlist.net_of("R1", "1").unwrap().contains("R2", "1"));
    }

    #[test]
    fn test_labels_merge_nets() {
        let mut schematic = Schematic::default();
        place(&mut schematic, "R1", "Device:R", Point::new(0.0, 0.0), 0.0);
        place(&mut schematic, "R2", "Device:R", Point::new(50.0, 0.0), 0.0);
        schematic.emit_label("VOUT", Point::new(0.0, 0.0), 0.0).unwrap();
        schematic.emit_label("VOUT", Point::new(50.0, 0.0), 0.0).unwrap();

        let netlist = Netlist::from_schematic(&schematic);
        let net = netlist.net("VOUT").unwrap();
        let nodes: Vec<String> = net.nodes().iter().map(ToString::to_string).collect();
        assert_eq!(nodes, ["R1-1", "R2-1"]);
    }

    #[test]
    fn test_power_symbols_name_and_merge_nets() {
        let mut schematic = Schematic::default();
        place(&mut schematic, "R1", "Device:R", Point::new(0.0, 0.0), 0.0);
        place(&mut schematic, "R2", "Device:R", Point::new(30.0, 0.0), 0.0);
        place(&mut schematic, "#PWR1", "power:GND", Point::new(0.0, 7.62), 0.0);
        place(&mut schematic, "#PWR2", "power:GND", Point::new(30.0, 7.62), 0.0);

        let netlist = Netlist::from_schematic(&schematic);
        let gnd = netlist.net("GND").unwrap();
        assert!(gnd.contains("R1", "2"));
        assert!(gnd.contains("R2", "2"));
        assert!(netlist.nets().iter().all(|net| !net.contains("#PWR1", "1")));
    }

    #[test]
    fn test_nodes_sorted_naturally() {
        let mut schematic = Schematic::default();
        for (i, reference) in ["R10", "C1", "R2"].iter().enumerate() {
            place(&mut schematic, reference, "Device:R", Point::new(i as f64 * 10.0, 0.0), 0.0);
        }
        schematic
            .emit_wire(Point::new(0.0, 0.0), Point::new(20.0, 0.0))
            .unwrap();

        let netlist = Netlist::from_schematic(&schematic);
        let net = netlist.net_of("R10", "1").unwrap();
        let refs: Vec<&str> = net.nodes().iter().map(NetNode::reference).collect();
        assert_eq!(refs, ["C1", "R2", "R10"]);
        assert_eq!(net.name(), "Net-(C1-Pad1)");
    }

    #[test]
    fn test_nets_sorted_naturally() {
        let mut schematic = Schematic::default();
        let parts = [("R1", "N10"), ("R2", "N2"), ("R3", "N1")];
        for (i, (reference, label)) in parts.iter().enumerate() {
            let at = Point::new(i as f64 * 30.0, 0.0);
            place(&mut schematic, reference, "Device:R", at, 0.0);
            schematic.emit_label(label, at, 0.0).unwrap();
        }

        let netlist = Netlist::from_schematic(&schematic);
        let names: Vec<&str> = netlist.nets().iter().map(Net::name).collect();
        assert_eq!(names[..3], ["N1", "N2", "N10"]);
        assert_eq!(compare_names("Net-(R2-Pad1)", "Net-(R10-Pad1)"), Ordering::Less);
        assert_eq!(compare_names("N02", "N2"), Ordering::Greater);
    }

    #[test]
    fn test_display() {
        let mut schematic = Schematic::default();
        place(&mut schematic, "R1", "Device:R", Point::new(0.0, 0.0), 0.0);
        schematic.emit_label("IN", Point::new(0.0, 0.0), 0.0).unwrap();

        let text = Netlist::from_schematic(&schematic).to_string();
        assert!(text.contains("IN: R1-1\n"));
        assert!(text.contains("Net-(R1-Pad2): R1-2\n"));
    }

    #[test]
    fn test_on_segment() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 10.0);
        assert!(on_segment(Point::new(5.0, 5.0), from, to));
        assert!(on_segment(to, from, to));
        assert!(!on_segment(Point::new(11.0, 11.0), from, to));
        assert!(!on_segment(Point::new(5.0, 5.1), from, to));
    }
}
