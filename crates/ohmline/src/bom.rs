//! Bill of materials.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    netlist::compare_references,
    schematic::{PlacedSymbol, Schematic},
};

/// Property read for the footprint column.
pub const FOOTPRINT_PROPERTY: &str = "Footprint";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BomLine {
    references: Vec<String>,
    value: String,
    library: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    footprint: Option<String>,
    quantity: usize,
}

impl BomLine {
    fn from_symbol(symbol: &PlacedSymbol) -> Self {
        Self {
            references: vec![symbol.reference().to_string()],
            value: symbol.value().to_string(),
            library: symbol.library().to_string(),
            footprint: symbol.properties().get(FOOTPRINT_PROPERTY).cloned(),
            quantity: 1,
        }
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn footprint(&self) -> Option<&str> {
        self.footprint.as_deref()
    }

    pub fn quantity(&self) -> usize {
        self.quantity
    }
}

/// Parts of a schematic, power symbols excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Bom {
    lines: Vec<BomLine>,
}

impl Bom {
    /// One line per reference, or with `group` one line per distinct
    /// library, value and footprint. A multi-unit part counts once.
    pub fn from_schematic(schematic: &Schematic, group: bool) -> Self {
        let mut parts: IndexMap<&str, &PlacedSymbol> = IndexMap::new();
        for symbol in schematic.symbols().filter(|symbol| !symbol.is_power()) {
            parts.entry(symbol.reference()).or_insert(symbol);
        }
        parts.sort_by(|a, _, b, _| compare_references(a, b));

        if !group {
            let lines = parts.values().map(|symbol| BomLine::from_symbol(symbol)).collect();
            return Self { lines };
        }

        let mut grouped: IndexMap<(&str, &str, Option<&String>), BomLine> = IndexMap::new();
        for symbol in parts.values() {
            let key = (
                symbol.library(),
                symbol.value(),
                symbol.properties().get(FOOTPRINT_PROPERTY),
            );
            grouped
                .entry(key)
                .and_modify(|line| {
                    line.references.push(symbol.reference().to_string());
                    line.quantity += 1;
                })
                .or_insert_with(|| BomLine::from_symbol(symbol));
        }
        Self {
            lines: grouped.into_values().collect(),
        }
    }

    pub fn lines(&self) -> &[BomLine] {
        &self.lines
    }

    /// Total number of parts.
    pub fn quantity(&self) -> usize {
        self.lines.iter().map(BomLine::quantity).sum()
    }
}

impl fmt::Display for Bom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            write!(
                f,
                "{}\t{}\t{}\t{}",
                line.quantity,
                line.references.join(", "),
                line.value,
                line.library
            )?;
            if let Some(footprint) = &line.footprint {
                write!(f, "\t{footprint}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
