//! SVG plot of a schematic.
//!
//! Coordinates stay in millimetres inside the document through the `viewBox`;
//! only the `width` and `height` attributes are multiplied by the style scale.

use std::{fs::File, io::Write, path::Path};

use log::{debug, error, info};
use svg::{
    Document,
    node::element::{Circle, Group, Line, Rectangle, Text},
};

use ohmline_core::{
    apply_stroke,
    geometry::{Bounds, Point},
};

use crate::{
    config::StyleConfig,
    export::{self, Exporter},
    schematic::{PlacedSymbol, Primitive, Schematic},
};

// Half the arm length of a no-connect cross.
const NO_CONNECT_SIZE: f64 = 0.635;

/// A rendered plot and the sheet area it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotResult {
    svg: String,
    bounds: Bounds,
}

impl PlotResult {
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Drawing area in millimetres, padding included.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn into_svg(self) -> String {
        self.svg
    }

    /// Writes the document to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), export::Error> {
        let path = path.as_ref();
        info!(path:? = path; "Creating SVG file");
        let mut file = match File::create(path) {
            Ok(file) => file,
            Err(err) => {
                error!(path:? = path, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = file.write_all(self.svg.as_bytes()) {
            error!(path:? = path, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

/// Renders a [`Schematic`] with a [`StyleConfig`].
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    style: StyleConfig,
}

impl SvgExporter {
    pub fn new(style: &StyleConfig) -> Self {
        Self {
            style: style.clone(),
        }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Renders every primitive in emission order.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] for a schematic with nothing on it.
    pub fn render(&self, schematic: &Schematic) -> Result<PlotResult, export::Error> {
        let bounds = schematic
            .bounds()
            .ok_or_else(|| export::Error::Render("schematic is empty".to_string()))?
            .add_padding(self.style.padding());
        let scale = self.style.scale();

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.width(),
                    bounds.height()
                ),
            )
            .set("width", bounds.width() * scale)
            .set("height", bounds.height() * scale);

        if let Some(color) = self.style.background_color() {
            doc = doc.add(
                Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("fill", &color)
                    .set("fill-opacity", color.alpha()),
            );
        }

        let mut wires = Group::new().set("class", "wires");
        let mut symbols = Group::new().set("class", "symbols");
        let mut marks = Group::new().set("class", "marks");
        for primitive in schematic.primitives() {
            match primitive {
                Primitive::Wire { from, to } => wires = wires.add(self.render_wire(*from, *to)),
                Primitive::Junction(at) => marks = marks.add(self.render_junction(*at)),
                Primitive::NoConnect(at) => marks = marks.add(self.render_no_connect(*at)),
                Primitive::Label { text, at, angle } => {
                    marks = marks.add(self.render_label(text, *at, *angle));
                }
                Primitive::Symbol(symbol) => symbols = symbols.add(self.render_symbol(symbol)),
            }
        }
        doc = doc.add(wires).add(symbols).add(marks);

        debug!(
            primitives = schematic.primitives().len(),
            width = bounds.width(),
            height = bounds.height();
            "SVG document rendered"
        );
        Ok(PlotResult {
            svg: doc.to_string(),
            bounds,
        })
    }

    fn line(from: Point, to: Point) -> Line {
        Line::new()
            .set("x1", from.x())
            .set("y1", from.y())
            .set("x2", to.x())
            .set("y2", to.y())
    }

    fn render_wire(&self, from: Point, to: Point) -> Line {
        apply_stroke!(Self::line(from, to), self.style.wire())
    }

    fn render_junction(&self, at: Point) -> Circle {
        Circle::new()
            .set("cx", at.x())
            .set("cy", at.y())
            .set("r", self.style.junction_radius())
            .set("fill", &self.style.junction_color())
    }

    fn render_no_connect(&self, at: Point) -> Group {
        let d = NO_CONNECT_SIZE;
        let arms = [
            (Point::new(-d, -d), Point::new(d, d)),
            (Point::new(-d, d), Point::new(d, -d)),
        ];
        arms.into_iter().fold(Group::new(), |group, (a, b)| {
            group.add(apply_stroke!(Self::line(at + a, at + b), self.style.wire()))
        })
    }

    fn text(&self, content: &str, at: Point) -> Text {
        Text::new(content)
            .set("x", at.x())
            .set("y", at.y())
            .set("font-family", "monospace")
            .set("font-size", self.style.font_size())
            .set("fill", &self.style.text_color())
    }

    fn render_label(&self, text: &str, at: Point, angle: f64) -> Text {
        let label = self.text(text, at).set("dominant-baseline", "text-after-edge");
        if angle.rem_euclid(360.0) == 0.0 {
            return label;
        }
        // Angles turn counter-clockwise on screen.
        label.set("transform", format!("rotate({} {} {})", -angle, at.x(), at.y()))
    }

    fn render_symbol(&self, symbol: &PlacedSymbol) -> Group {
        let mut group = Group::new()
            .set("class", "symbol")
            .set("data-reference", symbol.reference());

        let body = symbol.body();
        if let Some(body) = body {
            group = group.add(apply_stroke!(
                Rectangle::new()
                    .set("x", body.min_x())
                    .set("y", body.min_y())
                    .set("width", body.width())
                    .set("height", body.height())
                    .set("fill", "none"),
                self.style.symbol()
            ));
        }

        for pin in symbol.pins() {
            let stub_end = match body {
                Some(body) => clamp_to(pin.at(), body),
                None => symbol.origin(),
            };
            if !stub_end.coincides(pin.at()) {
                let stub = Self::line(pin.at(), stub_end);
                group = group.add(apply_stroke!(stub, self.style.symbol()));
            }
        }

        let anchor = body
            .map(|body| Point::new(body.max_x(), body.min_y()))
            .unwrap_or_else(|| symbol.origin());
        let font_size = self.style.font_size();
        let text_at = anchor + Point::new(font_size / 2.0, font_size);
        if symbol.is_power() {
            let name = symbol
                .pins()
                .first()
                .map(|pin| pin.name())
                .filter(|name| !name.is_empty())
                .unwrap_or(symbol.value());
            group = group.add(self.text(name, text_at));
        } else {
            group = group.add(self.text(symbol.reference(), text_at));
            if !symbol.value().is_empty() {
                let value_at = text_at + Point::new(0.0, font_size * 1.2);
                group = group.add(self.text(symbol.value(), value_at));
            }
        }
        group
    }
}

impl Exporter for SvgExporter {
    type Output = PlotResult;

    fn export_schematic(&mut self, schematic: &Schematic) -> Result<PlotResult, export::Error> {
        self.render(schematic)
    }
}

fn clamp_to(point: Point, bounds: Bounds) -> Point {
    Point::new(
        point.x().clamp(bounds.min_x(), bounds.max_x()),
        point.y().clamp(bounds.min_y(), bounds.max_y()),
    )
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use ohmline_core::color::Color;

    use super::*;
    use crate::backend::{Backend, SymbolPlacement};

    fn sample() -> Schematic {
        let properties = IndexMap::new();
        let mut schematic = Schematic::default();
        schematic
            .emit_symbol(SymbolPlacement {
                reference: "R1",
                value: "10k",
                library: "Device:R",
                unit: 1,
                at: Point::new(0.0, 0.0),
                pin: "1",
                angle: 0.0,
                mirror: None,
                x_override: None,
                y_override: None,
                properties: &properties,
            })
            .unwrap();
        schematic
            .emit_wire(Point::new(0.0, 0.0), Point::new(10.16, 0.0))
            .unwrap();
        schematic.emit_junction(Point::new(10.16, 0.0)).unwrap();
        schematic.emit_no_connect(Point::new(0.0, 7.62)).unwrap();
        schematic.emit_label("OUT", Point::new(10.16, 0.0), 90.0).unwrap();
        schematic
    }

    #[test]
    fn test_render_contains_primitives() {
        let plot = SvgExporter::default().render(&sample()).unwrap();
        let svg = plot.svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("data-reference=\"R1\""));
        assert!(svg.contains("10k"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("OUT"));
        assert!(svg.contains("rotate(-90 10.16 0)"));
        assert!(svg.contains("stroke-width=\"0.1524\""));
    }

    #[test]
    fn test_bounds_include_padding() {
        let plot = SvgExporter::default().render(&sample()).unwrap();
        let bounds = plot.bounds();

        // Pin 2 of R1 is the lowest point at y = 7.62.
        let corner = Point::new(bounds.min_x(), bounds.max_y());
        assert!(corner.coincides(Point::new(-1.016 - 2.54, 10.16)));
        assert!(bounds.contains(Point::new(10.16, 0.0)));
    }

    #[test]
    fn test_background() {
        let style = StyleConfig::default().with_background_color(Color::new("white").ok());
        let plot = SvgExporter::new(&style).render(&sample()).unwrap();
        assert!(plot.svg().contains("fill=\"white\""));

        let plain = SvgExporter::default().render(&sample()).unwrap();
        assert!(!plain.svg().contains("fill=\"white\""));
    }

    #[test]
    fn test_empty_schematic() {
        let err = SvgExporter::default()
            .export_schematic(&Schematic::default())
            .unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));
    }
}
