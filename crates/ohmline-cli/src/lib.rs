//! CLI logic for the ohmline schematic tool.
//!
//! Every subcommand except `search` builds the schematic from a drawing
//! script first, then plots it, prints its nets or prints its parts list.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, OutputFormat};

use std::{fs, io::Write};

use log::info;
use serde::Serialize;

use ohmline::{
    OhmlineError,
    bom::Bom,
    export::{Exporter, svg::SvgExporter},
    netlist::Netlist,
    schematic::SymbolLibrary,
    script,
};

/// Run the ohmline CLI application
///
/// # Errors
///
/// Returns `OhmlineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Script parse errors
/// - Placement errors
/// - Export errors
pub fn run(args: &Args) -> Result<(), OhmlineError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Plot { input, output } => {
            info!(input_path = input, output_path = output; "Plotting schematic");
            let schematic = script::build_file(input, app_config.draw())?;
            let plot = SvgExporter::new(app_config.style()).export_schematic(&schematic)?;
            plot.write_to(output)?;
            info!(output_file = output; "SVG exported successfully");
        }
        Command::Netlist {
            input,
            format,
            output,
        } => {
            info!(input_path = input; "Extracting netlist");
            let schematic = script::build_file(input, app_config.draw())?;
            let netlist = Netlist::from_schematic(&schematic);
            info!(nets = netlist.len(); "Netlist extracted");
            let text = match format {
                OutputFormat::Text => netlist.to_string(),
                OutputFormat::Json => to_json(&netlist)?,
            };
            write_output(output.as_deref(), &text)?;
        }
        Command::Bom {
            input,
            group,
            format,
            output,
        } => {
            info!(input_path = input, group = *group; "Building bill of materials");
            let schematic = script::build_file(input, app_config.draw())?;
            let bom = Bom::from_schematic(&schematic, *group);
            info!(lines = bom.lines().len(), parts = bom.quantity(); "Bill of materials built");
            let text = match format {
                OutputFormat::Text => bom.to_string(),
                OutputFormat::Json => to_json(&bom)?,
            };
            write_output(output.as_deref(), &text)?;
        }
        Command::Search { term, library } => {
            let mut symbols = SymbolLibrary::builtin();
            for path in library {
                symbols.load(path)?;
            }
            let found = symbols.search(term);
            info!(term = term, matches = found.len(); "Searched symbol library");
            let text: String = found
                .iter()
                .map(|symbol| format!("{}\t{}\n", symbol.name(), symbol.description()))
                .collect();
            write_output(None, &text)?;
        }
    }

    Ok(())
}

fn to_json(value: &impl Serialize) -> Result<String, OhmlineError> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|err| OhmlineError::Export(Box::new(err)))?;
    json.push('\n');
    Ok(json)
}

/// Writes to `path`, or to stdout when no path is given.
fn write_output(path: Option<&str>, text: &str) -> Result<(), OhmlineError> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            info!(output_file = path; "Output written");
        }
        None => std::io::stdout().lock().write_all(text.as_bytes())?,
    }
    Ok(())
}
