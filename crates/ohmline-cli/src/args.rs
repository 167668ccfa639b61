//! Command-line argument definitions for the ohmline CLI.
//!
//! Every subcommand reads a TOML drawing script. [`Args::config`] and
//! [`Args::log_level`] apply to all of them.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the ohmline schematic tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a script to SVG
    Plot {
        /// Path to the drawing script
        input: String,

        /// Path to the output SVG file
        #[arg(short, long, default_value = "out.svg")]
        output: String,
    },

    /// Print the nets of a script
    Netlist {
        /// Path to the drawing script
        input: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the bill of materials of a script
    Bom {
        /// Path to the drawing script
        input: String,

        /// One line per distinct part instead of per reference
        #[arg(short, long)]
        group: bool,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Find library symbols by name or description
    Search {
        term: String,

        /// Extra library files to search besides the built-in one
        #[arg(short, long)]
        library: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
