//! Command-line arguments
//!
//! Global flags can also be set through the environment:
//! - `DRAFTCLASS_LENIENT_VISUALS=true` keeps unparsable visuals blocks as raw
//!   bytes instead of failing
//! - `DRAFTCLASS_STRICT=true` turns every diagnostic into an error
//!
//! Log output goes to stderr and honours `RUST_LOG`; `-v`/`-q` only change
//! the default level used when `RUST_LOG` is unset.

use clap::{ArgAction, Parser, Subcommand};
use draftclass_formats::{DecodeOptions, VisualsPolicy};
use std::path::PathBuf;

/// Draft class file tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "draftclass",
    about = "Inspect, export and import FBCHUNKS draft class files",
    version,
    long_about = "Reads and writes Madden-25 draft class files. Files can be exported to JSON, edited, and imported back; untouched prospects are written back byte for byte."
)]
pub struct Cli {
    /// Keep visuals blocks that are not valid JSON as raw bytes
    #[arg(long, global = true, env = "DRAFTCLASS_LENIENT_VISUALS")]
    pub lenient_visuals: bool,

    /// Fail on any diagnostic instead of printing a warning
    #[arg(long, global = true, env = "DRAFTCLASS_STRICT")]
    pub strict: bool,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the header summary and any diagnostics
    Info {
        /// Draft class file
        input: PathBuf,

        /// Also list every prospect
        #[arg(short, long)]
        list: bool,
    },

    /// Decode a draft class file to JSON
    Export {
        /// Draft class file
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Encode a JSON export back into a draft class file
    Import {
        /// JSON file produced by `export`
        input: PathBuf,

        /// Draft class file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Grow the declared data size to fit the prospects
        #[arg(long)]
        refresh_sizes: bool,
    },

    /// Check that decoding and re-encoding reproduces the file exactly
    Verify {
        /// Draft class file
        input: PathBuf,
    },
}

impl Cli {
    /// Decode options selected by the global flags
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            visuals: if self.lenient_visuals {
                VisualsPolicy::Lenient
            } else {
                VisualsPolicy::Strict
            },
        }
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
