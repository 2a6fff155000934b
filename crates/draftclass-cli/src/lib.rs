//! Command-line front end for `draftclass-formats`
//!
//! Wires the draft class codec to the filesystem and to JSON. All format
//! logic lives in the library crate; this crate only reads and writes files,
//! applies the global flags and reports diagnostics.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{RunOptions, run};
