//! Subcommand implementations
//!
//! Handlers write their report to the given writer so that they can be
//! driven from tests; logs and diagnostics go through `tracing`.

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use draftclass_formats::{
    DecodeOptions, Diagnostics, DraftClass, HEADER_SIZE, RECORD_SIZE, first_difference,
};
use std::io::Write;
use std::path::Path;

/// Settings shared by all subcommands
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Decoder configuration
    pub decode: DecodeOptions,
    /// Treat any diagnostic as an error
    pub strict: bool,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            decode: cli.decode_options(),
            strict: cli.strict,
        }
    }
}

/// Dispatch the parsed command line
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let options = RunOptions::from(cli);
    match &cli.command {
        Commands::Info { input, list } => info(input, *list, options, out),
        Commands::Export {
            input,
            output,
            pretty,
        } => export(input, output.as_deref(), *pretty, options, out),
        Commands::Import {
            input,
            output,
            refresh_sizes,
        } => import(input, output, *refresh_sizes, options, out),
        Commands::Verify { input } => verify(input, options, out),
    }
}

fn check(diagnostics: Diagnostics, options: RunOptions, path: &Path) -> Result<()> {
    if options.strict {
        diagnostics
            .into_result()
            .with_context(|| format!("strict mode: {}", path.display()))?;
    }
    Ok(())
}

fn load(path: &Path, options: RunOptions) -> Result<(DraftClass, Vec<u8>)> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoded = DraftClass::decode(&data, &options.decode)
        .with_context(|| format!("failed to decode {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        prospects = decoded.value.len(),
        warnings = decoded.diagnostics.len(),
        "loaded draft class"
    );

    check(decoded.diagnostics, options, path)?;
    Ok((decoded.value, data))
}

/// Print the header summary
pub fn info(path: &Path, list: bool, options: RunOptions, out: &mut dyn Write) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoded = DraftClass::decode(&data, &options.decode)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    let class = &decoded.value;
    let header = &class.header;

    writeln!(out, "File:        {}", path.display())?;
    writeln!(out, "File name:   {}", header.file_name)?;
    writeln!(out, "Version:     {}", header.version)?;
    writeln!(out, "Game year:   {}", header.game_year)?;
    writeln!(out, "Prospects:   {}", header.num_prospects)?;
    writeln!(
        out,
        "Data size:   {} bytes (room for {} prospects)",
        header.data_size,
        header.data_size as usize / RECORD_SIZE
    )?;
    writeln!(out, "Total size:  {} bytes", header.total_size)?;
    writeln!(out, "Warnings:    {}", decoded.diagnostics.len())?;
    for diagnostic in &decoded.diagnostics {
        writeln!(out, "  - {diagnostic}")?;
    }

    if list {
        writeln!(out)?;
        for (index, prospect) in class.prospects.iter().enumerate() {
            writeln!(
                out,
                "{:>4}  {:<32} pos {:>2}  ovr {:>2}  rd {} pick {}",
                index,
                prospect.full_name(),
                prospect.position,
                prospect.overall,
                prospect.draft_round,
                prospect.draft_pick
            )?;
        }
    }

    check(decoded.diagnostics, options, path)
}

/// Decode to JSON, writing to `output` or to `out`
pub fn export(
    path: &Path,
    output: Option<&Path>,
    pretty: bool,
    options: RunOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let (class, _) = load(path, options)?;

    let json = if pretty {
        serde_json::to_string_pretty(&class)
    } else {
        serde_json::to_string(&class)
    }
    .context("failed to serialize draft class")?;

    match output {
        Some(target) => {
            std::fs::write(target, json)
                .with_context(|| format!("failed to write {}", target.display()))?;
            tracing::info!(
                path = %target.display(),
                prospects = class.len(),
                "exported draft class"
            );
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

/// Encode a JSON export into a draft class file
pub fn import(
    path: &Path,
    output: &Path,
    refresh_sizes: bool,
    options: RunOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut class: DraftClass = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse JSON from {}", path.display()))?;

    if refresh_sizes {
        class
            .refresh_sizes()
            .context("failed to refresh header sizes")?;
    }

    let encoded = class
        .encode()
        .with_context(|| format!("failed to encode {}", path.display()))?;
    let warnings = encoded.diagnostics.len();
    check(encoded.diagnostics, options, output)?;

    std::fs::write(output, &encoded.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;

    writeln!(
        out,
        "Wrote {} prospects ({} bytes, {} warnings) to {}",
        class.len(),
        encoded.bytes.len(),
        warnings,
        output.display()
    )?;
    Ok(())
}

/// Decode, re-encode and compare with the original bytes
pub fn verify(path: &Path, options: RunOptions, out: &mut dyn Write) -> Result<()> {
    let (class, original) = load(path, options)?;

    let rebuilt = class
        .build()
        .with_context(|| format!("failed to encode {}", path.display()))?;
    if let Some(at) = first_difference(&original, &rebuilt) {
        let region = match at.checked_sub(HEADER_SIZE).map(|rel| rel / RECORD_SIZE) {
            None => "header".to_string(),
            Some(record) if record < class.len() => format!("record {record}"),
            Some(_) => "padding".to_string(),
        };
        bail!(
            "{}: re-encoded file differs at offset {at:#x} ({region}; {} bytes in, {} bytes out)",
            path.display(),
            original.len(),
            rebuilt.len()
        );
    }

    let padding = (class.header.data_size as usize).saturating_sub(class.len() * RECORD_SIZE);
    writeln!(
        out,
        "OK {}: {} prospects, {} bytes, {} bytes of padding after offset {:#x}",
        path.display(),
        class.len(),
        original.len(),
        padding,
        HEADER_SIZE + class.len() * RECORD_SIZE
    )?;
    Ok(())
}
