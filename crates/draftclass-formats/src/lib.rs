//! Parser and builder for `FBCHUNKS` draft class files
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // Field names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! Draft class files carry a franchise-mode class of incoming players for
//! the Madden-25 edition: a 70-byte header followed by a data segment of
//! fixed 4322-byte prospect records, zero-padded to the declared size.
//!
//! # Layers
//!
//! - **[`cursor`]**: offset-tracking little-endian reader and writer
//! - **[`header`]**: the `FBCHUNKS` header and edition check
//! - **[`record`]**: prospect records, the field layout table and the
//!   embedded visuals document
//! - **[`file`]**: whole-file assembly and the prospect count invariant
//!
//! # Example
//!
//! ```rust,no_run
//! use draftclass_formats::{DecodeOptions, DraftClass};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("CAREERDRAFT-Madden-25")?;
//! let decoded = DraftClass::decode(&data, &DecodeOptions::default())?;
//! for warning in &decoded.diagnostics {
//!     eprintln!("warning: {warning}");
//! }
//!
//! let mut class = decoded.value;
//! class.prospects[0].first_name = "John".to_string();
//! std::fs::write("CAREERDRAFT-Madden-25.out", class.build()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! Any file this crate writes decodes back to an equal value. A file that
//! decodes without diagnostics re-encodes byte for byte, provided its
//! visuals documents are stored as compact JSON.

#![warn(missing_docs)]

/// Builder for new draft classes
pub mod builder;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod file;
pub mod header;
pub mod record;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
pub(crate) mod test_utils;

pub use builder::DraftClassBuilder;
pub use diagnostics::{Decoded, Diagnostic, Diagnostics, Encoded};
pub use error::{DraftClassError, Result};
pub use file::{DecodeOptions, DraftClass};
pub use header::{EDITION_MARKER, FileHeader, HEADER_SIZE, MAGIC};
pub use record::{
    FieldKind, FieldValue, PROSPECT_FIELDS, ProspectRecord, RECORD_SIZE, Visuals, VisualsPolicy,
};

/// Common format trait for types with a binary file representation
pub trait BinaryFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if let Some(at) = first_difference(data, &rebuilt) {
            return Err(format!(
                "Round-trip verification failed: first difference at offset {:#x} ({} bytes in, {} bytes out)",
                at,
                data.len(),
                rebuilt.len()
            )
            .into());
        }
        Ok(())
    }
}

/// Offset of the first byte where `a` and `b` differ
///
/// When one buffer is a prefix of the other, this is the shorter length.
pub fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

impl BinaryFormat for FileHeader {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let mut reader = cursor::ByteReader::new(data);
        Ok(FileHeader::decode(&mut reader, &mut Diagnostics::new())?)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.encode()?)
    }
}

impl BinaryFormat for ProspectRecord {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(ProspectRecord::parse(data)?)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.encode()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference(b"abc", b"abc"), None);
        assert_eq!(first_difference(b"abc", b"abd"), Some(2));
        assert_eq!(first_difference(b"abc", b"ab"), Some(2));
        assert_eq!(first_difference(b"", b"x"), Some(0));
    }
}
