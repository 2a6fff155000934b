//! Error types for draft class parsing and building

use thiserror::Error;

/// Errors that can occur when parsing or building draft class files
///
/// Every variant is fatal: the decode or encode call that produced it returns
/// no value. Non-fatal anomalies are reported as
/// [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum DraftClassError {
    /// Leading 8 bytes are not the `FBCHUNKS` tag
    #[error("Invalid magic: expected 'FBCHUNKS', got {found:?}")]
    InvalidMagic {
        /// Bytes found at offset 0
        found: [u8; 8],
    },

    /// Header file name lacks the supported edition marker
    #[error("Unsupported edition: file name '{file_name}' does not contain '{marker}'")]
    UnsupportedEdition {
        /// Decoded file name
        file_name: String,
        /// Required marker substring
        marker: &'static str,
    },

    /// Buffer ended before a read could complete
    #[error(
        "Truncated input reading {field} at offset {offset:#x}: needed {needed} bytes, {available} available"
    )]
    TruncatedInput {
        /// Field being read
        field: &'static str,
        /// Cursor offset at the start of the read
        offset: usize,
        /// Bytes required by the read
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// String does not fit in its fixed-width slot
    #[error("Field {field} too long: {len} bytes, slot holds {max}")]
    FieldTooLong {
        /// Field being written
        field: &'static str,
        /// Encoded byte length of the value
        len: usize,
        /// Slot width
        max: usize,
    },

    /// String holds a NUL, which the slot format reads as its terminator
    #[error("Field {field} contains a NUL byte at position {position}")]
    EmbeddedNul {
        /// Field being written
        field: &'static str,
        /// Byte index of the first NUL
        position: usize,
    },

    /// Declared record count does not fit in the declared data segment
    #[error(
        "Record count overflow: {num_prospects} records of {record_size} bytes exceed data size {data_size}"
    )]
    RecordCountOverflow {
        /// Record count from the header
        num_prospects: u32,
        /// Fixed record width
        record_size: usize,
        /// Data segment size from the header
        data_size: u32,
    },

    /// Encoded record is not exactly one record wide
    ///
    /// Indicates a field-width bug in the schema table, not bad input.
    #[error("Record {index} encoded to {actual} bytes, expected {expected}")]
    RecordSizeMismatch {
        /// Record index within the draft class
        index: usize,
        /// Fixed record width
        expected: usize,
        /// Bytes actually written
        actual: usize,
    },

    /// Visuals sub-block is not valid structured text
    #[error("Malformed visuals block in record {record} at offset {offset:#x}: {reason}")]
    MalformedVisualsBlock {
        /// Record index within the draft class
        record: usize,
        /// Absolute offset of the visuals slot
        offset: usize,
        /// Parser message
        reason: String,
    },

    /// Value cannot be represented by the field's storage
    #[error("Value {value} out of range for field {field}")]
    ValueOutOfRange {
        /// Field being written
        field: &'static str,
        /// Rejected value
        value: u64,
    },

    /// Field name is not part of the prospect layout
    #[error("Unknown prospect field: {0}")]
    UnknownField(String),

    /// Value kind does not match the field's declared kind
    #[error("Field {field} holds {expected} values, got {actual}")]
    FieldKindMismatch {
        /// Field being assigned
        field: &'static str,
        /// Declared kind
        expected: &'static str,
        /// Kind of the supplied value
        actual: &'static str,
    },

    /// Diagnostics escalated to an error by the caller
    #[error("{count} diagnostic(s) reported, first: {first}")]
    Diagnostics {
        /// Number of diagnostics collected
        count: usize,
        /// Rendering of the first diagnostic
        first: String,
    },

    /// Non-IO error from the binrw primitives
    #[error("Binary codec error: {0}")]
    BinRead(String),

    /// Structured text error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error during parsing or building
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for draft class operations
pub type Result<T> = std::result::Result<T, DraftClassError>;
