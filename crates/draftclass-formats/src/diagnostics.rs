//! Non-fatal anomalies collected during decode and encode
//!
//! Diagnostics never abort processing. Each one is logged through `tracing`
//! when it is recorded and handed back to the caller alongside the value, so
//! the caller decides whether a given anomaly is acceptable.

use crate::error::{DraftClassError, Result};
use std::fmt;

/// A recoverable anomaly found while decoding or encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Header total size differs from header size plus data size
    SizeMismatch {
        /// Declared header size
        header_size: u32,
        /// Declared data segment size
        data_size: u32,
        /// Declared total size
        total_size: u32,
    },

    /// Encoded records are longer than the declared data size
    ///
    /// The full record data is still written.
    DataSizeExceeded {
        /// Declared data segment size
        declared: u32,
        /// Bytes of encoded record data
        actual: usize,
    },

    /// Text slot will not re-encode to the bytes it was read from
    ///
    /// Raised for invalid UTF-8 (replaced with U+FFFD) and for non-zero
    /// bytes after the terminator.
    LossyText {
        /// Record index, or `None` for the header
        record: Option<usize>,
        /// Field name
        field: &'static str,
        /// Absolute offset of the slot
        offset: usize,
    },

    /// Visuals sub-block could not be parsed and was kept as raw bytes
    MalformedVisuals {
        /// Record index within the draft class
        record: usize,
        /// Absolute offset of the visuals slot
        offset: usize,
        /// Parser message
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch {
                header_size,
                data_size,
                total_size,
            } => write!(
                f,
                "total size {total_size} does not match header size {header_size} + data size {data_size}"
            ),
            Self::DataSizeExceeded { declared, actual } => write!(
                f,
                "record data is {actual} bytes, larger than declared data size {declared}"
            ),
            Self::LossyText {
                record: Some(record),
                field,
                offset,
            } => write!(
                f,
                "record {record} {field} at offset {offset:#x} is not clean text and will change on re-encode"
            ),
            Self::LossyText {
                record: None,
                field,
                offset,
            } => write!(
                f,
                "header {field} at offset {offset:#x} is not clean text and will change on re-encode"
            ),
            Self::MalformedVisuals {
                record,
                offset,
                reason,
            } => write!(
                f,
                "record {record} visuals at offset {offset:#x} kept as raw bytes: {reason}"
            ),
        }
    }
}

/// Ordered list of diagnostics from one decode or encode call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of recorded diagnostics
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over recorded diagnostics in order
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Escalate: fail if anything was recorded
    pub fn into_result(self) -> Result<()> {
        match self.items.first() {
            None => Ok(()),
            Some(first) => Err(DraftClassError::Diagnostics {
                count: self.items.len(),
                first: first.to_string(),
            }),
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A decoded value together with the diagnostics raised while decoding it
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Decoded value
    pub value: T,
    /// Anomalies found along the way
    pub diagnostics: Diagnostics,
}

impl<T> Decoded<T> {
    /// Return the value, failing if any diagnostic was raised
    pub fn into_strict(self) -> Result<T> {
        self.diagnostics.into_result()?;
        Ok(self.value)
    }
}

/// Encoded bytes together with the diagnostics raised while encoding them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    /// Complete output buffer
    pub bytes: Vec<u8>,
    /// Anomalies found along the way
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diagnostics_pass() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(diagnostics.into_result().is_ok());
    }

    #[test]
    fn test_escalation_reports_first() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::DataSizeExceeded {
            declared: 10,
            actual: 20,
        });
        diagnostics.push(Diagnostic::SizeMismatch {
            header_size: 70,
            data_size: 4322,
            total_size: 1,
        });
        assert_eq!(diagnostics.len(), 2);

        let err = diagnostics.into_result().unwrap_err();
        match err {
            DraftClassError::Diagnostics { count, first } => {
                assert_eq!(count, 2);
                assert!(first.contains("declared data size 10"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decoded_into_strict() {
        let clean = Decoded {
            value: 7u32,
            diagnostics: Diagnostics::new(),
        };
        assert_eq!(clean.into_strict().unwrap(), 7);

        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::MalformedVisuals {
            record: 3,
            offset: 0x46,
            reason: "EOF while parsing".to_string(),
        });
        let noisy = Decoded {
            value: 7u32,
            diagnostics,
        };
        assert!(noisy.into_strict().is_err());
    }
}
