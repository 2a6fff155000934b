//! Byte cursors with offset tracking and little-endian primitives
//!
//! [`ByteReader`] and [`ByteWriter`] know nothing about the header or record
//! layout. Both codecs drive them field by field, passing the field name so
//! that failures carry the offset and name of the read that broke.

use crate::error::{DraftClassError, Result};
use binrw::io::Cursor;
use binrw::{BinReaderExt, BinWriterExt};
use std::io::Write;

/// Sequential reader over an immutable byte slice
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    inner: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at offset 0
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
        }
    }

    /// Current offset from the start of the slice
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Bytes left before the end of the slice
    pub fn remaining(&self) -> usize {
        self.inner.get_ref().len().saturating_sub(self.position())
    }

    fn ensure(&self, field: &'static str, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(DraftClassError::TruncatedInput {
                field,
                offset: self.position(),
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Read the next `n` bytes as a borrowed slice
    pub fn read_bytes(&mut self, field: &'static str, n: usize) -> Result<&'a [u8]> {
        self.ensure(field, n)?;
        let data: &'a [u8] = *self.inner.get_ref();
        let start = self.position();
        let end = start + n;
        self.inner.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Read one byte
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.ensure(field, 1)?;
        Ok(self.inner.read_le::<u8>()?)
    }

    /// Read a little-endian u16
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        self.ensure(field, 2)?;
        Ok(self.inner.read_le::<u16>()?)
    }

    /// Read a little-endian u32
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        self.ensure(field, 4)?;
        Ok(self.inner.read_le::<u32>()?)
    }

    /// Read an `n`-byte null-padded string
    ///
    /// Text ends at the first NUL, or spans all `n` bytes if there is none.
    /// The cursor always advances by `n`.
    pub fn read_fixed_string(&mut self, field: &'static str, n: usize) -> Result<String> {
        Ok(self.read_fixed_slot(field, n)?.text)
    }

    /// Read an `n`-byte null-padded string and report whether it is exact
    ///
    /// Invalid UTF-8 is replaced with U+FFFD. The slot is not exact when that
    /// happened or when non-zero bytes follow the terminator; writing the
    /// text back would then change the slot.
    pub fn read_fixed_slot(&mut self, field: &'static str, n: usize) -> Result<FixedString> {
        let bytes = self.read_bytes(field, n)?;
        let text = until_nul(bytes);
        let padding_clean = bytes[text.len()..].iter().all(|&b| b == 0);

        Ok(match std::str::from_utf8(text) {
            Ok(valid) => FixedString {
                text: valid.to_owned(),
                exact: padding_clean,
            },
            Err(_) => FixedString {
                text: String::from_utf8_lossy(text).into_owned(),
                exact: false,
            },
        })
    }

    /// Split off the next `n` bytes as an independent reader
    ///
    /// Offsets reported by the sub-reader are relative to its own start.
    pub fn sub_reader(&mut self, field: &'static str, n: usize) -> Result<ByteReader<'a>> {
        Ok(ByteReader::new(self.read_bytes(field, n)?))
    }
}

/// Text read from a fixed-width slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedString {
    /// Decoded text up to the first NUL
    pub text: String,
    /// Whether writing `text` back reproduces the slot bytes
    pub exact: bool,
}

/// Leading bytes of `bytes` up to (excluding) the first NUL
pub(crate) fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

/// Sequential writer into a growable buffer
#[derive(Debug, Default)]
pub struct ByteWriter {
    inner: Cursor<Vec<u8>>,
}

impl ByteWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Cursor::new(Vec::with_capacity(capacity)),
        }
    }

    /// Current offset, equal to the number of bytes written
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Append `n` zero bytes
    pub fn write_zeros(&mut self, n: usize) -> Result<()> {
        self.write_bytes(&vec![0u8; n])
    }

    /// Append one byte
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_le(&value)?;
        Ok(())
    }

    /// Append a little-endian u16
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.inner.write_le(&value)?;
        Ok(())
    }

    /// Append a little-endian u32
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_le(&value)?;
        Ok(())
    }

    /// Append `value` left-aligned in a zero-filled `n`-byte slot
    ///
    /// Fails with [`DraftClassError::FieldTooLong`] instead of truncating,
    /// and with [`DraftClassError::EmbeddedNul`] if `value` contains a NUL,
    /// since the text would read back cut short.
    pub fn write_fixed_string(&mut self, field: &'static str, value: &str, n: usize) -> Result<()> {
        if let Some(position) = value.bytes().position(|b| b == 0) {
            return Err(DraftClassError::EmbeddedNul { field, position });
        }
        self.write_fixed_bytes(field, value.as_bytes(), n)
    }

    /// Append raw bytes left-aligned in a zero-filled `n`-byte slot
    pub fn write_fixed_bytes(&mut self, field: &'static str, bytes: &[u8], n: usize) -> Result<()> {
        if bytes.len() > n {
            return Err(DraftClassError::FieldTooLong {
                field,
                len: bytes.len(),
                max: n,
            });
        }
        self.write_bytes(bytes)?;
        self.write_zeros(n - bytes.len())
    }

    /// Consume the writer and return the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl From<binrw::Error> for DraftClassError {
    fn from(e: binrw::Error) -> Self {
        match e {
            binrw::Error::Io(io) => Self::Io(io),
            other => Self::BinRead(other.to_string()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_integers_little_endian() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u8("a").unwrap(), 0x01);
        assert_eq!(reader.read_u16("b").unwrap(), 0x1234);
        assert_eq!(reader.read_u32("c").unwrap(), 0x1234_5678);
        assert_eq!(reader.position(), 7);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_is_truncated_input() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut reader = ByteReader::new(&data);
        reader.read_u16("first").unwrap();

        let err = reader.read_u32("second").unwrap_err();
        assert!(matches!(
            err,
            DraftClassError::TruncatedInput {
                field: "second",
                offset: 2,
                needed: 4,
                available: 1,
            }
        ));
        // Failed read leaves the cursor where it was
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_fixed_string_stops_at_nul_but_advances_full_width() {
        let data = b"Caleb\0\0\0junk\0\0\0\0\0\x07";
        let mut reader = ByteReader::new(data);

        assert_eq!(reader.read_fixed_string("first_name", 17).unwrap(), "Caleb");
        assert_eq!(reader.position(), 17);
        assert_eq!(reader.read_u8("next").unwrap(), 0x07);
    }

    #[test]
    fn test_fixed_slot_flags_data_after_terminator() {
        let data = b"Caleb\0\0\0junk\0\0\0\0\0";
        let slot = ByteReader::new(data).read_fixed_slot("first_name", 17).unwrap();
        assert_eq!(slot.text, "Caleb");
        assert!(!slot.exact);

        let slot = ByteReader::new(b"Caleb\0\0\0").read_fixed_slot("first_name", 8).unwrap();
        assert!(slot.exact);
    }

    #[test]
    fn test_fixed_slot_flags_invalid_utf8() {
        let data = b"S\xE3o Paulo\0\0\0\0\0";
        let mut reader = ByteReader::new(data);
        let slot = reader.read_fixed_slot("home_town", 14).unwrap();

        assert_eq!(slot.text, "S\u{FFFD}o Paulo");
        assert!(!slot.exact);
        assert_eq!(reader.position(), 14);
    }

    #[test]
    fn test_fixed_string_without_terminator_uses_all_bytes() {
        let data = b"ABCD";
        let mut reader = ByteReader::new(data);
        assert_eq!(reader.read_fixed_string("code", 4).unwrap(), "ABCD");
    }

    #[test]
    fn test_sub_reader_is_bounded() {
        let data = [1u8, 2, 3, 4, 5];
        let mut reader = ByteReader::new(&data);
        let mut sub = reader.sub_reader("window", 2).unwrap();

        assert_eq!(reader.position(), 2);
        assert_eq!(sub.read_u16("pair").unwrap(), 0x0201);
        assert!(sub.read_u8("beyond").is_err());
    }

    #[test]
    fn test_write_integers_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0x01).unwrap();
        writer.write_u16(0x1234).unwrap();
        writer.write_u32(0x1234_5678).unwrap();

        assert_eq!(writer.position(), 7);
        assert_eq!(
            writer.into_inner(),
            vec![0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn test_write_fixed_string_pads_with_zeros() {
        let mut writer = ByteWriter::new();
        writer.write_fixed_string("first_name", "John", 8).unwrap();
        assert_eq!(writer.into_inner(), b"John\0\0\0\0".to_vec());
    }

    #[test]
    fn test_write_fixed_string_rejects_embedded_nul() {
        let mut writer = ByteWriter::new();
        assert!(matches!(
            writer.write_fixed_string("last_name", "Mc\0Coy", 21),
            Err(DraftClassError::EmbeddedNul {
                field: "last_name",
                position: 2,
            })
        ));
        assert_eq!(writer.position(), 0);
    }

    #[test]
    fn test_write_fixed_string_exact_fit() {
        let mut writer = ByteWriter::new();
        writer.write_fixed_string("code", "ABCD", 4).unwrap();
        assert_eq!(writer.into_inner(), b"ABCD".to_vec());
    }

    #[test]
    fn test_write_fixed_string_rejects_overlong() {
        let mut writer = ByteWriter::new();
        let err = writer
            .write_fixed_string("code", "ABCDE", 4)
            .unwrap_err();
        assert!(matches!(
            err,
            DraftClassError::FieldTooLong {
                field: "code",
                len: 5,
                max: 4,
            }
        ));
        assert_eq!(writer.position(), 0);
    }
}
