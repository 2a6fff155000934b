//! Field-offset table machinery for prospect records
//!
//! Each [`FieldSpec`] names one scalar or string slot, its storage kind and,
//! through the kind, its byte width. The table itself lives next to
//! [`ProspectRecord`] and is walked by one read loop and one write loop, so
//! the byte position of every field follows from declaration order alone.

use crate::cursor::{ByteReader, ByteWriter};
use crate::error::{DraftClassError, Result};
use crate::record::VISUALS_SIZE;
use crate::record::prospect::{PROSPECT_FIELDS, ProspectRecord};
use std::fmt;

/// Weight is stored as an offset from this baseline
pub const WEIGHT_BASELINE: u32 = 160;

/// Storage kind of a layout field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single byte
    U8,
    /// Little-endian u16
    U16,
    /// Little-endian u16 holding `weight - 160`
    Weight,
    /// Null-padded string in a slot of the given width
    Text(usize),
}

impl FieldKind {
    /// Bytes occupied on disk
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::Weight => 2,
            Self::Text(width) => width,
        }
    }

    /// Short name used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::Weight => "weight",
            Self::Text(_) => "text",
        }
    }

    // The flag is false only for text that will not write back unchanged
    fn read(self, reader: &mut ByteReader<'_>, field: &'static str) -> Result<(FieldValue, bool)> {
        Ok(match self {
            Self::U8 => (FieldValue::U8(reader.read_u8(field)?), true),
            Self::U16 => (FieldValue::U16(reader.read_u16(field)?), true),
            Self::Weight => (
                FieldValue::Weight(u32::from(reader.read_u16(field)?) + WEIGHT_BASELINE),
                true,
            ),
            Self::Text(width) => {
                let slot = reader.read_fixed_slot(field, width)?;
                (FieldValue::Text(slot.text), slot.exact)
            }
        })
    }
}

/// Decoded value of one layout field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single byte value
    U8(u8),
    /// u16 value
    U16(u16),
    /// Real weight, baseline already applied
    Weight(u32),
    /// String value
    Text(String),
}

impl FieldValue {
    /// Short name of the value's kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::Weight(_) => "weight",
            Self::Text(_) => "text",
        }
    }

    fn write(&self, writer: &mut ByteWriter, spec: &FieldSpec) -> Result<()> {
        match (spec.kind, self) {
            (FieldKind::U8, Self::U8(v)) => writer.write_u8(*v),
            (FieldKind::U16, Self::U16(v)) => writer.write_u16(*v),
            (FieldKind::Weight, Self::Weight(v)) => {
                let stored = v
                    .checked_sub(WEIGHT_BASELINE)
                    .and_then(|offset| u16::try_from(offset).ok())
                    .ok_or(DraftClassError::ValueOutOfRange {
                        field: spec.name,
                        value: u64::from(*v),
                    })?;
                writer.write_u16(stored)
            }
            (FieldKind::Text(width), Self::Text(s)) => writer.write_fixed_string(spec.name, s, width),
            (kind, value) => Err(DraftClassError::FieldKindMismatch {
                field: spec.name,
                expected: kind.name(),
                actual: value.kind_name(),
            }),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::Weight(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Conversion between a record member and its [`FieldValue`]
pub(crate) trait FieldSlot: Sized {
    fn to_value(&self) -> FieldValue;
    fn from_value(value: FieldValue) -> Option<Self>;
}

impl FieldSlot for u8 {
    fn to_value(&self) -> FieldValue {
        FieldValue::U8(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::U8(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldSlot for u16 {
    fn to_value(&self) -> FieldValue {
        FieldValue::U16(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::U16(v) => Some(v),
            _ => None,
        }
    }
}

// Only the weight field is a u32 member
impl FieldSlot for u32 {
    fn to_value(&self) -> FieldValue {
        FieldValue::Weight(*self)
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Weight(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldSlot for String {
    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// One entry of the prospect layout table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Field name, matching the [`ProspectRecord`] member
    pub name: &'static str,
    /// Storage kind, which fixes the width
    pub kind: FieldKind,
    pub(crate) get: fn(&ProspectRecord) -> FieldValue,
    pub(crate) set: fn(&mut ProspectRecord, FieldValue) -> Result<()>,
}

impl FieldSpec {
    /// Bytes occupied on disk
    pub const fn width(&self) -> usize {
        self.kind.width()
    }

    /// Current value of this field in `record`
    pub fn get(&self, record: &ProspectRecord) -> FieldValue {
        (self.get)(record)
    }

    /// Assign `value` to this field in `record`
    ///
    /// Fails with [`DraftClassError::FieldKindMismatch`] if the value kind
    /// differs from the field kind.
    pub fn set(&self, record: &mut ProspectRecord, value: FieldValue) -> Result<()> {
        (self.set)(record, value)
    }

    /// Returns whether the field will re-encode to the bytes just read
    pub(crate) fn read_into(&self, reader: &mut ByteReader<'_>, record: &mut ProspectRecord) -> Result<bool> {
        let (value, exact) = self.kind.read(reader, self.name)?;
        self.set(record, value)?;
        Ok(exact)
    }

    pub(crate) fn write_from(&self, writer: &mut ByteWriter, record: &ProspectRecord) -> Result<()> {
        self.get(record).write(writer, self)
    }
}

/// Look up a layout field by name
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    PROSPECT_FIELDS.iter().find(|spec| spec.name == name)
}

/// Offset of a layout field from the start of its record
///
/// The visuals slot occupies offsets `0..4096`; table fields follow it.
pub fn field_offset(name: &str) -> Option<usize> {
    let mut offset = VISUALS_SIZE;
    for spec in PROSPECT_FIELDS {
        if spec.name == name {
            return Some(offset);
        }
        offset += spec.width();
    }
    None
}

/// Total width of all table fields
pub fn layout_width() -> usize {
    PROSPECT_FIELDS.iter().map(FieldSpec::width).sum()
}
