//! Fixed-size prospect records
//!
//! Every record is 4322 bytes: a 4096-byte visuals slot holding a JSON
//! document, followed by 226 bytes of names, ids, ratings and traits laid out
//! by [`PROSPECT_FIELDS`]. Records are self-contained; decoding one needs only
//! a reader aligned to its first byte.
//!
//! # Usage
//!
//! ```rust,no_run
//! use draftclass_formats::record::{FieldValue, ProspectRecord, RECORD_SIZE};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut record = ProspectRecord::default();
//! record.first_name = "Caleb".to_string();
//! record.weight = 236;
//! record.set("overall", FieldValue::U8(79))?;
//!
//! let bytes = record.encode()?;
//! assert_eq!(bytes.len(), RECORD_SIZE);
//!
//! let parsed = ProspectRecord::parse(&bytes)?;
//! assert_eq!(parsed, record);
//! # Ok(())
//! # }
//! ```

pub mod prospect;
pub mod schema;
pub mod visuals;

pub use prospect::{PROSPECT_FIELDS, ProspectRecord, RecordContext};
pub use schema::{
    FieldKind, FieldSpec, FieldValue, WEIGHT_BASELINE, field_offset, field_spec, layout_width,
};
pub use visuals::{Visuals, VisualsPolicy};

/// Bytes per prospect record
pub const RECORD_SIZE: usize = 0x10E2;

/// Bytes reserved for the visuals document
pub const VISUALS_SIZE: usize = 0x1000;

/// Bytes of table fields after the visuals slot
pub const PLAYER_DATA_SIZE: usize = 0xE2;

/// First name slot width
pub const FIRST_NAME_SIZE: usize = 0x11;

/// Last name slot width
pub const LAST_NAME_SIZE: usize = 0x15;

/// Home town slot width
pub const HOME_TOWN_SIZE: usize = 0x1B;

/// Asset name slot width
pub const ASSET_NAME_SIZE: usize = 0x2A;
