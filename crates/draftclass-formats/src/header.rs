//! Fixed 70-byte `FBCHUNKS` file header
//!
//! | Offset | Field            | Width |
//! |--------|------------------|-------|
//! | 0x00   | magic `FBCHUNKS` | 8     |
//! | 0x08   | version          | 2     |
//! | 0x0A   | header size      | 4     |
//! | 0x0E   | data size        | 4     |
//! | 0x12   | total size       | 4     |
//! | 0x16   | game year        | 2     |
//! | 0x18   | 5 reserved u16   | 10    |
//! | 0x22   | file name        | 21    |
//! | 0x37   | reserved         | 7     |
//! | 0x3E   | reserved u32     | 4     |
//! | 0x42   | prospect count   | 4     |
//!
//! All integers are little-endian. The data segment starts at 0x46.

use crate::cursor::{ByteReader, ByteWriter};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{DraftClassError, Result};
use serde::{Deserialize, Serialize};

/// File signature
pub const MAGIC: [u8; 8] = *b"FBCHUNKS";

/// Encoded header width; the data segment starts here
pub const HEADER_SIZE: usize = 0x46;

/// Width of the null-padded file name slot
pub const FILE_NAME_SIZE: usize = 0x15;

/// Number of reserved u16 slots after the game year
pub const RESERVED_SHORTS: usize = 5;

/// Width of the reserved byte run after the file name
pub const RESERVED_BYTES: usize = 7;

/// Substring the file name must contain for the supported edition
pub const EDITION_MARKER: &str = "Madden-25";

/// Decoded draft class file header
///
/// In JSON the reserved u16 slots appear as `unkShort0`..`unkShort4` and
/// `reservedBytes` may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HeaderJson", into = "HeaderJson")]
pub struct FileHeader {
    /// Format version
    pub version: u16,
    /// Declared header size
    pub header_size: u32,
    /// Declared data segment size
    pub data_size: u32,
    /// Declared total size, normally `header_size + data_size`
    pub total_size: u32,
    /// Game season year
    pub game_year: u16,
    /// Unknown u16 slots at 0x18
    pub reserved_shorts: [u16; RESERVED_SHORTS],
    /// File name, must contain [`EDITION_MARKER`]
    pub file_name: String,
    /// Unknown bytes at 0x37, normally zero
    pub reserved_bytes: [u8; RESERVED_BYTES],
    /// Unknown u32 at 0x3E, typically 4
    pub unk_int: u32,
    /// Number of prospect records in the data segment
    pub num_prospects: u32,
}

// JSON shape of the header, one key per reserved slot
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeaderJson {
    version: u16,
    header_size: u32,
    data_size: u32,
    total_size: u32,
    game_year: u16,
    unk_short0: u16,
    unk_short1: u16,
    unk_short2: u16,
    unk_short3: u16,
    unk_short4: u16,
    file_name: String,
    #[serde(default)]
    reserved_bytes: [u8; RESERVED_BYTES],
    unk_int: u32,
    num_prospects: u32,
}

impl From<HeaderJson> for FileHeader {
    fn from(json: HeaderJson) -> Self {
        Self {
            version: json.version,
            header_size: json.header_size,
            data_size: json.data_size,
            total_size: json.total_size,
            game_year: json.game_year,
            reserved_shorts: [
                json.unk_short0,
                json.unk_short1,
                json.unk_short2,
                json.unk_short3,
                json.unk_short4,
            ],
            file_name: json.file_name,
            reserved_bytes: json.reserved_bytes,
            unk_int: json.unk_int,
            num_prospects: json.num_prospects,
        }
    }
}

impl From<FileHeader> for HeaderJson {
    fn from(header: FileHeader) -> Self {
        let [unk_short0, unk_short1, unk_short2, unk_short3, unk_short4] = header.reserved_shorts;
        Self {
            version: header.version,
            header_size: header.header_size,
            data_size: header.data_size,
            total_size: header.total_size,
            game_year: header.game_year,
            unk_short0,
            unk_short1,
            unk_short2,
            unk_short3,
            unk_short4,
            file_name: header.file_name,
            reserved_bytes: header.reserved_bytes,
            unk_int: header.unk_int,
            num_prospects: header.num_prospects,
        }
    }
}

impl FileHeader {
    /// Create a header for an empty draft class
    ///
    /// Size fields start out describing an empty data segment.
    pub fn new(file_name: impl Into<String>, game_year: u16) -> Self {
        Self {
            version: 1,
            header_size: HEADER_SIZE as u32,
            data_size: 0,
            total_size: HEADER_SIZE as u32,
            game_year,
            reserved_shorts: [0; RESERVED_SHORTS],
            file_name: file_name.into(),
            reserved_bytes: [0; RESERVED_BYTES],
            unk_int: 4,
            num_prospects: 0,
        }
    }

    /// Whether `total_size == header_size + data_size`
    pub fn has_consistent_sizes(&self) -> bool {
        u64::from(self.header_size) + u64::from(self.data_size) == u64::from(self.total_size)
    }

    /// Fail unless the file name carries the edition marker
    pub fn validate(&self) -> Result<()> {
        if !self.file_name.contains(EDITION_MARKER) {
            return Err(DraftClassError::UnsupportedEdition {
                file_name: self.file_name.clone(),
                marker: EDITION_MARKER,
            });
        }
        Ok(())
    }

    /// Decode a header, leaving `reader` at the first data segment byte
    ///
    /// The magic is checked before anything else is read. A total size that
    /// disagrees with the other size fields is recorded in `diagnostics`
    /// rather than rejected.
    pub fn decode(reader: &mut ByteReader<'_>, diagnostics: &mut Diagnostics) -> Result<Self> {
        let magic = reader.read_bytes("magic", MAGIC.len())?;
        if magic != MAGIC {
            let mut found = [0u8; 8];
            found.copy_from_slice(magic);
            return Err(DraftClassError::InvalidMagic { found });
        }

        let version = reader.read_u16("version")?;
        let header_size = reader.read_u32("headerSize")?;
        let data_size = reader.read_u32("dataSize")?;
        let total_size = reader.read_u32("totalSize")?;
        let game_year = reader.read_u16("gameYear")?;

        let mut reserved_shorts = [0u16; RESERVED_SHORTS];
        for slot in &mut reserved_shorts {
            *slot = reader.read_u16("reservedShorts")?;
        }

        let name_at = reader.position();
        let name_slot = reader.read_fixed_slot("fileName", FILE_NAME_SIZE)?;
        if !name_slot.exact {
            diagnostics.push(Diagnostic::LossyText {
                record: None,
                field: "fileName",
                offset: name_at,
            });
        }
        let file_name = name_slot.text;

        let mut reserved_bytes = [0u8; RESERVED_BYTES];
        reserved_bytes.copy_from_slice(reader.read_bytes("reservedBytes", RESERVED_BYTES)?);

        let unk_int = reader.read_u32("unkInt")?;
        let num_prospects = reader.read_u32("numProspects")?;

        let header = Self {
            version,
            header_size,
            data_size,
            total_size,
            game_year,
            reserved_shorts,
            file_name,
            reserved_bytes,
            unk_int,
            num_prospects,
        };

        if !header.has_consistent_sizes() {
            diagnostics.push(Diagnostic::SizeMismatch {
                header_size,
                data_size,
                total_size,
            });
        }

        header.validate()?;

        tracing::debug!(
            version,
            game_year,
            data_size,
            num_prospects,
            file_name = %header.file_name,
            "decoded draft class header"
        );

        Ok(header)
    }

    /// Append the header fields to `writer`
    ///
    /// `num_prospects` is written as-is; callers assembling a whole file
    /// refresh it from the record list first.
    pub fn write(&self, writer: &mut ByteWriter) -> Result<()> {
        self.validate()?;

        writer.write_bytes(&MAGIC)?;
        writer.write_u16(self.version)?;
        writer.write_u32(self.header_size)?;
        writer.write_u32(self.data_size)?;
        writer.write_u32(self.total_size)?;
        writer.write_u16(self.game_year)?;
        for &slot in &self.reserved_shorts {
            writer.write_u16(slot)?;
        }
        writer.write_fixed_string("fileName", &self.file_name, FILE_NAME_SIZE)?;
        writer.write_bytes(&self.reserved_bytes)?;
        writer.write_u32(self.unk_int)?;
        writer.write_u32(self.num_prospects)?;
        Ok(())
    }

    /// Encode the header into a standalone [`HEADER_SIZE`]-byte buffer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::with_capacity(HEADER_SIZE);
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }
}
