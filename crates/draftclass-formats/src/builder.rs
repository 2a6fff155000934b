//! Builder for constructing draft classes from scratch

use crate::error::{DraftClassError, Result};
use crate::file::DraftClass;
use crate::header::{FILE_NAME_SIZE, FileHeader, HEADER_SIZE, RESERVED_SHORTS};
use crate::record::{ProspectRecord, RECORD_SIZE};

/// Builder for constructing `DraftClass` instances
///
/// The builder collects prospects and header settings, then computes the
/// derived header fields (data size, total size, prospect count) at build
/// time.
#[derive(Debug, Clone)]
pub struct DraftClassBuilder {
    file_name: String,
    game_year: u16,
    version: u16,
    unk_int: u32,
    reserved_shorts: [u16; RESERVED_SHORTS],
    data_size: Option<u32>,
    prospects: Vec<ProspectRecord>,
}

impl DraftClassBuilder {
    /// Create a new builder
    ///
    /// Defaults: version 1, unknown int 4, reserved slots zero, data size
    /// sized exactly to the prospects.
    #[must_use]
    pub fn new(file_name: impl Into<String>, game_year: u16) -> Self {
        Self {
            file_name: file_name.into(),
            game_year,
            version: 1,
            unk_int: 4,
            reserved_shorts: [0; RESERVED_SHORTS],
            data_size: None,
            prospects: Vec::new(),
        }
    }

    /// Set the format version
    #[must_use]
    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    /// Set the unknown u32 at 0x3E
    #[must_use]
    pub fn unk_int(mut self, value: u32) -> Self {
        self.unk_int = value;
        self
    }

    /// Set the reserved u16 slots at 0x18
    #[must_use]
    pub fn reserved_shorts(mut self, values: [u16; RESERVED_SHORTS]) -> Self {
        self.reserved_shorts = values;
        self
    }

    /// Declare a data segment larger than the prospects need
    ///
    /// Encoding zero-pads the segment up to this size. Game-produced files
    /// reserve room for 450 prospects this way.
    #[must_use]
    pub fn data_size(mut self, size: u32) -> Self {
        self.data_size = Some(size);
        self
    }

    /// Add one prospect
    #[must_use]
    pub fn add_prospect(mut self, prospect: ProspectRecord) -> Self {
        self.prospects.push(prospect);
        self
    }

    /// Add several prospects in order
    #[must_use]
    pub fn prospects(mut self, prospects: impl IntoIterator<Item = ProspectRecord>) -> Self {
        self.prospects.extend(prospects);
        self
    }

    /// Build the final `DraftClass`
    pub fn build(self) -> Result<DraftClass> {
        let mut header = FileHeader::new(self.file_name, self.game_year);
        header.validate()?;

        let name_len = header.file_name.len();
        if name_len > FILE_NAME_SIZE {
            return Err(DraftClassError::FieldTooLong {
                field: "fileName",
                len: name_len,
                max: FILE_NAME_SIZE,
            });
        }

        let count = u32::try_from(self.prospects.len()).map_err(|_| {
            DraftClassError::ValueOutOfRange {
                field: "numProspects",
                value: self.prospects.len() as u64,
            }
        })?;

        let needed = u64::from(count) * RECORD_SIZE as u64;
        let data_size = match self.data_size {
            Some(size) if u64::from(size) < needed => {
                return Err(DraftClassError::RecordCountOverflow {
                    num_prospects: count,
                    record_size: RECORD_SIZE,
                    data_size: size,
                });
            }
            Some(size) => size,
            None => u32::try_from(needed).map_err(|_| DraftClassError::ValueOutOfRange {
                field: "dataSize",
                value: needed,
            })?,
        };

        let total = HEADER_SIZE as u64 + u64::from(data_size);
        header.total_size = u32::try_from(total).map_err(|_| DraftClassError::ValueOutOfRange {
            field: "totalSize",
            value: total,
        })?;
        header.data_size = data_size;
        header.version = self.version;
        header.unk_int = self.unk_int;
        header.reserved_shorts = self.reserved_shorts;
        header.num_prospects = count;

        Ok(DraftClass {
            header,
            prospects: self.prospects,
        })
    }
}
