//! Whole-file assembly: header, data segment and trailing padding
//!
//! On read the header declares how many bytes of data follow and how many
//! records they hold; records are decoded from consecutive 4322-byte windows
//! of that segment. On write the record count is taken from the record list,
//! records are concatenated, and the segment is zero-padded up to the
//! declared data size. A segment that outgrows the declared size is written
//! in full and reported, never truncated.

use crate::cursor::{ByteReader, ByteWriter};
use crate::diagnostics::{Decoded, Diagnostic, Diagnostics, Encoded};
use crate::error::{DraftClassError, Result};
use crate::header::{FileHeader, HEADER_SIZE};
use crate::record::{ProspectRecord, RECORD_SIZE, RecordContext, VisualsPolicy};
use serde::{Deserialize, Serialize};

/// Options controlling [`DraftClass::decode`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Handling of visuals blocks that are not valid JSON
    pub visuals: VisualsPolicy,
}

impl DecodeOptions {
    /// Strict decoding: any malformed visuals block aborts
    pub fn strict() -> Self {
        Self::default()
    }

    /// Lenient decoding: malformed visuals blocks are kept as raw bytes
    pub fn lenient() -> Self {
        Self {
            visuals: VisualsPolicy::Lenient,
        }
    }
}

/// A complete draft class: one header and its prospects in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftClass {
    /// File header
    pub header: FileHeader,
    /// Prospect records in file order
    pub prospects: Vec<ProspectRecord>,
}

impl DraftClass {
    /// Decode a complete draft class file
    ///
    /// Either every record decodes or the call fails; there is no partial
    /// result.
    pub fn decode(data: &[u8], options: &DecodeOptions) -> Result<Decoded<Self>> {
        let mut diagnostics = Diagnostics::new();
        let mut reader = ByteReader::new(data);

        let header = FileHeader::decode(&mut reader, &mut diagnostics)?;
        let data_offset = reader.position();

        let count = header.num_prospects as usize;
        if count as u64 * RECORD_SIZE as u64 > u64::from(header.data_size) {
            return Err(DraftClassError::RecordCountOverflow {
                num_prospects: header.num_prospects,
                record_size: RECORD_SIZE,
                data_size: header.data_size,
            });
        }

        let mut segment = reader.sub_reader("dataSegment", header.data_size as usize)?;

        let mut prospects = Vec::with_capacity(count);
        for index in 0..count {
            let mut window = segment.sub_reader("prospect", RECORD_SIZE)?;
            let ctx = RecordContext::at(index, data_offset, options.visuals);
            prospects.push(ProspectRecord::decode(&mut window, &ctx, &mut diagnostics)?);
        }

        tracing::debug!(
            prospects = prospects.len(),
            padding = segment.remaining(),
            trailing = reader.remaining(),
            warnings = diagnostics.len(),
            "decoded draft class"
        );

        Ok(Decoded {
            value: Self { header, prospects },
            diagnostics,
        })
    }

    /// Decode with strict visuals handling, logging but discarding warnings
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self::decode(data, &DecodeOptions::strict())?.value)
    }

    /// Encode the draft class into a complete file
    ///
    /// The written prospect count always equals `self.prospects.len()`,
    /// whatever `self.header.num_prospects` says. Other header fields are
    /// written as stored.
    pub fn encode(&self) -> Result<Encoded> {
        let mut diagnostics = Diagnostics::new();

        let mut header = self.header.clone();
        header.num_prospects = self.prospect_count()?;

        let record_bytes = self.prospects.len() * RECORD_SIZE;
        let declared = header.data_size as usize;
        let mut writer = ByteWriter::with_capacity(HEADER_SIZE + record_bytes.max(declared));

        header.write(&mut writer)?;

        let data_start = writer.position();
        for (index, prospect) in self.prospects.iter().enumerate() {
            prospect.write(&mut writer, index)?;
        }
        let written = writer.position() - data_start;

        if written < declared {
            writer.write_zeros(declared - written)?;
        } else if written > declared {
            diagnostics.push(Diagnostic::DataSizeExceeded {
                declared: header.data_size,
                actual: written,
            });
        }

        tracing::debug!(
            prospects = self.prospects.len(),
            bytes = writer.position(),
            "encoded draft class"
        );

        Ok(Encoded {
            bytes: writer.into_inner(),
            diagnostics,
        })
    }

    /// Encode, logging but discarding warnings
    pub fn build(&self) -> Result<Vec<u8>> {
        Ok(self.encode()?.bytes)
    }

    /// Number of prospects
    pub fn len(&self) -> usize {
        self.prospects.len()
    }

    /// Whether there are no prospects
    pub fn is_empty(&self) -> bool {
        self.prospects.is_empty()
    }

    /// Append a prospect and bring the header count up to date
    pub fn push(&mut self, prospect: ProspectRecord) -> Result<()> {
        self.prospects.push(prospect);
        self.header.num_prospects = self.prospect_count()?;
        Ok(())
    }

    /// Grow the declared sizes to fit the current prospects
    ///
    /// Sets `num_prospects`, raises `data_size` if the records no longer fit
    /// (it is never lowered) and recomputes `total_size`. [`encode`] never
    /// does this on its own.
    ///
    /// [`encode`]: Self::encode
    pub fn refresh_sizes(&mut self) -> Result<()> {
        let count = self.prospect_count()?;
        let needed = u64::from(count) * RECORD_SIZE as u64;
        let needed = u32::try_from(needed).map_err(|_| DraftClassError::ValueOutOfRange {
            field: "dataSize",
            value: needed,
        })?;

        let data_size = self.header.data_size.max(needed);
        let total = u64::from(self.header.header_size) + u64::from(data_size);
        let total_size = u32::try_from(total).map_err(|_| DraftClassError::ValueOutOfRange {
            field: "totalSize",
            value: total,
        })?;

        self.header.num_prospects = count;
        self.header.data_size = data_size;
        self.header.total_size = total_size;
        Ok(())
    }

    fn prospect_count(&self) -> Result<u32> {
        u32::try_from(self.prospects.len()).map_err(|_| DraftClassError::ValueOutOfRange {
            field: "numProspects",
            value: self.prospects.len() as u64,
        })
    }
}

impl crate::BinaryFormat for DraftClass {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(DraftClass::parse(data)?)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(DraftClass::build(self)?)
    }
}
