//! Prospect record and its declaration-order layout table

use crate::cursor::{ByteReader, ByteWriter};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{DraftClassError, Result};
use crate::record::schema::{
    FieldKind, FieldSlot, FieldSpec, FieldValue, WEIGHT_BASELINE, field_spec,
};
use crate::record::visuals::{Visuals, VisualsPolicy};
use crate::record::{
    ASSET_NAME_SIZE, FIRST_NAME_SIZE, HOME_TOWN_SIZE, LAST_NAME_SIZE, RECORD_SIZE, VISUALS_SIZE,
};
use serde::{Deserialize, Serialize};

macro_rules! field_type {
    (U8) => { u8 };
    (U16) => { u16 };
    (Weight) => { u32 };
    (Text) => { String };
}

// A zero stored weight decodes to the baseline, so that is the empty value.
macro_rules! field_default {
    (Weight) => { WEIGHT_BASELINE };
    ($kind:ident) => { Default::default() };
}

// Generates the record struct and the table that drives encode/decode.
// Order here is the on-disk order.
macro_rules! prospect_layout {
    ($( $field:ident : $kind:ident $(($width:expr))? ),* $(,)?) => {
        /// One draftable player, 4322 bytes on disk
        ///
        /// String members must fit their slot when encoded. `weight` holds
        /// the real weight; the file stores it relative to 160.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct ProspectRecord {
            /// Character appearance document
            pub visuals: Visuals,
            $(
                #[doc = concat!("Layout field `", stringify!($field), "`")]
                pub $field: field_type!($kind),
            )*
        }

        impl Default for ProspectRecord {
            fn default() -> Self {
                Self {
                    visuals: Visuals::default(),
                    $( $field: field_default!($kind), )*
                }
            }
        }

        /// Layout of the 226 bytes following the visuals slot, in file order
        pub static PROSPECT_FIELDS: &[FieldSpec] = &[
            $(
                FieldSpec {
                    name: stringify!($field),
                    kind: FieldKind::$kind $(($width))?,
                    get: |record| FieldSlot::to_value(&record.$field),
                    set: |record, value| {
                        let actual = value.kind_name();
                        record.$field = FieldSlot::from_value(value).ok_or(
                            DraftClassError::FieldKindMismatch {
                                field: stringify!($field),
                                expected: FieldKind::$kind $(($width))?.name(),
                                actual,
                            },
                        )?;
                        Ok(())
                    },
                },
            )*
        ];
    };
}

prospect_layout! {
    // Identity
    first_name: Text(FIRST_NAME_SIZE),
    last_name: Text(LAST_NAME_SIZE),
    home_state: U8,
    home_town: Text(HOME_TOWN_SIZE),
    college: U16,
    birth_date: U16,
    age: U8,
    height_inches: U8,
    weight: Weight,
    position: U8,
    archetype: U8,
    jersey_num: U8,
    draftable: U8,
    draft_pick: U16,
    draft_round: U8,

    // Ratings
    overall: U8,
    acceleration: U8,
    agility: U8,
    awareness: U8,
    ball_carrier_vision: U8,
    block_shedding: U8,
    break_sack: U8,
    break_tackle: U8,
    carrying: U8,
    catching: U8,
    catch_in_traffic: U8,
    change_of_direction: U8,
    finesse_moves: U8,
    hit_power: U8,
    impact_blocking: U8,
    injury: U8,
    juke_move: U8,
    jumping: U8,
    kick_accuracy: U8,
    kick_power: U8,
    kick_return: U8,
    lead_block: U8,
    man_coverage: U8,
    pass_block_finesse: U8,
    pass_block_power: U8,
    pass_block: U8,
    personality: U8,
    play_action: U8,
    play_recognition: U8,
    power_moves: U8,
    press_coverage: U8,
    pursuit: U8,
    release: U8,
    short_route_running: U8,
    medium_route_running: U8,
    deep_route_running: U8,
    run_block_finesse: U8,
    run_block_power: U8,
    run_block: U8,
    running_style: U8,
    spectacular_catch: U8,
    speed: U8,
    spin_move: U8,
    stamina: U8,
    stiff_arm: U8,
    strength: U8,
    tackle: U8,
    throw_accuracy_deep: U8,
    throw_accuracy_mid: U8,
    throw_accuracy: U8,
    throw_accuracy_short: U8,
    throw_on_the_run: U8,
    throw_power: U8,
    throw_under_pressure: U8,
    toughness: U8,
    trucking: U8,
    zone_coverage: U8,
    morale: U8,

    // Traits
    trait_big_hitter: U8,
    trait_possession_catch: U8,
    trait_clutch: U8,
    trait_cover_ball: U8,
    trait_deep_ball: U8,
    trait_dl_bull_rush: U8,
    trait_dl_spin_move: U8,
    trait_dl_swim_move: U8,
    trait_drops_open: U8,
    trait_sideline_catch: U8,
    trait_fight_for_yards: U8,
    trait_unk1: U8,
    trait_high_motor: U8,
    trait_aggressive_catch: U8,
    trait_penalty: U8,
    trait_play_ball: U8,
    trait_pump_fake: U8,
    trait_lb_style: U8,
    trait_sense_pressure: U8,
    trait_unk2: U8,
    trait_strip_ball: U8,
    trait_tackle_low: U8,
    trait_throw_away: U8,
    trait_tight_spiral: U8,
    trait_tendency: U8,
    trait_run_after_catch: U8,
    dev_trait: U8,
    trait_predictability: U8,
    unk_byte2: U8,

    // Presentation
    generic_head: U16,
    handedness: U16,
    portrait_id: U16,
    qb_style: U8,
    qb_stance: U8,
    unk3: U8,
    unk4: U8,
    unk5: U8,
    unk6: U8,
    vis_move_type: U8,
    unk8: U8,
    commentary_id: U16,
    asset_name: Text(ASSET_NAME_SIZE),
}

/// Where a record sits and how to treat its visuals block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordContext {
    /// Record index within the draft class
    pub index: usize,
    /// Absolute offset of the record in the file
    pub offset: usize,
    /// Handling of an unparsable visuals block
    pub visuals: VisualsPolicy,
}

impl RecordContext {
    /// Context for record `index` of a file whose data segment starts at
    /// `data_offset`
    pub fn at(index: usize, data_offset: usize, visuals: VisualsPolicy) -> Self {
        Self {
            index,
            offset: data_offset + index * RECORD_SIZE,
            visuals,
        }
    }
}

impl ProspectRecord {
    /// Decode one record from a reader aligned to a record boundary
    ///
    /// Consumes exactly [`RECORD_SIZE`] bytes. Table fields are decoded even
    /// when the visuals block is malformed; whether that aborts the call is
    /// decided by `ctx.visuals`.
    pub fn decode(
        reader: &mut ByteReader<'_>,
        ctx: &RecordContext,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let slot = reader.read_bytes("visuals", VISUALS_SIZE)?;

        let mut record = Self::default();
        for spec in PROSPECT_FIELDS {
            let at = reader.position();
            if !spec.read_into(reader, &mut record)? {
                diagnostics.push(Diagnostic::LossyText {
                    record: Some(ctx.index),
                    field: spec.name,
                    offset: ctx.offset + at,
                });
            }
        }

        record.visuals = match Visuals::parse(slot) {
            Ok(visuals) => visuals,
            Err(e) => match ctx.visuals {
                VisualsPolicy::Strict => {
                    return Err(DraftClassError::MalformedVisualsBlock {
                        record: ctx.index,
                        offset: ctx.offset,
                        reason: e.to_string(),
                    });
                }
                VisualsPolicy::Lenient => {
                    diagnostics.push(Diagnostic::MalformedVisuals {
                        record: ctx.index,
                        offset: ctx.offset,
                        reason: e.to_string(),
                    });
                    Visuals::Opaque(slot.to_vec())
                }
            },
        };

        tracing::trace!(
            index = ctx.index,
            first_name = %record.first_name,
            last_name = %record.last_name,
            "decoded prospect"
        );

        Ok(record)
    }

    /// Parse a standalone record buffer with strict visuals handling
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        Self::decode(&mut reader, &RecordContext::default(), &mut Diagnostics::new())
    }

    /// Append this record to `writer`
    ///
    /// Fails with [`DraftClassError::RecordSizeMismatch`] if the fields did
    /// not add up to exactly [`RECORD_SIZE`] bytes.
    pub fn write(&self, writer: &mut ByteWriter, index: usize) -> Result<()> {
        let start = writer.position();

        self.visuals.write(writer)?;
        for spec in PROSPECT_FIELDS {
            spec.write_from(writer, self)?;
        }

        let written = writer.position() - start;
        if written != RECORD_SIZE {
            return Err(DraftClassError::RecordSizeMismatch {
                index,
                expected: RECORD_SIZE,
                actual: written,
            });
        }
        Ok(())
    }

    /// Encode this record into a standalone [`RECORD_SIZE`]-byte buffer
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::with_capacity(RECORD_SIZE);
        self.write(&mut writer, 0)?;
        Ok(writer.into_inner())
    }

    /// Read a layout field by name
    pub fn get(&self, name: &str) -> Result<FieldValue> {
        field_spec(name)
            .map(|spec| spec.get(self))
            .ok_or_else(|| DraftClassError::UnknownField(name.to_string()))
    }

    /// Assign a layout field by name
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let spec = field_spec(name).ok_or_else(|| DraftClassError::UnknownField(name.to_string()))?;
        spec.set(self, value)
    }

    /// Display name, "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
