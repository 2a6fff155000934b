#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for whole draft class files
//!
//! Classes are built synthetically with `DraftClassBuilder`, sized the way
//! game-produced files are (room for 450 prospects, 288 filled), then pushed
//! through decode and encode.

use draftclass_formats::record::field_offset;
use draftclass_formats::{
    BinaryFormat, DecodeOptions, Diagnostic, DraftClass, DraftClassBuilder, DraftClassError,
    HEADER_SIZE, ProspectRecord, RECORD_SIZE, Visuals,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const FILE_NAME: &str = "CAREERDRAFT-Madden-25";
const CAPACITY: usize = 450;
const CLASS_SIZE: usize = 288;

fn prospect(index: usize, first_name: &str, last_name: &str) -> ProspectRecord {
    ProspectRecord {
        visuals: Visuals::Structured(json!({
            "genericHeadAssetName": format!("gen_head_{index:04}"),
            "skinTone": index % 7,
            "loadouts": [{ "loadoutType": 0, "loadoutElements": [] }]
        })),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        home_town: "Somewhere".to_string(),
        college: (index % 300) as u16,
        age: 21 + (index % 3) as u8,
        height_inches: 70 + (index % 10) as u8,
        weight: 180 + (index % 150) as u32,
        position: (index % 21) as u8,
        draftable: 1,
        draft_pick: index as u16,
        draft_round: (index / 32 + 1) as u8,
        overall: 50 + (index % 40) as u8,
        speed: 60 + (index % 35) as u8,
        dev_trait: (index % 4) as u8,
        portrait_id: 1000 + index as u16,
        asset_name: format!("{last_name}{first_name}_{index}"),
        ..ProspectRecord::default()
    }
}

fn game_sized_class() -> DraftClass {
    let prospects = (0..CLASS_SIZE).map(|i| {
        if i == 0 {
            prospect(i, "Caleb", "Williams")
        } else {
            prospect(i, &format!("First{i}"), &format!("Last{i}"))
        }
    });

    DraftClassBuilder::new(FILE_NAME, 2024)
        .data_size((CAPACITY * RECORD_SIZE) as u32)
        .prospects(prospects)
        .build()
        .expect("Should build game-sized class")
}

fn record_window(bytes: &[u8], index: usize) -> &[u8] {
    let start = HEADER_SIZE + index * RECORD_SIZE;
    &bytes[start..start + RECORD_SIZE]
}

#[test]
fn round_trip_game_sized_class() {
    let class = game_sized_class();
    let bytes = class.build().unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + CAPACITY * RECORD_SIZE);

    let decoded = DraftClass::decode(&bytes, &DecodeOptions::default()).unwrap();
    assert!(decoded.diagnostics.is_empty());
    assert_eq!(decoded.value, class);
}

#[test]
fn encode_is_idempotent() {
    let bytes = game_sized_class().build().unwrap();

    let once = DraftClass::parse(&bytes).unwrap().build().unwrap();
    let twice = DraftClass::parse(&once).unwrap().build().unwrap();

    assert!(once == bytes, "first re-encode changed the file");
    assert!(twice == once, "second re-encode changed the file");
    DraftClass::verify_round_trip(&bytes).expect("Should verify");
}

#[test]
fn renaming_first_prospect_touches_only_its_slot() {
    let original = game_sized_class().build().unwrap();

    let mut class = DraftClass::parse(&original).unwrap();
    assert_eq!(class.prospects.len(), CLASS_SIZE);
    assert_eq!(class.prospects[0].full_name(), "Caleb Williams");

    class.prospects[0].first_name = "John".to_string();
    let edited = class.build().unwrap();

    assert_eq!(edited.len(), original.len());
    assert_eq!(&edited[..HEADER_SIZE], &original[..HEADER_SIZE]);

    let reparsed = DraftClass::parse(&edited).unwrap();
    assert_eq!(reparsed.prospects[0].first_name, "John");
    assert_eq!(reparsed.prospects[0].last_name, "Williams");

    // Within record 0 only the 17-byte first name slot differs
    let name_at = field_offset("first_name").unwrap();
    let before = record_window(&original, 0);
    let after = record_window(&edited, 0);
    assert_eq!(&after[..name_at], &before[..name_at]);
    assert_eq!(&after[name_at + 0x11..], &before[name_at + 0x11..]);
    assert_eq!(&after[name_at..name_at + 5], b"John\0");

    for index in 1..CLASS_SIZE {
        assert!(
            record_window(&edited, index) == record_window(&original, index),
            "record {index} changed"
        );
    }

    let padding = HEADER_SIZE + CLASS_SIZE * RECORD_SIZE;
    assert!(edited[padding..] == original[padding..]);
    assert!(edited[padding..].iter().all(|&b| b == 0));
}

#[test]
fn prospect_count_follows_record_list() {
    let mut class = game_sized_class();
    for i in 0..5 {
        class.prospects.push(prospect(CLASS_SIZE + i, "Late", "Addition"));
    }
    // Header count left stale on purpose
    assert_eq!(class.header.num_prospects as usize, CLASS_SIZE);

    let bytes = class.build().unwrap();
    let count = u32::from_le_bytes(bytes[0x42..0x46].try_into().unwrap());
    assert_eq!(count as usize, CLASS_SIZE + 5);

    let reparsed = DraftClass::parse(&bytes).unwrap();
    assert_eq!(reparsed.prospects.len(), CLASS_SIZE + 5);
    assert_eq!(reparsed.prospects[CLASS_SIZE + 4].first_name, "Late");
}

#[test]
fn full_capacity_then_overflow() {
    let mut class = game_sized_class();
    for i in CLASS_SIZE..CAPACITY {
        class.prospects.push(prospect(i, "Fill", "Er"));
    }
    let full = class.encode().unwrap();
    assert!(full.diagnostics.is_empty());
    assert_eq!(full.bytes.len(), HEADER_SIZE + CAPACITY * RECORD_SIZE);

    class.prospects.push(prospect(CAPACITY, "One", "Toomany"));
    let over = class.encode().unwrap();
    assert_eq!(over.bytes.len(), HEADER_SIZE + (CAPACITY + 1) * RECORD_SIZE);
    assert!(matches!(
        over.diagnostics.iter().collect::<Vec<_>>().as_slice(),
        [Diagnostic::DataSizeExceeded { .. }]
    ));
}

#[test]
fn weight_is_stored_relative_to_baseline() {
    let class = DraftClassBuilder::new(FILE_NAME, 2024)
        .add_prospect(prospect(0, "Heavy", "Lineman"))
        .build()
        .unwrap();
    let mut bytes = class.build().unwrap();
    let weight_at = HEADER_SIZE + field_offset("weight").unwrap();

    bytes[weight_at..weight_at + 2].copy_from_slice(&0u16.to_le_bytes());
    assert_eq!(DraftClass::parse(&bytes).unwrap().prospects[0].weight, 160);

    bytes[weight_at..weight_at + 2].copy_from_slice(&90u16.to_le_bytes());
    let mut parsed = DraftClass::parse(&bytes).unwrap();
    assert_eq!(parsed.prospects[0].weight, 250);

    parsed.prospects[0].weight = 330;
    let rebuilt = parsed.build().unwrap();
    assert_eq!(&rebuilt[weight_at..weight_at + 2], &170u16.to_le_bytes());
}

#[test]
fn rejects_foreign_files() {
    let bytes = game_sized_class().build().unwrap();

    let mut wrong_magic = bytes.clone();
    wrong_magic[..8].copy_from_slice(b"FBCHUNKX");
    assert!(matches!(
        DraftClass::parse(&wrong_magic),
        Err(DraftClassError::InvalidMagic { .. })
    ));

    let mut wrong_edition = bytes.clone();
    wrong_edition[0x22..0x37].copy_from_slice(b"CAREERDRAFT-Madden-24");
    assert!(matches!(
        DraftClass::parse(&wrong_edition),
        Err(DraftClassError::UnsupportedEdition { .. })
    ));

    assert!(matches!(
        DraftClass::parse(&bytes[..HEADER_SIZE - 1]),
        Err(DraftClassError::TruncatedInput { .. })
    ));
}

#[test]
fn lenient_visuals_survive_round_trip() {
    let mut bytes = game_sized_class().build().unwrap();
    let slot = HEADER_SIZE + 17 * RECORD_SIZE;
    bytes[slot..slot + 4].copy_from_slice(b"\xFF\xFE{{");

    assert!(matches!(
        DraftClass::parse(&bytes),
        Err(DraftClassError::MalformedVisualsBlock { record: 17, offset, .. }) if offset == slot
    ));

    let decoded = DraftClass::decode(&bytes, &DecodeOptions::lenient()).unwrap();
    assert_eq!(decoded.diagnostics.len(), 1);
    assert!(decoded.value.prospects[17].visuals.is_opaque());
    assert_eq!(decoded.value.build().unwrap(), bytes);

    assert!(decoded.into_strict().is_err());
}

#[test]
fn json_export_import_round_trip() {
    let class = game_sized_class();
    let text = serde_json::to_string(&class).unwrap();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["header"]["fileName"], FILE_NAME);
    assert_eq!(value["header"]["numProspects"], CLASS_SIZE);
    assert_eq!(value["prospects"][0]["firstName"], "Caleb");

    let imported: DraftClass = serde_json::from_str(&text).unwrap();
    assert_eq!(imported, class);
    assert!(imported.build().unwrap() == class.build().unwrap());
}
