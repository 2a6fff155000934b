//! Test utilities for draft class round-trip testing
//!
//! Sample records and draft classes shared by the unit tests, plus
//! assertions that a class survives encode and decode unchanged.

use crate::builder::DraftClassBuilder;
use crate::file::{DecodeOptions, DraftClass};
use crate::first_difference;
use crate::header::HEADER_SIZE;
use crate::record::{ProspectRecord, RECORD_SIZE, Visuals};
use pretty_assertions::assert_eq;
use serde_json::json;

/// File name carrying the supported edition marker
pub const SAMPLE_FILE_NAME: &str = "CAREERDRAFT-Madden-25";

/// A fully populated prospect with distinctive field values
pub fn sample_prospect(first_name: &str, last_name: &str) -> ProspectRecord {
    ProspectRecord {
        visuals: Visuals::Structured(json!({
            "genericHeadAssetName": "gen_head_0042",
            "skinTone": 4,
            "loadouts": [
                { "loadoutType": 1, "loadoutElements": [{ "slotType": 2, "itemAssetName": "helmet_a" }] }
            ]
        })),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        home_state: 5,
        home_town: "Washington".to_string(),
        college: 270,
        birth_date: 11_324,
        age: 22,
        height_inches: 73,
        weight: 214,
        position: 0,
        archetype: 2,
        jersey_num: 13,
        draftable: 1,
        draft_pick: 1,
        draft_round: 1,
        overall: 79,
        speed: 84,
        throw_power: 94,
        throw_accuracy_short: 85,
        awareness: 70,
        trait_clutch: 1,
        dev_trait: 2,
        generic_head: 512,
        handedness: 1,
        portrait_id: 9_876,
        qb_style: 3,
        qb_stance: 1,
        commentary_id: 4_321,
        asset_name: format!("{last_name}{first_name}_1"),
        ..ProspectRecord::default()
    }
}

/// A draft class of `count` distinct prospects with an exact-fit data size
pub fn sample_draft_class(count: usize) -> DraftClass {
    DraftClassBuilder::new(SAMPLE_FILE_NAME, 2024)
        .prospects((0..count).map(|i| {
            let mut prospect = sample_prospect(&format!("First{i}"), &format!("Last{i}"));
            prospect.overall = (i % 100) as u8;
            prospect.draft_pick = i as u16;
            prospect
        }))
        .build()
        .expect("Sample draft class should build")
}

/// Where an offset falls in an encoded draft class
pub fn describe_offset(class: &DraftClass, offset: usize) -> String {
    if offset < HEADER_SIZE {
        return format!("header byte {offset:#x}");
    }
    let record = (offset - HEADER_SIZE) / RECORD_SIZE;
    if record < class.len() {
        let within = (offset - HEADER_SIZE) % RECORD_SIZE;
        format!("record {record} byte {within:#x}")
    } else {
        format!("padding at {offset:#x}")
    }
}

/// Encode `class`, decode it back cleanly and check both the value and the
/// re-encoded bytes; returns the first encoding
pub fn assert_class_round_trip(class: &DraftClass) -> Vec<u8> {
    let bytes = class.build().expect("Class should encode");
    let decoded = DraftClass::decode(&bytes, &DecodeOptions::strict()).expect("Should decode");
    assert!(
        decoded.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        decoded.diagnostics
    );
    assert_eq!(&decoded.value, class);
    assert_file_bytes_stable(&bytes);
    bytes
}

/// Decode `data` and assert it re-encodes to the same bytes
pub fn assert_file_bytes_stable(data: &[u8]) {
    let class = DraftClass::parse(data).expect("Should decode");
    let rebuilt = class.build().expect("Should re-encode");
    if let Some(at) = first_difference(data, &rebuilt) {
        panic!(
            "re-encoded file differs at {} ({} bytes in, {} bytes out)",
            describe_offset(&class, at),
            data.len(),
            rebuilt.len()
        );
    }
}
