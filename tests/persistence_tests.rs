//! Persistence Tests
//!
//! End-to-end behaviour of the sheet session over real and in-memory stores.

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use test_case::test_case;

use wheel_of_fate::sheet::{
    CharacterRecord, CharacterSheet, DieRating, MoveDirection, SheetTemplate, StatementTrait,
    Talent, TalentTemplate, TrackerKind,
};
use wheel_of_fate::state::{
    FileStore, KeyValueStore, LoadStatus, MemoryStore, NotificationCenter, NotificationKind,
    SheetChange, SheetSession, STORAGE_KEY,
};

/// Helper to open a session over an in-memory store
fn memory_session(store: MemoryStore) -> SheetSession<MemoryStore, NotificationCenter> {
    SheetSession::open(SheetTemplate::default(), store, NotificationCenter::new())
}

/// Helper to build a sheet with something in every section
fn populated_sheet() -> CharacterSheet {
    let mut sheet = CharacterSheet::default();
    sheet.set_character_name("Kade");
    sheet.set_player_name("Sam");
    sheet.set_notes("Owes the harbourmaster a favour.");
    sheet
        .set_distinction(1, StatementTrait::new("Exiled Knight", DieRating::D10, "I keep my oath"))
        .unwrap();
    sheet.set_value_rating("Justice", DieRating::D12).unwrap();
    sheet
        .set_value_statement("Justice", "The guilty must answer")
        .unwrap();
    sheet.set_approach_rating("Sneaky", DieRating::D4).unwrap();
    sheet.set_role_rating("Arcanist", DieRating::D10).unwrap();
    sheet.toggle_point(TrackerKind::Physical, 2).unwrap();
    sheet.toggle_point(TrackerKind::Momentum, 0).unwrap();
    sheet.increment_resolve();
    sheet
        .apply_talent_template(3, TalentTemplate::find("Sixth Sense").unwrap())
        .unwrap();
    sheet
}

// === Round-trip ===

#[test]
fn test_apply_then_capture_round_trip() {
    let record = populated_sheet().capture_record();

    let mut sheet = CharacterSheet::default();
    sheet.apply_record(&record);

    assert_eq!(sheet.capture_record(), record);
}

#[test]
fn test_round_trip_through_json_text() {
    let record = populated_sheet().capture_record();
    let text = record.to_json().unwrap();

    let mut sheet = CharacterSheet::default();
    sheet.apply_record(&CharacterRecord::from_json(&text).unwrap());

    assert_eq!(sheet.capture_record(), record);
}

// === Resolve clamp ===

#[test_case(10, 10, 9 ; "at maximum")]
#[test_case(0, 1, 0 ; "at minimum")]
#[test_case(5, 6, 4 ; "in range")]
fn test_resolve_steps(start: u8, after_increment: u8, after_decrement: u8) {
    let record = CharacterRecord::from_json(&format!(
        r#"{{"trackers": {{"resolve": {}}}}}"#,
        start
    ))
    .unwrap();

    let mut sheet = CharacterSheet::default();
    sheet.apply_record(&record);
    assert_eq!(sheet.increment_resolve(), after_increment);

    sheet.apply_record(&record);
    assert_eq!(sheet.decrement_resolve(), after_decrement);
}

#[test]
fn test_stored_resolve_above_maximum_is_clamped() {
    let record = CharacterRecord::from_json(r#"{"trackers": {"resolve": 42}}"#).unwrap();
    let mut sheet = CharacterSheet::default();
    sheet.apply_record(&record);
    assert_eq!(sheet.resolve().value(), 10);
}

// === Talent filled derivation ===

#[test_case("", "", "", false)]
#[test_case("  ", "\t", "\n", false)]
#[test_case("Quick Draw", "", "", true)]
#[test_case("", " Combat ", "", true)]
#[test_case("", "", "Once per scene", true)]
fn test_talent_filled(name: &str, tag: &str, description: &str, filled: bool) {
    assert_eq!(Talent::new(name, tag, description).filled(), filled);
}

#[test]
fn test_stored_filled_flag_is_recomputed() {
    let record = CharacterRecord::from_json(
        r#"{"talents": [{"name": "", "tag": "", "description": "", "filled": true}]}"#,
    )
    .unwrap();
    assert!(!record.talents[0].filled());
}

// === Corrupted-store recovery ===

#[test]
fn test_corrupted_store_recovery() {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, "{\"characterName\": \"Ka").unwrap();

    let mut session = memory_session(store);

    assert_eq!(session.load_status(), LoadStatus::Discarded);
    assert_eq!(session.store().get(STORAGE_KEY).unwrap(), None);
    assert_eq!(session.sheet().capture_record(), CharacterSheet::default().capture_record());
    assert_eq!(
        session.notifier().latest().unwrap().kind,
        NotificationKind::Error
    );
    assert_eq!(session.load(), LoadStatus::Empty);
}

#[test]
fn test_non_utf8_entry_discarded_on_open() {
    let temp = tempdir().unwrap();
    let entry = temp.path().join(format!("{}.json", STORAGE_KEY));
    std::fs::write(&entry, b"{\xff}").unwrap();

    let store = FileStore::open(temp.path()).unwrap();
    let mut session = SheetSession::open(SheetTemplate::default(), store, NotificationCenter::new());

    assert_eq!(session.load_status(), LoadStatus::Discarded);
    assert!(!entry.exists());
    assert_eq!(
        session.notifier().latest().unwrap().kind,
        NotificationKind::Error
    );
    assert_eq!(session.load(), LoadStatus::Empty);
}

#[test]
fn test_non_object_store_entry_loads_defaults() {
    let mut store = MemoryStore::new();
    store.set(STORAGE_KEY, "[1, 2, 3]").unwrap();

    let session = memory_session(store);
    assert_eq!(session.sheet().capture_record(), CharacterSheet::default().capture_record());
}

// === Export fidelity ===

#[test]
fn test_export_matches_saved_record() {
    let mut session = memory_session(MemoryStore::new());
    session
        .apply(SheetChange::CharacterName("Kade".to_string()))
        .unwrap();
    session
        .apply(SheetChange::RoleRating {
            name: "Rogue".to_string(),
            rating: DieRating::D8,
        })
        .unwrap();

    let file = session.export().unwrap();
    let stored = session.store().get(STORAGE_KEY).unwrap().unwrap();

    assert_eq!(file.contents, stored);
    assert_eq!(
        CharacterRecord::from_json(&file.contents).unwrap(),
        session.sheet().capture_record()
    );
    assert_eq!(file.filename, "wheel-of-fate-Kade.json");

    let latest = session.notifier().latest().unwrap();
    assert_eq!(latest.kind, NotificationKind::Success);
    assert_eq!(latest.message, "Character exported as wheel-of-fate-Kade.json");
}

// === Import validation ===

#[test]
fn test_import_rejects_non_json() {
    let mut session = memory_session(MemoryStore::new());
    session
        .apply(SheetChange::CharacterName("Original".to_string()))
        .unwrap();
    let stored_before = session.store().get(STORAGE_KEY).unwrap();
    let sheet_before = session.sheet().capture_record();

    assert!(session.import("not json").is_err());

    assert_eq!(session.store().get(STORAGE_KEY).unwrap(), stored_before);
    assert_eq!(session.sheet().capture_record(), sheet_before);
    let latest = session.notifier().latest().unwrap();
    assert_eq!(latest.kind, NotificationKind::Error);
    assert_eq!(
        latest.message,
        "Import failed. The file is not a valid character sheet."
    );
}

#[test]
fn test_import_minimal_record_resets_other_fields() {
    let mut session = memory_session(MemoryStore::new());
    session
        .apply(SheetChange::PlayerName("Previous player".to_string()))
        .unwrap();
    session
        .apply(SheetChange::TogglePoint {
            tracker: TrackerKind::Mental,
            index: 0,
        })
        .unwrap();

    session.import(r#"{"characterName":"Kade"}"#).unwrap();

    let mut expected = CharacterSheet::default();
    expected.set_character_name("Kade");
    assert_eq!(session.sheet().capture_record(), expected.capture_record());
    assert_eq!(session.sheet().resolve().value(), 1);
    assert_eq!(
        session.store().get(STORAGE_KEY).unwrap().as_deref(),
        Some(r#"{"characterName":"Kade"}"#)
    );
    assert_eq!(
        session.notifier().latest().unwrap().message,
        "Character imported successfully!"
    );
}

#[test]
fn test_import_missing_file_reports_read_error() {
    let temp = tempdir().unwrap();
    let mut session = memory_session(MemoryStore::new());

    let result = session.import_file(&temp.path().join("missing.json"));

    assert!(result.is_err());
    assert_eq!(
        session.notifier().latest().unwrap().message,
        "Error reading the file."
    );
}

// === Filename sanitization ===

#[test_case("Sir Kade the \"Bold\"!", "wheel-of-fate-Sir_Kade_the_Bold.json")]
#[test_case("", "wheel-of-fate-character.json")]
fn test_export_filename_from_session(name: &str, expected: &str) {
    let mut session = memory_session(MemoryStore::new());
    session
        .apply(SheetChange::CharacterName(name.to_string()))
        .unwrap();

    assert_eq!(session.export().unwrap().filename, expected);
}

// === File store sessions ===

#[test]
fn test_file_store_survives_reopen() {
    let temp = tempdir().unwrap();

    {
        let store = FileStore::open(temp.path()).unwrap();
        let mut session =
            SheetSession::open(SheetTemplate::default(), store, NotificationCenter::new());
        session
            .apply(SheetChange::CharacterName("Kade".to_string()))
            .unwrap();
        session
            .apply(SheetChange::ApplyTalentTemplate {
                slot: 0,
                template: TalentTemplate::find("resourceful").unwrap(),
            })
            .unwrap();
        session
            .apply(SheetChange::MoveTalent {
                slot: 0,
                direction: MoveDirection::Down,
            })
            .unwrap();
    }

    let store = FileStore::open(temp.path()).unwrap();
    assert_eq!(store.keys(), vec![STORAGE_KEY.to_string()]);

    let session = SheetSession::open(SheetTemplate::default(), store, NotificationCenter::new());
    assert_eq!(session.sheet().character_name(), "Kade");
    assert_eq!(session.sheet().talents()[1].name(), "Resourceful");
    assert!(!session.sheet().talents()[0].filled());
}

#[test]
fn test_export_writes_file_to_directory() {
    let temp = tempdir().unwrap();
    let store = FileStore::open(&temp.path().join("store")).unwrap();
    let mut session = SheetSession::open(SheetTemplate::default(), store, NotificationCenter::new());
    session
        .apply(SheetChange::CharacterName("Ana de la Cruz".to_string()))
        .unwrap();

    let file = session.export().unwrap();
    let path = file.write_to(&temp.path().join("out")).unwrap();

    assert!(path.ends_with("wheel-of-fate-Ana_de_la_Cruz.json"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), file.contents);
}

#[test]
fn test_smaller_template_ignores_extra_entries() {
    let record = populated_sheet().capture_record();

    let template = SheetTemplate {
        talent_slots: 2,
        roles: vec!["Rogue".to_string(), "Arcanist".to_string()],
        ..SheetTemplate::default()
    };
    let mut sheet = CharacterSheet::new(template);
    sheet.apply_record(&record);

    let captured = sheet.capture_record();
    assert_eq!(captured.talents.len(), 2);
    assert_eq!(captured.roles.len(), 2);
    assert_eq!(captured.roles[1].rating, DieRating::D10);
}
