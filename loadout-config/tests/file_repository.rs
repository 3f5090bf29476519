//! Tests for persisting preset slots to disk and restoring them in a new
//! session.

use loadout_config::{
    FilePresetRepository, PresetRepository, PresetStore, Schema, SettingDefinition, SlotId,
};
use std::sync::Arc;

fn game_schema() -> Arc<Schema> {
    let mut builder = Schema::builder();
    builder
        .define(SettingDefinition::text("name", "").with_max_length(16))
        .expect("define name");
    builder
        .define(SettingDefinition::choice(
            "world_state",
            "standard",
            ["standard", "open"],
        ))
        .expect("define world_state");
    builder.freeze().into()
}

#[test]
fn test_session_restart_restores_slots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("presets.yaml");

    // First session: edit and persist.
    {
        let mut store = PresetStore::new(game_schema());
        store.set_nickname(SlotId::One, "Speedrun");
        store
            .set_value(SlotId::One, "name", "Hero")
            .expect("set name");
        store
            .set_value(SlotId::Two, "world_state", "open")
            .expect("set world_state");

        let mut repo = FilePresetRepository::new(&path);
        for id in SlotId::ALL {
            repo.save(id, &store.slot_state(id)).expect("save slot");
        }
    }

    // Second session: load and restore.
    let mut store = PresetStore::new(game_schema());
    let mut repo = FilePresetRepository::new(&path);
    let stored = repo.load().expect("load").expect("file exists");
    for id in SlotId::ALL {
        if let Some(state) = stored.slot(id) {
            store.restore_slot(id, state.clone());
        }
    }

    assert_eq!(store.nickname(SlotId::One), "Speedrun");
    assert_eq!(store.value(SlotId::One, "name").expect("name"), "Hero");
    assert_eq!(
        store
            .value(SlotId::Two, "world_state")
            .expect("world_state"),
        "open"
    );
    assert_eq!(store.nickname(SlotId::Three), "");
}

#[test]
fn test_restore_drops_entries_for_changed_schema() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("presets.yaml");

    // Persist under a schema that also had a "glitches" setting.
    {
        let mut builder = Schema::builder();
        builder
            .define(SettingDefinition::text("name", "").with_max_length(16))
            .expect("define name");
        builder
            .define(SettingDefinition::choice(
                "world_state",
                "standard",
                ["standard", "open"],
            ))
            .expect("define world_state");
        builder
            .define(SettingDefinition::choice("glitches", "none", ["none", "major"]))
            .expect("define glitches");
        let old_schema: Arc<Schema> = builder.freeze().into();

        let mut store = PresetStore::new(old_schema);
        store
            .set_value(SlotId::One, "name", "Hero")
            .expect("set name");
        store
            .set_value(SlotId::One, "glitches", "major")
            .expect("set glitches");

        let mut repo = FilePresetRepository::new(&path);
        repo.save(SlotId::One, &store.slot_state(SlotId::One))
            .expect("save slot");
    }

    // Restore into the current schema, which no longer knows "glitches".
    let mut store = PresetStore::new(game_schema());
    let mut repo = FilePresetRepository::new(&path);
    let stored = repo.load().expect("load").expect("file exists");
    let state = stored.slot(SlotId::One).expect("slot 1 stored").clone();

    let dropped = store.restore_slot(SlotId::One, state);

    assert_eq!(dropped, 1);
    assert_eq!(store.value(SlotId::One, "name").expect("name"), "Hero");
    assert!(store.value(SlotId::One, "glitches").is_err());
}

#[test]
fn test_saving_only_touched_slots_keeps_file_sparse() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("presets.yaml");

    let mut store = PresetStore::new(game_schema());
    store.set_nickname(SlotId::Two, "Only me");

    let mut repo = FilePresetRepository::new(&path);
    repo.save(SlotId::Two, &store.slot_state(SlotId::Two))
        .expect("save slot");

    let contents = std::fs::read_to_string(&path).expect("read file");
    assert!(contents.contains("Only me"));
    // Untouched slots were never saved, so the file has no entry for them.
    let mut fresh = FilePresetRepository::new(&path);
    let stored = fresh.load().expect("load").expect("file exists");
    assert!(stored.slot(SlotId::One).is_none());
    assert!(stored.slot(SlotId::Three).is_none());
}
