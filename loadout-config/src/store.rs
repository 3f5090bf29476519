//! Preset store: three slots with default-fallback reads and atomic
//! writes.
//!
//! Covers:
//! - `PresetStore` (slot state, get/set/reset/snapshot, import application)
//! - `StoreOptions` (reset behavior)
//! - `SharedPresetStore` (mutex-guarded handle for hosts with a background
//!   autosave)
//!
//! Every mutation validates against the schema before touching slot state,
//! so a failed call never leaves a partial write behind.

use crate::document::ParsedPreset;
use crate::error::PresetError;
use crate::schema::Schema;
use crate::slot::{PresetSlot, PresetSnapshot, SlotId, SnapshotEntry, StoredSlot};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// Behavior switches for the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Whether `reset_to_defaults` also clears the slot's nickname.
    ///
    /// Off by default: resetting restores game settings while keeping the
    /// preset's identity.
    pub reset_clears_nickname: bool,
}

/// Owner of the three preset slots.
///
/// All reads resolve through the schema's defaults; all writes validate
/// first and leave the store untouched on failure.
#[derive(Debug)]
pub struct PresetStore {
    schema: Arc<Schema>,
    slots: [PresetSlot; 3],
    options: StoreOptions,
}

impl PresetStore {
    /// Creates a store with every slot at defaults.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_options(schema, StoreOptions::default())
    }

    /// Creates a store with explicit behavior switches.
    pub fn with_options(schema: Arc<Schema>, options: StoreOptions) -> Self {
        Self {
            schema,
            slots: std::array::from_fn(|_| PresetSlot::default()),
            options,
        }
    }

    /// The schema this store validates against.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Shared handle to the schema, for collaborators that outlive a
    /// borrow of the store.
    pub fn schema_handle(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// Resolved value of `name` in slot `id`: the stored value when the
    /// slot has one, the schema default otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::UnknownSetting`] for an unregistered name.
    pub fn value(&self, id: SlotId, name: &str) -> Result<String, PresetError> {
        let definition = self.schema.get(name)?;
        let slot = &self.slots[id.index()];
        Ok(slot
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| definition.default.clone()))
    }

    /// Validates `value` and stores it under `name` in slot `id`.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::UnknownSetting`] or
    /// [`PresetError::InvalidValue`]; in both cases the store is unchanged.
    pub fn set_value(
        &mut self,
        id: SlotId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), PresetError> {
        let value = value.into();
        self.schema.validate(name, &value)?;
        self.slots[id.index()]
            .values
            .insert(name.to_string(), value);
        Ok(())
    }

    /// The slot's nickname, possibly empty.
    pub fn nickname(&self, id: SlotId) -> &str {
        &self.slots[id.index()].nickname
    }

    /// Stores the nickname verbatim. Nicknames are labels, not settings,
    /// and are not validated.
    pub fn set_nickname(&mut self, id: SlotId, nickname: impl Into<String>) {
        self.slots[id.index()].nickname = nickname.into();
    }

    /// Clears the slot's explicit values so every setting resolves to its
    /// default again. The nickname is kept unless
    /// [`StoreOptions::reset_clears_nickname`] is set.
    pub fn reset_to_defaults(&mut self, id: SlotId) {
        let slot = &mut self.slots[id.index()];
        slot.values.clear();
        if self.options.reset_clears_nickname {
            slot.nickname.clear();
        }
    }

    /// Immutable resolved copy of slot `id`, entries in schema declaration
    /// order.
    pub fn snapshot(&self, id: SlotId) -> PresetSnapshot {
        let slot = &self.slots[id.index()];
        let entries = self
            .schema
            .definitions()
            .map(|definition| match slot.values.get(&definition.name) {
                Some(value) => SnapshotEntry {
                    name: definition.name.clone(),
                    value: value.clone(),
                    explicit: true,
                },
                None => SnapshotEntry {
                    name: definition.name.clone(),
                    value: definition.default.clone(),
                    explicit: false,
                },
            })
            .collect();

        PresetSnapshot {
            nickname: slot.nickname.clone(),
            entries,
        }
    }

    /// Applies a parsed document to slot `id` as one unit: every parsed
    /// value validates first, then the nickname and all values are written
    /// together. Settings the document does not name keep their current
    /// state.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; the slot is untouched on any
    /// error.
    pub fn apply_parsed(&mut self, id: SlotId, parsed: &ParsedPreset) -> Result<(), PresetError> {
        for (name, value) in &parsed.values {
            self.schema.validate(name, value)?;
        }

        let slot = &mut self.slots[id.index()];
        slot.nickname = parsed.nickname.clone();
        for (name, value) in &parsed.values {
            slot.values.insert(name.clone(), value.clone());
        }
        Ok(())
    }

    /// Copies slot `id`'s raw state for the persistence boundary. Only
    /// explicit values are included; defaults are not materialized.
    pub fn slot_state(&self, id: SlotId) -> StoredSlot {
        let slot = &self.slots[id.index()];
        StoredSlot {
            nickname: slot.nickname.clone(),
            values: slot.values.clone(),
        }
    }

    /// Restores slot `id` from storage, dropping entries the current
    /// schema no longer accepts (renamed settings, stale constraints).
    /// Returns how many entries were dropped.
    pub fn restore_slot(&mut self, id: SlotId, state: StoredSlot) -> usize {
        let mut dropped = 0;
        let mut values = HashMap::new();
        for (name, value) in state.values {
            match self.schema.validate(&name, &value) {
                Ok(()) => {
                    values.insert(name, value);
                }
                Err(e) => {
                    log::warn!("dropping stored entry for preset {}: {e}", id.number());
                    dropped += 1;
                }
            }
        }

        let slot = &mut self.slots[id.index()];
        slot.nickname = state.nickname;
        slot.values = values;
        dropped
    }
}

/// Clonable handle sharing one [`PresetStore`] across threads.
///
/// Intended for hosts that run a background autosave next to the
/// interactive session: [`SharedPresetStore::snapshot`] holds the lock only
/// for the copy, so a concurrent `set_value` can never observe or produce a
/// half-written slot.
#[derive(Debug, Clone)]
pub struct SharedPresetStore {
    inner: Arc<Mutex<PresetStore>>,
}

impl SharedPresetStore {
    /// Wraps a store for shared access.
    pub fn new(store: PresetStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Locks the store for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, PresetStore> {
        self.inner.lock()
    }

    /// Atomically copies one slot's resolved state.
    pub fn snapshot(&self, id: SlotId) -> PresetSnapshot {
        self.inner.lock().snapshot(id)
    }
}
