//! Form state and event handling for the preset editor.
//!
//! `PresetForm` is the layer between a host UI and the preset store. The
//! host owns widgets and event capture; the form owns which slot is
//! active, the text behind every bound field, validation feedback, and
//! the status line. Events arrive one at a time and each one finishes its
//! store mutation before the next is handled.

use crate::bindings::FieldBindings;
use loadout_config::{
    DocumentFormat, ExportMode, ImportPolicy, PresetRepository, PresetStore, SlotId,
};
use std::collections::HashMap;

/// One-line feedback for the status area of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Message text.
    pub text: String,

    /// Whether the message reports a failure.
    pub is_error: bool,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Inline validation failure attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The field whose edit was rejected.
    pub field_id: String,

    /// Human-readable description of the violated constraint.
    pub message: String,
}

/// An export ready to hand to the host's download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPreset {
    /// Serialized document text.
    pub document: String,

    /// Filename derived from the preset nickname.
    pub suggested_filename: String,
}

/// State machine binding editable fields to the active preset slot.
///
/// Exactly one slot is active at any time after construction; the form
/// starts bound to [`SlotId::One`] with every buffer populated, so there
/// is no unbound state to represent.
#[derive(Debug)]
pub struct PresetForm {
    store: PresetStore,
    bindings: FieldBindings,
    format: DocumentFormat,
    import_policy: ImportPolicy,
    active: SlotId,
    field_buffers: HashMap<String, String>,
    nickname_buffer: String,
    field_error: Option<FieldError>,
    status: Option<StatusMessage>,
    dirty: bool,
}

impl PresetForm {
    /// Creates a form over `store` with every schema setting bound under
    /// its own name.
    pub fn new(store: PresetStore) -> Self {
        let bindings = FieldBindings::identity(store.schema());
        Self::with_bindings(store, bindings)
    }

    /// Creates a form with an explicit binding table, for hosts whose
    /// widget ids differ from setting names.
    pub fn with_bindings(store: PresetStore, bindings: FieldBindings) -> Self {
        let mut form = Self {
            store,
            bindings,
            format: DocumentFormat::default(),
            import_policy: ImportPolicy::default(),
            active: SlotId::One,
            field_buffers: HashMap::new(),
            nickname_buffer: String::new(),
            field_error: None,
            status: None,
            dirty: false,
        };
        form.repopulate();
        form
    }

    /// Overrides the document contract used for export and import.
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Overrides the import policy (strict by default).
    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    // ── State accessors ────────────────────────────────────────────────

    /// The currently active slot.
    pub fn active_slot(&self) -> SlotId {
        self.active
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    /// The binding table the form was built with.
    pub fn bindings(&self) -> &FieldBindings {
        &self.bindings
    }

    /// Text to display in a bound field, or `None` for an unbound id.
    pub fn field_text(&self, field_id: &str) -> Option<&str> {
        self.field_buffers.get(field_id).map(String::as_str)
    }

    /// Text to display in the nickname field.
    pub fn nickname_text(&self) -> &str {
        &self.nickname_buffer
    }

    /// The current inline validation failure, if any.
    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_error.as_ref()
    }

    /// The current status line, if any.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Dismisses the status line.
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// True when slot state changed since the last successful persist or
    /// restore.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Events ─────────────────────────────────────────────────────────

    /// Switches the active slot and repopulates every buffer from it.
    pub fn select_slot(&mut self, id: SlotId) {
        self.active = id;
        self.repopulate();
        self.field_error = None;
    }

    /// Routes a raw field edit to its setting.
    ///
    /// On success the buffer takes the new text. On validation failure or
    /// for an unbound field id the store is unchanged and the buffer keeps
    /// the last accepted value, so the displayed text reverts; the failure
    /// is surfaced as [`PresetForm::field_error`].
    pub fn field_edited(&mut self, field_id: &str, raw: &str) {
        let Some(setting) = self.bindings.setting_for(field_id) else {
            log::error!("edit for unbound field '{field_id}' rejected");
            self.field_error = Some(FieldError {
                field_id: field_id.to_string(),
                message: format!("'{field_id}' is not bound to any setting"),
            });
            return;
        };

        match self.store.set_value(self.active, setting, raw) {
            Ok(()) => {
                self.field_buffers
                    .insert(field_id.to_string(), raw.to_string());
                self.field_error = None;
                self.dirty = true;
            }
            Err(e) => {
                log::debug!("rejected edit of '{field_id}': {e}");
                self.field_error = Some(FieldError {
                    field_id: field_id.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    /// Stores the nickname verbatim and mirrors it into the buffer.
    pub fn nickname_edited(&mut self, raw: &str) {
        self.store.set_nickname(self.active, raw);
        self.nickname_buffer = raw.to_string();
        self.dirty = true;
    }

    /// Resets the active slot to defaults and repopulates the buffers.
    pub fn reset_clicked(&mut self) {
        self.store.reset_to_defaults(self.active);
        self.repopulate();
        self.field_error = None;
        self.dirty = true;
        self.status = Some(StatusMessage::info(format!(
            "{} reset to defaults",
            self.active.display_name()
        )));
    }

    /// Serializes the active slot for the host's download collaborator.
    ///
    /// Returns `None` when serialization fails; the failure is reported
    /// through the status line.
    pub fn export_clicked(&mut self, mode: ExportMode) -> Option<ExportedPreset> {
        let snapshot = self.store.snapshot(self.active);
        match self.format.serialize(&snapshot, mode) {
            Ok(document) => {
                let suggested_filename = self.format.suggested_filename(&snapshot.nickname);
                log::info!(
                    "exported {} as {suggested_filename}",
                    self.active.display_name()
                );
                self.status = Some(StatusMessage::info(format!(
                    "Exported {suggested_filename}"
                )));
                Some(ExportedPreset {
                    document,
                    suggested_filename,
                })
            }
            Err(e) => {
                log::error!("preset export failed: {e}");
                self.status = Some(StatusMessage::error(format!("Export failed: {e}")));
                None
            }
        }
    }

    /// Imports document text into the active slot.
    ///
    /// The import is a unit: on any parse or validation failure the slot
    /// and the buffers stay as they were and the status line carries a
    /// message naming the first offending field.
    pub fn import_document(&mut self, text: &str) {
        let parsed = match self
            .format
            .deserialize(text, self.store.schema(), self.import_policy)
        {
            Ok(parsed) => parsed,
            Err(e) => {
                log::error!("preset import rejected: {e}");
                self.status = Some(StatusMessage::error(format!("Import failed: {e}")));
                return;
            }
        };

        match self.store.apply_parsed(self.active, &parsed) {
            Ok(()) => {
                self.repopulate();
                self.field_error = None;
                self.dirty = true;
                self.status = Some(StatusMessage::info(format!(
                    "Imported into {}",
                    self.active.display_name()
                )));
            }
            Err(e) => {
                log::error!("imported preset could not be applied: {e}");
                self.status = Some(StatusMessage::error(format!("Import failed: {e}")));
            }
        }
    }

    /// Saves every slot to the repository.
    ///
    /// A failure leaves in-memory state untouched and is reported through
    /// the status line.
    pub fn persist(&mut self, repository: &mut dyn PresetRepository) {
        for id in SlotId::ALL {
            let state = self.store.slot_state(id);
            if let Err(e) = repository.save(id, &state) {
                log::error!("failed to save {}: {e}", id.display_name());
                self.status = Some(StatusMessage::error(format!("Saving presets failed: {e}")));
                return;
            }
        }
        self.dirty = false;
        log::info!("persisted all preset slots");
        self.status = Some(StatusMessage::info("Presets saved"));
    }

    /// Loads every stored slot from the repository.
    ///
    /// Missing storage keeps the defaults silently; a read failure keeps
    /// the defaults and is reported through the status line.
    pub fn restore(&mut self, repository: &mut dyn PresetRepository) {
        match repository.load() {
            Ok(Some(stored)) => {
                let mut dropped = 0;
                for id in SlotId::ALL {
                    if let Some(state) = stored.slot(id) {
                        dropped += self.store.restore_slot(id, state.clone());
                    }
                }
                self.dirty = false;
                self.repopulate();
                self.field_error = None;
                if dropped > 0 {
                    log::info!("restored presets, dropped {dropped} outdated entries");
                } else {
                    log::info!("restored presets");
                }
            }
            Ok(None) => {
                log::info!("no stored presets, keeping defaults");
            }
            Err(e) => {
                log::error!("failed to load presets: {e}");
                self.status = Some(StatusMessage::error(format!("Loading presets failed: {e}")));
            }
        }
    }

    /// Refills every buffer from the active slot.
    fn repopulate(&mut self) {
        self.field_buffers.clear();
        for (field_id, setting) in self.bindings.entries() {
            match self.store.value(self.active, setting) {
                Ok(value) => {
                    self.field_buffers.insert(field_id.to_string(), value);
                }
                Err(e) => {
                    log::error!("field '{field_id}' is bound to an unusable setting: {e}");
                }
            }
        }
        self.nickname_buffer = self.store.nickname(self.active).to_string();
    }
}
