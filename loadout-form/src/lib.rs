//! Binding layer between a host UI and the preset store.
//!
//! The host owns widgets and event capture; this crate owns everything
//! between an input event and the store: field-to-setting routing,
//! per-field text buffers, inline validation feedback, the status line,
//! and the active-slot state machine. Covers:
//! - Declarative field bindings (`FieldBindings`)
//! - Form state and event handling (`PresetForm`)
//! - Export and import plumbing for the active slot
//! - Persistence wiring over any `PresetRepository`

pub mod bindings;
pub mod form;

// Binding table
pub use bindings::FieldBindings;

// Form state machine
pub use form::{ExportedPreset, FieldError, PresetForm, StatusMessage};
