//! Preset state management for the loadout preset manager.
//!
//! This crate provides the core of the player preset system. It includes:
//!
//! - Setting schema with typed constraints (text length caps, fixed option
//!   sets)
//! - Three fixed preset slots with default-fallback reads and atomic
//!   writes
//! - YAML export and import of single presets with strict or lenient
//!   validation
//! - Durable storage of all slots between sessions
//! - Built-in baseline settings

pub mod defaults;
pub mod document;
pub mod error;
pub mod persistence;
pub mod schema;
pub mod slot;
pub mod store;

// Re-export main types for convenience
pub use error::{ConstraintViolation, PresetError};
pub use schema::{Schema, SchemaBuilder, SettingDefinition, SettingKind};
pub use slot::{PresetSnapshot, SlotId, SnapshotEntry, StoredSlot};
pub use store::{PresetStore, SharedPresetStore, StoreOptions};
// Document serialization
pub use document::{DocumentFormat, ExportMode, ImportPolicy, ParsedPreset};
// Storage boundary
pub use persistence::{FilePresetRepository, PresetRepository, STORAGE_VERSION, StoredPresets};
