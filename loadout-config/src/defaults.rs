//! Built-in defaults: the baseline schema and its constants.
//!
//! Hosts that manage a richer option catalog start from
//! [`baseline_schema`] and keep registering their own settings on the
//! returned builder before freezing.

use crate::error::PresetError;
use crate::schema::{Schema, SchemaBuilder, SettingDefinition};

// ── Constants ──────────────────────────────────────────────────────────────

/// Maximum character length of the player name setting.
pub fn max_name_length() -> usize {
    16
}

// ── Baseline schema ────────────────────────────────────────────────────────

/// Builder pre-loaded with the baseline settings every host starts from:
/// a free-form `description` and a length-capped player `name`.
///
/// # Errors
///
/// Returns [`PresetError::DuplicateSetting`] or
/// [`PresetError::InvalidValue`] if registration fails.
pub fn baseline_builder() -> Result<SchemaBuilder, PresetError> {
    let mut builder = Schema::builder();
    builder.define(SettingDefinition::text("description", ""))?;
    builder.define(SettingDefinition::text("name", "").with_max_length(max_name_length()))?;
    Ok(builder)
}

/// The baseline schema, frozen as-is.
///
/// # Errors
///
/// Returns [`PresetError::DuplicateSetting`] or
/// [`PresetError::InvalidValue`] if registration fails.
pub fn baseline_schema() -> Result<Schema, PresetError> {
    Ok(baseline_builder()?.freeze())
}
