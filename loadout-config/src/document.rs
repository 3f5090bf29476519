//! Preset document serialization: YAML export and import.
//!
//! Covers:
//! - `DocumentFormat` (the document contract: top-level key names,
//!   placeholder label, `serialize` / `deserialize` / `suggested_filename`)
//! - `ExportMode` (minimal vs full emission)
//! - `ImportPolicy` (strict vs lenient handling of unknown keys)
//! - `ParsedPreset` (validated import result)
//!
//! The exact top-level field names must match whatever the downstream
//! session tool parses, so they are carried in [`DocumentFormat`] instead
//! of being hardcoded; the defaults follow the tool's observed labels.

use crate::error::{ConstraintViolation, PresetError};
use crate::schema::Schema;
use crate::slot::PresetSnapshot;
use serde_yaml_ng::{Mapping, Value};
use std::collections::HashMap;

/// Which settings a serialized document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Only values the slot stores explicitly.
    Minimal,
    /// Every registered setting, resolved through defaults.
    #[default]
    Full,
}

/// How deserialization treats keys the schema does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportPolicy {
    /// Reject the whole document on the first unknown key.
    #[default]
    Strict,
    /// Skip unknown keys, logging a warning for each.
    Lenient,
}

/// Validated result of deserializing a preset document, ready to be
/// applied to a store slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPreset {
    /// Nickname carried by the document, empty when the document had none.
    pub nickname: String,

    /// Validated setting values keyed by name.
    pub values: HashMap<String, String>,
}

/// The document contract: top-level field names and the placeholder label
/// written for unnamed presets.
///
/// A document looks like:
///
/// ```yaml
/// description: Speedrun
/// settings:
///   name: Hero
///   mode: open
/// ```
///
/// Keeping the settings under their own mapping means a registered setting
/// may itself be called `description` without colliding with the preset
/// label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFormat {
    /// Top-level key holding the preset nickname.
    pub nickname_key: String,

    /// Top-level key holding the settings mapping.
    pub settings_key: String,

    /// Label written when the preset has no nickname. Stable: the same
    /// snapshot always serializes to the same bytes.
    pub placeholder_nickname: String,
}

impl Default for DocumentFormat {
    fn default() -> Self {
        Self {
            nickname_key: "description".to_string(),
            settings_key: "settings".to_string(),
            placeholder_nickname: "Unnamed preset".to_string(),
        }
    }
}

impl DocumentFormat {
    /// Overrides the nickname key.
    pub fn with_nickname_key(mut self, key: impl Into<String>) -> Self {
        self.nickname_key = key.into();
        self
    }

    /// Overrides the settings mapping key.
    pub fn with_settings_key(mut self, key: impl Into<String>) -> Self {
        self.settings_key = key.into();
        self
    }

    /// Overrides the placeholder label for unnamed presets.
    pub fn with_placeholder(mut self, label: impl Into<String>) -> Self {
        self.placeholder_nickname = label.into();
        self
    }

    /// Serializes a snapshot to document text.
    ///
    /// Deterministic: settings are emitted in the snapshot's entry order,
    /// which the store derives from schema declaration order. An empty
    /// nickname is written as the placeholder label.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::Yaml`] if emission fails.
    pub fn serialize(
        &self,
        snapshot: &PresetSnapshot,
        mode: ExportMode,
    ) -> Result<String, PresetError> {
        let mut settings = Mapping::new();
        for entry in &snapshot.entries {
            if mode == ExportMode::Minimal && !entry.explicit {
                continue;
            }
            settings.insert(
                Value::String(entry.name.clone()),
                Value::String(entry.value.clone()),
            );
        }

        let nickname = if snapshot.nickname.is_empty() {
            self.placeholder_nickname.clone()
        } else {
            snapshot.nickname.clone()
        };

        let mut root = Mapping::new();
        root.insert(
            Value::String(self.nickname_key.clone()),
            Value::String(nickname),
        );
        root.insert(
            Value::String(self.settings_key.clone()),
            Value::Mapping(settings),
        );

        Ok(serde_yaml_ng::to_string(&Value::Mapping(root))?)
    }

    /// Parses and validates document text.
    ///
    /// Setting values may be written as any plain scalar; numbers and
    /// booleans are read back as their textual form and null as the empty
    /// string. Nothing is written to any slot; apply the result through
    /// `PresetStore::apply_parsed`.
    ///
    /// # Errors
    ///
    /// - [`PresetError::Document`] when the text is not YAML, the top
    ///   level is not a mapping, or (under [`ImportPolicy::Strict`]) an
    ///   unexpected top-level field is present.
    /// - [`PresetError::UnknownSetting`] naming the first unregistered
    ///   setting under [`ImportPolicy::Strict`].
    /// - [`PresetError::InvalidValue`] naming the first setting whose
    ///   value is not a scalar or fails its constraints.
    pub fn deserialize(
        &self,
        text: &str,
        schema: &Schema,
        policy: ImportPolicy,
    ) -> Result<ParsedPreset, PresetError> {
        let root: Value =
            serde_yaml_ng::from_str(text).map_err(|e| PresetError::Document(e.to_string()))?;
        let Value::Mapping(root) = root else {
            return Err(PresetError::Document(
                "top level is not a mapping".to_string(),
            ));
        };

        let mut nickname = String::new();
        let mut values = HashMap::new();

        for (key, value) in &root {
            let Some(key) = key.as_str() else {
                return Err(PresetError::Document(
                    "top-level keys must be strings".to_string(),
                ));
            };

            if key == self.nickname_key {
                nickname = scalar_to_string(value).ok_or_else(|| PresetError::InvalidValue {
                    name: key.to_string(),
                    reason: ConstraintViolation::NotScalar,
                })?;
            } else if key == self.settings_key {
                self.parse_settings(value, schema, policy, &mut values)?;
            } else {
                match policy {
                    ImportPolicy::Strict => {
                        return Err(PresetError::Document(format!(
                            "unexpected top-level field '{key}'"
                        )));
                    }
                    ImportPolicy::Lenient => {
                        log::warn!(
                            "skipping unexpected top-level field '{key}' in imported preset"
                        );
                    }
                }
            }
        }

        Ok(ParsedPreset { nickname, values })
    }

    /// Suggests a filename for a document exported from a preset with the
    /// given nickname: the ASCII slug of the nickname (placeholder label
    /// when empty) plus a `.yaml` extension.
    pub fn suggested_filename(&self, nickname: &str) -> String {
        let base = if nickname.trim().is_empty() {
            self.placeholder_nickname.as_str()
        } else {
            nickname
        };
        let mut slug = slugify(base);
        if slug.is_empty() {
            slug = slugify(&self.placeholder_nickname);
        }
        if slug.is_empty() {
            slug = "preset".to_string();
        }
        format!("{slug}.yaml")
    }

    fn parse_settings(
        &self,
        section: &Value,
        schema: &Schema,
        policy: ImportPolicy,
        values: &mut HashMap<String, String>,
    ) -> Result<(), PresetError> {
        let entries = match section {
            Value::Mapping(entries) => entries,
            Value::Null => return Ok(()),
            _ => {
                return Err(PresetError::Document(format!(
                    "'{}' is not a mapping",
                    self.settings_key
                )));
            }
        };

        for (key, value) in entries {
            let Some(name) = key.as_str() else {
                return Err(PresetError::Document(
                    "setting names must be strings".to_string(),
                ));
            };

            if !schema.contains(name) {
                match policy {
                    ImportPolicy::Strict => {
                        return Err(PresetError::UnknownSetting {
                            name: name.to_string(),
                        });
                    }
                    ImportPolicy::Lenient => {
                        log::warn!("skipping unknown setting '{name}' in imported preset");
                        continue;
                    }
                }
            }

            let text = scalar_to_string(value).ok_or_else(|| PresetError::InvalidValue {
                name: name.to_string(),
                reason: ConstraintViolation::NotScalar,
            })?;
            schema.validate(name, &text)?;
            values.insert(name.to_string(), text);
        }
        Ok(())
    }
}

/// Renders a plain YAML scalar as the string the store carries. `None` for
/// sequences, mappings, and tagged values.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Lowercases ASCII alphanumerics and joins runs with dashes; everything
/// else is dropped.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut gap = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    slug
}
