//! Setting schema: declarations, constraints, and validation.
//!
//! Covers:
//! - `SettingKind` / `SettingDefinition` (the shape of one setting)
//! - `SchemaBuilder` (mutable registration phase, startup only)
//! - `Schema` (frozen lookup table used for every read and validation)
//!
//! The schema is write-once: hosts register every setting through
//! [`SchemaBuilder`] during startup, then call [`SchemaBuilder::freeze`].
//! After freezing there is no mutation path, so lookups and validation can
//! be shared freely across the store and the serializer.

use crate::error::{ConstraintViolation, PresetError};
use std::collections::HashMap;

/// Value shape of a single setting.
///
/// All values are carried as strings; the kind determines which strings are
/// acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
    /// Free-form text, optionally capped at `max_length` characters.
    Text {
        /// Maximum accepted length in characters, `None` for unlimited.
        max_length: Option<usize>,
    },
    /// Exactly one value out of a fixed option set.
    Choice {
        /// The accepted values, in display order.
        options: Vec<String>,
    },
}

impl SettingKind {
    /// Checks `value` against this kind's constraints.
    pub fn check(&self, value: &str) -> Result<(), ConstraintViolation> {
        match self {
            SettingKind::Text { max_length } => {
                if let Some(limit) = max_length {
                    let actual = value.chars().count();
                    if actual > *limit {
                        return Err(ConstraintViolation::TooLong {
                            limit: *limit,
                            actual,
                        });
                    }
                }
                Ok(())
            }
            SettingKind::Choice { options } => {
                if options.iter().any(|option| option == value) {
                    Ok(())
                } else {
                    Err(ConstraintViolation::NotAnOption {
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}

/// One registered setting: its unique name, value kind, and default.
///
/// Immutable once the definition has been accepted by
/// [`SchemaBuilder::define`]; the default is checked against the kind's own
/// constraints at registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDefinition {
    /// Unique setting name, used as the key everywhere (store, documents,
    /// storage).
    pub name: String,

    /// Value shape and constraints.
    pub kind: SettingKind,

    /// Value a slot resolves to when it has no explicit entry.
    pub default: String,
}

impl SettingDefinition {
    /// Creates an unlimited text setting.
    pub fn text(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SettingKind::Text { max_length: None },
            default: default.into(),
        }
    }

    /// Creates a fixed-option setting.
    pub fn choice(
        name: impl Into<String>,
        default: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: SettingKind::Choice {
                options: options.into_iter().map(Into::into).collect(),
            },
            default: default.into(),
        }
    }

    /// Caps a text setting at `limit` characters. Has no effect on choice
    /// settings.
    pub fn with_max_length(mut self, limit: usize) -> Self {
        if let SettingKind::Text { max_length } = &mut self.kind {
            *max_length = Some(limit);
        }
        self
    }
}

/// Mutable registration phase of the schema.
///
/// Collects definitions in declaration order, rejecting duplicates and
/// defaults that violate their own constraints, then freezes into an
/// immutable [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    definitions: Vec<SettingDefinition>,
    index: HashMap<String, usize>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one setting.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::DuplicateSetting`] if the name is already
    /// registered, or [`PresetError::InvalidValue`] if the definition's
    /// default does not satisfy its own constraints.
    pub fn define(&mut self, definition: SettingDefinition) -> Result<(), PresetError> {
        if self.index.contains_key(&definition.name) {
            return Err(PresetError::DuplicateSetting {
                name: definition.name,
            });
        }
        if let Err(reason) = definition.kind.check(&definition.default) {
            return Err(PresetError::InvalidValue {
                name: definition.name,
                reason,
            });
        }

        self.index
            .insert(definition.name.clone(), self.definitions.len());
        self.definitions.push(definition);
        Ok(())
    }

    /// Freezes the builder into an immutable schema.
    pub fn freeze(self) -> Schema {
        Schema {
            definitions: self.definitions,
            index: self.index,
        }
    }
}

/// Frozen lookup table over every registered setting.
///
/// Declaration order is preserved and drives the entry order of snapshots
/// and exported documents.
#[derive(Debug)]
pub struct Schema {
    definitions: Vec<SettingDefinition>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Starts a new registration phase.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Looks up a definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::UnknownSetting`] if the name is not
    /// registered.
    pub fn get(&self, name: &str) -> Result<&SettingDefinition, PresetError> {
        self.index
            .get(name)
            .map(|&i| &self.definitions[i])
            .ok_or_else(|| PresetError::UnknownSetting {
                name: name.to_string(),
            })
    }

    /// True when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Checks `value` against the named setting's constraints.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError::UnknownSetting`] for an unregistered name, or
    /// [`PresetError::InvalidValue`] naming the violated constraint.
    pub fn validate(&self, name: &str, value: &str) -> Result<(), PresetError> {
        let definition = self.get(name)?;
        definition
            .kind
            .check(value)
            .map_err(|reason| PresetError::InvalidValue {
                name: name.to_string(),
                reason,
            })
    }

    /// Iterates every definition in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &SettingDefinition> {
        self.definitions.iter()
    }

    /// Number of registered settings.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// True when no settings are registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
