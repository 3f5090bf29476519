//! Typed error variants for the loadout-config crate.
//!
//! Provides structured error types for schema registration, value
//! validation, document import, and preset storage so callers can match on
//! specific failure modes instead of opaque strings.

use thiserror::Error;

/// The constraint a value failed, carried inside
/// [`PresetError::InvalidValue`].
///
/// Each variant renders a human-readable description that names the limit
/// that was violated, suitable for inline display next to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    /// A text value is longer than the setting's declared maximum.
    #[error("exceeds maximum length {limit} (got {actual})")]
    TooLong {
        /// Declared maximum length in characters.
        limit: usize,
        /// Length of the rejected value in characters.
        actual: usize,
    },

    /// A choice value is not a member of the setting's option set.
    #[error("'{value}' is not one of the allowed options")]
    NotAnOption {
        /// The rejected value.
        value: String,
    },

    /// A document entry holds a nested structure where a plain scalar
    /// (string, number, bool, or null) was expected.
    #[error("value is not a plain scalar")]
    NotScalar,
}

/// Top-level error type for the preset manager.
///
/// Covers the failure categories callers need to distinguish:
/// - schema registration and lookup
/// - value validation
/// - preset document import
/// - durable storage I/O
#[derive(Debug, Error)]
pub enum PresetError {
    // -----------------------------------------------------------------------
    // Schema registry
    // -----------------------------------------------------------------------
    /// The named setting is not registered in the schema.
    #[error("unknown setting '{name}'")]
    UnknownSetting {
        /// The unrecognized setting name.
        name: String,
    },

    /// A setting name was registered twice during schema construction.
    #[error("setting '{name}' is already registered")]
    DuplicateSetting {
        /// The name that was registered a second time.
        name: String,
    },

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------
    /// A value failed the named setting's constraints.
    #[error("invalid value for '{name}': {reason}")]
    InvalidValue {
        /// The setting the value was destined for.
        name: String,
        /// Which constraint was violated.
        reason: ConstraintViolation,
    },

    // -----------------------------------------------------------------------
    // Document import
    // -----------------------------------------------------------------------
    /// An imported document is not structurally a preset (unparseable text,
    /// a non-mapping top level, or an unexpected top-level field).
    #[error("malformed preset document: {0}")]
    Document(String),

    // -----------------------------------------------------------------------
    // Storage boundary
    // -----------------------------------------------------------------------
    /// An I/O error occurred reading or writing the preset storage file.
    #[error("I/O error accessing preset storage: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or emitted YAML could not be processed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PresetError {
    /// True when the error names a setting, i.e. it can be surfaced inline
    /// next to the field it belongs to rather than as a document-level
    /// message.
    pub fn setting_name(&self) -> Option<&str> {
        match self {
            PresetError::UnknownSetting { name }
            | PresetError::DuplicateSetting { name }
            | PresetError::InvalidValue { name, .. } => Some(name),
            PresetError::Document(_) | PresetError::Io(_) | PresetError::Yaml(_) => None,
        }
    }
}
