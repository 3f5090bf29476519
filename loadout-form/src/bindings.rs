//! Field-to-setting bindings.
//!
//! Each editable field in the host UI is identified by a stable field id.
//! The binding table maps those ids to setting names once, at
//! initialization, so no runtime inspection of UI elements is needed to
//! route an edit to its setting.

use loadout_config::Schema;
use std::collections::HashMap;

/// Registration table from field id to setting name.
///
/// Built once when the form is constructed. Most hosts use
/// [`FieldBindings::identity`], where every registered setting is bound
/// under its own name; [`FieldBindings::bind`] supports hosts whose widget
/// ids differ from setting names.
#[derive(Debug, Clone, Default)]
pub struct FieldBindings {
    map: HashMap<String, String>,
}

impl FieldBindings {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every setting in `schema` under its own name.
    pub fn identity(schema: &Schema) -> Self {
        let mut bindings = Self::new();
        for definition in schema.definitions() {
            bindings.bind(definition.name.clone(), definition.name.clone());
        }
        bindings
    }

    /// Binds `field_id` to `setting`. Rebinding an id replaces its target.
    pub fn bind(&mut self, field_id: impl Into<String>, setting: impl Into<String>) {
        self.map.insert(field_id.into(), setting.into());
    }

    /// The setting a field id is bound to.
    pub fn setting_for(&self, field_id: &str) -> Option<&str> {
        self.map.get(field_id).map(String::as_str)
    }

    /// Iterates `(field_id, setting_name)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .iter()
            .map(|(field_id, setting)| (field_id.as_str(), setting.as_str()))
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no fields are bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadout_config::SettingDefinition;

    fn test_schema() -> Schema {
        let mut builder = Schema::builder();
        builder
            .define(SettingDefinition::text("description", ""))
            .expect("define description");
        builder
            .define(SettingDefinition::text("name", "").with_max_length(16))
            .expect("define name");
        builder.freeze()
    }

    #[test]
    fn test_identity_covers_every_setting() {
        let schema = test_schema();
        let bindings = FieldBindings::identity(&schema);

        assert_eq!(bindings.len(), schema.len());
        assert_eq!(bindings.setting_for("name"), Some("name"));
        assert_eq!(bindings.setting_for("description"), Some("description"));
    }

    #[test]
    fn test_custom_binding() {
        let mut bindings = FieldBindings::new();
        bindings.bind("player-name-input", "name");

        assert_eq!(bindings.setting_for("player-name-input"), Some("name"));
        assert_eq!(bindings.setting_for("name"), None);
    }

    #[test]
    fn test_rebinding_replaces_target() {
        let mut bindings = FieldBindings::new();
        bindings.bind("field", "name");
        bindings.bind("field", "description");

        assert_eq!(bindings.setting_for("field"), Some("description"));
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_unbound_field_is_none() {
        let bindings = FieldBindings::identity(&test_schema());
        assert_eq!(bindings.setting_for("unknown-widget"), None);
    }
}
