//! Preset slot identity and slot-shaped value types.
//!
//! Exactly three preset slots exist for the lifetime of a session. The
//! fixed count lives in the [`SlotId`] type rather than in runtime checks;
//! there is no way to address a fourth slot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of one of the three preset slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// Slot 1, the slot bound to the form at startup.
    One,
    /// Slot 2.
    Two,
    /// Slot 3.
    Three,
}

impl SlotId {
    /// All slots in display order.
    pub const ALL: [SlotId; 3] = [SlotId::One, SlotId::Two, SlotId::Three];

    /// The 1-based slot number shown to users and written to storage.
    pub fn number(self) -> u8 {
        match self {
            SlotId::One => 1,
            SlotId::Two => 2,
            SlotId::Three => 3,
        }
    }

    /// Parses a stored 1-based slot number.
    pub fn from_number(number: u8) -> Option<SlotId> {
        match number {
            1 => Some(SlotId::One),
            2 => Some(SlotId::Two),
            3 => Some(SlotId::Three),
            _ => None,
        }
    }

    /// Returns a human-readable label for this slot.
    pub fn display_name(self) -> &'static str {
        match self {
            SlotId::One => "Preset 1",
            SlotId::Two => "Preset 2",
            SlotId::Three => "Preset 3",
        }
    }

    /// Zero-based array index for internal slot storage.
    pub(crate) fn index(self) -> usize {
        match self {
            SlotId::One => 0,
            SlotId::Two => 1,
            SlotId::Three => 2,
        }
    }
}

/// In-memory state of one slot: a nickname plus the sparse value mapping.
///
/// Keys absent from `values` resolve to the schema default on read. Both
/// fields are only reachable through `PresetStore`, which maintains the
/// invariant that every stored key is registered and every stored value is
/// valid.
#[derive(Debug, Clone, Default)]
pub(crate) struct PresetSlot {
    pub(crate) nickname: String,
    pub(crate) values: HashMap<String, String>,
}

/// One resolved setting inside a [`PresetSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// Setting name.
    pub name: String,

    /// Resolved value: the stored value when `explicit`, the schema default
    /// otherwise.
    pub value: String,

    /// Whether the slot stores this value explicitly.
    pub explicit: bool,
}

/// Immutable point-in-time copy of one slot, fully resolved through
/// defaults.
///
/// Entries appear in schema declaration order, which makes serialization
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetSnapshot {
    /// The slot's nickname, possibly empty.
    pub nickname: String,

    /// One entry per registered setting, in declaration order.
    pub entries: Vec<SnapshotEntry>,
}

impl PresetSnapshot {
    /// Resolved value of `name`, or `None` when the setting is not part of
    /// this snapshot's schema.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// True when the slot stores `name` explicitly rather than resolving it
    /// from the default.
    pub fn is_explicit(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.name == name && entry.explicit)
    }
}

/// Persisted shape of one slot, as written to the preset storage file.
///
/// Only explicitly set values are stored; defaults are resolved against the
/// schema on restore, so schema default changes between sessions take
/// effect for values the user never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSlot {
    /// The slot's nickname, omitted from the file when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nickname: String,

    /// Explicitly set values keyed by setting name, omitted when empty.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub values: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_numbers() {
        assert_eq!(SlotId::One.number(), 1);
        assert_eq!(SlotId::Two.number(), 2);
        assert_eq!(SlotId::Three.number(), 3);

        for id in SlotId::ALL {
            assert_eq!(SlotId::from_number(id.number()), Some(id));
        }
        assert_eq!(SlotId::from_number(0), None);
        assert_eq!(SlotId::from_number(4), None);
    }

    #[test]
    fn test_display_names() {
        let labels: Vec<&str> = SlotId::ALL.iter().map(|id| id.display_name()).collect();
        assert_eq!(labels, ["Preset 1", "Preset 2", "Preset 3"]);
    }

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = PresetSnapshot {
            nickname: "Speedrun".to_string(),
            entries: vec![
                SnapshotEntry {
                    name: "name".to_string(),
                    value: "Hero".to_string(),
                    explicit: true,
                },
                SnapshotEntry {
                    name: "description".to_string(),
                    value: String::new(),
                    explicit: false,
                },
            ],
        };

        assert_eq!(snapshot.value("name"), Some("Hero"));
        assert_eq!(snapshot.value("description"), Some(""));
        assert_eq!(snapshot.value("missing"), None);
        assert!(snapshot.is_explicit("name"));
        assert!(!snapshot.is_explicit("description"));
    }

    #[test]
    fn test_stored_slot_yaml_roundtrip() {
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Hero".to_string());
        let slot = StoredSlot {
            nickname: "Speedrun".to_string(),
            values,
        };

        let yaml = serde_yaml_ng::to_string(&slot).expect("serialize");
        let back: StoredSlot = serde_yaml_ng::from_str(&yaml).expect("deserialize");
        assert_eq!(back, slot);
    }

    #[test]
    fn test_stored_slot_empty_fields_omitted() {
        let yaml = serde_yaml_ng::to_string(&StoredSlot::default()).expect("serialize");
        assert!(!yaml.contains("nickname"));
        assert!(!yaml.contains("values"));

        let back: StoredSlot = serde_yaml_ng::from_str("{}").expect("deserialize empty mapping");
        assert_eq!(back, StoredSlot::default());
    }
}
