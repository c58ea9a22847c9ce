//! Group domain model.
//!
//! # Invariants
//! - `name` is trimmed and non-empty for groups created through the store.
//! - Name matching for import is case-insensitive; see [`group_name_key`].

use crate::model::id::GroupId;
use crate::model::palette::PaletteColor;
use serde::{Deserialize, Serialize};

/// Groups seeded on first run, in display order.
pub const DEFAULT_GROUPS: [(&str, PaletteColor); 3] = [
    ("Work", PaletteColor::Blue),
    ("Family", PaletteColor::Green),
    ("Friends", PaletteColor::Purple),
];

/// Named, colored label that partitions contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub color: PaletteColor,
    /// Carried for snapshot compatibility; nothing reads it yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Group {
    pub fn new(name: impl Into<String>, color: PaletteColor) -> Self {
        Self {
            id: GroupId::generate(),
            name: name.into(),
            color,
            description: None,
        }
    }

    pub fn defaults() -> Vec<Self> {
        DEFAULT_GROUPS
            .iter()
            .map(|(name, color)| Self::new(*name, *color))
            .collect()
    }
}

/// Normalized lookup key for a group name: trimmed and lower-cased.
pub fn group_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
