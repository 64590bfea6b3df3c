//! Named snapshots of the placed-object list.
//!
//! Presets are append-only within a session; the JSON export is the stable
//! exchange format, so the field names are literal.

use serde::{Deserialize, Serialize};

use crate::types::Placed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetItem {
    pub x_cm: i32,
    pub y_cm: i32,
    pub w_cm: i32,
    pub h_cm: i32,
    pub typ: String,
}

impl From<&Placed> for PresetItem {
    fn from(p: &Placed) -> Self {
        Self {
            x_cm: p.x,
            y_cm: p.y,
            w_cm: p.w,
            h_cm: p.h,
            typ: p.kind.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub items: Vec<PresetItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetStore {
    presets: Vec<Preset>,
}

impl PresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Appends a snapshot of the current bed under `name`.
    pub fn save(&mut self, name: &str, objects: &[Placed]) {
        self.presets.push(Preset {
            name: name.to_string(),
            items: objects.iter().map(PresetItem::from).collect(),
        });
    }

    pub fn clear(&mut self) {
        self.presets.clear();
    }

    /// All presets as a 2-space-indented JSON array, order preserved.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.presets)
    }
}
