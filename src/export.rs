//! Saved-layout document: the trailer, the surface's object records as
//! last echoed, and the derived metrics, in the stable on-disk JSON shape.

use serde::Serialize;

use crate::metrics::{self, AxleSplit};
use crate::types::{EchoedObject, Trailer};

#[derive(Debug, Clone, Serialize)]
pub struct TrailerMeta {
    #[serde(rename = "L_cm")]
    pub length_cm: i32,
    #[serde(rename = "W_cm")]
    pub width_cm: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutMeta {
    pub trailer: TrailerMeta,
    pub cell_cm: i32,
    pub scale_px_per_cm: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutMetrics {
    pub used_length_cm: i32,
    pub axle_front_pct: i32,
    pub axle_back_pct: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedLayout {
    pub meta: LayoutMeta,
    pub objects: Vec<EchoedObject>,
    pub metrics: LayoutMetrics,
}

impl SavedLayout {
    /// Builds the document from the last echo tick. Metrics are measured
    /// on the echoed geometry, transient rotations included.
    pub fn from_echo(trailer: Trailer, objects: Vec<EchoedObject>) -> Self {
        let used = metrics::used_length(metrics::spans_of_echo(&objects));
        let AxleSplit {
            front_pct,
            back_pct,
        } = metrics::axle_split(metrics::spans_of_echo(&objects), trailer);
        Self {
            meta: LayoutMeta {
                trailer: TrailerMeta {
                    length_cm: trailer.length,
                    width_cm: trailer.width,
                },
                cell_cm: Trailer::LAYOUT_CELL,
                scale_px_per_cm: 1.0,
                verified: true,
            },
            objects,
            metrics: LayoutMetrics {
                used_length_cm: used,
                axle_front_pct: front_pct,
                axle_back_pct: back_pct,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
