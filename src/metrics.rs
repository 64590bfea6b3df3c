//! Derived load metrics: used bed length and a coarse axle split.

use serde::Serialize;

use crate::geometry::rotated_bbox_w;
use crate::types::{EchoedObject, PalletKind, Placed, Trailer};

/// X-axis extent of one object, as far as the metrics care: left edge,
/// axis-aligned bounding-box width, and whether it counts double.
#[derive(Debug, Clone, Copy)]
pub struct Span {
    pub x: f64,
    pub bbox_w: f64,
    pub heavy: bool,
}

impl From<&Placed> for Span {
    fn from(p: &Placed) -> Self {
        Span {
            x: p.x as f64,
            bbox_w: p.w as f64,
            heavy: p.heavy(),
        }
    }
}

impl From<&EchoedObject> for Span {
    fn from(e: &EchoedObject) -> Self {
        // Surface geometry may still carry a transient rotation.
        Span {
            x: e.left,
            bbox_w: rotated_bbox_w(e.width * e.scale_x, e.height * e.scale_y, e.angle),
            heavy: PalletKind::from_name(&e.name).is_some_and(|k| k.heavy()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxleSplit {
    pub front_pct: i32,
    pub back_pct: i32,
}

/// Rearmost extent of the load in cm; 0 for an empty bed.
pub fn used_length<I>(spans: I) -> i32
where
    I: IntoIterator<Item = Span>,
{
    spans
        .into_iter()
        .map(|s| (s.x + s.bbox_w).round() as i32)
        .max()
        .unwrap_or(0)
}

/// Front/back load split as whole percentages summing to 100.
///
/// Each object contributes its X centre, weighted 2 for heavy types.
/// The share is linear in the centre's distance from half-length; this is
/// a rough positional estimate kept for parity with the original tool,
/// not an axle-geometry calculation.
pub fn axle_split<I>(spans: I, trailer: Trailer) -> AxleSplit
where
    I: IntoIterator<Item = Span>,
{
    let half = trailer.length as f64 / 2.0;
    let mut weighted = 0.0;
    let mut total = 0.0;
    for s in spans {
        let centre = s.x + s.bbox_w / 2.0;
        let g = if s.heavy { 2.0 } else { 1.0 };
        let share = (0.5 + (half - centre) / (2.0 * half)).clamp(0.0, 1.0);
        weighted += g * share;
        total += g;
    }
    if total == 0.0 {
        return AxleSplit {
            front_pct: 50,
            back_pct: 50,
        };
    }
    let front = (100.0 * weighted / total).round() as i32;
    AxleSplit {
        front_pct: front,
        back_pct: 100 - front,
    }
}

pub fn spans_of(objects: &[Placed]) -> impl Iterator<Item = Span> + '_ {
    objects.iter().map(Span::from)
}

pub fn spans_of_echo(echoes: &[EchoedObject]) -> impl Iterator<Item = Span> + '_ {
    echoes.iter().map(Span::from)
}
