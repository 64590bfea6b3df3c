//! Deterministic bottom-left shelf packer for batch filling the bed.

use crate::types::{PalletKind, Trailer};

/// One rectangle to place, in request order.
#[derive(Debug, Clone, Copy)]
pub struct PackRequest {
    pub kind: PalletKind,
    pub w: i32,
    pub h: i32,
}

impl PackRequest {
    /// Canonical footprint request; None for Custom, which carries no
    /// canonical size.
    pub fn canonical(kind: PalletKind) -> Option<Self> {
        let (w, h) = kind.size()?;
        Some(Self { kind, w, h })
    }
}

/// Per-type counts entered in the sidebar. Expansion order matches the
/// request order of the original tool: Euro, Industrie, Blumenwagen, IBC,
/// then customs.
#[derive(Debug, Clone, Default)]
pub struct PackCounts {
    pub euro: u32,
    pub industrie: u32,
    pub blumenwagen: u32,
    pub ibc: u32,
    pub custom: Vec<(i32, i32)>,
}

impl PackCounts {
    pub fn to_requests(&self) -> Vec<PackRequest> {
        let named = [
            (PalletKind::Euro, self.euro),
            (PalletKind::Industrie, self.industrie),
            (PalletKind::Blumenwagen, self.blumenwagen),
            (PalletKind::Ibc, self.ibc),
        ];
        let mut requests = Vec::new();
        for (kind, qty) in named {
            if let Some(req) = PackRequest::canonical(kind) {
                requests.extend(std::iter::repeat_n(req, qty as usize));
            }
        }
        for &(w, h) in &self.custom {
            requests.push(PackRequest {
                kind: PalletKind::Custom,
                w,
                h,
            });
        }
        requests
    }

    pub fn total(&self) -> usize {
        (self.euro + self.industrie + self.blumenwagen + self.ibc) as usize + self.custom.len()
    }
}

/// A placed request: top-left corner in cm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackPlacement {
    pub kind: PalletKind,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Result of one packing run. Requests that did not fit are reported as
/// log lines and skipped; placement order follows request order.
#[derive(Debug, Clone)]
pub struct PackReport {
    pub placements: Vec<PackPlacement>,
    pub log: Vec<String>,
}

impl PackReport {
    pub fn all_placed(&self) -> bool {
        self.log.is_empty()
    }
}

/// Bottom-left first-fit on an occupancy grid of PACK_CELL-sized cells.
/// Scan order is Y outer, X inner, so ties resolve leftmost-front-first.
pub struct ShelfPacker {
    trailer: Trailer,
    cell: i32,
}

impl ShelfPacker {
    pub fn new(trailer: Trailer) -> Self {
        Self {
            trailer,
            cell: Trailer::PACK_CELL,
        }
    }

    pub fn pack(&self, requests: &[PackRequest]) -> PackReport {
        let cols = (self.trailer.length / self.cell) as usize;
        let rows = (self.trailer.width / self.cell) as usize;
        let mut occupied = vec![vec![false; cols]; rows];

        let mut placements = Vec::new();
        let mut log = Vec::new();

        for req in requests {
            match self.find_slot(&occupied, req.w, req.h) {
                Some((cx, cy)) => {
                    self.mark(&mut occupied, cx, cy, req.w, req.h);
                    placements.push(PackPlacement {
                        kind: req.kind,
                        x: cx as i32 * self.cell,
                        y: cy as i32 * self.cell,
                        w: req.w,
                        h: req.h,
                    });
                }
                None => {
                    let line = format!("no space for {}", req.kind);
                    tracing::warn!("{line}");
                    log.push(line);
                }
            }
        }

        PackReport { placements, log }
    }

    /// Footprint of a w x h rectangle in whole occupancy cells.
    fn cells(&self, w: i32, h: i32) -> (usize, usize) {
        (
            ((w + self.cell - 1) / self.cell) as usize,
            ((h + self.cell - 1) / self.cell) as usize,
        )
    }

    /// First cell position whose footprint is entirely free and whose
    /// cm-rectangle stays inside the bed.
    fn find_slot(&self, occupied: &[Vec<bool>], w: i32, h: i32) -> Option<(usize, usize)> {
        if w <= 0 || h <= 0 || w > self.trailer.length || h > self.trailer.width {
            return None;
        }
        let (cw, ch) = self.cells(w, h);
        let rows = occupied.len();
        let cols = occupied.first().map_or(0, Vec::len);
        if cw > cols || ch > rows {
            return None;
        }

        for cy in 0..=(rows - ch) {
            if cy as i32 * self.cell + h > self.trailer.width {
                break;
            }
            for cx in 0..=(cols - cw) {
                if cx as i32 * self.cell + w > self.trailer.length {
                    break;
                }
                if self.footprint_free(occupied, cx, cy, cw, ch) {
                    return Some((cx, cy));
                }
            }
        }
        None
    }

    fn footprint_free(
        &self,
        occupied: &[Vec<bool>],
        cx: usize,
        cy: usize,
        cw: usize,
        ch: usize,
    ) -> bool {
        for row in occupied.iter().skip(cy).take(ch) {
            for &cell in row.iter().skip(cx).take(cw) {
                if cell {
                    return false;
                }
            }
        }
        true
    }

    fn mark(&self, occupied: &mut [Vec<bool>], cx: usize, cy: usize, w: i32, h: i32) {
        let (cw, ch) = self.cells(w, h);
        for row in occupied.iter_mut().skip(cy).take(ch) {
            for cell in row.iter_mut().skip(cx).take(cw) {
                *cell = true;
            }
        }
    }
}
