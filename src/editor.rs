//! Authoritative editor state and the command API.
//!
//! The host UI owns one [`EditorState`] and funnels every mutation through
//! these methods; the rendering surface never writes back directly. Each
//! tick the surface's echoed object list is folded in via [`EditorState::commit`]
//! before any button command runs, so commands always act on snapped,
//! reconciled coordinates.

use std::collections::HashMap;

use crate::geometry::{clamp_into, snap_axis_y, snap_x_into};
use crate::packer::{PackCounts, PackReport, ShelfPacker};
use crate::types::{EchoedObject, PalletKind, Placed, SpawnKind, Trailer};

/// Lane selector for align commands: front edge, centred, back edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanePos {
    Left,
    Mid,
    Right,
}

impl LanePos {
    fn y_for(&self, h: i32, width: i32) -> i32 {
        match self {
            LanePos::Left => 0,
            LanePos::Mid => (width - h) / 2,
            LanePos::Right => width - h,
        }
    }
}

/// Which objects an align command touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignScope {
    Last,
    All,
}

/// Enforces the per-type size invariant whenever geometry re-enters the
/// core: Euro collapses to one of its two orientations, Industrie is
/// always 120 x 100, everything else keeps its declared size.
pub fn fix_size(kind: PalletKind, w: i32, h: i32) -> (i32, i32) {
    match kind {
        PalletKind::Euro => {
            if w < h {
                (80, 120)
            } else {
                (120, 80)
            }
        }
        PalletKind::Industrie => (120, 100),
        _ => (w, h),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    trailer: Trailer,
    objects: Vec<Placed>,
    next_id: u64,
    next_slot_idx: usize,
    grid_step: i32,
    locked: bool,
    edit: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::new(Trailer::reefer())
    }
}

impl EditorState {
    pub fn new(trailer: Trailer) -> Self {
        Self {
            trailer,
            objects: Vec::new(),
            next_id: 1,
            next_slot_idx: 0,
            grid_step: Trailer::GRID_STEP,
            locked: false,
            edit: true,
        }
    }

    pub fn trailer(&self) -> Trailer {
        self.trailer
    }

    pub fn objects(&self) -> &[Placed] {
        &self.objects
    }

    pub fn grid_step(&self) -> i32 {
        self.grid_step
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn edit(&self) -> bool {
        self.edit
    }

    /// Adds one pallet at the next free tiling slot. Slots run in rows
    /// across the bed so repeated spawns do not stack on one spot; the
    /// final position is grid- and lane-snapped like any other geometry.
    pub fn spawn(&mut self, kind: SpawnKind) {
        if self.locked {
            return;
        }
        let (w, h) = kind.size();
        let gap = Trailer::SPAWN_GAP;

        let per_row = ((self.trailer.length / (w + gap)) as usize).max(1);
        let row = self.next_slot_idx / per_row;
        let col = self.next_slot_idx % per_row;
        let x0 = (10 + col as i32 * (w + gap)).min(self.trailer.length - w);
        let y0 = (10 + row as i32 * (h.max(100) + gap)).min(self.trailer.width - h);

        let x = snap_x_into(x0, w, self.grid_step, self.trailer.length);
        let y = snap_axis_y(y0, h, self.trailer.width);

        let interactive = self.edit && !self.locked;
        self.objects.push(Placed {
            id: self.next_id,
            kind: kind.kind(),
            x,
            y,
            w,
            h,
            selectable: interactive,
            evented: interactive,
        });
        self.next_id += 1;
        self.next_slot_idx += 1;
    }

    /// Removes the most recently added object. Ids are never reused.
    pub fn delete_last(&mut self) {
        if self.locked {
            return;
        }
        self.objects.pop();
        self.next_slot_idx = self.next_slot_idx.saturating_sub(1);
    }

    /// Clears the bed. `next_id` keeps advancing so ids stay unique for
    /// the whole session.
    pub fn delete_all(&mut self) {
        if self.locked {
            return;
        }
        self.objects.clear();
        self.next_slot_idx = 0;
    }

    /// Moves the selected objects into a lane, re-snaps X and normalizes
    /// sizes.
    pub fn align(&mut self, scope: AlignScope, pos: LanePos) {
        if self.locked {
            return;
        }
        let (trailer, step) = (self.trailer, self.grid_step);
        let range = match scope {
            AlignScope::All => 0..self.objects.len(),
            AlignScope::Last => self.objects.len().saturating_sub(1)..self.objects.len(),
        };
        for obj in &mut self.objects[range] {
            let (w, h) = fix_size(obj.kind, obj.w, obj.h);
            obj.w = w;
            obj.h = h;
            obj.y = pos.y_for(h, trailer.width);
            obj.x = snap_x_into(obj.x, w, step, trailer.length);
        }
    }

    /// Locking freezes every mutation and drops edit mode.
    pub fn set_locked(&mut self, flag: bool) {
        self.locked = flag;
        if flag {
            self.edit = false;
        }
        self.propagate_flags();
    }

    pub fn set_edit(&mut self, flag: bool) {
        self.edit = flag && !self.locked;
        self.propagate_flags();
    }

    /// Steps below 1 are coerced to 1 (raster off).
    pub fn set_grid_step(&mut self, step: i32) {
        if self.locked {
            return;
        }
        self.grid_step = step.max(1);
    }

    fn propagate_flags(&mut self) {
        let interactive = self.edit && !self.locked;
        for obj in &mut self.objects {
            obj.selectable = interactive;
            obj.evented = interactive;
        }
    }

    /// Replaces the bed contents with a batch-packed layout from per-type
    /// counts. The pack log (any "no space for ..." lines) is returned for
    /// the host UI to display.
    pub fn pack_batch(&mut self, counts: &PackCounts) -> PackReport {
        if self.locked {
            return PackReport {
                placements: Vec::new(),
                log: Vec::new(),
            };
        }
        let report = ShelfPacker::new(self.trailer).pack(&counts.to_requests());
        self.objects.clear();
        self.next_slot_idx = 0;
        let interactive = self.edit && !self.locked;
        for p in &report.placements {
            self.objects.push(Placed {
                id: self.next_id,
                kind: p.kind,
                x: p.x,
                y: p.y,
                w: p.w,
                h: p.h,
                selectable: interactive,
                evented: interactive,
            });
            self.next_id += 1;
        }
        self.next_slot_idx = self.objects.len();
        report
    }

    /// The reconcile step: folds a surface-echoed object list back into
    /// the authoritative one, keyed entirely by id. The surface may
    /// re-emit objects in any order, drop some, or carry transient
    /// rotation/scale; authoritative entries without a matching echo keep
    /// their prior values, echoes without a known id are ignored.
    pub fn commit(&mut self, echoes: &[EchoedObject]) {
        if self.locked {
            return;
        }
        let by_id: HashMap<u64, &EchoedObject> =
            echoes.iter().filter_map(|e| e.id.map(|id| (id, e))).collect();

        let (trailer, step) = (self.trailer, self.grid_step);
        for obj in &mut self.objects {
            let Some(echo) = by_id.get(&obj.id) else {
                continue;
            };
            let (ew, eh) = echo.effective_size();
            let (w, h) = fix_size(obj.kind, ew, eh);
            let (cx, cy) = clamp_into(
                echo.left.round() as i32,
                echo.top.round() as i32,
                w,
                h,
                trailer.length,
                trailer.width,
            );
            obj.w = w;
            obj.h = h;
            obj.x = snap_x_into(cx, w, step, trailer.length);
            obj.y = snap_axis_y(cy, h, trailer.width);
        }
        tracing::debug!(objects = self.objects.len(), "committed surface echo");
    }
}
