//! Contract between the core and a rendering surface, plus the per-tick
//! driver the host UI loop runs.

use crate::editor::{AlignScope, EditorState, LanePos};
use crate::packer::{PackCounts, PackReport};
use crate::presets::PresetStore;
use crate::types::{EchoedObject, Placed, SpawnKind, Trailer};

/// What the core requires of any rendering surface: draw the current
/// object list, and report back the (possibly dragged) geometry each tick
/// with ids preserved. 1 cm = 1 px is the simplest mapping; any uniform
/// linear scale works. The surface is free to allow overlap during drags.
pub trait Surface {
    fn render(&mut self, objects: &[Placed], editable: bool);
    fn tick(&mut self) -> Vec<EchoedObject>;
}

/// Full command set exposed to the host UI.
#[derive(Debug, Clone)]
pub enum Command {
    Spawn(SpawnKind),
    DeleteLast,
    DeleteAll,
    Align(AlignScope, LanePos),
    SetLocked(bool),
    SetEdit(bool),
    SetGridStep(i32),
    SavePreset(String),
    ClearPresets,
    PackBatch(PackCounts),
}

/// One editor session: the authoritative state plus the preset store.
///
/// [`Session::tick`] runs one frame in the strict order
/// commit -> commands -> render, so button commands always see snapped,
/// reconciled coordinates rather than raw drag geometry.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: EditorState,
    pub presets: PresetStore,
}

impl Session {
    pub fn new(trailer: Trailer) -> Self {
        Self {
            state: EditorState::new(trailer),
            presets: PresetStore::new(),
        }
    }

    /// Applies one command. Pack reports bubble up so the UI can show
    /// any "no space for ..." lines.
    pub fn apply(&mut self, cmd: Command) -> Option<PackReport> {
        match cmd {
            Command::Spawn(kind) => self.state.spawn(kind),
            Command::DeleteLast => self.state.delete_last(),
            Command::DeleteAll => self.state.delete_all(),
            Command::Align(scope, pos) => self.state.align(scope, pos),
            Command::SetLocked(flag) => self.state.set_locked(flag),
            Command::SetEdit(flag) => self.state.set_edit(flag),
            Command::SetGridStep(step) => self.state.set_grid_step(step),
            Command::SavePreset(name) => self.presets.save(&name, self.state.objects()),
            Command::ClearPresets => self.presets.clear(),
            Command::PackBatch(counts) => return Some(self.state.pack_batch(&counts)),
        }
        None
    }

    /// One frame of the cooperative UI loop.
    pub fn tick<S: Surface>(&mut self, surface: &mut S, commands: Vec<Command>) {
        let echoes = surface.tick();
        self.state.commit(&echoes);
        for cmd in commands {
            self.apply(cmd);
        }
        surface.render(self.state.objects(), self.state.edit());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{self, AxleSplit};

    /// Surface stub that echoes the last rendered list with a per-tick
    /// edit applied, the way a canvas reports drag results.
    struct ScriptedSurface {
        last: Vec<EchoedObject>,
        edits: Vec<Box<dyn Fn(&mut Vec<EchoedObject>)>>,
        rendered_editable: Option<bool>,
    }

    impl ScriptedSurface {
        fn new() -> Self {
            Self {
                last: Vec::new(),
                edits: Vec::new(),
                rendered_editable: None,
            }
        }

        fn script(&mut self, edit: impl Fn(&mut Vec<EchoedObject>) + 'static) {
            self.edits.push(Box::new(edit));
        }
    }

    impl Surface for ScriptedSurface {
        fn render(&mut self, objects: &[Placed], editable: bool) {
            self.last = objects.iter().map(EchoedObject::from_placed).collect();
            self.rendered_editable = Some(editable);
        }

        fn tick(&mut self) -> Vec<EchoedObject> {
            let mut echo = self.last.clone();
            if !self.edits.is_empty() {
                let edit = self.edits.remove(0);
                edit(&mut echo);
            }
            echo
        }
    }

    #[test]
    fn test_tick_order_commit_before_commands() {
        let mut session = Session::new(Trailer::reefer());
        let mut surface = ScriptedSurface::new();

        session.tick(&mut surface, vec![Command::Spawn(SpawnKind::EuroLong)]);
        assert_eq!(session.state.objects().len(), 1);

        // The user drags the pallet to a ragged position; the align button
        // pressed on the same tick must act on the snapped result.
        surface.script(|echo| {
            echo[0].left = 513.0;
            echo[0].top = 91.0;
        });
        session.tick(
            &mut surface,
            vec![Command::Align(AlignScope::All, LanePos::Left)],
        );
        let obj = &session.state.objects()[0];
        assert_eq!(obj.x, 510);
        assert_eq!(obj.y, 0);
    }

    #[test]
    fn test_render_reflects_edit_flag() {
        let mut session = Session::new(Trailer::reefer());
        let mut surface = ScriptedSurface::new();
        session.tick(&mut surface, vec![Command::SetEdit(false)]);
        assert_eq!(surface.rendered_editable, Some(false));
        session.tick(&mut surface, vec![Command::SetEdit(true)]);
        assert_eq!(surface.rendered_editable, Some(true));
    }

    #[test]
    fn test_save_preset_through_commands() {
        let mut session = Session::new(Trailer::reefer());
        let mut surface = ScriptedSurface::new();
        session.tick(
            &mut surface,
            vec![
                Command::Spawn(SpawnKind::EuroLong),
                Command::Spawn(SpawnKind::Industrie),
                Command::SavePreset("tour-42".into()),
            ],
        );
        assert_eq!(session.presets.presets().len(), 1);
        assert_eq!(session.presets.presets()[0].items.len(), 2);
        session.apply(Command::ClearPresets);
        assert!(session.presets.is_empty());
    }

    #[test]
    fn test_pack_batch_report_bubbles_up() {
        let mut session = Session::new(Trailer::reefer());
        let report = session.apply(Command::PackBatch(PackCounts {
            euro: 50,
            ..Default::default()
        }));
        let report = report.unwrap();
        assert_eq!(report.placements.len(), 33);
        assert_eq!(report.log.len(), 17);
        assert_eq!(session.state.objects().len(), 33);
    }

    #[test]
    fn test_locked_session_survives_hostile_surface() {
        let mut session = Session::new(Trailer::reefer());
        let mut surface = ScriptedSurface::new();
        session.tick(&mut surface, vec![Command::Spawn(SpawnKind::EuroLong)]);
        session.apply(Command::SetLocked(true));
        let before = session.state.clone();

        surface.script(|echo| {
            for e in echo.iter_mut() {
                e.left += 400.0;
            }
        });
        session.tick(&mut surface, vec![Command::DeleteAll]);
        assert_eq!(session.state, before);
    }

    #[test]
    fn test_metrics_over_session_state() {
        let mut session = Session::new(Trailer::reefer());
        session.apply(Command::PackBatch(PackCounts {
            euro: 10,
            industrie: 4,
            ..Default::default()
        }));
        let objects = session.state.objects();
        let used = metrics::used_length(metrics::spans_of(objects));
        assert!(used > 0 && used <= 1360);
        let AxleSplit {
            front_pct,
            back_pct,
        } = metrics::axle_split(metrics::spans_of(objects), session.state.trailer());
        assert_eq!(front_pct + back_pct, 100);
    }
}
