//! crates/course_chat_core/src/panel.rs
//!
//! Dashboard menu behaviour for picking which assistant panel is shown.

use crate::domain::Copilot;
use crate::ports::PanelCallbacks;

/// Handles a click on one of the copilot menu entries.
///
/// The host always hears about the chosen copilot. The panel is then opened
/// if it was closed, closed if the chosen copilot was the one already open,
/// and left open (just switched) otherwise.
pub fn choose_copilot(
    active: Copilot,
    is_open: bool,
    chosen: Copilot,
    callbacks: &mut dyn PanelCallbacks,
) {
    let was_showing_chosen = is_open && active == chosen;
    callbacks.on_copilot_change(chosen);
    if !is_open || was_showing_chosen {
        callbacks.on_toggle_chat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::NoopPanelCallbacks;

    #[derive(Default)]
    struct Recorder {
        toggles: usize,
        changes: Vec<Copilot>,
    }

    impl PanelCallbacks for Recorder {
        fn on_toggle_chat(&mut self) {
            self.toggles += 1;
        }

        fn on_copilot_change(&mut self, copilot: Copilot) {
            self.changes.push(copilot);
        }
    }

    #[test]
    fn opens_closed_panel() {
        let mut rec = Recorder::default();
        choose_copilot(Copilot::CoPilot, false, Copilot::CoPilot2, &mut rec);
        assert_eq!(rec.toggles, 1);
        assert_eq!(rec.changes, vec![Copilot::CoPilot2]);
    }

    #[test]
    fn closes_when_same_copilot_is_open() {
        let mut rec = Recorder::default();
        choose_copilot(Copilot::CoPilot2, true, Copilot::CoPilot2, &mut rec);
        assert_eq!(rec.toggles, 1);
    }

    #[test]
    fn switches_without_toggling_when_other_copilot_is_open() {
        let mut rec = Recorder::default();
        choose_copilot(Copilot::CoPilot, true, Copilot::CoPilot2, &mut rec);
        assert_eq!(rec.toggles, 0);
        assert_eq!(rec.changes, vec![Copilot::CoPilot2]);
    }

    #[test]
    fn noop_callbacks_are_accepted() {
        choose_copilot(Copilot::CoPilot, false, Copilot::CoPilot, &mut NoopPanelCallbacks);
    }
}
