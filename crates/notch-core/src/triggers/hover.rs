use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, trace};

use super::DebounceSlot;
use crate::context::{NotchContext, PointerSource};
use crate::geometry::{Point, Rect};
use crate::state::{PanelRequest, PanelState, StateMachine};

/// Hover zone state derived from one pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTransition {
    Entered,
    Left,
    Unchanged,
}

/// Tracks the pointer against the panel with entry/exit hysteresis.
///
/// Entering the padded panel rectangle peeks a closed panel. Leaving the
/// larger exit rectangle schedules a collapse; re-entering before it fires
/// cancels it.
pub struct HoverZoneMonitor {
    ctx: Rc<NotchContext>,
    machine: StateMachine,
    inside: Cell<bool>,
    alpha: Cell<f64>,
    collapse: DebounceSlot,
    collapses_fired: Rc<Cell<u32>>,
}

impl HoverZoneMonitor {
    pub fn new(machine: StateMachine) -> Self {
        Self {
            ctx: machine.context().clone(),
            machine,
            inside: Cell::new(false),
            alpha: Cell::new(1.0),
            collapse: DebounceSlot::new(),
            collapses_fired: Rc::new(Cell::new(0)),
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.inside.get()
    }

    pub fn collapse_pending(&self) -> bool {
        self.collapse.is_pending()
    }

    /// Number of collapse timers that ran to completion
    pub fn collapses_fired(&self) -> u32 {
        self.collapses_fired.get()
    }

    /// Feed one pointer sample. Must be called from within the UI `LocalSet`.
    pub fn observe(&self, pointer: Point) -> HoverTransition {
        let frame = self.ctx.frame();
        let (entry_padding, exit_padding, collapse_delay, hide_shortcut) = {
            let settings = self.ctx.settings();
            (
                settings.hover_entry_padding(),
                settings.hover_exit_padding(),
                settings.hover_collapse_delay(),
                settings.hover_hide_shortcut().to_owned(),
            )
        };
        let in_entry = frame.expanded(entry_padding).contains(pointer);
        let in_exit = frame.expanded(exit_padding).contains(pointer);

        self.update_alpha(&hide_shortcut, in_entry);

        if !self.inside.get() && in_entry {
            self.inside.set(true);
            self.collapse.cancel();
            trace!("Pointer entered hover zone at {:?}", pointer);

            if self.ctx.state() == PanelState::Closed {
                self.ctx.perform_haptic();
                self.machine.submit(PanelRequest::PeekIn);
            }
            return HoverTransition::Entered;
        }

        if self.inside.get() && !in_exit {
            self.inside.set(false);
            trace!("Pointer left hover zone at {:?}", pointer);

            let ctx = self.ctx.clone();
            let machine = self.machine.clone();
            let fired = self.collapses_fired.clone();
            self.collapse.schedule(collapse_delay, async move {
                fired.set(fired.get() + 1);
                match ctx.state() {
                    PanelState::Open if !ctx.gates().is_settings_open() => {
                        debug!("Hover lost, closing panel");
                        machine.submit(PanelRequest::Close);
                    }
                    PanelState::PartiallyOpen => {
                        debug!("Hover lost, ending peek");
                        machine.submit(PanelRequest::PeekOut);
                    }
                    _ => {}
                }
            });
            return HoverTransition::Left;
        }

        HoverTransition::Unchanged
    }

    /// Poll `pointer` and re-evaluate whenever the pointer moves or the
    /// panel changes shape under it
    pub async fn track(self: Rc<Self>, pointer: Rc<dyn PointerSource>, period: Duration) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last: Option<(Point, Rect)> = None;
        loop {
            ticker.tick().await;
            let Some(at) = pointer.location() else {
                continue;
            };
            let sample = (at, self.ctx.frame());
            if last == Some(sample) {
                continue;
            }
            last = Some(sample);
            self.observe(at);
        }
    }

    /// Hide the surface while the hover-hide shortcut is held and the
    /// pointer is over the panel.
    fn update_alpha(&self, shortcut: &str, in_entry: bool) {
        let hidden = in_entry && self.ctx.gates().is_shortcut_active(shortcut);
        let alpha = if hidden { 0.0 } else { 1.0 };
        if self.alpha.replace(alpha) != alpha {
            trace!("Surface alpha -> {}", alpha);
            self.ctx.surface().set_alpha(alpha);
        }
    }
}
