use std::rc::Rc;

use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::context::{NotchContext, PointerSource};
use crate::geometry::{Point, Rect};
use crate::state::{PanelRequest, PanelState, StateMachine, TransitionOutcome};

/// Whether a pointer this far from an open panel should close it
pub fn should_auto_close(
    state: PanelState,
    frame: Rect,
    pointer: Point,
    max_distance: f64,
    settings_open: bool,
) -> bool {
    state == PanelState::Open && !settings_open && pointer.distance_to(frame.center()) > max_distance
}

/// Polls the pointer and closes an open panel once it wanders away
pub struct PointerProximityMonitor {
    ctx: Rc<NotchContext>,
    machine: StateMachine,
    pointer: Rc<dyn PointerSource>,
}

impl PointerProximityMonitor {
    pub fn new(machine: StateMachine, pointer: Rc<dyn PointerSource>) -> Self {
        Self {
            ctx: machine.context().clone(),
            machine,
            pointer,
        }
    }

    /// One poll; submits a close when warranted
    pub fn check(&self) -> Option<JoinHandle<TransitionOutcome>> {
        let pointer = self.pointer.location()?;
        let max_distance = self.ctx.settings().proximity_distance();
        let close = should_auto_close(
            self.ctx.state(),
            self.ctx.frame(),
            pointer,
            max_distance,
            self.ctx.gates().is_settings_open(),
        );
        if !close || self.ctx.guards().is_snapping() {
            return None;
        }

        debug!("Pointer {:?} beyond {} of panel, closing", pointer, max_distance);
        Some(self.machine.submit(PanelRequest::Close))
    }

    /// Poll forever at the configured interval, picking up interval
    /// changes from reloaded settings
    pub async fn run(self) {
        let mut period = self.ctx.settings().proximity_interval();
        info!("Pointer proximity monitor polling every {:?}", period);

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.check();

            let configured = self.ctx.settings().proximity_interval();
            if configured != period {
                info!("Proximity polling interval changed to {:?}", configured);
                period = configured;
                ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_frame() -> Rect {
        Rect::new(1287.0, 0.0, 450.0, 188.0)
    }

    #[test]
    fn far_pointer_closes_open_panel() {
        let far = Point::new(1512.0, 500.0);
        assert!(should_auto_close(PanelState::Open, open_frame(), far, 300.0, false));
    }

    #[test]
    fn near_pointer_keeps_panel() {
        let near = Point::new(1512.0, 300.0);
        assert!(!should_auto_close(PanelState::Open, open_frame(), near, 300.0, false));
    }

    #[test]
    fn settings_surface_suppresses_close() {
        let far = Point::new(0.0, 1500.0);
        assert!(!should_auto_close(PanelState::Open, open_frame(), far, 300.0, true));
    }

    #[test]
    fn only_open_panels_auto_close() {
        let far = Point::new(0.0, 1500.0);
        assert!(!should_auto_close(PanelState::Closed, open_frame(), far, 300.0, false));
        assert!(!should_auto_close(PanelState::PartiallyOpen, open_frame(), far, 300.0, false));
    }
}
