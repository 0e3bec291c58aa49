use std::rc::Rc;

use async_channel::Receiver;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::context::NotchContext;
use crate::state::{Axis, PanelRequest, PanelState, StateMachine, TransitionOutcome};

/// Bridges the external "artwork present" signal into width changes.
///
/// Repeated values are ignored and changes settle for the debounce window
/// before anything happens.
pub struct ArtworkPresenceBridge {
    ctx: Rc<NotchContext>,
    machine: StateMachine,
}

impl ArtworkPresenceBridge {
    pub fn new(machine: StateMachine) -> Self {
        Self {
            ctx: machine.context().clone(),
            machine,
        }
    }

    /// Consume presence values until the sender side closes
    pub async fn run(self, rx: Receiver<bool>) {
        info!(
            "Artwork presence bridge started ({:?} debounce)",
            self.ctx.settings().artwork_debounce()
        );

        let mut last_seen: Option<bool> = None;
        let mut pending: Option<bool> = None;
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                received = rx.recv() => match received {
                    Ok(present) => {
                        if last_seen == Some(present) {
                            continue;
                        }
                        last_seen = Some(present);
                        pending = Some(present);
                        // Current settings, reloads included
                        deadline = Instant::now() + self.ctx.settings().artwork_debounce();
                    }
                    Err(_) => {
                        debug!("Artwork signal closed");
                        break;
                    }
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(present) = pending.take() {
                        self.apply(present);
                    }
                }
            }
        }
    }

    /// Act on a settled presence value
    pub fn apply(&self, present: bool) -> Option<JoinHandle<TransitionOutcome>> {
        self.ctx.set_artwork_present(present);

        let guards = self.ctx.guards();
        if self.ctx.state() != PanelState::Closed
            || guards.is_snapping()
            || guards.is_busy(Axis::Width)
        {
            debug!("Artwork {} noted, panel busy or not closed", present);
            return None;
        }

        let request = if present {
            PanelRequest::ExpandWidth
        } else {
            PanelRequest::ReduceWidth
        };
        debug!("Artwork {} -> {:?}", present, request);
        Some(self.machine.submit(request))
    }
}
