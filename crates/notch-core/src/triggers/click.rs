use std::rc::Rc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::context::NotchContext;
use crate::state::{PanelRequest, PanelState, PresentationMode, StateMachine, TransitionOutcome};

/// Click and file-drop entry points
pub struct ClickHandler {
    ctx: Rc<NotchContext>,
    machine: StateMachine,
}

impl ClickHandler {
    pub fn new(machine: StateMachine) -> Self {
        Self {
            ctx: machine.context().clone(),
            machine,
        }
    }

    /// A click on the panel opens it unless it already is
    pub fn click(&self) -> Option<JoinHandle<TransitionOutcome>> {
        if self.ctx.state() == PanelState::Open {
            return None;
        }
        debug!("Panel clicked while {}", self.ctx.state());
        Some(self.machine.submit(PanelRequest::Open))
    }

    /// A file dropped onto the panel shows the home view, opened
    pub fn file_dropped(&self) -> JoinHandle<TransitionOutcome> {
        debug!("File dropped on panel");
        self.ctx.set_mode(PresentationMode::Home);
        self.machine.submit(PanelRequest::Open)
    }
}
