use std::rc::Rc;
use std::time::Duration;

use tokio::task::{JoinHandle, LocalSet};
use tracing::{debug, info, warn};

use notch_core::messages::Reply;
use notch_core::triggers::DebounceSlot;
use notch_core::{
    ArtworkPresenceBridge, ClickHandler, Collaborators, DisplayId, DropReason, HoverZoneMonitor,
    InputGates, NotchCommand, NotchContext, NotchEvent, NotchPaths, NotchSettings, PanelRequest,
    PointerProximityMonitor, PointerSource, ScrollTrigger, ServiceHub, StateMachine, TransitionOutcome,
};

use crate::headless::{SharedPointer, TracingHaptics, TracingLayout, TracingSurface};

/// How often the hover monitor polls the pointer
const POINTER_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Run the shell daemon
pub fn run(paths: NotchPaths) -> anyhow::Result<()> {
    info!("Initializing notch shell daemon");

    let settings = NotchSettings::load(&paths.settings);

    // Create service hub (starts its runtime, IPC and the config watcher)
    let services = ServiceHub::new(paths.clone())?;
    let event_rx = services.event_receiver();

    // The panel itself lives on this thread
    let ui = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();
    local.block_on(&ui, async move {
        let shell = Shell::new(settings, paths);
        shell.start();

        while let Ok(event) = event_rx.recv().await {
            match event {
                NotchEvent::SettingsReloaded(settings) => shell.apply_settings(*settings),
                NotchEvent::Command { command, reply } => shell.handle_command(command, reply),
                NotchEvent::Shutdown => break,
            }
        }
    });

    info!("Notch shell daemon exiting");
    // Runtimes must not be dropped from inside async context
    drop(local);
    drop(ui);
    drop(services);
    Ok(())
}

struct Shell {
    paths: NotchPaths,
    ctx: Rc<NotchContext>,
    machine: StateMachine,
    gates: Rc<InputGates>,
    pointer: Rc<SharedPointer>,
    scroll: ScrollTrigger,
    click: ClickHandler,
    hover: Rc<HoverZoneMonitor>,
    artwork_tx: async_channel::Sender<bool>,
    artwork_rx: async_channel::Receiver<bool>,
    realign: DebounceSlot,
}

impl Shell {
    fn new(settings: NotchSettings, paths: NotchPaths) -> Self {
        let gates = InputGates::new();
        let ctx = NotchContext::new(
            settings,
            Collaborators {
                surface: Rc::new(TracingSurface),
                layout: Rc::new(TracingLayout),
                haptics: Rc::new(TracingHaptics),
                gates: gates.clone(),
            },
        );
        let machine = StateMachine::new(ctx.clone());
        let (artwork_tx, artwork_rx) = async_channel::unbounded();

        Self {
            paths,
            scroll: ScrollTrigger::new(machine.clone()),
            click: ClickHandler::new(machine.clone()),
            hover: Rc::new(HoverZoneMonitor::new(machine.clone())),
            pointer: Rc::new(SharedPointer::default()),
            ctx,
            machine,
            gates,
            artwork_tx,
            artwork_rx,
            realign: DebounceSlot::new(),
        }
    }

    /// Spawn the long-running trigger sources onto the local set
    fn start(&self) {
        let proximity = PointerProximityMonitor::new(self.machine.clone(), self.pointer.clone());
        tokio::task::spawn_local(proximity.run());

        let bridge = ArtworkPresenceBridge::new(self.machine.clone());
        tokio::task::spawn_local(bridge.run(self.artwork_rx.clone()));

        let pointer: Rc<dyn PointerSource> = self.pointer.clone();
        tokio::task::spawn_local(self.hover.clone().track(pointer, POINTER_POLL_INTERVAL));

        info!("Notch shell ready: {}", self.ctx.status_line());
    }

    fn apply_settings(&self, settings: NotchSettings) {
        info!("Applying reloaded settings");
        if self.ctx.apply_settings(settings) {
            self.schedule_realign();
        }
    }

    fn schedule_realign(&self) {
        let delay = self.ctx.settings().realign_delay();
        debug!("Display change, realigning in {:?}", delay);
        let machine = self.machine.clone();
        self.realign.schedule(delay, async move {
            machine.realign();
        });
    }

    fn handle_command(&self, command: NotchCommand, reply: Option<Reply>) {
        debug!("Handling command: {}", command);

        match command {
            NotchCommand::Open => self.reply_when_done(self.machine.submit(PanelRequest::Open), reply),
            NotchCommand::Close => {
                self.reply_when_done(self.machine.submit(PanelRequest::Close), reply)
            }
            NotchCommand::PeekIn => {
                self.reply_when_done(self.machine.submit(PanelRequest::PeekIn), reply)
            }
            NotchCommand::PeekOut => {
                self.reply_when_done(self.machine.submit(PanelRequest::PeekOut), reply)
            }
            NotchCommand::Click => match self.click.click() {
                Some(handle) => self.reply_when_done(handle, reply),
                None => send_reply(
                    reply,
                    TransitionOutcome::Dropped(DropReason::AlreadyInState).to_string(),
                ),
            },
            NotchCommand::Drop => self.reply_when_done(self.click.file_dropped(), reply),
            NotchCommand::Scroll(event) => {
                let handles = self.scroll.on_scroll(event);
                tokio::task::spawn_local(async move {
                    let mut outcomes = Vec::with_capacity(handles.len());
                    for handle in handles {
                        outcomes.push(outcome_text(handle.await));
                    }
                    let response = if outcomes.is_empty() {
                        "ok".to_string()
                    } else {
                        outcomes.join("; ")
                    };
                    send_reply(reply, response);
                });
            }
            NotchCommand::Pointer(point) => {
                self.pointer.set(point);
                send_reply(reply, "ok".to_string());
            }
            NotchCommand::Artwork(present) => {
                let response = match self.artwork_tx.try_send(present) {
                    Ok(()) => "ok".to_string(),
                    Err(e) => format!("error: {}", e),
                };
                send_reply(reply, response);
            }
            NotchCommand::SettingsWindow(open) => {
                self.gates.set_settings_open(open);
                send_reply(reply, "ok".to_string());
            }
            NotchCommand::Shortcut { name, active } => {
                self.gates.set_shortcut(&name, active);
                send_reply(reply, "ok".to_string());
            }
            NotchCommand::Display(id) => send_reply(reply, self.select_display(id)),
            NotchCommand::ReloadConfig => {
                let response = match NotchSettings::try_load(&self.paths.settings) {
                    Ok(settings) => {
                        self.apply_settings(settings);
                        "ok: settings reloaded".to_string()
                    }
                    Err(e) => {
                        warn!("Failed to reload settings: {}", e);
                        format!("error: {}", e)
                    }
                };
                send_reply(reply, response);
            }
            NotchCommand::Status => send_reply(reply, self.ctx.status_line()),
        }
    }

    /// Move the panel to another display and remember the choice
    fn select_display(&self, id: DisplayId) -> String {
        if self.ctx.selected_display() == Some(id) {
            return "ok: already selected".to_string();
        }
        self.ctx.select_display(Some(id));
        self.schedule_realign();

        let snapshot = self.ctx.settings().clone();
        match snapshot.save_to(&self.paths.settings) {
            Ok(()) => "ok".to_string(),
            Err(e) => {
                warn!("Failed to save display selection: {}", e);
                format!("ok: not saved ({})", e)
            }
        }
    }

    fn reply_when_done(&self, handle: JoinHandle<TransitionOutcome>, reply: Option<Reply>) {
        tokio::task::spawn_local(async move {
            send_reply(reply, outcome_text(handle.await));
        });
    }
}

fn outcome_text(result: Result<TransitionOutcome, tokio::task::JoinError>) -> String {
    match result {
        Ok(outcome) => outcome.to_string(),
        Err(e) => format!("error: {}", e),
    }
}

fn send_reply(reply: Option<Reply>, response: String) {
    if let Some(reply) = reply {
        let _ = reply.send(response);
    }
}
