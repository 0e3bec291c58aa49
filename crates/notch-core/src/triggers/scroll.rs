use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use smallvec::SmallVec;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::NotchSettings;
use crate::context::NotchContext;
use crate::error::NotchError;
use crate::state::{PanelRequest, PanelState, PresentationMode, StateMachine, TransitionOutcome};

/// Phase of a scroll or pan gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl FromStr for ScrollPhase {
    type Err = NotchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "began" | "begin" => Ok(Self::Began),
            "changed" | "change" => Ok(Self::Changed),
            "ended" | "end" => Ok(Self::Ended),
            "cancelled" | "canceled" | "cancel" => Ok(Self::Cancelled),
            other => Err(NotchError::invalid_command(format!("unknown scroll phase: {}", other))),
        }
    }
}

/// One scroll sample; positive `delta` pulls the panel down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub delta: f64,
    pub phase: ScrollPhase,
}

impl ScrollEvent {
    pub fn new(delta: f64, phase: ScrollPhase) -> Self {
        Self { delta, phase }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThresholds {
    pub open: f64,
    /// Open threshold in preview mode
    pub preview_open: f64,
    pub close: f64,
    pub peek: f64,
}

impl ScrollThresholds {
    pub fn from_settings(settings: &NotchSettings) -> Self {
        Self {
            open: settings.scroll_open_threshold(),
            preview_open: settings.preview_open_threshold(),
            close: if settings.force_scroll_close() {
                0.0
            } else {
                settings.scroll_close_threshold()
            },
            peek: settings.scroll_peek_threshold(),
        }
    }

    fn open_for(&self, mode: PresentationMode) -> f64 {
        match mode {
            PresentationMode::Home => self.open,
            PresentationMode::Preview => self.preview_open,
        }
    }
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self::from_settings(&NotchSettings::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Down,
    Up,
}

impl Direction {
    fn of(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Self::Down)
        } else if delta < 0.0 {
            Some(Self::Up)
        } else {
            None
        }
    }
}

pub type ScrollRequests = SmallVec<[PanelRequest; 2]>;

/// Turns raw scroll samples into panel requests.
///
/// Pure: state and mode are passed in, nothing is executed here. A gesture
/// produces at most one open or close.
#[derive(Debug, Clone)]
pub struct ScrollGestureInterpreter {
    thresholds: ScrollThresholds,
    direction: Option<Direction>,
    translation: f64,
    acted: bool,
    peeked: bool,
}

impl ScrollGestureInterpreter {
    pub fn new(thresholds: ScrollThresholds) -> Self {
        Self {
            thresholds,
            direction: None,
            translation: 0.0,
            acted: false,
            peeked: false,
        }
    }

    pub fn set_thresholds(&mut self, thresholds: ScrollThresholds) {
        self.thresholds = thresholds;
    }

    /// Accumulated translation of the current gesture
    pub fn translation(&self) -> f64 {
        self.translation
    }

    pub fn interpret(
        &mut self,
        event: ScrollEvent,
        state: PanelState,
        mode: PresentationMode,
    ) -> ScrollRequests {
        let mut requests = ScrollRequests::new();

        match event.phase {
            ScrollPhase::Began => {
                self.reset();
                self.direction = Direction::of(event.delta);
                self.translation = event.delta;
                self.evaluate(state, mode, &mut requests);
            }
            ScrollPhase::Changed => {
                if self.direction.is_none() {
                    self.direction = Direction::of(event.delta);
                }
                self.translation += event.delta;
                self.evaluate(state, mode, &mut requests);
            }
            ScrollPhase::Ended | ScrollPhase::Cancelled => {
                if self.peeked && !self.acted {
                    requests.push(PanelRequest::PeekOut);
                }
                self.reset();
            }
        }

        requests
    }

    fn evaluate(&mut self, state: PanelState, mode: PresentationMode, out: &mut ScrollRequests) {
        if self.acted {
            return;
        }

        match self.direction {
            Some(Direction::Down) if state != PanelState::Open => {
                if self.translation >= self.thresholds.open_for(mode) {
                    self.acted = true;
                    out.push(PanelRequest::Open);
                } else if state == PanelState::Closed
                    && !self.peeked
                    && self.translation >= self.thresholds.peek
                {
                    self.peeked = true;
                    out.push(PanelRequest::PeekIn);
                }
            }
            Some(Direction::Up) if state == PanelState::Open => {
                if -self.translation >= self.thresholds.close {
                    self.acted = true;
                    out.push(PanelRequest::Close);
                }
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.direction = None;
        self.translation = 0.0;
        self.acted = false;
        self.peeked = false;
    }
}

impl Default for ScrollGestureInterpreter {
    fn default() -> Self {
        Self::new(ScrollThresholds::default())
    }
}

/// Feeds scroll samples through the interpreter into the state machine
pub struct ScrollTrigger {
    ctx: Rc<NotchContext>,
    machine: StateMachine,
    interpreter: RefCell<ScrollGestureInterpreter>,
}

impl ScrollTrigger {
    pub fn new(machine: StateMachine) -> Self {
        let ctx = machine.context().clone();
        let thresholds = ScrollThresholds::from_settings(&ctx.settings());
        Self {
            ctx,
            machine,
            interpreter: RefCell::new(ScrollGestureInterpreter::new(thresholds)),
        }
    }

    /// Interpret one sample and submit whatever it asks for
    pub fn on_scroll(&self, event: ScrollEvent) -> Vec<JoinHandle<TransitionOutcome>> {
        let mut interpreter = self.interpreter.borrow_mut();
        if event.phase == ScrollPhase::Began {
            interpreter.set_thresholds(ScrollThresholds::from_settings(&self.ctx.settings()));
        }

        let requests = interpreter.interpret(event, self.ctx.state(), self.ctx.mode());
        requests
            .into_iter()
            .map(|request| {
                debug!("Scroll gesture requests {:?}", request);
                self.machine.submit(request)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> ScrollGestureInterpreter {
        ScrollGestureInterpreter::default()
    }

    #[test]
    fn single_large_pull_opens() {
        let mut scroll = interpreter();
        let requests = scroll.interpret(
            ScrollEvent::new(260.0, ScrollPhase::Began),
            PanelState::Closed,
            PresentationMode::Home,
        );
        assert_eq!(requests.as_slice(), &[PanelRequest::Open]);
    }

    #[test]
    fn preview_mode_needs_a_longer_pull() {
        let mut scroll = interpreter();
        let requests = scroll.interpret(
            ScrollEvent::new(260.0, ScrollPhase::Began),
            PanelState::Closed,
            PresentationMode::Preview,
        );
        assert_eq!(requests.as_slice(), &[PanelRequest::PeekIn]);

        let requests = scroll.interpret(
            ScrollEvent::new(200.0, ScrollPhase::Changed),
            PanelState::PartiallyOpen,
            PresentationMode::Preview,
        );
        assert_eq!(requests.as_slice(), &[PanelRequest::Open]);
    }

    #[test]
    fn at_most_one_action_per_gesture() {
        let mut scroll = interpreter();
        let state = PanelState::Closed;
        let mode = PresentationMode::Home;
        let mut all = Vec::new();
        all.extend(scroll.interpret(ScrollEvent::new(10.0, ScrollPhase::Began), state, mode));
        for _ in 0..10 {
            all.extend(scroll.interpret(ScrollEvent::new(100.0, ScrollPhase::Changed), state, mode));
        }
        all.extend(scroll.interpret(ScrollEvent::new(0.0, ScrollPhase::Ended), state, mode));

        assert_eq!(all, vec![PanelRequest::PeekIn, PanelRequest::Open]);
    }

    #[test]
    fn short_pull_peeks_then_peeks_out() {
        let mut scroll = interpreter();
        let mode = PresentationMode::Home;
        let peek = scroll.interpret(ScrollEvent::new(45.0, ScrollPhase::Began), PanelState::Closed, mode);
        assert_eq!(peek.as_slice(), &[PanelRequest::PeekIn]);

        let end = scroll.interpret(
            ScrollEvent::new(0.0, ScrollPhase::Ended),
            PanelState::PartiallyOpen,
            mode,
        );
        assert_eq!(end.as_slice(), &[PanelRequest::PeekOut]);
    }

    #[test]
    fn direction_is_fixed_by_first_sample() {
        let mut scroll = interpreter();
        let state = PanelState::Open;
        let mode = PresentationMode::Home;
        assert!(scroll
            .interpret(ScrollEvent::new(5.0, ScrollPhase::Began), state, mode)
            .is_empty());
        // Now heading up in absolute terms, but the gesture began downward
        assert!(scroll
            .interpret(ScrollEvent::new(-200.0, ScrollPhase::Changed), state, mode)
            .is_empty());
    }

    #[test]
    fn upward_pull_closes_open_panel() {
        let mut scroll = interpreter();
        let state = PanelState::Open;
        let mode = PresentationMode::Home;
        assert!(scroll
            .interpret(ScrollEvent::new(-30.0, ScrollPhase::Began), state, mode)
            .is_empty());
        let requests = scroll.interpret(ScrollEvent::new(-25.0, ScrollPhase::Changed), state, mode);
        assert_eq!(requests.as_slice(), &[PanelRequest::Close]);
    }

    #[test]
    fn forced_close_needs_no_distance() {
        let settings = NotchSettings {
            force_scroll_close: Some(true),
            ..Default::default()
        };
        let mut scroll = ScrollGestureInterpreter::new(ScrollThresholds::from_settings(&settings));
        let requests = scroll.interpret(
            ScrollEvent::new(-1.0, ScrollPhase::Began),
            PanelState::Open,
            PresentationMode::Home,
        );
        assert_eq!(requests.as_slice(), &[PanelRequest::Close]);
    }

    #[test]
    fn phase_names_parse() {
        assert_eq!("Began".parse::<ScrollPhase>().unwrap(), ScrollPhase::Began);
        assert_eq!("cancelled".parse::<ScrollPhase>().unwrap(), ScrollPhase::Cancelled);
        assert!("sideways".parse::<ScrollPhase>().is_err());
    }
}
