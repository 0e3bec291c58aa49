#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use notch_core::{
    Collaborators, DisplayId, HapticFeedback, InputGates, LayoutSink, NotchContext,
    NotchSettings, PanelState, PanelSurface, Point, PointerSource, Rect, ScreenDescriptor,
    StateMachine,
};
use tokio::task::LocalSet;

pub const SCREEN_WIDTH: f64 = 3024.0;
pub const NOTCH_HEIGHT: f64 = 38.0;

#[derive(Default)]
pub struct RecordingSurface {
    pub frames: RefCell<Vec<Rect>>,
    pub alphas: RefCell<Vec<f64>>,
}

impl RecordingSurface {
    pub fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last_frame(&self) -> Option<Rect> {
        self.frames.borrow().last().copied()
    }
}

impl PanelSurface for RecordingSurface {
    fn set_frame(&self, frame: Rect) {
        self.frames.borrow_mut().push(frame);
    }

    fn set_alpha(&self, alpha: f64) {
        self.alphas.borrow_mut().push(alpha);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutEvent {
    Opening,
    Expanded,
    Compact,
    State(PanelState),
}

#[derive(Default)]
pub struct RecordingLayout {
    pub events: RefCell<Vec<LayoutEvent>>,
}

impl RecordingLayout {
    pub fn count(&self, event: LayoutEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn states(&self) -> Vec<PanelState> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                LayoutEvent::State(state) => Some(*state),
                _ => None,
            })
            .collect()
    }
}

impl LayoutSink for RecordingLayout {
    fn apply_opening_layout(&self) {
        self.events.borrow_mut().push(LayoutEvent::Opening);
    }

    fn apply_expanded_layout(&self) {
        self.events.borrow_mut().push(LayoutEvent::Expanded);
    }

    fn apply_compact_layout(&self) {
        self.events.borrow_mut().push(LayoutEvent::Compact);
    }

    fn panel_state_changed(&self, state: PanelState) {
        self.events.borrow_mut().push(LayoutEvent::State(state));
    }
}

#[derive(Default)]
pub struct CountingHaptics {
    pub count: Cell<u32>,
}

impl HapticFeedback for CountingHaptics {
    fn perform(&self) {
        self.count.set(self.count.get() + 1);
    }
}

#[derive(Default)]
pub struct FakePointer {
    pub at: Cell<Option<Point>>,
}

impl FakePointer {
    pub fn move_to(&self, x: f64, y: f64) {
        self.at.set(Some(Point::new(x, y)));
    }
}

impl PointerSource for FakePointer {
    fn location(&self) -> Option<Point> {
        self.at.get()
    }
}

pub struct Fixture {
    pub ctx: Rc<NotchContext>,
    pub machine: StateMachine,
    pub surface: Rc<RecordingSurface>,
    pub layout: Rc<RecordingLayout>,
    pub haptics: Rc<CountingHaptics>,
    pub gates: Rc<InputGates>,
}

impl Fixture {
    pub fn frame(&self) -> Rect {
        self.ctx.frame()
    }
}

/// 3024 wide display with a 38 pt notch inset
pub fn notched_display() -> ScreenDescriptor {
    ScreenDescriptor {
        name: "Built-in Retina Display".into(),
        safe_area_top: NOTCH_HEIGHT,
        ..ScreenDescriptor::plain(1, Rect::new(0.0, 0.0, SCREEN_WIDTH, 1964.0))
    }
}

pub fn external_display() -> ScreenDescriptor {
    ScreenDescriptor {
        name: "External".into(),
        ..ScreenDescriptor::plain(2, Rect::new(SCREEN_WIDTH, 0.0, 2560.0, 1440.0))
    }
}

pub fn test_settings() -> NotchSettings {
    NotchSettings {
        displays: vec![notched_display()],
        selected_display: Some(DisplayId(1)),
        ..Default::default()
    }
}

pub fn fixture() -> Fixture {
    fixture_with(test_settings())
}

pub fn fixture_with(settings: NotchSettings) -> Fixture {
    let surface = Rc::new(RecordingSurface::default());
    let layout = Rc::new(RecordingLayout::default());
    let haptics = Rc::new(CountingHaptics::default());
    let gates = InputGates::new();

    let ctx = NotchContext::new(
        settings,
        Collaborators {
            surface: surface.clone(),
            layout: layout.clone(),
            haptics: haptics.clone(),
            gates: gates.clone(),
        },
    );

    Fixture {
        machine: StateMachine::new(ctx.clone()),
        ctx,
        surface,
        layout,
        haptics,
        gates,
    }
}

/// Closed panel centred on the test display
pub fn closed_rect() -> Rect {
    Rect::new((SCREEN_WIDTH - 180.0) / 2.0, 0.0, 180.0, NOTCH_HEIGHT)
}

/// Fully open panel centred on the test display
pub fn open_rect() -> Rect {
    Rect::new((SCREEN_WIDTH - 450.0) / 2.0, 0.0, 450.0, NOTCH_HEIGHT + 150.0)
}

pub async fn run_local<F: Future>(future: F) -> F::Output {
    LocalSet::new().run_until(future).await
}
