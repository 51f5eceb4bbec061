use crate::core::geometry::Point;
use serde::{Deserialize, Serialize};

/// Phases of a raw touch event as delivered by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// One finger on the surface: a stable per-finger identity plus its
/// client-space position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, position: Point) -> Self {
        Self { id, position }
    }
}

/// A raw touch event. `touches` carries the full set of fingers still on the
/// surface after the event, mirroring how browser touch lists behave: an
/// `End` event lists the remaining fingers, not the lifted ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub event_type: TouchEventType,
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    pub fn new(event_type: TouchEventType, touches: Vec<TouchPoint>) -> Self {
        Self { event_type, touches }
    }

    pub fn start(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchEventType::Start, touches)
    }

    pub fn moved(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchEventType::Move, touches)
    }

    pub fn end(touches: Vec<TouchPoint>) -> Self {
        Self::new(TouchEventType::End, touches)
    }

    pub fn cancel() -> Self {
        Self::new(TouchEventType::Cancel, Vec::new())
    }

    /// The first touch position, if any finger is down.
    pub fn primary_position(&self) -> Option<Point> {
        self.touches.first().map(|t| t.position)
    }
}

/// Interaction mode selected by UI chrome outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerMode {
    /// Single-finger drag pans the view.
    #[default]
    Move,
    /// Press-and-hold places a marker through the loupe.
    Mark,
}

/// Observable outcomes emitted by the gesture recognizer. Pan and pinch are
/// not reported here; their effect is visible only through the owned
/// [`Transform`](crate::core::transform::Transform).
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEvent {
    /// The pending-mark delay elapsed; the loupe should become visible.
    MarkingStarted { position: Point },
    /// The marking finger moved; the loupe tracks it.
    MarkingMoved { position: Point },
    /// An in-progress mark preview was discarded (second finger, mode
    /// change, or cancel) without producing a marker.
    MarkingCancelled,
    /// The marking finger lifted; `position` is the last raw screen point,
    /// to be resolved through the loupe aim projection.
    MarkRequested { position: Point },
}
