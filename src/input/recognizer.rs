use crate::core::constants::MARK_CONFIRM_DELAY_MS;
use crate::core::geometry::Point;
use crate::core::transform::Transform;
use crate::input::events::{GestureEvent, PointerMode, TouchEvent, TouchEventType};
use crate::prelude::{Duration, HashMap, Instant};

/// Configuration for gesture recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// How long a single touch in mark mode must survive before it is
    /// confirmed as a mark gesture rather than the first finger of a pinch.
    pub mark_confirm_delay: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            mark_confirm_delay: Duration::from_millis(MARK_CONFIRM_DELAY_MS),
        }
    }
}

/// Internal state of the recognizer. Scratch values (last single-touch
/// position, last pinch distance and midpoint, pending deadline) are
/// invisible to consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum GesturePhase {
    Idle,
    /// Single finger dragging the view in move mode.
    Panning { last: Point },
    /// Two fingers zooming. The distance ref is updated every frame, and
    /// the anchor midpoint is recomputed fresh from the same frame, so the
    /// point under the fingers continuously tracks them.
    Pinching { last_distance: f64 },
    /// Single finger down in mark mode, delay timer outstanding. The latest
    /// position is tracked silently so the loupe opens at a fresh spot.
    PendingMark { deadline: Instant, position: Point },
    /// Confirmed mark gesture; the loupe is visible and tracks the finger.
    Marking { position: Point },
}

/// State machine over raw touch streams. Classifies touches into pan,
/// pinch-zoom, and delayed-mark gestures, and owns the authoritative
/// [`Transform`] it mutates; renderers read it through [`transform`].
///
/// The pending-mark delay is the only suspension point: it is stored as a
/// deadline that the host's scheduled callback fires via [`fire_pending`],
/// and that the next event also honors lazily, so a hold that outlives the
/// delay is confirmed even when the callback arrives late.
///
/// [`transform`]: GestureRecognizer::transform
/// [`fire_pending`]: GestureRecognizer::fire_pending
pub struct GestureRecognizer {
    transform: Transform,
    mode: PointerMode,
    config: GestureConfig,
    active_touches: HashMap<u64, Point>,
    phase: GesturePhase,
}

impl GestureRecognizer {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            transform: Transform::IDENTITY,
            mode: PointerMode::default(),
            config,
            active_touches: HashMap::default(),
            phase: GesturePhase::Idle,
        }
    }

    /// The authoritative current view. Always read this live value inside
    /// the handler that needs it; never act on a copy latched at gesture
    /// start.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Replaces the view wholesale. Used on plan changes: reset to identity,
    /// then fit-to-width once the image's natural size is known.
    pub fn set_view(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    /// Switches the interaction mode. Any pending or in-progress mark
    /// preview is discarded; an active single touch re-seeds into the state
    /// matching the new mode at its current position.
    pub fn set_mode(&mut self, mode: PointerMode) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        if mode == self.mode {
            return events;
        }
        self.mode = mode;

        if matches!(self.phase, GesturePhase::Marking { .. }) {
            events.push(GestureEvent::MarkingCancelled);
        }
        match self.phase {
            GesturePhase::Pinching { .. } => {}
            _ => {
                self.phase = match self.single_touch() {
                    Some(position) => self.seed_single_touch(position, Instant::now()),
                    None => GesturePhase::Idle,
                };
            }
        }
        events
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Whether the loupe should be visible.
    pub fn is_marking(&self) -> bool {
        matches!(self.phase, GesturePhase::Marking { .. })
    }

    /// Raw finger position of the active mark gesture, if one is confirmed.
    pub fn marking_position(&self) -> Option<Point> {
        match self.phase {
            GesturePhase::Marking { position } => Some(position),
            _ => None,
        }
    }

    /// Deadline the host should schedule its timer callback for, if a mark
    /// confirmation is outstanding.
    pub fn pending_deadline(&self) -> Option<Instant> {
        match self.phase {
            GesturePhase::PendingMark { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Clears all gesture scratch state. The transform is left untouched;
    /// plan switches reset it separately through [`set_view`].
    ///
    /// [`set_view`]: GestureRecognizer::set_view
    pub fn reset(&mut self) {
        self.active_touches.clear();
        self.phase = GesturePhase::Idle;
    }

    /// Entry point for the host's scheduled mark-delay callback.
    pub fn fire_pending(&mut self, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        self.promote_pending(now, &mut events);
        events
    }

    /// Processes one raw touch event, delivered in order. Mutates the owned
    /// transform for pan/pinch and returns the observable gesture outcomes.
    pub fn handle_event(&mut self, event: &TouchEvent, now: Instant) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        // A deadline that elapsed before this event arrived counts as fired.
        self.promote_pending(now, &mut events);

        if event.event_type == TouchEventType::Cancel {
            if matches!(self.phase, GesturePhase::Marking { .. }) {
                events.push(GestureEvent::MarkingCancelled);
            }
            log::debug!("touch cancel: resetting gesture state");
            self.reset();
            return events;
        }

        self.active_touches.clear();
        for touch in &event.touches {
            self.active_touches.insert(touch.id, touch.position);
        }

        match self.active_touches.len() {
            0 => self.finish_gesture(&mut events),
            1 => self.track_single_touch(event, now, &mut events),
            _ => self.track_pinch(event, &mut events),
        }

        events
    }

    fn promote_pending(&mut self, now: Instant, events: &mut Vec<GestureEvent>) {
        if let GesturePhase::PendingMark { deadline, position } = self.phase {
            if now >= deadline && self.mode == PointerMode::Mark && self.active_touches.len() == 1 {
                log::debug!("mark gesture confirmed at ({}, {})", position.x, position.y);
                self.phase = GesturePhase::Marking { position };
                events.push(GestureEvent::MarkingStarted { position });
            }
        }
    }

    /// All fingers lifted: resolve or discard, then return to idle.
    fn finish_gesture(&mut self, events: &mut Vec<GestureEvent>) {
        match self.phase {
            GesturePhase::Marking { position } => {
                events.push(GestureEvent::MarkRequested { position });
            }
            GesturePhase::PendingMark { .. } => {
                // Quick tap: the delay never elapsed, so no marker.
                log::debug!("pending mark cancelled by early touch end");
            }
            _ => {}
        }
        self.phase = GesturePhase::Idle;
    }

    fn track_single_touch(
        &mut self,
        event: &TouchEvent,
        now: Instant,
        events: &mut Vec<GestureEvent>,
    ) {
        let position = match event.primary_position() {
            Some(p) => p,
            None => return,
        };

        self.phase = match self.phase {
            GesturePhase::Panning { last } if event.event_type == TouchEventType::Move => {
                let delta = position.subtract(&last);
                self.transform.translate_by(&delta);
                GesturePhase::Panning { last: position }
            }
            GesturePhase::Panning { .. } => GesturePhase::Panning { last: position },
            GesturePhase::PendingMark { deadline, .. } => {
                // Tracked silently; the freshest position wins when the
                // timer fires.
                GesturePhase::PendingMark { deadline, position }
            }
            GesturePhase::Marking { .. } => {
                events.push(GestureEvent::MarkingMoved { position });
                GesturePhase::Marking { position }
            }
            // A pinch decayed to one finger, or the gesture is new: seed the
            // single-touch state at the current position so there is no
            // positional jump on the next move.
            GesturePhase::Pinching { .. } | GesturePhase::Idle => {
                self.seed_single_touch(position, now)
            }
        };
    }

    fn seed_single_touch(&self, position: Point, now: Instant) -> GesturePhase {
        match self.mode {
            PointerMode::Move => GesturePhase::Panning { last: position },
            PointerMode::Mark => GesturePhase::PendingMark {
                deadline: now + self.config.mark_confirm_delay,
                position,
            },
        }
    }

    /// Two or more fingers: pinch-zoom overrides everything else. With more
    /// than two, the two lowest-id touches drive the gesture so the pair
    /// choice is deterministic.
    fn track_pinch(&mut self, event: &TouchEvent, events: &mut Vec<GestureEvent>) {
        match self.phase {
            GesturePhase::Marking { .. } => {
                events.push(GestureEvent::MarkingCancelled);
                log::debug!("mark preview discarded by second touch");
            }
            GesturePhase::PendingMark { .. } => {
                log::debug!("pending mark discarded by second touch");
            }
            _ => {}
        }

        let (a, b) = match self.pinch_pair() {
            Some(pair) => pair,
            None => return,
        };
        let distance = a.distance_to(&b);
        let midpoint = a.midpoint(&b);

        if distance <= 0.0 {
            // Two touch identifiers sharing a point; skip the frame rather
            // than propagate a non-finite scale factor.
            return;
        }

        if let GesturePhase::Pinching { last_distance } = self.phase {
            if event.event_type == TouchEventType::Move && last_distance > 0.0 {
                // Anchor at the current midpoint, not the original one: the
                // image point under the fingers tracks them every frame,
                // giving simultaneous pan-and-zoom.
                let factor = distance / last_distance;
                self.transform.zoom_about(&midpoint, factor);
            }
        }

        self.phase = GesturePhase::Pinching {
            last_distance: distance,
        };
    }

    fn pinch_pair(&self) -> Option<(Point, Point)> {
        let mut ids: Vec<u64> = self.active_touches.keys().copied().collect();
        ids.sort_unstable();
        match (ids.first(), ids.get(1)) {
            (Some(first), Some(second)) => Some((
                self.active_touches[first],
                self.active_touches[second],
            )),
            _ => None,
        }
    }

    fn single_touch(&self) -> Option<Point> {
        if self.active_touches.len() == 1 {
            self.active_touches.values().next().copied()
        } else {
            None
        }
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}
