use crate::core::geometry::{ImageDimensions, Point};
use crate::core::transform::Transform;
use crate::input::events::{GestureEvent, PointerMode, TouchEvent};
use crate::input::recognizer::{GestureConfig, GestureRecognizer};
use crate::loupe::projector::{LoupeConfig, LoupeProjector, LoupeView};
use crate::markers::marker::{Marker, MarkerData};
use crate::markers::pipeline::{MarkPipeline, MarkerDraft};
use crate::markers::store::MarkerStore;
use crate::prelude::Instant;
use crate::spatial::clustering::{ClusterEngine, ClusteringConfig, DisplayCluster};
use crate::{PlanError, Result};

/// Per-component tuning knobs, aggregated for construction.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceOptions {
    pub gestures: GestureConfig,
    pub loupe: LoupeConfig,
    pub clustering: ClusteringConfig,
}

/// Outcomes surfaced to UI chrome. Pan and zoom are not events; their effect
/// is read from [`Workspace::transform`] when rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    /// A mark gesture was confirmed; show the loupe.
    LoupeShown,
    /// The marking finger moved; re-query [`Workspace::loupe_view`].
    LoupeMoved,
    /// The mark gesture ended or was discarded; hide the loupe.
    LoupeHidden,
    /// A touch resolved to a valid image point: the save form should open
    /// for this draft and finish with [`Workspace::commit_mark`] or
    /// [`Workspace::cancel_mark`].
    MarkDraftReady(MarkerDraft),
}

/// The annotation session for one project: wires the gesture recognizer,
/// loupe projector, clustering engine, and mark pipeline behind a single
/// façade, and talks to the persistence collaborator through the
/// [`MarkerStore`] seam.
///
/// Everything runs synchronously on the caller's event thread. The marker
/// set is append-only here: edits and deletion are out of scope.
pub struct Workspace<S: MarkerStore> {
    recognizer: GestureRecognizer,
    loupe: LoupeProjector,
    clusters: ClusterEngine,
    pipeline: MarkPipeline,
    markers: Vec<Marker>,
    dimensions: ImageDimensions,
    active_plan: usize,
    store: S,
}

impl<S: MarkerStore> Workspace<S> {
    /// Restores the session from the store: markers are loaded once at
    /// startup, and the id allocator resumes above them.
    pub fn new(store: S) -> Result<Self> {
        Self::with_options(store, WorkspaceOptions::default())
    }

    pub fn with_options(mut store: S, options: WorkspaceOptions) -> Result<Self> {
        let markers = store.load_markers()?;
        let pipeline = MarkPipeline::resume(&markers);
        Ok(Self {
            recognizer: GestureRecognizer::with_config(options.gestures),
            loupe: LoupeProjector::new(options.loupe),
            clusters: ClusterEngine::new(options.clustering),
            pipeline,
            markers,
            dimensions: ImageDimensions::unknown(),
            active_plan: 0,
            store,
        })
    }

    // --- plan lifecycle ---

    pub fn active_plan(&self) -> usize {
        self.active_plan
    }

    /// Switches the active plan: the view resets to identity and the image
    /// dimensions become unknown until [`set_plan_image`] delivers the new
    /// natural size.
    ///
    /// [`set_plan_image`]: Workspace::set_plan_image
    pub fn set_active_plan(&mut self, index: usize) {
        if index == self.active_plan && self.dimensions.is_known() {
            return;
        }
        log::debug!("switching to plan {}", index);
        self.active_plan = index;
        self.dimensions = ImageDimensions::unknown();
        self.pipeline.cancel();
        self.recognizer.reset();
        self.recognizer.set_view(Transform::IDENTITY);
    }

    /// Delivers the loaded image's natural pixel size, replacing the
    /// identity view with one that fits the image width to the viewport.
    pub fn set_plan_image(&mut self, dims: ImageDimensions, viewport_width: f64) {
        self.dimensions = dims;
        self.recognizer
            .set_view(Transform::fit_width(viewport_width, &dims));
    }

    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    // --- interaction ---

    pub fn mode(&self) -> PointerMode {
        self.recognizer.mode()
    }

    pub fn set_mode(&mut self, mode: PointerMode) -> Vec<WorkspaceEvent> {
        let gestures = self.recognizer.set_mode(mode);
        self.map_gesture_events(gestures)
    }

    /// Feeds one raw touch event through the recognizer, in delivery order.
    pub fn handle_touch(&mut self, event: &TouchEvent, now: Instant) -> Vec<WorkspaceEvent> {
        let gestures = self.recognizer.handle_event(event, now);
        self.map_gesture_events(gestures)
    }

    /// Entry point for the host's scheduled mark-delay callback; see
    /// [`mark_timer_deadline`] for when to schedule it.
    ///
    /// [`mark_timer_deadline`]: Workspace::mark_timer_deadline
    pub fn fire_mark_timer(&mut self, now: Instant) -> Vec<WorkspaceEvent> {
        let gestures = self.recognizer.fire_pending(now);
        self.map_gesture_events(gestures)
    }

    pub fn mark_timer_deadline(&self) -> Option<Instant> {
        self.recognizer.pending_deadline()
    }

    fn map_gesture_events(&mut self, gestures: Vec<GestureEvent>) -> Vec<WorkspaceEvent> {
        let mut events = Vec::new();
        for gesture in gestures {
            match gesture {
                GestureEvent::MarkingStarted { .. } => events.push(WorkspaceEvent::LoupeShown),
                GestureEvent::MarkingMoved { .. } => events.push(WorkspaceEvent::LoupeMoved),
                GestureEvent::MarkingCancelled => events.push(WorkspaceEvent::LoupeHidden),
                GestureEvent::MarkRequested { position } => {
                    events.push(WorkspaceEvent::LoupeHidden);
                    if let Some(draft) = self.resolve_mark(position) {
                        events.push(WorkspaceEvent::MarkDraftReady(draft));
                    }
                }
            }
        }
        events
    }

    /// Resolves a gesture-end screen position through the loupe aim
    /// projection. An out-of-bounds aim is a normal outcome: no draft, no
    /// error.
    fn resolve_mark(&mut self, position: Point) -> Option<MarkerDraft> {
        let transform = self.recognizer.transform();
        let image_point = self
            .loupe
            .resolve_aim(position, &transform, &self.dimensions);
        match image_point {
            Some(point) => {
                self.pipeline
                    .draft(point, self.active_plan, &self.markers, &self.dimensions)
            }
            None => {
                log::debug!("mark gesture ended on no valid target");
                None
            }
        }
    }

    // --- mark completion (driven by the external save form) ---

    /// Completes the open draft with the form payload and captured photo,
    /// appends the marker to the set and the store, and drops back to move
    /// mode.
    pub fn commit_mark(&mut self, data: MarkerData, photo: Vec<u8>) -> Result<Marker> {
        let marker = self
            .pipeline
            .commit(data, photo)
            .ok_or_else(|| PlanError::Marker("no active mark draft".to_string()))?;
        self.store.append_marker(&marker)?;
        self.markers.push(marker.clone());
        self.recognizer.set_mode(PointerMode::Move);
        log::debug!("marker {} committed", marker.seq);
        Ok(marker)
    }

    /// Abandons the open draft, if any. The next draft reuses the same
    /// sequence number since nothing was persisted.
    pub fn cancel_mark(&mut self) {
        self.pipeline.cancel();
    }

    // --- read surface ---

    /// The authoritative current view, shared read-only with rendering and
    /// the export collaborator.
    pub fn transform(&self) -> Transform {
        self.recognizer.transform()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Rebuilds the display list for the active plan. Call on every change
    /// to the marker set, the active plan, or the image dimensions; the
    /// same list feeds the main canvas and the loupe.
    pub fn display_clusters(&self) -> Vec<DisplayCluster> {
        self.clusters
            .display_clusters(&self.markers, self.active_plan, &self.dimensions)
    }

    /// Current loupe geometry, present only while a mark gesture is
    /// confirmed. Validity is recomputed per call, never cached.
    pub fn loupe_view(&self) -> Option<LoupeView> {
        let finger = self.recognizer.marking_position()?;
        Some(
            self.loupe
                .view(finger, &self.recognizer.transform(), &self.dimensions),
        )
    }

    pub fn loupe_projector(&self) -> &LoupeProjector {
        &self.loupe
    }

    /// Direct access to the persistence collaborator, for the setup and
    /// export flows that live outside this core.
    pub fn store(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::events::TouchPoint;
    use crate::markers::store::MemoryStore;
    use crate::prelude::Duration;

    fn touch(id: u64, x: f64, y: f64) -> TouchPoint {
        TouchPoint::new(id, Point::new(x, y))
    }

    fn workspace() -> Workspace<MemoryStore> {
        let mut ws = Workspace::new(MemoryStore::new()).unwrap();
        ws.set_plan_image(ImageDimensions::new(1000.0, 1000.0), 1000.0);
        ws
    }

    fn hold_and_lift(ws: &mut Workspace<MemoryStore>, x: f64, y: f64) -> Vec<WorkspaceEvent> {
        let t0 = Instant::now();
        let fire = t0 + Duration::from_millis(150);
        let mut events = ws.handle_touch(&TouchEvent::start(vec![touch(1, x, y)]), t0);
        events.extend(ws.fire_mark_timer(fire));
        events.extend(ws.handle_touch(&TouchEvent::end(vec![]), fire));
        events
    }

    #[test]
    fn test_plan_switch_resets_view_until_image_loads() {
        let mut ws = workspace();
        let t0 = Instant::now();
        ws.handle_touch(&TouchEvent::start(vec![touch(1, 0.0, 0.0)]), t0);
        ws.handle_touch(&TouchEvent::moved(vec![touch(1, 40.0, 40.0)]), t0);

        ws.set_active_plan(1);
        assert_eq!(ws.transform(), Transform::IDENTITY);
        assert!(!ws.dimensions().is_known());
        assert!(ws.display_clusters().is_empty());

        ws.set_plan_image(ImageDimensions::new(2000.0, 1000.0), 500.0);
        assert_eq!(ws.transform().scale, 0.25);
    }

    #[test]
    fn test_mark_flow_produces_draft_and_commit_persists() {
        let mut ws = workspace();
        ws.set_mode(PointerMode::Mark);

        let events = hold_and_lift(&mut ws, 400.0, 400.0);
        assert_eq!(events[0], WorkspaceEvent::LoupeShown);
        assert_eq!(events[1], WorkspaceEvent::LoupeHidden);
        let draft = match &events[2] {
            WorkspaceEvent::MarkDraftReady(draft) => draft.clone(),
            other => panic!("expected draft, got {:?}", other),
        };
        assert_eq!(draft.seq, 1);

        let marker = ws.commit_mark(MarkerData::default(), Vec::new()).unwrap();
        assert_eq!(marker.seq, 1);
        assert_eq!(ws.markers().len(), 1);
        // Saving drops back to move mode, matching the field workflow.
        assert_eq!(ws.mode(), PointerMode::Move);
    }

    #[test]
    fn test_aim_above_image_top_yields_no_draft() {
        let mut ws = workspace();
        ws.set_mode(PointerMode::Mark);

        // The aim offset lifts the target above y=0.
        let events = hold_and_lift(&mut ws, 400.0, 10.0);
        assert!(events
            .iter()
            .all(|e| !matches!(e, WorkspaceEvent::MarkDraftReady(_))));
        assert!(ws.commit_mark(MarkerData::default(), Vec::new()).is_err());
    }

    #[test]
    fn test_loupe_view_present_only_while_marking() {
        let mut ws = workspace();
        ws.set_mode(PointerMode::Mark);
        let t0 = Instant::now();

        assert!(ws.loupe_view().is_none());
        ws.handle_touch(&TouchEvent::start(vec![touch(1, 300.0, 300.0)]), t0);
        assert!(ws.loupe_view().is_none());

        ws.fire_mark_timer(t0 + Duration::from_millis(150));
        let view = ws.loupe_view().unwrap();
        assert!(view.is_valid());

        ws.handle_touch(&TouchEvent::end(vec![]), t0 + Duration::from_millis(200));
        assert!(ws.loupe_view().is_none());
    }

    #[test]
    fn test_sequence_monotonic_across_interleaved_gestures() {
        let mut ws = workspace();

        for i in 0..4u32 {
            // Pan and pinch in between marks.
            let t0 = Instant::now();
            ws.handle_touch(&TouchEvent::start(vec![touch(1, 500.0, 500.0)]), t0);
            ws.handle_touch(&TouchEvent::moved(vec![touch(1, 510.0, 490.0)]), t0);
            ws.handle_touch(&TouchEvent::end(vec![]), t0);
            ws.handle_touch(
                &TouchEvent::start(vec![touch(1, 400.0, 500.0), touch(2, 600.0, 500.0)]),
                t0,
            );
            ws.handle_touch(
                &TouchEvent::moved(vec![touch(1, 380.0, 500.0), touch(2, 620.0, 500.0)]),
                t0,
            );
            ws.handle_touch(&TouchEvent::end(vec![]), t0);

            ws.set_mode(PointerMode::Mark);
            let events = hold_and_lift(&mut ws, 450.0, 450.0 + 40.0 * i as f64);
            assert!(matches!(
                events.last(),
                Some(WorkspaceEvent::MarkDraftReady(_))
            ));
            let marker = ws.commit_mark(MarkerData::default(), Vec::new()).unwrap();
            assert_eq!(marker.seq, i + 1);
        }

        let seqs: Vec<u32> = ws.markers().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_markers_restored_from_store_feed_clusters_and_seq() {
        let seeded = vec![Marker::new(
            9,
            0,
            50.0,
            50.0,
            7,
            MarkerData::default(),
            Vec::new(),
        )];
        let store = MemoryStore::with_records(None, seeded);
        let mut ws = Workspace::new(store).unwrap();
        ws.set_plan_image(ImageDimensions::new(1000.0, 1000.0), 1000.0);

        assert_eq!(ws.display_clusters().len(), 1);

        ws.set_mode(PointerMode::Mark);
        let events = hold_and_lift(&mut ws, 200.0, 400.0);
        let draft = match events.last() {
            Some(WorkspaceEvent::MarkDraftReady(draft)) => draft,
            other => panic!("expected draft, got {:?}", other),
        };
        assert_eq!(draft.seq, 8);
        assert_eq!(draft.id, 10);
    }
}
