use crate::core::geometry::{ImageDimensions, Point};
use crate::markers::marker::{Marker, MarkerData};

/// A mark request that has been resolved to an image-space point but not yet
/// completed by the save form. Position is already converted to percentage
/// coordinates and the sequence number is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub id: u64,
    pub plan_index: usize,
    /// Percentage coordinates (0-100).
    pub x: f64,
    pub y: f64,
    pub seq: u32,
}

/// Turns resolved image-space coordinates into marker records. Persistence
/// and photo capture stay with external collaborators; this pipeline owns
/// identity allocation and the draft lifecycle.
///
/// At most one draft is active at a time (the save form is modal). A new
/// draft replaces an abandoned one; `cancel` discards without consuming the
/// sequence number (nothing was persisted, so `max(existing) + 1` yields the
/// same value next time).
#[derive(Debug, Default)]
pub struct MarkPipeline {
    next_id: u64,
    active_draft: Option<MarkerDraft>,
}

impl MarkPipeline {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active_draft: None,
        }
    }

    /// Seeds the id allocator above the markers restored from the store, so
    /// new ids never collide with persisted ones.
    pub fn resume(existing: &[Marker]) -> Self {
        Self {
            next_id: existing.iter().map(|m| m.id).max().unwrap_or(0) + 1,
            active_draft: None,
        }
    }

    pub fn active_draft(&self) -> Option<&MarkerDraft> {
        self.active_draft.as_ref()
    }

    /// Opens a draft for a confirmed image-space point. Returns `None` when
    /// the dimensions are unknown or the point is out of bounds; creation is
    /// disabled rather than erroring.
    ///
    /// `seq` is `max(existing seq) + 1` across the whole project; sequence
    /// numbers are global, not per plan, and are never reused.
    pub fn draft(
        &mut self,
        image_point: Point,
        plan_index: usize,
        markers: &[Marker],
        dims: &ImageDimensions,
    ) -> Option<MarkerDraft> {
        if !dims.is_known() || !dims.contains(&image_point) {
            return None;
        }

        let seq = markers.iter().map(|m| m.seq).max().unwrap_or(0) + 1;
        let percent = dims.to_percent(&image_point);
        let draft = MarkerDraft {
            id: self.next_id,
            plan_index,
            x: percent.x,
            y: percent.y,
            seq,
        };
        self.next_id += 1;
        log::debug!("marker draft opened: seq {} on plan {}", seq, plan_index);
        self.active_draft = Some(draft.clone());
        Some(draft)
    }

    /// Discards the active draft, if any.
    pub fn cancel(&mut self) {
        if self.active_draft.take().is_some() {
            log::debug!("marker draft cancelled");
        }
    }

    /// Completes the active draft into an immutable marker. Returns `None`
    /// when no draft is open.
    pub fn commit(&mut self, data: MarkerData, photo: Vec<u8>) -> Option<Marker> {
        let draft = self.active_draft.take()?;
        Some(Marker::new(
            draft.id,
            draft.plan_index,
            draft.x,
            draft.y,
            draft.seq,
            data,
            photo,
        ))
    }
}
