//! Coordinate math and naming scheme consumed by the archive collaborator.
//! Archive generation itself (packaging photos and stamped plan images)
//! happens outside this core; these helpers keep the layout deterministic so
//! exports are reproducible across devices.

use crate::core::constants::{EXPORT_BADGE_MIN_PX, EXPORT_BADGE_RATIO, EXPORT_SEQ_PAD};
use crate::core::geometry::{ImageDimensions, Point};
use crate::markers::marker::Marker;

/// Placement of one marker badge on an export-resolution canvas. Positions
/// come straight from the marker's percentage coordinates, independent of
/// the live viewport transform.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgePlacement {
    pub center: Point,
    /// Badge edge length, scaled with the canvas but never below the
    /// legibility floor.
    pub size: f64,
}

/// Photo file name for a marker:
/// `{seq:03}_{floor}[M]F_{location}_{code1}_{code2}_{code3}_{code4}_{code6}_{length}_{width}`.
pub fn photo_file_name(marker: &Marker) -> String {
    let d = &marker.data;
    let mut floor = d.floor.clone();
    if d.is_mezzanine {
        floor.push('M');
    }
    floor.push('F');
    format!(
        "{:0pad$}_{}_{}_{}_{}_{}_{}_{}_{}_{}",
        marker.seq,
        floor,
        d.location,
        d.code1,
        d.code2,
        d.code3,
        d.code4,
        d.code6,
        d.length,
        d.width,
        pad = EXPORT_SEQ_PAD,
    )
}

/// File name for a stamped plan image.
pub fn map_file_name(plan_name: &str) -> String {
    format!("{}_marked", plan_name)
}

/// Where and how large to stamp a marker badge on an export canvas.
pub fn badge_placement(marker: &Marker, canvas: &ImageDimensions) -> BadgePlacement {
    BadgePlacement {
        center: canvas.from_percent(&Point::new(marker.x, marker.y)),
        size: (canvas.width * EXPORT_BADGE_RATIO).max(EXPORT_BADGE_MIN_PX),
    }
}

/// The distinct plan indices that have at least one marker, ascending. Plans
/// without markers are skipped by the export.
pub fn plans_with_markers(markers: &[Marker]) -> Vec<usize> {
    let mut indices: Vec<usize> = markers.iter().map(|m| m.plan_index).collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}
