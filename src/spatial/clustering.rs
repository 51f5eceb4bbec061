use crate::core::constants::MARKER_FOOTPRINT_PX;
use crate::core::geometry::ImageDimensions;
use crate::markers::marker::Marker;

/// Configuration for marker clustering.
#[derive(Debug, Clone)]
pub struct ClusteringConfig {
    /// Rendered footprint of one marker badge in screen pixels, border
    /// included. Converted to percentage-space thresholds against the
    /// current image dimensions.
    pub footprint_px: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            footprint_px: MARKER_FOOTPRINT_PX,
        }
    }
}

/// An on-screen merged representation of one or more markers whose rendered
/// footprints would overlap. Ephemeral: lives only until the next
/// recomputation; the clustering engine is the sole producer and consumers
/// (canvas layer, loupe layer) only read.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCluster {
    /// Identity of the lowest-seq member, used as a stable render key.
    pub representative_id: u64,
    /// Centroid position in percentage coordinates (0-100).
    pub x: f64,
    pub y: f64,
    /// Member sequence numbers joined in ascending order, e.g. `"1,2"`.
    pub label: String,
    pub is_cluster: bool,
}

/// Running cluster state during the greedy scan. Membership is tested
/// against the live centroid, which drifts as members join; a later marker
/// is compared to the drifted center, not the seed point, so the grouping
/// is path-dependent on sorted-seq order.
struct ClusterAccumulator {
    ids: Vec<u64>,
    seqs: Vec<u32>,
    sum_x: f64,
    sum_y: f64,
}

impl ClusterAccumulator {
    fn seed(marker: &Marker) -> Self {
        Self {
            ids: vec![marker.id],
            seqs: vec![marker.seq],
            sum_x: marker.x,
            sum_y: marker.y,
        }
    }

    fn centroid(&self) -> (f64, f64) {
        let n = self.ids.len() as f64;
        (self.sum_x / n, self.sum_y / n)
    }

    fn absorb(&mut self, marker: &Marker) {
        self.ids.push(marker.id);
        self.seqs.push(marker.seq);
        self.sum_x += marker.x;
        self.sum_y += marker.y;
    }

    fn into_display(self) -> DisplayCluster {
        let n = self.ids.len() as f64;
        let label = self
            .seqs
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        DisplayCluster {
            representative_id: self.ids[0],
            x: self.sum_x / n,
            y: self.sum_y / n,
            label,
            is_cluster: self.ids.len() > 1,
        }
    }
}

/// Greedy single-pass marker clustering.
///
/// Deterministic regardless of input order: markers are sorted by ascending
/// `seq` before the scan, which fixes both the grouping and the
/// left-to-right label order. O(n*k) with k the running cluster count;
/// marker counts are tens per plan, not thousands.
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: ClusteringConfig,
}

impl ClusterEngine {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ClusteringConfig) {
        self.config = config;
    }

    /// Rebuilds the full display list for the active plan. Recomputation is
    /// pure and total; no incremental update is attempted. Unknown image
    /// dimensions yield an empty list.
    pub fn display_clusters(
        &self,
        markers: &[Marker],
        plan_index: usize,
        dims: &ImageDimensions,
    ) -> Vec<DisplayCluster> {
        if !dims.is_known() {
            return Vec::new();
        }

        let threshold_x = self.config.footprint_px / dims.width * 100.0;
        let threshold_y = self.config.footprint_px / dims.height * 100.0;

        let mut plan_markers: Vec<&Marker> = markers
            .iter()
            .filter(|m| m.plan_index == plan_index)
            .collect();
        plan_markers.sort_by_key(|m| m.seq);

        let mut clusters: Vec<ClusterAccumulator> = Vec::new();
        for marker in plan_markers {
            // Rectangular proximity test, strict on both axes, against the
            // live centroid.
            let existing = clusters.iter_mut().find(|c| {
                let (cx, cy) = c.centroid();
                (cx - marker.x).abs() < threshold_x && (cy - marker.y).abs() < threshold_y
            });
            match existing {
                Some(cluster) => cluster.absorb(marker),
                None => clusters.push(ClusterAccumulator::seed(marker)),
            }
        }

        clusters.into_iter().map(|c| c.into_display()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::marker::MarkerData;

    fn marker(seq: u32, plan_index: usize, x: f64, y: f64) -> Marker {
        Marker::new(
            seq as u64 + 100,
            plan_index,
            x,
            y,
            seq,
            MarkerData::default(),
            Vec::new(),
        )
    }

    fn engine() -> ClusterEngine {
        ClusterEngine::new(ClusteringConfig::default())
    }

    #[test]
    fn test_nearby_markers_merge_with_joined_label() {
        let dims = ImageDimensions::new(1000.0, 1000.0);
        // Footprint 22px over 1000px -> threshold ~2.2%.
        let markers = vec![
            marker(1, 0, 50.0, 50.0),
            marker(2, 0, 50.1, 50.0),
            marker(5, 0, 80.0, 80.0),
        ];

        let clusters = engine().display_clusters(&markers, 0, &dims);
        assert_eq!(clusters.len(), 2);

        let merged = clusters.iter().find(|c| c.is_cluster).unwrap();
        assert_eq!(merged.label, "1,2");
        assert!((merged.x - 50.05).abs() < 1e-9);
        assert!((merged.y - 50.0).abs() < 1e-9);
        assert_eq!(merged.representative_id, 101);

        let single = clusters.iter().find(|c| !c.is_cluster).unwrap();
        assert_eq!(single.label, "5");
        assert_eq!((single.x, single.y), (80.0, 80.0));
    }

    #[test]
    fn test_grouping_is_input_order_independent() {
        let dims = ImageDimensions::new(1000.0, 1000.0);
        let base = vec![
            marker(3, 0, 10.0, 10.0),
            marker(1, 0, 11.0, 10.5),
            marker(7, 0, 60.0, 60.0),
            marker(2, 0, 10.5, 10.2),
            marker(4, 0, 60.5, 60.5),
        ];

        let reference = engine().display_clusters(&base, 0, &dims);

        // Every rotation of the input produces identical clusters.
        let mut permuted = base.clone();
        for _ in 0..base.len() {
            permuted.rotate_left(1);
            let clusters = engine().display_clusters(&permuted, 0, &dims);
            assert_eq!(clusters, reference);
        }

        let labels: Vec<&str> = reference.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1,2,3", "4,7"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Footprint 25px over a 200px image: threshold is exactly 12.5%.
        let dims = ImageDimensions::new(200.0, 200.0);
        let mut e = engine();
        e.set_config(ClusteringConfig { footprint_px: 25.0 });

        // Exactly at the threshold distance: must not merge.
        let apart = vec![marker(1, 0, 50.0, 50.0), marker(2, 0, 62.5, 50.0)];
        assert_eq!(e.display_clusters(&apart, 0, &dims).len(), 2);

        // 0.01% closer: must merge.
        let close = vec![marker(1, 0, 50.0, 50.0), marker(2, 0, 62.49, 50.0)];
        let clusters = e.display_clusters(&close, 0, &dims);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].label, "1,2");
    }

    #[test]
    fn test_proximity_is_rectangular_not_radial() {
        let dims = ImageDimensions::new(200.0, 200.0);
        let mut e = engine();
        e.set_config(ClusteringConfig { footprint_px: 25.0 });

        // Within the 12.5% threshold on each axis independently but
        // radially ~14.1% apart: still merges.
        let diagonal = vec![marker(1, 0, 50.0, 50.0), marker(2, 0, 60.0, 60.0)];
        assert_eq!(e.display_clusters(&diagonal, 0, &dims).len(), 1);

        // Barely over on the X axis alone: stays separate.
        let off_axis = vec![marker(1, 0, 50.0, 50.0), marker(2, 0, 63.0, 50.1)];
        assert_eq!(e.display_clusters(&off_axis, 0, &dims).len(), 2);
    }

    #[test]
    fn test_centroid_drift_is_path_dependent() {
        let dims = ImageDimensions::new(100.0, 100.0);
        let mut e = engine();
        e.set_config(ClusteringConfig { footprint_px: 10.0 });
        // Threshold 10%. Marker 3 at x=21 is 11 away from the seed at 10,
        // but only 7 away from the centroid (10+18)/2=14 after marker 2
        // joins, so it merges only because the centroid drifted.
        let markers = vec![
            marker(1, 0, 10.0, 50.0),
            marker(2, 0, 18.0, 50.0),
            marker(3, 0, 21.0, 50.0),
        ];
        let clusters = e.display_clusters(&markers, 0, &dims);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].label, "1,2,3");
        assert!((clusters[0].x - (10.0 + 18.0 + 21.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_filters_to_active_plan() {
        let dims = ImageDimensions::new(1000.0, 1000.0);
        let markers = vec![
            marker(1, 0, 50.0, 50.0),
            marker(2, 1, 50.0, 50.0),
            marker(3, 0, 50.0, 50.0),
        ];
        let clusters = engine().display_clusters(&markers, 0, &dims);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].label, "1,3");

        let other = engine().display_clusters(&markers, 1, &dims);
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].label, "2");
    }

    #[test]
    fn test_unknown_dimensions_yield_empty_list() {
        let markers = vec![marker(1, 0, 50.0, 50.0)];
        let clusters = engine().display_clusters(&markers, 0, &ImageDimensions::unknown());
        assert!(clusters.is_empty());
    }
}
