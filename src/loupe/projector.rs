use crate::core::constants::{
    LOUPE_AIM_OFFSET_PX, LOUPE_DIAMETER_PX, LOUPE_MAGNIFICATION, LOUPE_WIDGET_RAISE_PX,
};
use crate::core::geometry::{ImageDimensions, Point};
use crate::core::transform::Transform;
use crate::spatial::clustering::DisplayCluster;

/// Tunables for the magnified preview. The aim offset and widget raise are
/// empirically tuned, device-dependent values; treat them as configuration,
/// not derived quantities.
#[derive(Debug, Clone)]
pub struct LoupeConfig {
    /// Diameter of the circular widget in screen pixels.
    pub diameter: f64,
    /// Intrinsic magnification of the preview contents.
    pub magnification: f64,
    /// Vertical distance between the raw finger position and the aim point.
    pub aim_offset: f64,
    /// Vertical distance between the raw finger position and the widget
    /// center, lifting the preview clear of the hand.
    pub widget_raise: f64,
}

impl Default for LoupeConfig {
    fn default() -> Self {
        Self {
            diameter: LOUPE_DIAMETER_PX,
            magnification: LOUPE_MAGNIFICATION,
            aim_offset: LOUPE_AIM_OFFSET_PX,
            widget_raise: LOUPE_WIDGET_RAISE_PX,
        }
    }
}

/// One frame of loupe geometry, recomputed on every move event.
#[derive(Debug, Clone, PartialEq)]
pub struct LoupeView {
    /// Screen center of the circular widget; follows the raw finger.
    pub widget_center: Point,
    /// The screen point actually being targeted: the finger raised by the
    /// aim offset.
    pub aim_screen: Point,
    /// The aim point inverse-transformed into image pixels, unvalidated.
    pub aim_image: Point,
    /// The validated target: `None` when the aim falls outside the image,
    /// in which case no mark may be created and the crosshair shows an
    /// invalid state.
    pub image_point: Option<Point>,
    /// Translation of the magnified content layer that centers the aim
    /// point under the crosshair.
    pub content_offset: Point,
}

impl LoupeView {
    pub fn is_valid(&self) -> bool {
        self.image_point.is_some()
    }
}

/// Projects the current touch point and transform into loupe geometry, and
/// re-projects display clusters into the magnified view so existing markers
/// stay verifiable while placing a new one nearby.
#[derive(Debug, Clone, Default)]
pub struct LoupeProjector {
    config: LoupeConfig,
}

impl LoupeProjector {
    pub fn new(config: LoupeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoupeConfig {
        &self.config
    }

    /// Computes the full loupe geometry for a raw finger position.
    ///
    /// Validity is decided here, per frame: callers must not cache a
    /// previous frame's `image_point` across moves.
    pub fn view(
        &self,
        finger: Point,
        transform: &Transform,
        dims: &ImageDimensions,
    ) -> LoupeView {
        let aim_screen = Point::new(finger.x, finger.y - self.config.aim_offset);
        let aim_image = transform.screen_to_image(&aim_screen);
        let image_point = if dims.is_known() && dims.contains(&aim_image) {
            Some(aim_image)
        } else {
            None
        };

        let radius = self.config.diameter / 2.0;
        LoupeView {
            widget_center: Point::new(finger.x, finger.y - self.config.widget_raise),
            aim_screen,
            aim_image,
            image_point,
            content_offset: Point::new(
                radius - aim_image.x * self.config.magnification,
                radius - aim_image.y * self.config.magnification,
            ),
        }
    }

    /// Resolves a raw finger position to a validated image-space coordinate,
    /// shared by the per-frame crosshair state and the gesture-end mark
    /// request.
    pub fn resolve_aim(
        &self,
        finger: Point,
        transform: &Transform,
        dims: &ImageDimensions,
    ) -> Option<Point> {
        self.view(finger, transform, dims).image_point
    }

    /// Re-projects a display cluster into loupe-local pixels through the
    /// local magnification. The caller clips to the circular widget.
    pub fn project_cluster(
        &self,
        cluster: &DisplayCluster,
        view: &LoupeView,
        dims: &ImageDimensions,
    ) -> Point {
        let image = dims.from_percent(&Point::new(cluster.x, cluster.y));
        image
            .scale(self.config.magnification)
            .add(&view.content_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> LoupeProjector {
        LoupeProjector::new(LoupeConfig::default())
    }

    #[test]
    fn test_aim_is_offset_vertically() {
        let p = projector();
        let transform = Transform::new(10.0, -20.0, 2.0);
        let dims = ImageDimensions::new(1000.0, 1000.0);
        let offset = p.config().aim_offset;

        let view = p.view(Point::new(100.0, 300.0), &transform, &dims);

        // The resolved aim equals the inverse transform of the offset point,
        // not of the raw finger position.
        let expected = transform.screen_to_image(&Point::new(100.0, 300.0 - offset));
        assert_eq!(view.aim_image, expected);
        let raw = transform.screen_to_image(&Point::new(100.0, 300.0));
        assert_ne!(view.aim_image, raw);
    }

    #[test]
    fn test_widget_follows_finger() {
        let p = projector();
        let dims = ImageDimensions::new(1000.0, 1000.0);
        let view = p.view(Point::new(250.0, 400.0), &Transform::IDENTITY, &dims);
        assert_eq!(view.widget_center.x, 250.0);
        assert_eq!(view.widget_center.y, 400.0 - p.config().widget_raise);
    }

    #[test]
    fn test_out_of_bounds_aim_is_invalid() {
        let p = projector();
        let dims = ImageDimensions::new(500.0, 500.0);
        // Aim lands above the image top edge.
        let view = p.view(Point::new(100.0, 10.0), &Transform::IDENTITY, &dims);
        assert!(view.image_point.is_none());
        assert!(!view.is_valid());

        // Same finger with the image panned down is valid again.
        let panned = Transform::new(0.0, -200.0, 1.0);
        let view = p.view(Point::new(100.0, 10.0), &panned, &dims);
        assert!(view.is_valid());
    }

    #[test]
    fn test_unknown_dimensions_never_resolve() {
        let p = projector();
        let view = p.view(
            Point::new(100.0, 300.0),
            &Transform::IDENTITY,
            &ImageDimensions::unknown(),
        );
        assert!(view.image_point.is_none());
    }

    #[test]
    fn test_content_offset_centers_aim_under_crosshair() {
        let p = projector();
        let dims = ImageDimensions::new(1000.0, 1000.0);
        let finger = Point::new(300.0, 500.0);
        let view = p.view(finger, &Transform::IDENTITY, &dims);

        let magnified_aim = view
            .aim_image
            .scale(p.config().magnification)
            .add(&view.content_offset);
        let radius = p.config().diameter / 2.0;
        assert!((magnified_aim.x - radius).abs() < 1e-9);
        assert!((magnified_aim.y - radius).abs() < 1e-9);
    }

    #[test]
    fn test_cluster_projection_matches_aim_scale() {
        let p = projector();
        let dims = ImageDimensions::new(1000.0, 1000.0);
        let finger = Point::new(300.0, 500.0);
        let view = p.view(finger, &Transform::IDENTITY, &dims);

        // A cluster sitting exactly at the aim point lands on the crosshair.
        let pct = dims.to_percent(&view.aim_image);
        let cluster = DisplayCluster {
            representative_id: 1,
            x: pct.x,
            y: pct.y,
            label: "1".to_string(),
            is_cluster: false,
        };
        let local = p.project_cluster(&cluster, &view, &dims);
        let radius = p.config().diameter / 2.0;
        assert!((local.x - radius).abs() < 1e-9);
        assert!((local.y - radius).abs() < 1e-9);
    }
}
