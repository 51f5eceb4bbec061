use crate::core::constants::{SCALE_MAX, SCALE_MIN};
use crate::core::geometry::{ImageDimensions, Point};
use serde::{Deserialize, Serialize};

/// The current affine view mapping image pixel space to screen space:
/// a screen-space translation of the image's top-left origin plus a uniform
/// scale. `sx = x + ix * scale`, `sy = y + iy * scale`.
///
/// The scale invariant `SCALE_MIN..=SCALE_MAX` holds after every operation;
/// requested scales are clamped before being committed. The authoritative
/// value is owned by the gesture recognizer and shared read-only with
/// renderers and the export collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Transform {
    /// No pan, unit scale. The state every plan starts from.
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            scale: scale.clamp(SCALE_MIN, SCALE_MAX),
        }
    }

    /// The initial view for a freshly loaded plan: image width fitted to the
    /// viewport width, anchored at the origin.
    pub fn fit_width(viewport_width: f64, dims: &ImageDimensions) -> Self {
        if !dims.is_known() || viewport_width <= 0.0 {
            return Self::IDENTITY;
        }
        Self::new(0.0, 0.0, viewport_width / dims.width)
    }

    /// Maps an image-pixel coordinate to screen space.
    pub fn image_to_screen(&self, image: &Point) -> Point {
        Point::new(self.x + image.x * self.scale, self.y + image.y * self.scale)
    }

    /// Maps a screen coordinate back to image pixel space.
    pub fn screen_to_image(&self, screen: &Point) -> Point {
        Point::new(
            (screen.x - self.x) / self.scale,
            (screen.y - self.y) / self.scale,
        )
    }

    /// Pure translation; scale untouched.
    pub fn translate_by(&mut self, delta: &Point) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Applies a scale factor anchored at a screen point: the image-space
    /// point under `anchor` before the zoom maps back to the same screen
    /// coordinate after it. Non-finite or non-positive factors skip the frame.
    pub fn zoom_about(&mut self, anchor: &Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return;
        }
        let new_scale = (self.scale * factor).clamp(SCALE_MIN, SCALE_MAX);
        let effective = new_scale / self.scale;
        self.x = anchor.x - (anchor.x - self.x) * effective;
        self.y = anchor.y - (anchor.y - self.y) * effective;
        self.scale = new_scale;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
