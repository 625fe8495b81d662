use serde::{Deserialize, Serialize};

use crate::math::{Point2, Vector2};

/// Placement of a room in world space: translate + rotate + uniform scale.
///
/// Local coordinates are centimeters centered on the room centroid; world
/// coordinates are centimeters in the shared plan frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomTransform {
    /// World-space position of the room's local origin (its centroid).
    pub position: Point2,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f64,
    /// Uniform scale factor.
    pub scale: f64,
}

impl Default for RoomTransform {
    fn default() -> Self {
        Self {
            position: Point2::origin(),
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

impl RoomTransform {
    /// Creates a transform at a position with no rotation and unit scale.
    #[must_use]
    pub fn at(position: Point2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    /// Maps a room-local point into world space.
    #[must_use]
    pub fn local_to_world(&self, p: &Point2) -> Point2 {
        let (sin, cos) = self.rotation.sin_cos();
        let x = p.x * self.scale;
        let y = p.y * self.scale;
        Point2::new(
            self.position.x + x * cos - y * sin,
            self.position.y + x * sin + y * cos,
        )
    }

    /// Maps a world point into room-local space.
    #[must_use]
    pub fn world_to_local(&self, p: &Point2) -> Point2 {
        let (sin, cos) = self.rotation.sin_cos();
        let dx = p.x - self.position.x;
        let dy = p.y - self.position.y;
        // Inverse rotation, then inverse scale.
        let x = dx * cos + dy * sin;
        let y = -dx * sin + dy * cos;
        if self.scale.abs() < f64::EPSILON {
            Point2::new(x, y)
        } else {
            Point2::new(x / self.scale, y / self.scale)
        }
    }

    /// Rotates a local-space vector into world space (no translation).
    #[must_use]
    pub fn rotate_to_world(&self, v: &Vector2) -> Vector2 {
        let (sin, cos) = self.rotation.sin_cos();
        Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos) * self.scale
    }
}

/// Screen mapping: world centimeters to screen pixels (pan + zoom).
///
/// Pixel-threshold comparisons in the interaction layer convert through
/// [`Viewport::px_to_world`] so thresholds stay zoom-independent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space pan offset in pixels.
    pub pan: Vector2,
    /// Zoom factor in pixels per centimeter.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vector2::zeros(),
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Maps a world point to screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, p: &Point2) -> Point2 {
        Point2::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    /// Maps a screen point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, p: &Point2) -> Point2 {
        Point2::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    /// Converts a pixel distance to world centimeters at the current zoom.
    #[must_use]
    pub fn px_to_world(&self, px: f64) -> f64 {
        px / self.zoom
    }
}
