use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an aperture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApertureId(Uuid);

impl ApertureId {
    /// Generates a fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ApertureId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ApertureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of opening cut into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApertureKind {
    Door,
    Window,
}

/// The wall end an aperture's `distance` is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorEnd {
    Start,
    End,
}

/// A door or window cut into a wall.
///
/// Position along the wall is always a distance from one named end, never an
/// absolute coordinate, so it survives wall-length changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aperture {
    pub id: ApertureId,
    pub kind: ApertureKind,
    /// Opening width in centimeters.
    pub width: f64,
    /// Distance from the anchored wall end to the aperture's near edge.
    pub distance: f64,
    /// Which wall end `distance` is measured from.
    pub anchor: AnchorEnd,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Aperture {
    /// Creates an aperture anchored to the wall start.
    #[must_use]
    pub fn new(kind: ApertureKind, width: f64, distance: f64) -> Self {
        Self {
            id: ApertureId::new(),
            kind,
            width,
            distance,
            anchor: AnchorEnd::Start,
            flip_h: false,
            flip_v: false,
        }
    }

    /// Distance from the wall start to the aperture's near edge, for a wall
    /// of the given length.
    #[must_use]
    pub fn offset_from_start(&self, wall_length: f64) -> f64 {
        match self.anchor {
            AnchorEnd::Start => self.distance,
            AnchorEnd::End => wall_length - self.distance - self.width,
        }
    }

    /// Distance from the wall start to the aperture's center.
    #[must_use]
    pub fn center_from_start(&self, wall_length: f64) -> f64 {
        self.offset_from_start(wall_length) + self.width / 2.0
    }

    /// Re-anchors the aperture so `distance` is measured from whichever wall
    /// end is nearer, given the desired offset of the near edge from the
    /// wall start.
    pub fn anchor_from_nearer_end(&mut self, offset_from_start: f64, wall_length: f64) {
        let center = offset_from_start + self.width / 2.0;
        if center <= wall_length / 2.0 {
            self.anchor = AnchorEnd::Start;
            self.distance = offset_from_start;
        } else {
            self.anchor = AnchorEnd::End;
            self.distance = wall_length - offset_from_start - self.width;
        }
    }

    /// Clamps the aperture span to fit a wall of the given length.
    ///
    /// Returns `true` if the aperture was moved or resized.
    pub fn clamp_to_wall(&mut self, wall_length: f64) -> bool {
        let mut changed = false;
        if self.width > wall_length {
            self.width = wall_length;
            changed = true;
        }
        let max_distance = (wall_length - self.width).max(0.0);
        if self.distance < 0.0 {
            self.distance = 0.0;
            changed = true;
        } else if self.distance > max_distance {
            self.distance = max_distance;
            changed = true;
        }
        changed
    }
}
