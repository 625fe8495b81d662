use tracing::debug;

use super::door::{closest_door_pair, door_centers_on_segment};
use super::{SnapConfig, SnapDebugInfo, SnapMode, SnapPreview, SnapResult};
use crate::error::Result;
use crate::math::angle::{alignment_rotation, directions_opposite};
use crate::math::distance_2d::{closest_endpoint_pair, segment_segment_dist};
use crate::math::{Point2, Vector2};
use crate::model::{Plan, RoomId};

/// Score floor that guarantees an opposite pair always beats any
/// non-opposite pair, whatever their distances.
const OPPOSITE_SCORE_BASE: f64 = 1000.0;

/// Finds the best wall alignment between a moving room and the rest of the
/// plan, and the rigid transform (rotation + translation) that commits it.
///
/// Centerline segments are compared pairwise: segment proximity plus an
/// opposite-direction test pick the winning wall pair, a separately tracked
/// closest vertex pair serves as fallback, and doors on the winning pair
/// override plain vertex alignment so two doors meet face to face.
#[derive(Debug)]
pub struct SnapEngine<'a> {
    plan: &'a Plan,
    config: SnapConfig,
}

/// A centerline segment tagged with its owner for pair scoring.
#[derive(Debug, Clone, Copy)]
struct TaggedSegment {
    room: RoomId,
    edge: usize,
    start: Point2,
    end: Point2,
    angle: f64,
}

impl TaggedSegment {
    fn endpoint(&self, index: usize) -> Point2 {
        if index == 0 {
            self.start
        } else {
            self.end
        }
    }

    fn midpoint(&self) -> Point2 {
        Point2::from((self.start.coords + self.end.coords) / 2.0)
    }

    fn direction(&self) -> Vector2 {
        let d = self.end - self.start;
        let len = d.norm();
        if len < crate::math::TOLERANCE {
            Vector2::zeros()
        } else {
            d / len
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BestEdgePair {
    score: f64,
    moving: usize,
    stationary: usize,
    opposite: bool,
    segment_distance: f64,
}

#[derive(Debug, Clone, Copy)]
struct BestVertexPair {
    distance: f64,
    moving_point: Point2,
    stationary_point: Point2,
    stationary_room: RoomId,
}

impl<'a> SnapEngine<'a> {
    /// Creates an engine over the plan with the given thresholds.
    #[must_use]
    pub fn new(plan: &'a Plan, config: SnapConfig) -> Self {
        Self { plan, config }
    }

    /// Evaluates the snap for `moving` at a proposed world-space `offset`.
    ///
    /// With `visualize_only` the commit transform is skipped and the raw
    /// closest-pair geometry is returned for UI preview instead; nothing is
    /// mutated either way.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ModelError::RoomNotFound`] for a stale room
    /// ID.
    pub fn evaluate(
        &self,
        moving: RoomId,
        offset: Vector2,
        visualize_only: bool,
    ) -> Result<SnapResult> {
        let moving_room = self.plan.room(moving)?;
        let moving_segments = tag_segments(
            moving,
            moving_room
                .world_centerline_segments()
                .into_iter()
                .map(|(a, b)| (a + offset, b + offset)),
        );

        let mut stationary_segments: Vec<TaggedSegment> = Vec::new();
        for (id, room) in self.plan.rooms().filter(|(id, _)| *id != moving) {
            stationary_segments.extend(tag_segments(
                id,
                room.world_centerline_segments().into_iter(),
            ));
        }

        let mut debug_info = SnapDebugInfo {
            best_vertex_distance: f64::INFINITY,
            best_segment_distance: f64::INFINITY,
            ..SnapDebugInfo::default()
        };
        if stationary_segments.is_empty() {
            return Ok(SnapResult::none(moving, debug_info));
        }

        let mut best_edge: Option<BestEdgePair> = None;
        let mut best_vertex: Option<BestVertexPair> = None;

        for (mi, m) in moving_segments.iter().enumerate() {
            for (si, s) in stationary_segments.iter().enumerate() {
                debug_info.pairs_evaluated += 1;

                let seg_dist = segment_segment_dist(&m.start, &m.end, &s.start, &s.end);
                let (v_dist, ia, ib) = closest_endpoint_pair(&m.start, &m.end, &s.start, &s.end);
                let opposite =
                    directions_opposite(m.angle, s.angle, self.config.opposite_angle_tolerance);

                if seg_dist <= self.config.edge_threshold {
                    let closeness = 1.0 - seg_dist / self.config.edge_threshold;
                    let score = if opposite {
                        OPPOSITE_SCORE_BASE + closeness * 100.0
                    } else {
                        closeness * 10.0
                    };
                    if best_edge.is_none_or(|b| score > b.score) {
                        best_edge = Some(BestEdgePair {
                            score,
                            moving: mi,
                            stationary: si,
                            opposite,
                            segment_distance: seg_dist,
                        });
                        debug_info.best_score = score;
                        debug_info.best_segment_distance = seg_dist;
                    }
                }

                if v_dist <= self.config.vertex_threshold
                    && best_vertex.is_none_or(|b| v_dist < b.distance)
                {
                    best_vertex = Some(BestVertexPair {
                        distance: v_dist,
                        moving_point: m.endpoint(ia),
                        stationary_point: s.endpoint(ib),
                        stationary_room: s.room,
                    });
                    debug_info.best_vertex_distance = v_dist;
                }
            }
        }

        // An edge pair only bears a rotation when its walls are opposite;
        // doors on the winning pair can still force an edge-vertex snap.
        if let Some(edge) = best_edge {
            let m_seg = &moving_segments[edge.moving];
            let s_seg = &stationary_segments[edge.stationary];

            let door_pair = self.find_door_pair(moving, m_seg, s_seg);
            if let Some((dm, ds)) = door_pair {
                return Ok(self.finalize_edge_snap(
                    moving,
                    moving_room.transform.position + offset,
                    m_seg,
                    s_seg,
                    SnapMode::EdgeVertex,
                    (dm, ds),
                    true,
                    visualize_only,
                    debug_info,
                ));
            }

            if edge.opposite {
                let (v_dist, ia, ib) =
                    closest_endpoint_pair(&m_seg.start, &m_seg.end, &s_seg.start, &s_seg.end);
                let mode = if v_dist <= self.config.vertex_threshold {
                    SnapMode::EdgeVertex
                } else {
                    SnapMode::EdgeOnly
                };
                debug!(
                    ?mode,
                    segment_distance = edge.segment_distance,
                    vertex_distance = v_dist,
                    "edge snap selected"
                );
                return Ok(self.finalize_edge_snap(
                    moving,
                    moving_room.transform.position + offset,
                    m_seg,
                    s_seg,
                    mode,
                    (m_seg.endpoint(ia), s_seg.endpoint(ib)),
                    false,
                    visualize_only,
                    debug_info,
                ));
            }
        }

        if let Some(vertex) = best_vertex {
            let translation = if visualize_only {
                Vector2::zeros()
            } else {
                vertex.stationary_point - vertex.moving_point
            };
            return Ok(SnapResult {
                rotation: 0.0,
                translation,
                snapped: true,
                mode: SnapMode::VertexOnly,
                is_door_snap: false,
                moving_room: moving,
                stationary_room: Some(vertex.stationary_room),
                preview: None,
                debug: debug_info,
            });
        }

        Ok(SnapResult::none(moving, debug_info))
    }

    /// Door centers on the winning wall pair, paired within the door
    /// threshold.
    fn find_door_pair(
        &self,
        moving: RoomId,
        m_seg: &TaggedSegment,
        s_seg: &TaggedSegment,
    ) -> Option<(Point2, Point2)> {
        let moving_room = self.plan.room(moving).ok()?;
        let stationary_room = self.plan.room(s_seg.room).ok()?;
        let m_wall = moving_room.walls.get(m_seg.edge)?;
        let s_wall = stationary_room.walls.get(s_seg.edge)?;

        // The moving segment already carries the proposed offset; the door
        // centers inherit it through the segment endpoints.
        let m_doors = door_centers_on_segment(m_wall, &(m_seg.start, m_seg.end));
        let s_doors = door_centers_on_segment(s_wall, &(s_seg.start, s_seg.end));

        closest_door_pair(&m_doors, &s_doors, self.config.door_threshold)
            .map(|(m, s)| (m.point, s.point))
    }

    #[allow(clippy::too_many_arguments)]
    fn finalize_edge_snap(
        &self,
        moving: RoomId,
        pivot: Point2,
        m_seg: &TaggedSegment,
        s_seg: &TaggedSegment,
        mode: SnapMode,
        anchors: (Point2, Point2),
        is_door_snap: bool,
        visualize_only: bool,
        debug_info: SnapDebugInfo,
    ) -> SnapResult {
        if visualize_only {
            let vertex_pair = match mode {
                SnapMode::EdgeVertex => Some(anchors),
                _ => None,
            };
            return SnapResult {
                rotation: 0.0,
                translation: Vector2::zeros(),
                snapped: true,
                mode,
                is_door_snap,
                moving_room: moving,
                stationary_room: Some(s_seg.room),
                preview: Some(SnapPreview {
                    moving_edge: m_seg.edge,
                    stationary_room: s_seg.room,
                    stationary_edge: s_seg.edge,
                    moving_segment: (m_seg.start, m_seg.end),
                    stationary_segment: (s_seg.start, s_seg.end),
                    vertex_pair,
                }),
                debug: debug_info,
            };
        }

        let rotation = alignment_rotation(m_seg.angle, s_seg.angle);
        let translation = match mode {
            SnapMode::EdgeVertex => {
                let rotated = rotate_about(&pivot, &anchors.0, rotation);
                anchors.1 - rotated
            }
            _ => {
                // Edge-only: land the rotated midpoint on the stationary
                // line.
                let mid = rotate_about(&pivot, &m_seg.midpoint(), rotation);
                let dir = s_seg.direction();
                let projected = s_seg.start + dir * (mid - s_seg.start).dot(&dir);
                projected - mid
            }
        };

        SnapResult {
            rotation,
            translation,
            snapped: true,
            mode,
            is_door_snap,
            moving_room: moving,
            stationary_room: Some(s_seg.room),
            preview: None,
            debug: debug_info,
        }
    }
}

fn tag_segments(
    room: RoomId,
    segments: impl Iterator<Item = (Point2, Point2)>,
) -> Vec<TaggedSegment> {
    segments
        .enumerate()
        .filter_map(|(edge, (start, end))| {
            let d = end - start;
            if d.norm() < crate::math::TOLERANCE {
                return None;
            }
            Some(TaggedSegment {
                room,
                edge,
                start,
                end,
                angle: d.y.atan2(d.x),
            })
        })
        .collect()
}

/// Rotates a point around a pivot.
fn rotate_about(pivot: &Point2, p: &Point2, angle: f64) -> Point2 {
    let (sin, cos) = angle.sin_cos();
    let d = p - pivot;
    Point2::new(
        pivot.x + d.x * cos - d.y * sin,
        pivot.y + d.x * sin + d.y * cos,
    )
}
