use slotmap::SlotMap;
use tracing::debug;

use super::room::Room;
use crate::envelope::{EnvelopeData, EnvelopeRequest, EnvelopeSettings};
use crate::error::{ModelError, Result};
use crate::walls::classify_wall_types;

slotmap::new_key_type! {
    /// Unique identifier for a room in the plan.
    pub struct RoomId;
}

/// The room collection: the only shared mutable resource in the engine.
///
/// All mutation goes through [`Plan::update_room`], which replaces the
/// room's fields and bumps a monotonically increasing mutation counter. The
/// counter doubles as the generation tag for asynchronous envelope results:
/// a result computed against an older generation is dropped instead of
/// overwriting newer geometry.
#[derive(Debug, Default)]
pub struct Plan {
    rooms: SlotMap<RoomId, Room>,
    mutation_counter: u64,
    envelope_settings: EnvelopeSettings,
}

impl Plan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a room and returns its ID.
    pub fn add_room(&mut self, room: Room) -> RoomId {
        self.mutation_counter += 1;
        self.rooms.insert(room)
    }

    /// Removes a room, returning it if present.
    pub fn remove_room(&mut self, id: RoomId) -> Option<Room> {
        let removed = self.rooms.remove(id);
        if removed.is_some() {
            self.mutation_counter += 1;
        }
        removed
    }

    /// Returns a reference to a room.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::RoomNotFound`] if the ID is stale.
    pub fn room(&self, id: RoomId) -> Result<&Room> {
        self.rooms.get(id).ok_or_else(|| ModelError::RoomNotFound.into())
    }

    /// Iterates over all rooms.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms.iter()
    }

    /// Number of rooms in the plan.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The current mutation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.mutation_counter
    }

    /// Envelope defaults handed to the external union collaborator.
    #[must_use]
    pub fn envelope_settings(&self) -> &EnvelopeSettings {
        &self.envelope_settings
    }

    /// Replaces envelope defaults.
    pub fn set_envelope_settings(&mut self, settings: EnvelopeSettings) {
        self.envelope_settings = settings;
    }

    /// The single mutation entry point: read-modify-write on one room.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::RoomNotFound`] if the ID is stale; the closure
    /// is not called in that case.
    pub fn update_room(&mut self, id: RoomId, f: impl FnOnce(&mut Room)) -> Result<()> {
        let room = self
            .rooms
            .get_mut(id)
            .ok_or(ModelError::RoomNotFound)?;
        f(room);
        self.mutation_counter += 1;
        Ok(())
    }

    /// Snapshots the plan for an asynchronous envelope recalculation.
    ///
    /// The returned request carries the current generation; pass it back to
    /// [`Plan::apply_envelope_results`] with the collaborator's output.
    #[must_use]
    pub fn begin_envelope_recalc(&self) -> EnvelopeRequest {
        EnvelopeRequest {
            generation: self.mutation_counter,
            settings: self.envelope_settings,
            rooms: self
                .rooms
                .iter()
                .map(|(id, room)| (id, room.clone()))
                .collect(),
        }
    }

    /// Applies per-room results of an envelope recalculation.
    ///
    /// Results tagged with a stale generation are dropped wholesale (the
    /// plan has moved on; a newer request is already in flight or about to
    /// be issued). When a result carries `updated_vertices` — the union
    /// inserted vertices at inter-room intersections — walls are
    /// regenerated from them while `original_vertices` keeps the
    /// manually-authored shape for later separation.
    ///
    /// Returns `true` if the results were applied.
    pub fn apply_envelope_results(
        &mut self,
        generation: u64,
        results: Vec<(RoomId, EnvelopeData)>,
    ) -> bool {
        if generation != self.mutation_counter {
            debug!(
                result_generation = generation,
                current_generation = self.mutation_counter,
                "dropping stale envelope result"
            );
            return false;
        }

        for (id, data) in results {
            let Some(room) = self.rooms.get_mut(id) else {
                debug!("envelope result for removed room, skipping");
                continue;
            };
            room.envelope_vertices = Some(data.envelope);
            room.inner_boundary_vertices = Some(data.inner_boundary);
            if let Some(updated) = data.updated_vertices {
                // Keep the authored baseline; apply_ring would otherwise be
                // re-derived from union-inserted vertices.
                let authored = room.original_vertices.clone();
                room.apply_ring(updated);
                room.original_vertices = authored;
            }
            if !data.walls.is_empty() && data.walls.len() == room.walls.len() {
                room.walls = data.walls;
            }
        }
        self.mutation_counter += 1;
        true
    }

    /// Reclassifies every room's walls from the current adjacency.
    pub fn reclassify_walls(&mut self) {
        let ids: Vec<RoomId> = self.rooms.keys().collect();
        for &id in &ids {
            let Some(room) = self.rooms.get(id) else { continue };
            let others: Vec<&Room> = self
                .rooms
                .iter()
                .filter(|(other_id, _)| *other_id != id)
                .map(|(_, r)| r)
                .collect();
            let types = classify_wall_types(room, &others);
            let Some(room) = self.rooms.get_mut(id) else { continue };
            for (wall, t) in room.walls.iter_mut().zip(types) {
                wall.wall_type = t;
            }
        }
        self.mutation_counter += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn square_room() -> Room {
        Room::from_ring(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(400.0, 0.0),
                Point2::new(400.0, 300.0),
                Point2::new(0.0, 300.0),
            ],
            15.0,
        )
        .unwrap()
    }

    #[test]
    fn update_room_bumps_generation() {
        let mut plan = Plan::new();
        let id = plan.add_room(square_room());
        let g0 = plan.generation();
        plan.update_room(id, |room| {
            room.wall_thickness = 20.0;
        })
        .unwrap();
        assert_eq!(plan.generation(), g0 + 1);
        assert!((plan.room(id).unwrap().wall_thickness - 20.0).abs() < 1e-12);
    }

    #[test]
    fn update_missing_room_errors() {
        let mut plan = Plan::new();
        let id = plan.add_room(square_room());
        plan.remove_room(id);
        assert!(plan.update_room(id, |_| {}).is_err());
    }

    #[test]
    fn stale_envelope_result_is_dropped() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        let mut plan = Plan::new();
        let id = plan.add_room(square_room());
        let request = plan.begin_envelope_recalc();

        // The plan mutates while the external union runs.
        plan.update_room(id, |room| {
            room.wall_thickness = 30.0;
        })
        .unwrap();

        let applied = plan.apply_envelope_results(
            request.generation,
            vec![(id, EnvelopeData::default())],
        );
        assert!(!applied);
        assert!(plan.room(id).unwrap().envelope_vertices.is_none());
    }

    #[test]
    fn current_envelope_result_applies() {
        let mut plan = Plan::new();
        let id = plan.add_room(square_room());
        let request = plan.begin_envelope_recalc();

        let data = EnvelopeData {
            envelope: vec![Point2::new(-215.0, -165.0)],
            ..EnvelopeData::default()
        };
        assert!(plan.apply_envelope_results(request.generation, vec![(id, data)]));
        assert!(plan.room(id).unwrap().envelope_vertices.is_some());
    }

    #[test]
    fn updated_vertices_keep_authored_baseline() {
        let mut plan = Plan::new();
        let id = plan.add_room(square_room());
        let request = plan.begin_envelope_recalc();

        // The union inserted a vertex on the bottom edge.
        let mut updated = plan.room(id).unwrap().vertices.clone();
        updated.insert(1, crate::model::Vertex::new(0.0, -150.0));
        let data = EnvelopeData {
            updated_vertices: Some(updated),
            ..EnvelopeData::default()
        };
        plan.apply_envelope_results(request.generation, vec![(id, data)]);

        let room = plan.room(id).unwrap();
        assert_eq!(room.vertices.len(), 5);
        assert_eq!(room.walls.len(), 5);
        // The authored 4-vertex shape survives for later separation.
        assert_eq!(room.original_vertices.len(), 4);
    }
}
