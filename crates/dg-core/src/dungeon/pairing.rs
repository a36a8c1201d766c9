//! Door pairing and geometry carving
//!
//! Runs once after both placement phases. Coincident doors from adjacent
//! rooms are merged into a single canonical connector, redundant
//! duplicates are swept in a mark-then-apply batch, and wall cells under
//! every surviving connection are erased on both sides.

use log::{debug, warn};

use super::room::DoorId;
use super::world::World;

/// Counters reported back to the generation summary
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PairingStats {
    pub paired: usize,
    pub removed: usize,
    pub dead_ends: usize,
    pub anomalies: usize,
}

/// Resolve every unpaired door: merge coincident pairs, confirm dead ends,
/// then sweep the redundant doors in one batch.
pub(crate) fn pair_doors(world: &mut World) -> PairingStats {
    let mut stats = PairingStats::default();

    // Mark phase
    for id in world.door_ids() {
        let Some(door) = world.door(id) else {
            continue;
        };
        if door.room_b.is_some() || door.is_marked_for_deletion() {
            continue;
        }

        match find_partner(world, id) {
            Some(partner) => {
                merge_junction(world, id, partner);
                stats.paired += 1;
            }
            None => {
                if door.is_used() {
                    // Consumed during placement, so a partner should exist
                    warn!(
                        "door {} was consumed during generation but has no partner",
                        id.0
                    );
                    stats.anomalies += 1;
                }
                stats.dead_ends += 1;
            }
        }
    }

    // Apply phase: drop marked doors from their rooms' lists and vacate
    // the arena slots in one batch
    let marked: Vec<DoorId> = world
        .doors()
        .filter(|d| d.is_marked_for_deletion())
        .map(|d| d.id)
        .collect();
    let room_ids: Vec<_> = world.rooms().map(|r| r.id).collect();
    for room_id in room_ids {
        world
            .room_mut(room_id)
            .doors
            .retain(|id| !marked.contains(id));
    }
    for id in &marked {
        world.remove_door(*id);
    }
    stats.removed = marked.len();

    debug!(
        "pairing: {} junctions, {} redundant doors removed, {} dead ends",
        stats.paired, stats.removed, stats.dead_ends
    );
    stats
}

/// Another room's unresolved door whose footprint coincides with this one.
/// A junction is always two doors facing each other across the shared
/// wall; a perpendicular door grazing the same corner cell is not a match.
fn find_partner(world: &World, id: DoorId) -> Option<DoorId> {
    let door = world.door(id)?;
    let footprint = door.footprint();

    world
        .doors()
        .find(|other| {
            other.id != id
                && other.room_a != door.room_a
                && other.room_b.is_none()
                && !other.is_marked_for_deletion()
                && other.facing == door.facing.opposite()
                && other.footprint().intersects(&footprint)
        })
        .map(|other| other.id)
}

/// Merge two coincident doors into one junction. The door owned by the
/// earlier-placed room (higher sort depth) is kept as the canonical
/// connector and enters both rooms' door lists; the other is flagged for
/// the sweep.
fn merge_junction(world: &mut World, a: DoorId, b: DoorId) {
    let (Some(door_a), Some(door_b)) = (world.door(a), world.door(b)) else {
        return;
    };
    let (owner_a, owner_b) = (door_a.room_a, door_b.room_a);

    let (canon_id, redundant_id, redundant_room) =
        if world.room(owner_a).sort_depth >= world.room(owner_b).sort_depth {
            (a, b, owner_b)
        } else {
            (b, a, owner_a)
        };

    if let Some(canon) = world.door_mut(canon_id) {
        canon.room_b = Some(redundant_room);
    }
    if let Some(redundant) = world.door_mut(redundant_id) {
        redundant.mark_for_deletion();
    }

    // The redundant room's list now references the canonical connector in
    // the redundant door's place
    for slot in &mut world.room_mut(redundant_room).doors {
        if *slot == redundant_id {
            *slot = canon_id;
        }
    }
}

/// Erase the wall cells of both connected rooms under every surviving
/// paired door. Erasing an absent cell is a no-op, so this can run any
/// number of times.
pub(crate) fn carve_openings(world: &mut World) {
    let junctions: Vec<_> = world
        .doors()
        .filter_map(|d| d.room_b.map(|b| (d.footprint(), d.room_a, b)))
        .collect();

    for (footprint, room_a, room_b) in junctions {
        world.room_mut(room_a).walls.erase_rect(&footprint);
        world.room_mut(room_b).walls.erase_rect(&footprint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BASE_SORT_DEPTH;
    use crate::dungeon::catalog::{RoomTemplate, SocketSpec};
    use crate::dungeon::room::{RoomId, RoomKind};
    use crate::geometry::{Facing, GridPos};

    /// Two rooms placed side by side whose east/west doors coincide,
    /// without going through the placement engine
    fn abutting_world() -> World {
        let start = RoomTemplate::new(
            "start",
            RoomKind::Start,
            8,
            6,
            vec![SocketSpec::new(7, 2, Facing::East, 2)],
        );
        let other = RoomTemplate::new(
            "other",
            RoomKind::Combat,
            8,
            6,
            vec![SocketSpec::new(0, 2, Facing::West, 2)],
        );

        let mut world = World::with_start(&start, GridPos::new(0, 0));
        world.add_room(&other, GridPos::new(7, 0), BASE_SORT_DEPTH - 1);
        world
    }

    #[test]
    fn test_coincident_doors_merge_to_one_connector() {
        let mut world = abutting_world();
        let stats = pair_doors(&mut world);

        assert_eq!(stats.paired, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(world.door_count(), 1);

        // The canonical door belongs to the earlier-placed (deeper) room
        let canon = world.doors().next().unwrap();
        assert_eq!(canon.room_a, RoomId(0));
        assert_eq!(canon.room_b, Some(RoomId(1)));

        // Both rooms list the same connector
        assert_eq!(world.room(RoomId(0)).doors, vec![canon.id]);
        assert_eq!(world.room(RoomId(1)).doors, vec![canon.id]);
    }

    #[test]
    fn test_no_dangling_survivors_after_sweep() {
        let mut world = abutting_world();
        pair_doors(&mut world);

        for room in world.rooms() {
            for id in &room.doors {
                let door = world.door(*id).expect("listed doors resolve");
                assert!(!door.is_marked_for_deletion());
            }
        }
    }

    #[test]
    fn test_unconsumed_lone_door_is_clean_dead_end() {
        let start = RoomTemplate::new(
            "start",
            RoomKind::Start,
            8,
            6,
            vec![
                SocketSpec::new(7, 2, Facing::East, 2),
                SocketSpec::new(3, 0, Facing::North, 2),
            ],
        );
        let mut world = World::with_start(&start, GridPos::new(0, 0));

        let stats = pair_doors(&mut world);
        assert_eq!(stats.paired, 0);
        assert_eq!(stats.dead_ends, 2);
        assert_eq!(stats.anomalies, 0);
        assert_eq!(world.door_count(), 2);
    }

    #[test]
    fn test_consumed_door_without_partner_is_anomaly() {
        let mut world = abutting_world();

        // Fake a partnerless consumed door by dropping the second room's
        // door before pairing runs
        let lost = world.room(RoomId(1)).doors[0];
        world.remove_door(lost);
        world.room_mut(RoomId(1)).doors.clear();
        let survivor = world.room(RoomId(0)).doors[0];
        world.door_mut(survivor).unwrap().set_used();

        let stats = pair_doors(&mut world);
        assert_eq!(stats.anomalies, 1);
        assert_eq!(stats.dead_ends, 1);
        // Anomalies degrade to dead ends, nothing is deleted
        assert_eq!(world.door_count(), 1);
    }

    #[test]
    fn test_carve_opens_exactly_one_gap() {
        let mut world = abutting_world();
        pair_doors(&mut world);
        carve_openings(&mut world);

        // The shared wall column is open on both layers over the door
        // footprint (rows 2-3 at x = 7), and only there
        for room_id in [RoomId(0), RoomId(1)] {
            let walls = &world.room(room_id).walls;
            assert!(!walls.is_wall(GridPos::new(7, 2)));
            assert!(!walls.is_wall(GridPos::new(7, 3)));
            assert!(walls.is_wall(GridPos::new(7, 1)));
            assert!(walls.is_wall(GridPos::new(7, 4)));
        }
    }

    #[test]
    fn test_carve_is_idempotent() {
        let mut world = abutting_world();
        pair_doors(&mut world);

        carve_openings(&mut world);
        let once: Vec<_> = world.rooms().map(|r| r.walls.clone()).collect();

        carve_openings(&mut world);
        let twice: Vec<_> = world.rooms().map(|r| r.walls.clone()).collect();
        assert_eq!(once, twice);
    }
}
