//! The live room/door graph
//!
//! Owns the arena of placed rooms and door slots, the current-room
//! bookkeeping, and the display surface (show/hide/lock/open) that combat
//! and UI collaborators call back into. Rooms are permanent once placed;
//! doors can be swept by pairing, after which their ids stop resolving.

use log::warn;
use serde::{Deserialize, Serialize};

use super::catalog::RoomTemplate;
use super::events::{ClearTracker, EventQueue, WorldEvent};
use super::room::{Door, DoorFlags, DoorId, Room, RoomId, RoomKind};
use crate::geometry::GridPos;

/// The placed dungeon: rooms, doors, and the single active room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    rooms: Vec<Room>,
    doors: Vec<Option<Door>>,
    start_room: RoomId,
    current_room: RoomId,
    boss_room: Option<RoomId>,
    boss_unlocked: bool,
    clear_tracker: ClearTracker,
    events: EventQueue,
}

impl World {
    /// A world seeded with its start room placed at `origin`
    pub(crate) fn with_start(template: &RoomTemplate, origin: GridPos) -> Self {
        let mut world = Self {
            rooms: Vec::new(),
            doors: Vec::new(),
            start_room: RoomId(0),
            current_room: RoomId(0),
            boss_room: None,
            boss_unlocked: false,
            clear_tracker: ClearTracker::new(0),
            events: EventQueue::default(),
        };
        let start = world.add_room(template, origin, crate::consts::BASE_SORT_DEPTH);
        world.start_room = start;
        world.current_room = start;
        world
    }

    /// Instantiate a template into the arena, creating one door per socket
    /// in declaration order. The caller has already cleared the placement
    /// with the collision oracle.
    pub(crate) fn add_room(
        &mut self,
        template: &RoomTemplate,
        origin: GridPos,
        sort_depth: i32,
    ) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        let mut room = Room::instantiate(id, template, origin, sort_depth);

        for socket in &template.sockets {
            let door_id = DoorId(self.doors.len() as u32);
            self.doors.push(Some(Door {
                id: door_id,
                room_a: id,
                room_b: None,
                pos: origin + socket.offset,
                facing: socket.facing,
                extent: socket.extent,
                flags: DoorFlags::default(),
            }));
            room.doors.push(door_id);
        }

        if template.kind == RoomKind::Boss {
            self.boss_room = Some(id);
        }
        self.rooms.push(room);
        id
    }

    // --- lookups ---

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.0 as usize]
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id.0 as usize]
    }

    /// Resolve a door id; `None` once the door has been swept
    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub(crate) fn door_mut(&mut self, id: DoorId) -> Option<&mut Door> {
        self.doors.get_mut(id.0 as usize).and_then(|slot| slot.as_mut())
    }

    pub(crate) fn remove_door(&mut self, id: DoorId) {
        if let Some(slot) = self.doors.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// Every door still in the arena
    pub fn doors(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter().filter_map(|slot| slot.as_ref())
    }

    pub(crate) fn door_ids(&self) -> Vec<DoorId> {
        self.doors().map(|d| d.id).collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn door_count(&self) -> usize {
        self.doors().count()
    }

    pub fn start_room(&self) -> RoomId {
        self.start_room
    }

    pub fn current_room(&self) -> RoomId {
        self.current_room
    }

    pub fn boss_room(&self) -> Option<RoomId> {
        self.boss_room
    }

    /// The room whose floor contains `pos`, if any
    pub fn room_at(&self, pos: GridPos) -> Option<RoomId> {
        self.rooms.iter().find(|r| r.contains(pos)).map(|r| r.id)
    }

    /// Every door across the graph with `used_in_generation` still false
    pub(crate) fn unused_doors(&self) -> Vec<DoorId> {
        self.doors()
            .filter(|d| !d.is_used())
            .map(|d| d.id)
            .collect()
    }

    // --- events ---

    pub(crate) fn push_event(&mut self, event: WorldEvent) {
        self.events.push(event);
    }

    /// Take every pending notification, oldest first
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain()
    }

    pub fn clear_tracker(&self) -> &ClearTracker {
        &self.clear_tracker
    }

    // --- display surface for collaborators ---

    pub fn show_room(&mut self, id: RoomId) {
        self.room_mut(id).shown = true;
        self.refresh_door_visibility();
    }

    pub fn hide_room(&mut self, id: RoomId) {
        self.room_mut(id).shown = false;
        self.refresh_door_visibility();
    }

    /// Close every door of `id`. Boss doors relock as well.
    pub fn lock_doors(&mut self, id: RoomId) {
        let doors = self.room(id).doors.clone();
        for door_id in doors {
            if let Some(door) = self.door_mut(door_id) {
                door.set_open(false);
            }
        }
    }

    /// Open every door of `id`. Doors into the boss room stay locked from
    /// both sides until every other room has been cleared.
    pub fn open_doors(&mut self, id: RoomId) {
        let doors = self.room(id).doors.clone();
        for door_id in doors {
            if self.is_boss_gated(door_id) {
                continue;
            }
            if let Some(door) = self.door_mut(door_id) {
                door.set_open(true);
            }
        }
    }

    fn is_boss_gated(&self, id: DoorId) -> bool {
        if self.boss_unlocked {
            return false;
        }
        match (self.boss_room, self.door(id)) {
            (Some(boss), Some(door)) => door.connects(boss),
            _ => false,
        }
    }

    /// A door is visible iff one of its rooms is the current room
    fn refresh_door_visibility(&mut self) {
        let current = self.current_room;
        for slot in &mut self.doors {
            if let Some(door) = slot {
                let visible = door.connects(current);
                door.set_visible(visible);
            }
        }
    }

    // --- current-room transitions ---

    /// Handle a room-crossing event from gameplay code: a tracked position
    /// left the current room into `target`. Returns false (and changes
    /// nothing) unless `target` is paired to the current room by a
    /// surviving door.
    pub fn cross_into(&mut self, target: RoomId) -> bool {
        let from = self.current_room;
        if target == from {
            return false;
        }

        let adjacent = self
            .room(from)
            .doors
            .iter()
            .filter_map(|&id| self.door(id))
            .any(|d| d.other_side(from) == Some(target));
        if !adjacent {
            warn!(
                "ignoring crossing from room {} to non-adjacent room {}",
                from.0, target.0
            );
            return false;
        }

        self.room_mut(from).visited = true;
        self.current_room = target;

        self.show_room(target);
        if self.room(target).kind == RoomKind::Start {
            self.open_doors(target);
        }
        self.hide_room(from);

        self.push_event(WorldEvent::RoomExited(from));
        self.push_event(WorldEvent::RoomEntered(target));
        true
    }

    /// Combat collaborators report a finished encounter here. Opens the
    /// room's doors and feeds the aggregate clear counter; the final clear
    /// unlocks the boss room.
    pub fn mark_room_cleared(&mut self, id: RoomId) {
        self.push_event(WorldEvent::RoomCleared(id));
        self.open_doors(id);

        if self.room(id).kind.counts_toward_clear() && self.clear_tracker.record_clear() {
            self.push_event(WorldEvent::AllRoomsCleared);
            self.unlock_boss_doors();
        }
    }

    fn unlock_boss_doors(&mut self) {
        self.boss_unlocked = true;
        if let Some(boss) = self.boss_room {
            self.open_doors(boss);
        }
    }

    /// Initialize display state after generation: the start room is shown
    /// with its doors open, everything else hidden, and the one-time
    /// generation-complete notification is queued.
    pub(crate) fn finalize(&mut self) {
        self.clear_tracker = ClearTracker::new(self.room_count());
        self.current_room = self.start_room;

        let ids: Vec<RoomId> = self.rooms.iter().map(|r| r.id).collect();
        for id in ids {
            self.room_mut(id).shown = id == self.start_room;
        }
        self.open_doors(self.start_room);
        self.refresh_door_visibility();

        self.push_event(WorldEvent::WorldGenerated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::catalog::{RoomTemplate, SocketSpec};
    use crate::geometry::Facing;

    fn two_room_world() -> World {
        // Start room at the origin, combat room attached on its east wall
        let start = RoomTemplate::new(
            "start",
            RoomKind::Start,
            8,
            6,
            vec![SocketSpec::new(7, 2, Facing::East, 2)],
        );
        let combat = RoomTemplate::new(
            "combat",
            RoomKind::Combat,
            8,
            6,
            vec![SocketSpec::new(0, 2, Facing::West, 2)],
        );

        let mut world = World::with_start(&start, GridPos::new(0, 0));
        world.add_room(&combat, GridPos::new(7, 0), crate::consts::BASE_SORT_DEPTH - 1);

        // Pair the coincident doors by hand: the start room's door becomes
        // the canonical connector
        let canon = world.room(RoomId(0)).doors[0];
        let redundant = world.room(RoomId(1)).doors[0];
        world.door_mut(canon).unwrap().room_b = Some(RoomId(1));
        world.room_mut(RoomId(1)).doors = vec![canon];
        world.remove_door(redundant);

        world.finalize();
        world
    }

    #[test]
    fn test_finalize_shows_only_start() {
        let mut world = two_room_world();

        assert_eq!(world.current_room(), world.start_room());
        assert!(world.room(RoomId(0)).shown);
        assert!(!world.room(RoomId(1)).shown);
        assert!(world.drain_events().contains(&WorldEvent::WorldGenerated));
    }

    #[test]
    fn test_start_doors_open_after_finalize() {
        let world = two_room_world();
        let canon = world.room(RoomId(0)).doors[0];
        assert!(world.door(canon).unwrap().is_open());
    }

    #[test]
    fn test_cross_into_adjacent_room() {
        let mut world = two_room_world();
        world.drain_events();

        assert!(world.cross_into(RoomId(1)));
        assert_eq!(world.current_room(), RoomId(1));
        assert!(world.room(RoomId(0)).visited);
        assert!(!world.room(RoomId(0)).shown);
        assert!(world.room(RoomId(1)).shown);

        // Exit precedes enter
        assert_eq!(
            world.drain_events(),
            vec![
                WorldEvent::RoomExited(RoomId(0)),
                WorldEvent::RoomEntered(RoomId(1)),
            ]
        );
    }

    #[test]
    fn test_cross_into_non_adjacent_rejected() {
        let mut world = two_room_world();
        world.drain_events();

        assert!(!world.cross_into(RoomId(0)));
        assert_eq!(world.current_room(), world.start_room());
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_door_visibility_tracks_current_room() {
        let mut world = two_room_world();
        let canon = world.room(RoomId(0)).doors[0];

        // The shared door touches both rooms, so it stays visible on
        // either side of the crossing
        assert!(world.door(canon).unwrap().is_visible());
        world.cross_into(RoomId(1));
        assert!(world.door(canon).unwrap().is_visible());
    }

    #[test]
    fn test_mark_cleared_emits_and_counts() {
        let mut world = two_room_world();
        world.drain_events();

        world.mark_room_cleared(RoomId(1));
        let events = world.drain_events();
        assert!(events.contains(&WorldEvent::RoomCleared(RoomId(1))));
        assert_eq!(world.clear_tracker().cleared(), 1);
    }

    #[test]
    fn test_room_at_uses_floor_area() {
        let world = two_room_world();

        // Interior cells resolve, wall cells do not
        assert_eq!(world.room_at(GridPos::new(3, 2)), Some(RoomId(0)));
        assert_eq!(world.room_at(GridPos::new(9, 2)), Some(RoomId(1)));
        assert_eq!(world.room_at(GridPos::new(7, 2)), None);
        assert_eq!(world.room_at(GridPos::new(100, 100)), None);
    }

    #[test]
    fn test_swept_door_id_does_not_resolve() {
        let world = two_room_world();
        // The redundant door was removed during setup
        let resolved: Vec<_> = world.doors().collect();
        assert_eq!(resolved.len(), 1);
        assert_eq!(world.door_count(), 1);
    }
}
