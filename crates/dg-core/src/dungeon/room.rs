//! Rooms, doors, and their arena identities
//!
//! Rooms are never removed once placed; doors can be swept during pairing,
//! so door storage is slotted and a swept `DoorId` simply stops resolving.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::catalog::RoomTemplate;
use super::walls::WallLayer;
use crate::geometry::{Facing, GridPos, Rect};

/// Room classification
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum RoomKind {
    Start = 0,
    #[default]
    Combat = 1,
    Boss = 2,
    Other = 3,
}

impl RoomKind {
    /// Does clearing this room count toward the all-rooms-cleared total?
    pub const fn counts_toward_clear(self) -> bool {
        matches!(self, RoomKind::Combat | RoomKind::Boss)
    }
}

/// Stable room identifier (arena index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub(crate) u32);

/// Stable door identifier (arena slot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorId(pub(crate) u32);

bitflags! {
    /// Door lifecycle and display flags
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct DoorFlags: u8 {
        /// Consumed as a placement anchor or as an attachment socket
        const USED_IN_GENERATION = 0x01;
        /// Redundant duplicate awaiting the pairing sweep
        const MARKED_FOR_DELETION = 0x02;
        const OPEN = 0x04;
        const VISIBLE = 0x08;
    }
}

// Manual serde impl for DoorFlags
impl Serialize for DoorFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorFlags::from_bits_truncate(bits))
    }
}

/// A wall opening owned by one room, optionally connecting a second
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    /// Owning room
    pub room_a: RoomId,
    /// Paired room; `None` until pairing resolves it or forever for a dead end
    pub room_b: Option<RoomId>,
    /// World cell where the footprint starts
    pub pos: GridPos,
    pub facing: Facing,
    /// Footprint length in cells along the wall
    pub extent: u8,
    pub flags: DoorFlags,
}

impl Door {
    /// The wall cells this door occupies
    pub fn footprint(&self) -> Rect {
        let len = self.extent as i32;
        if self.facing.wall_runs_horizontal() {
            Rect::new(self.pos.x, self.pos.y, self.pos.x + len - 1, self.pos.y)
        } else {
            Rect::new(self.pos.x, self.pos.y, self.pos.x, self.pos.y + len - 1)
        }
    }

    pub fn is_used(&self) -> bool {
        self.flags.contains(DoorFlags::USED_IN_GENERATION)
    }

    pub(crate) fn set_used(&mut self) {
        self.flags.insert(DoorFlags::USED_IN_GENERATION);
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.flags.contains(DoorFlags::MARKED_FOR_DELETION)
    }

    pub(crate) fn mark_for_deletion(&mut self) {
        self.flags.insert(DoorFlags::MARKED_FOR_DELETION);
    }

    pub fn is_open(&self) -> bool {
        self.flags.contains(DoorFlags::OPEN)
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.flags.set(DoorFlags::OPEN, open);
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(DoorFlags::VISIBLE)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.flags.set(DoorFlags::VISIBLE, visible);
    }

    /// Is `room` one of this door's two sides?
    pub fn connects(&self, room: RoomId) -> bool {
        self.room_a == room || self.room_b == Some(room)
    }

    /// The side opposite `room`, if this door is paired
    pub fn other_side(&self, room: RoomId) -> Option<RoomId> {
        if self.room_a == room {
            self.room_b
        } else if self.room_b == Some(room) {
            Some(self.room_a)
        } else {
            None
        }
    }
}

/// A placed room instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub template_id: String,
    pub kind: RoomKind,
    /// World-space bounds, wall ring included
    pub bounds: Rect,
    /// Owned doors, in socket declaration order; pairing may append the
    /// canonical connector of a merged junction
    pub doors: Vec<DoorId>,
    /// Strictly decreasing with placement order; pairing tie-break only
    pub sort_depth: i32,
    pub visited: bool,
    pub shown: bool,
    pub walls: WallLayer,
}

impl Room {
    /// Instantiate a catalog template at a world origin. Doors are created
    /// by the world arena, not here.
    pub(crate) fn instantiate(
        id: RoomId,
        template: &RoomTemplate,
        origin: GridPos,
        sort_depth: i32,
    ) -> Self {
        let bounds = Rect::from_origin(origin, template.width, template.height);
        Self {
            id,
            template_id: template.id.clone(),
            kind: template.kind,
            bounds,
            doors: Vec::with_capacity(template.sockets.len()),
            sort_depth,
            visited: false,
            shown: false,
            walls: WallLayer::ring(bounds),
        }
    }

    /// Floor area inside the wall ring
    pub fn interior(&self) -> Rect {
        self.bounds.interior()
    }

    /// Is a world position inside this room's floor area?
    pub fn contains(&self, pos: GridPos) -> bool {
        self.interior().contains(pos)
    }
}
