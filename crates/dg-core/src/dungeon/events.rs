//! World notifications
//!
//! Collaborators (combat controllers, UI, music cues) consume typed events
//! drained from the world's queue instead of subscribing callbacks. Room
//! events carry arena ids; an id swept from the arena simply no longer
//! resolves, so there is nothing to unsubscribe.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::room::RoomId;

/// A notification produced by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Generation pipeline finished; fired exactly once per run, even when
    /// the dungeon came out smaller than requested or boss-less
    WorldGenerated,
    RoomEntered(RoomId),
    RoomExited(RoomId),
    RoomCleared(RoomId),
    /// Every combat/boss room has been cleared
    AllRoomsCleared,
}

/// FIFO queue of pending events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    pending: VecDeque<WorldEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: WorldEvent) {
        self.pending.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<WorldEvent> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Counts cleared rooms against the generated total minus the start and
/// boss rooms
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClearTracker {
    cleared: usize,
    required: usize,
    fired: bool,
}

impl ClearTracker {
    pub fn new(generated_rooms: usize) -> Self {
        Self {
            cleared: 0,
            required: generated_rooms.saturating_sub(2),
            fired: false,
        }
    }

    /// Record one cleared room. Returns true exactly once, when the count
    /// first reaches the required total.
    pub fn record_clear(&mut self) -> bool {
        self.cleared += 1;
        if !self.fired && self.cleared >= self.required {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn cleared(&self) -> usize {
        self.cleared
    }

    pub fn required(&self) -> usize {
        self.required
    }

    pub fn all_cleared(&self) -> bool {
        self.fired
    }
}
