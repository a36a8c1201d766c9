//! dg-core: room-graph dungeon generation for dungen
//!
//! This crate contains the layout generation logic with no I/O
//! dependencies. It is designed to be pure and testable: feed it a
//! validated template catalog, a collision oracle, and a seeded RNG, and
//! it produces the placed room graph plus a run report. Gameplay systems
//! (movement, combat, rendering) live elsewhere and talk to the graph
//! through its event queue and per-room display surface.

pub mod dungeon;

mod consts;
mod geometry;
mod rng;

pub use consts::*;
pub use geometry::{Facing, GridPos, Rect};
pub use rng::GenRng;
