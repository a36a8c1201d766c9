//! Dungeon generation system
//!
//! Room/door catalog, the live graph, the placement search, and the
//! post-placement pairing/carving passes.

mod catalog;
mod collision;
mod errors;
mod events;
mod pairing;
mod placement;
mod room;
mod walls;
mod world;

pub use catalog::{Catalog, RoomTemplate, SocketSpec};
pub use collision::{CollisionOracle, RectIndex};
pub use errors::{BossOutcome, CatalogError, GenerationReport, PlacementOutcome};
pub use events::{ClearTracker, EventQueue, WorldEvent};
pub use placement::{GenerationConfig, Phase, generate};
pub use room::{Door, DoorFlags, DoorId, Room, RoomId, RoomKind};
pub use walls::WallLayer;
pub use world::World;
