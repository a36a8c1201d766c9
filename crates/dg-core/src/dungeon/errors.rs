//! Catalog errors and generation outcome reports
//!
//! Only catalog validation is fatal, and it fails before generation starts.
//! Phase-level degradations (exhaustion, boss failure) are report values;
//! the pipeline always runs to completion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::room::RoomKind;

/// Fatal catalog configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("template '{id}' has no door sockets")]
    NoSockets { id: String },

    #[error("template '{id}' has degenerate bounds {width}x{height}")]
    MalformedBounds { id: String, width: i32, height: i32 },

    #[error("template '{id}' socket {index} is not on the wall ring")]
    SocketOffWall { id: String, index: usize },

    #[error("template '{id}' socket {index} has extent {extent} which does not fit its wall")]
    SocketExtent { id: String, index: usize, extent: u8 },

    #[error("template '{id}' fills the {slot} slot but has kind {kind}")]
    KindMismatch {
        id: String,
        slot: &'static str,
        kind: RoomKind,
    },

    #[error("catalog JSON: {0}")]
    Json(String),
}

/// How the main placement phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// Target room count reached
    TargetReached,
    /// Frontier emptied before the target count; the partial dungeon is kept
    Exhausted,
    /// Candidate budget spent before the target count
    BudgetSpent,
}

/// How the boss placement pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossOutcome {
    Placed,
    /// The boss template never fit; the dungeon has no boss room
    Failed,
}

/// Summary of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    /// Rooms requested, start included, boss excluded
    pub requested_rooms: usize,
    /// Rooms actually placed, start and boss included
    pub placed_rooms: usize,
    pub placement: PlacementOutcome,
    pub boss: BossOutcome,
    pub doors_paired: usize,
    pub doors_removed: usize,
    pub dead_ends: usize,
    /// Doors consumed during placement that never found a partner
    pub pairing_anomalies: usize,
}
