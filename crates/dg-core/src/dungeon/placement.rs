//! Placement engine
//!
//! Grows the room graph from the start room by attaching catalog templates
//! to open door sockets, rejecting candidates that overlap committed
//! geometry, until the target count is reached or the frontier is
//! exhausted. A single boss pass then runs the same search restricted to
//! the boss template. Selection is uniform random at every level: anchor,
//! template order, and socket try-order follow the seeded RNG.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::catalog::{Catalog, RoomTemplate};
use super::collision::CollisionOracle;
use super::errors::{BossOutcome, GenerationReport, PlacementOutcome};
use super::pairing::{carve_openings, pair_doors};
use super::room::DoorId;
use super::world::World;
use crate::consts::{BASE_SORT_DEPTH, DEFAULT_CANDIDATE_BUDGET, DEFAULT_TARGET_ROOMS};
use crate::geometry::GridPos;
use crate::rng::GenRng;

/// Tunables for one generation run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Rooms to place, start included (the boss room is extra)
    pub target_rooms: usize,
    /// Collision queries allowed before the search gives up
    pub candidate_budget: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            target_rooms: DEFAULT_TARGET_ROOMS,
            candidate_budget: DEFAULT_CANDIDATE_BUDGET,
        }
    }
}

/// Pipeline phases, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    Placing,
    BossPlacing,
    Pairing,
    Carving,
    Finalizing,
}

/// Why one anchor attempt ended
enum AnchorAttempt {
    Attached,
    NoFit,
    OutOfBudget,
}

/// Generate a dungeon from `catalog`.
///
/// Always returns a complete world: placement exhaustion and boss failure
/// degrade the result (fewer rooms, no boss) but never abort, and the
/// generation-complete notification fires exactly once either way.
pub fn generate(
    catalog: &Catalog,
    config: &GenerationConfig,
    oracle: &mut dyn CollisionOracle,
    rng: &mut GenRng,
) -> (World, GenerationReport) {
    debug!("phase: {}", Phase::Placing);
    let mut world = World::with_start(catalog.start(), GridPos::new(0, 0));
    oracle.commit(world.room(world.start_room()).interior());

    let mut budget = config.candidate_budget;
    let placement = run_placement(&mut world, catalog, config, oracle, rng, &mut budget);
    match placement {
        PlacementOutcome::TargetReached => {}
        PlacementOutcome::Exhausted => warn!(
            "placement exhausted at {} of {} rooms",
            world.room_count(),
            config.target_rooms
        ),
        PlacementOutcome::BudgetSpent => warn!(
            "candidate budget spent at {} of {} rooms",
            world.room_count(),
            config.target_rooms
        ),
    }

    debug!("phase: {}", Phase::BossPlacing);
    let boss = place_boss(&mut world, catalog, oracle, rng, &mut budget);
    if boss == BossOutcome::Failed {
        warn!("boss room never fit; dungeon has no boss");
    }

    debug!("phase: {}", Phase::Pairing);
    let pairing = pair_doors(&mut world);

    debug!("phase: {}", Phase::Carving);
    carve_openings(&mut world);

    debug!("phase: {}", Phase::Finalizing);
    world.finalize();

    info!(
        "generated {} rooms ({} doors) from seed {}",
        world.room_count(),
        world.door_count(),
        rng.seed()
    );

    let report = GenerationReport {
        seed: rng.seed(),
        requested_rooms: config.target_rooms,
        placed_rooms: world.room_count(),
        placement,
        boss,
        doors_paired: pairing.paired,
        doors_removed: pairing.removed,
        dead_ends: pairing.dead_ends,
        pairing_anomalies: pairing.anomalies,
    };
    (world, report)
}

/// Main growth loop: one room per iteration until the target count,
/// an empty frontier, or a spent budget stops it.
fn run_placement(
    world: &mut World,
    catalog: &Catalog,
    config: &GenerationConfig,
    oracle: &mut dyn CollisionOracle,
    rng: &mut GenRng,
    budget: &mut usize,
) -> PlacementOutcome {
    'grow: while world.room_count() < config.target_rooms {
        // Frontier: every door not yet consumed by generation
        let mut pool = world.unused_doors();
        if pool.is_empty() {
            return PlacementOutcome::Exhausted;
        }

        // Draw anchors without replacement until one accepts a room
        loop {
            let pick = rng.rn2(pool.len() as u32) as usize;
            let anchor = pool.swap_remove(pick);

            match try_anchor(world, catalog.attachable(), anchor, oracle, rng, budget) {
                AnchorAttempt::Attached => continue 'grow,
                AnchorAttempt::OutOfBudget => return PlacementOutcome::BudgetSpent,
                AnchorAttempt::NoFit => {
                    if pool.is_empty() {
                        return PlacementOutcome::Exhausted;
                    }
                }
            }
        }
    }

    PlacementOutcome::TargetReached
}

/// The same search restricted to the boss template, run exactly once
/// against the live frontier.
fn place_boss(
    world: &mut World,
    catalog: &Catalog,
    oracle: &mut dyn CollisionOracle,
    rng: &mut GenRng,
    budget: &mut usize,
) -> BossOutcome {
    let boss = std::slice::from_ref(catalog.boss());
    let mut pool = world.unused_doors();

    while !pool.is_empty() {
        let pick = rng.rn2(pool.len() as u32) as usize;
        let anchor = pool.swap_remove(pick);

        match try_anchor(world, boss, anchor, oracle, rng, budget) {
            AnchorAttempt::Attached => return BossOutcome::Placed,
            AnchorAttempt::OutOfBudget | AnchorAttempt::NoFit => {}
        }
    }

    BossOutcome::Failed
}

/// Try every template (shuffled) and every socket (declared order) at one
/// anchor door. The first candidate the oracle clears is placed for good.
fn try_anchor(
    world: &mut World,
    templates: &[RoomTemplate],
    anchor: DoorId,
    oracle: &mut dyn CollisionOracle,
    rng: &mut GenRng,
    budget: &mut usize,
) -> AnchorAttempt {
    let Some(anchor_door) = world.door(anchor) else {
        return AnchorAttempt::NoFit;
    };
    let anchor_pos = anchor_door.pos;

    let mut order: Vec<usize> = (0..templates.len()).collect();
    rng.shuffle(&mut order);

    for template_index in order {
        let template = &templates[template_index];

        for (socket_index, socket) in template.sockets.iter().enumerate() {
            if *budget == 0 {
                return AnchorAttempt::OutOfBudget;
            }
            *budget -= 1;

            // Rigid translation mapping the candidate socket onto the
            // anchor door; orientation is never re-derived, templates are
            // authored so sockets meet compatibly
            let delta = anchor_pos - socket.offset;
            let candidate = template.bounds().translated(delta);

            if oracle.overlaps(&candidate.interior()) {
                continue;
            }

            // Accept: the placement is permanent from here on
            let sort_depth = BASE_SORT_DEPTH - world.room_count() as i32;
            let room_id = world.add_room(template, delta, sort_depth);
            let socket_door = world.room(room_id).doors[socket_index];

            if let Some(door) = world.door_mut(anchor) {
                door.set_used();
            }
            if let Some(door) = world.door_mut(socket_door) {
                door.set_used();
            }
            oracle.commit(candidate.interior());

            debug!(
                "attached '{}' as room {} at ({}, {})",
                template.id, room_id.0, delta.x, delta.y
            );
            return AnchorAttempt::Attached;
        }
    }

    AnchorAttempt::NoFit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::catalog::SocketSpec;
    use crate::dungeon::collision::RectIndex;
    use crate::dungeon::room::RoomKind;
    use crate::geometry::Facing;

    fn chain_catalog() -> Catalog {
        // One east socket on the start, pass-through west/east sockets on
        // the only attachable template: the frontier never branches
        let start = RoomTemplate::new(
            "start",
            RoomKind::Start,
            8,
            6,
            vec![SocketSpec::new(7, 2, Facing::East, 2)],
        );
        let link = RoomTemplate::new(
            "link",
            RoomKind::Combat,
            8,
            6,
            vec![
                SocketSpec::new(0, 2, Facing::West, 2),
                SocketSpec::new(7, 2, Facing::East, 2),
            ],
        );
        let boss = RoomTemplate::new(
            "boss",
            RoomKind::Boss,
            10,
            8,
            vec![SocketSpec::new(0, 3, Facing::West, 2)],
        );
        Catalog::new(start, boss, vec![link]).unwrap()
    }

    #[test]
    fn test_reaches_target_room_count() {
        let catalog = chain_catalog();
        let config = GenerationConfig {
            target_rooms: 5,
            ..GenerationConfig::default()
        };
        let mut oracle = RectIndex::new();
        let mut rng = GenRng::new(11);

        let (world, report) = generate(&catalog, &config, &mut oracle, &mut rng);

        assert_eq!(report.placement, PlacementOutcome::TargetReached);
        // 5 requested plus the boss room
        assert_eq!(world.room_count(), 6);
        assert_eq!(report.placed_rooms, 6);
    }

    #[test]
    fn test_sort_depth_strictly_decreases() {
        let catalog = chain_catalog();
        let config = GenerationConfig {
            target_rooms: 5,
            ..GenerationConfig::default()
        };
        let mut oracle = RectIndex::new();
        let mut rng = GenRng::new(3);

        let (world, _) = generate(&catalog, &config, &mut oracle, &mut rng);

        let mut depths: Vec<i32> = world.rooms().map(|r| r.sort_depth).collect();
        let sorted = {
            let mut d = depths.clone();
            d.sort_unstable_by(|a, b| b.cmp(a));
            d
        };
        // Rooms are stored in placement order, so depths arrive sorted
        assert_eq!(depths, sorted);
        depths.dedup();
        assert_eq!(depths.len(), world.room_count());
    }

    #[test]
    fn test_anchor_and_socket_marked_used() {
        let catalog = chain_catalog();
        let config = GenerationConfig {
            target_rooms: 2,
            ..GenerationConfig::default()
        };
        let mut oracle = RectIndex::new();
        let mut rng = GenRng::new(5);

        let (world, _) = generate(&catalog, &config, &mut oracle, &mut rng);

        // Both sides of each junction were consumed; pairing then merged
        // each pair down to one canonical used door (start-link, link-boss)
        let used = world.doors().filter(|d| d.is_used()).count();
        assert_eq!(used, 2);
        assert!(world.doors().filter(|d| d.is_used()).all(|d| d.room_b.is_some()));
    }

    #[test]
    fn test_budget_spent_degrades_gracefully() {
        let catalog = chain_catalog();
        let config = GenerationConfig {
            target_rooms: 50,
            candidate_budget: 3,
        };
        let mut oracle = RectIndex::new();
        let mut rng = GenRng::new(7);

        let (world, report) = generate(&catalog, &config, &mut oracle, &mut rng);

        assert_eq!(report.placement, PlacementOutcome::BudgetSpent);
        assert!(world.room_count() < 50);
        // The pipeline still finalized
        assert!(world.room(world.start_room()).shown);
    }
}
