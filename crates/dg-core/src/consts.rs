//! Global constants

/// Sort depth assigned to the start room; every later room gets a strictly
/// smaller value, so depth order is placement order.
pub const BASE_SORT_DEPTH: i32 = 1000;

/// Default target room count, start room included
pub const DEFAULT_TARGET_ROOMS: usize = 10;

/// Default number of collision queries a run may spend before the search
/// gives up (deadline for catalogs where nothing ever fits)
pub const DEFAULT_CANDIDATE_BUDGET: usize = 10_000;

/// Smallest legal template edge: one interior cell plus the wall ring
pub const MIN_TEMPLATE_EDGE: i32 = 3;
