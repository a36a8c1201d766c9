//! Grid geometry primitives
//!
//! Rooms live on a shared integer cell grid. Y grows downward, so
//! `Facing::North` steps toward smaller y.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A cell position on the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Cardinal direction a door socket faces, pointing out of its room
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    /// Unit step out of the owning room
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::South => (0, 1),
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
        }
    }

    /// Doors on north/south walls extend along x; east/west along y
    pub const fn wall_runs_horizontal(self) -> bool {
        matches!(self, Facing::North | Facing::South)
    }

    pub const fn opposite(self) -> Facing {
        match self {
            Facing::North => Facing::South,
            Facing::South => Facing::North,
            Facing::East => Facing::West,
            Facing::West => Facing::East,
        }
    }
}

/// An inclusive cell rectangle: `lx..=hx` by `ly..=hy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub lx: i32,
    pub ly: i32,
    pub hx: i32,
    pub hy: i32,
}

impl Rect {
    pub const fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Self {
        Self { lx, ly, hx, hy }
    }

    /// Rectangle with its top-left corner at `origin`
    pub const fn from_origin(origin: GridPos, width: i32, height: i32) -> Self {
        Self {
            lx: origin.x,
            ly: origin.y,
            hx: origin.x + width - 1,
            hy: origin.y + height - 1,
        }
    }

    pub const fn width(&self) -> i32 {
        self.hx - self.lx + 1
    }

    pub const fn height(&self) -> i32 {
        self.hy - self.ly + 1
    }

    pub const fn is_valid(&self) -> bool {
        self.hx >= self.lx && self.hy >= self.ly
    }

    pub const fn origin(&self) -> GridPos {
        GridPos::new(self.lx, self.ly)
    }

    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= self.lx && pos.x <= self.hx && pos.y >= self.ly && pos.y <= self.hy
    }

    pub const fn intersects(&self, other: &Rect) -> bool {
        !(self.hx < other.lx || self.lx > other.hx || self.hy < other.ly || self.ly > other.hy)
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        Some(Rect {
            lx: self.lx.max(other.lx),
            ly: self.ly.max(other.ly),
            hx: self.hx.min(other.hx),
            hy: self.hy.min(other.hy),
        })
    }

    /// The same rectangle moved by `delta`
    pub const fn translated(&self, delta: GridPos) -> Rect {
        Rect {
            lx: self.lx + delta.x,
            ly: self.ly + delta.y,
            hx: self.hx + delta.x,
            hy: self.hy + delta.y,
        }
    }

    /// The floor area inside the one-cell wall ring.
    ///
    /// Overlap queries run against interiors, so two rooms sharing a wall
    /// line do not count as overlapping.
    pub const fn interior(&self) -> Rect {
        Rect {
            lx: self.lx + 1,
            ly: self.ly + 1,
            hx: self.hx - 1,
            hy: self.hy - 1,
        }
    }

    /// Iterate every cell in the rectangle, row by row
    pub fn cells(&self) -> impl Iterator<Item = GridPos> + use<> {
        let copy = *self;
        (copy.ly..=copy.hy)
            .flat_map(move |y| (copy.lx..=copy.hx).map(move |x| GridPos::new(x, y)))
    }
}
