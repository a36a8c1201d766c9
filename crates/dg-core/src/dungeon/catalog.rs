//! Room template catalog
//!
//! Pure data: immutable room prefabs with their door sockets. All
//! validation happens at construction; a catalog that builds is safe to
//! generate from.

use serde::{Deserialize, Serialize};

use super::errors::CatalogError;
use super::room::RoomKind;
use crate::consts::MIN_TEMPLATE_EDGE;
use crate::geometry::{Facing, GridPos, Rect};

/// A door attachment point on a room template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketSpec {
    /// Local wall-ring cell where the door footprint starts
    pub offset: GridPos,
    /// Which way the door leads out of the room
    pub facing: Facing,
    /// Footprint length in cells along the wall
    pub extent: u8,
}

impl SocketSpec {
    pub const fn new(x: i32, y: i32, facing: Facing, extent: u8) -> Self {
        Self {
            offset: GridPos::new(x, y),
            facing,
            extent,
        }
    }
}

/// An immutable room prefab: bounds plus an ordered list of door sockets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub id: String,
    pub kind: RoomKind,
    /// Bounds in cells, wall ring included
    pub width: i32,
    pub height: i32,
    pub sockets: Vec<SocketSpec>,
}

impl RoomTemplate {
    pub fn new(
        id: impl Into<String>,
        kind: RoomKind,
        width: i32,
        height: i32,
        sockets: Vec<SocketSpec>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            width,
            height,
            sockets,
        }
    }

    /// Local-space bounds at the origin
    pub fn bounds(&self) -> Rect {
        Rect::from_origin(GridPos::new(0, 0), self.width, self.height)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.width < MIN_TEMPLATE_EDGE || self.height < MIN_TEMPLATE_EDGE {
            return Err(CatalogError::MalformedBounds {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
            });
        }

        // A template with zero sockets can never join the frontier
        if self.sockets.is_empty() {
            return Err(CatalogError::NoSockets {
                id: self.id.clone(),
            });
        }

        for (index, socket) in self.sockets.iter().enumerate() {
            self.validate_socket(index, socket)?;
        }

        Ok(())
    }

    /// A socket must sit on its facing's wall, clear of the corners, with
    /// the whole footprint on that wall.
    fn validate_socket(&self, index: usize, socket: &SocketSpec) -> Result<(), CatalogError> {
        let GridPos { x, y } = socket.offset;
        let on_wall = match socket.facing {
            Facing::North => y == 0,
            Facing::South => y == self.height - 1,
            Facing::West => x == 0,
            Facing::East => x == self.width - 1,
        };
        let off_corners = if socket.facing.wall_runs_horizontal() {
            x >= 1 && x <= self.width - 2
        } else {
            y >= 1 && y <= self.height - 2
        };

        if !on_wall || !off_corners {
            return Err(CatalogError::SocketOffWall {
                id: self.id.clone(),
                index,
            });
        }

        let len = socket.extent as i32;
        let fits = len >= 1
            && if socket.facing.wall_runs_horizontal() {
                x + len - 1 <= self.width - 2
            } else {
                y + len - 1 <= self.height - 2
            };

        if !fits {
            return Err(CatalogError::SocketExtent {
                id: self.id.clone(),
                index,
                extent: socket.extent,
            });
        }

        Ok(())
    }
}

/// Serde shape of a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogSpec {
    start: RoomTemplate,
    boss: RoomTemplate,
    rooms: Vec<RoomTemplate>,
}

/// A validated set of templates for one generation run
#[derive(Debug, Clone)]
pub struct Catalog {
    start: RoomTemplate,
    boss: RoomTemplate,
    attachable: Vec<RoomTemplate>,
}

impl Catalog {
    /// Validate and assemble a catalog. Any violation is fatal here,
    /// before generation begins.
    pub fn new(
        start: RoomTemplate,
        boss: RoomTemplate,
        attachable: Vec<RoomTemplate>,
    ) -> Result<Self, CatalogError> {
        if start.kind != RoomKind::Start {
            return Err(CatalogError::KindMismatch {
                id: start.id,
                slot: "start",
                kind: start.kind,
            });
        }
        if boss.kind != RoomKind::Boss {
            return Err(CatalogError::KindMismatch {
                id: boss.id,
                slot: "boss",
                kind: boss.kind,
            });
        }

        start.validate()?;
        boss.validate()?;
        for template in &attachable {
            if !matches!(template.kind, RoomKind::Combat | RoomKind::Other) {
                return Err(CatalogError::KindMismatch {
                    id: template.id.clone(),
                    slot: "attachable",
                    kind: template.kind,
                });
            }
            template.validate()?;
        }

        Ok(Self {
            start,
            boss,
            attachable,
        })
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let spec: CatalogSpec =
            serde_json::from_str(json).map_err(|e| CatalogError::Json(e.to_string()))?;
        Self::new(spec.start, spec.boss, spec.rooms)
    }

    pub fn start(&self) -> &RoomTemplate {
        &self.start
    }

    pub fn boss(&self) -> &RoomTemplate {
        &self.boss
    }

    /// Templates eligible for frontier attachment, in declaration order
    pub fn attachable(&self) -> &[RoomTemplate] {
        &self.attachable
    }

    /// Built-in catalog used by the CLI and tests
    pub fn demo() -> Self {
        let start = RoomTemplate::new(
            "atrium",
            RoomKind::Start,
            8,
            6,
            vec![
                SocketSpec::new(7, 2, Facing::East, 2),
                SocketSpec::new(0, 2, Facing::West, 2),
                SocketSpec::new(3, 0, Facing::North, 2),
                SocketSpec::new(3, 5, Facing::South, 2),
            ],
        );

        let boss = RoomTemplate::new(
            "reactor_core",
            RoomKind::Boss,
            14,
            10,
            vec![
                SocketSpec::new(0, 4, Facing::West, 2),
                SocketSpec::new(13, 4, Facing::East, 2),
                SocketSpec::new(6, 0, Facing::North, 2),
                SocketSpec::new(6, 9, Facing::South, 2),
            ],
        );

        let rooms = vec![
            RoomTemplate::new(
                "cell_block",
                RoomKind::Combat,
                8,
                6,
                vec![
                    SocketSpec::new(0, 2, Facing::West, 2),
                    SocketSpec::new(7, 2, Facing::East, 2),
                    SocketSpec::new(3, 0, Facing::North, 2),
                    SocketSpec::new(3, 5, Facing::South, 2),
                ],
            ),
            RoomTemplate::new(
                "long_hall",
                RoomKind::Combat,
                12,
                5,
                vec![
                    SocketSpec::new(0, 2, Facing::West, 2),
                    SocketSpec::new(11, 2, Facing::East, 2),
                    SocketSpec::new(5, 0, Facing::North, 2),
                    SocketSpec::new(5, 4, Facing::South, 2),
                ],
            ),
            RoomTemplate::new(
                "vault",
                RoomKind::Combat,
                9,
                9,
                vec![
                    SocketSpec::new(0, 4, Facing::West, 2),
                    SocketSpec::new(8, 4, Facing::East, 2),
                    SocketSpec::new(4, 0, Facing::North, 2),
                    SocketSpec::new(4, 8, Facing::South, 2),
                ],
            ),
            RoomTemplate::new(
                "store_room",
                RoomKind::Other,
                6,
                6,
                vec![
                    SocketSpec::new(2, 0, Facing::North, 2),
                    SocketSpec::new(2, 5, Facing::South, 2),
                ],
            ),
        ];

        Self::new(start, boss, rooms).expect("demo catalog is valid")
    }
}
