//! Voxel and continuous coordinate types.
//!
//! The world is a grid of unit voxels addressed by [`BlockPos`].  Entities
//! live at continuous [`Position`]s; `Position::block()` floors each axis to
//! find the voxel an entity occupies.  The y axis is vertical.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::WorldId;

// ── BlockPos ──────────────────────────────────────────────────────────────────

/// Integer voxel coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Shift by a delta.  Saturates at the `i32` range instead of wrapping.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    #[inline]
    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    #[inline]
    pub fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Horizontal centre of the voxel at floor height, where an entity
    /// standing in this voxel is placed.
    #[inline]
    pub fn standing_point(self) -> Position {
        Position::new(self.x as f64 + 0.5, self.y as f64, self.z as f64 + 0.5)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ── Position ──────────────────────────────────────────────────────────────────

/// Continuous coordinate of an entity.
#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The voxel containing this point.
    #[inline]
    pub fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    #[inline]
    pub fn distance_sq(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// `[x, y, z]` array form used by the spatial index.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── Location ──────────────────────────────────────────────────────────────────

/// A position qualified by the world it is in.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub pos:   Position,
}

impl Location {
    #[inline]
    pub const fn new(world: WorldId, pos: Position) -> Self {
        Self { world, pos }
    }

    #[inline]
    pub fn block(self) -> BlockPos {
        self.pos.block()
    }

    /// Distance to `other`, or `None` if the two are in different worlds.
    pub fn distance(self, other: Location) -> Option<f64> {
        (self.world == other.world).then(|| self.pos.distance(other.pos))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.world, self.pos)
    }
}

// ── Facing / Forward ──────────────────────────────────────────────────────────

/// Horizontal cardinal direction.  North is −z, east is +x.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    /// Unit vector pointing the way this face looks.
    pub fn forward(self) -> Forward {
        let (x, z) = match self {
            Facing::North => (0.0, -1.0),
            Facing::East  => (1.0, 0.0),
            Facing::South => (0.0, 1.0),
            Facing::West  => (-1.0, 0.0),
        };
        Forward { x, z }
    }

    pub fn opposite(self) -> Facing {
        match self {
            Facing::North => Facing::South,
            Facing::East  => Facing::West,
            Facing::South => Facing::North,
            Facing::West  => Facing::East,
        }
    }

    /// Nearest cardinal face for a horizontal displacement.  Ties favour the
    /// z axis.
    pub fn from_delta(dx: f64, dz: f64) -> Facing {
        if dx.abs() > dz.abs() {
            if dx > 0.0 { Facing::East } else { Facing::West }
        } else if dz > 0.0 {
            Facing::South
        } else {
            Facing::North
        }
    }
}

/// A normalized horizontal direction (`x² + z² = 1`).
///
/// Construct with [`Forward::new`], which rejects the zero vector, or from a
/// [`Facing`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Forward {
    x: f64,
    z: f64,
}

impl Forward {
    /// Normalize `(x, z)`; `None` if the vector has no length.
    pub fn new(x: f64, z: f64) -> Option<Forward> {
        let len = (x * x + z * z).sqrt();
        if len <= f64::EPSILON || !len.is_finite() {
            return None;
        }
        Some(Forward { x: x / len, z: z / len })
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.x
    }

    #[inline]
    pub fn z(self) -> f64 {
        self.z
    }

    /// Dot product with an arbitrary horizontal vector.
    #[inline]
    pub fn dot(self, x: f64, z: f64) -> f64 {
        self.x * x + self.z * z
    }
}
