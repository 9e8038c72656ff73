//! Grid coordinates, cardinal directions, and the world-space layout that
//! turns a `width x depth` board into cell positions on the X/Z plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A cell coordinate: `x` runs along world X, `z` along world Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub z: i32,
}

impl GridPosition {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(&self, other: &GridPosition) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.z - other.z).unsigned_abs()
    }

    /// The position one step away in `dir`.
    pub fn step(&self, dir: Direction) -> GridPosition {
        let (dx, dz) = dir.offset();
        GridPosition::new(self.x + dx, self.z + dz)
    }
}

/// Cardinal directions on the board. North is world +Z (forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four cardinal directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
    }

    /// Offset for this direction as `(dx, dz)`.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// How far from a probe point a cell may sit and still count as the
/// neighbor in that direction.
pub const NEIGHBOR_PROBE_RADIUS: f32 = 0.1;

/// Largest board side, in cells, that a layout builds. Wider or deeper
/// layouts are clamped to it.
pub const MAX_GRID_SIDE: u32 = 256;

/// Describes where every cell of a board sits in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Cells along world X.
    pub width: u32,
    /// Cells along world Z.
    pub depth: u32,
    /// Footprint of a single cell. Only `x` and `z` affect placement.
    pub cell_size: Vec3,
    /// Extra gap between neighboring cells.
    pub spacing: f32,
    /// World position of cell `(0, 0)`.
    pub origin: Vec3,
    /// Gap between the last row and an extra row of `width` cells placed
    /// after it. `None` builds no extra row.
    pub bottom_row_gap: Option<f32>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            width: 10,
            depth: 10,
            cell_size: Vec3::ONE,
            spacing: 0.0,
            origin: Vec3::ZERO,
            bottom_row_gap: None,
        }
    }
}

impl GridLayout {
    /// A `width x depth` board of unit cells at the world origin.
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            width,
            depth,
            ..Self::default()
        }
    }

    /// Whether both sides fit within [`MAX_GRID_SIDE`].
    pub fn is_within_limits(&self) -> bool {
        self.width <= MAX_GRID_SIDE && self.depth <= MAX_GRID_SIDE
    }

    /// Width and depth as built, after clamping.
    fn built_size(&self) -> (i32, i32) {
        (
            self.width.min(MAX_GRID_SIDE) as i32,
            self.depth.min(MAX_GRID_SIDE) as i32,
        )
    }

    /// Distance between the centers of two adjacent cells, per axis.
    pub fn pitch(&self) -> (f32, f32) {
        (
            self.cell_size.x + self.spacing,
            self.cell_size.z + self.spacing,
        )
    }

    /// World position of a main-grid cell.
    pub fn world_position(&self, pos: GridPosition) -> Vec3 {
        let (px, pz) = self.pitch();
        self.origin + Vec3::new(pos.x as f32 * px, 0.0, pos.z as f32 * pz)
    }

    /// World Z of the detached bottom row, if configured.
    pub fn bottom_row_z(&self) -> Option<f32> {
        let gap = self.bottom_row_gap?;
        let (_, pz) = self.pitch();
        let (_, depth) = self.built_size();
        let last_row_z = self.origin.z + (depth - 1).max(0) as f32 * pz;
        Some(last_row_z + self.cell_size.z + gap)
    }

    /// Every cell the layout produces: main grid first (x-major), then the
    /// bottom row. Bottom-row cells use row index `depth`. Sides beyond
    /// [`MAX_GRID_SIDE`] are clamped.
    pub fn cells(&self) -> Vec<(GridPosition, Vec3, bool)> {
        let (width, depth) = self.built_size();
        let mut out = Vec::with_capacity(width as usize * (depth as usize + 1));
        for x in 0..width {
            for z in 0..depth {
                let pos = GridPosition::new(x, z);
                out.push((pos, self.world_position(pos), false));
            }
        }
        if let Some(row_z) = self.bottom_row_z() {
            let (px, _) = self.pitch();
            for x in 0..width {
                let world = Vec3::new(self.origin.x + x as f32 * px, self.origin.y, row_z);
                out.push((GridPosition::new(x, depth), world, true));
            }
        }
        out
    }
}
