use beambounce_core::id::{CellId, ItemId};
use beambounce_core::item::ItemKind;
use beambounce_core::state::CellState;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layout::{Direction, GridPosition};

/// Non-owning reference to the item sitting in a cell. The kind is kept so
/// removal can dispatch on what was there without asking the item arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub item: ItemId,
    pub kind: ItemKind,
}

/// One addressable board cell.
///
/// Invariants kept by [`crate::PowerGrid`]:
/// - `has_energy_source` implies `energized` and an `Energizer` occupant.
/// - `occupant.is_some()` is exactly "occupied".
#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) position: GridPosition,
    pub(crate) world: Vec3,
    pub(crate) bottom_row: bool,
    pub(crate) occupant: Option<Occupant>,
    pub(crate) energized: bool,
    pub(crate) has_energy_source: bool,
    pub(crate) hovered: bool,
    /// Cached cardinal neighbors, indexed by [`Direction::index`].
    pub(crate) neighbors: [Option<CellId>; 4],
}

impl Cell {
    pub(crate) fn new(position: GridPosition, world: Vec3, bottom_row: bool) -> Self {
        Self {
            position,
            world,
            bottom_row,
            occupant: None,
            energized: false,
            has_energy_source: false,
            hovered: false,
            neighbors: [None; 4],
        }
    }

    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Where items placed in this cell sit in the world.
    pub fn world_position(&self) -> Vec3 {
        self.world
    }

    pub fn is_bottom_row(&self) -> bool {
        self.bottom_row
    }

    pub fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }

    /// True only when an energizer sits directly in this cell.
    pub fn has_energy_source(&self) -> bool {
        self.has_energy_source
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// The displayed state derived from the cell's flags.
    pub fn state(&self) -> CellState {
        CellState::resolve(self.energized, self.is_occupied(), self.hovered)
    }

    pub fn neighbor(&self, dir: Direction) -> Option<CellId> {
        self.neighbors[dir.index()]
    }

    /// Existing cardinal neighbors in North, East, South, West order.
    pub fn neighbors(&self) -> impl Iterator<Item = CellId> + '_ {
        self.neighbors.iter().flatten().copied()
    }

    /// The gun sitting in this cell, if any.
    pub(crate) fn gun(&self) -> Option<ItemId> {
        self.occupant
            .filter(|o| o.kind == ItemKind::Gun)
            .map(|o| o.item)
    }
}
