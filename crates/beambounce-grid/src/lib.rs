//! Power grid for the BeamBounce board.
//!
//! A fixed set of cells laid out on the X/Z plane. Each cell tracks its
//! occupant and whether it is energized. Energizers power their own cell
//! and the single ring of four cardinal neighbors around it; guns placed on
//! energized cells are allowed to fire.
//!
//! # Design
//!
//! - Cells live in a slotmap arena keyed by [`CellId`]; topology is static
//!   for the lifetime of the grid, so neighbor links are resolved once at
//!   build time.
//! - A cell holds a non-owning [`Occupant`] (item id + kind). Items
//!   themselves belong to the placement layer.
//! - A cell is energized exactly when it or one of its cardinal neighbors
//!   holds an energizer. Propagation never cascades past that ring.
//! - Mutations report what they changed as [`GridEvent`]s: displayed state
//!   transitions and beam gate signals for guns whose cell was touched.
//! - Failed operations return a [`GridError`] and leave every cell as it was.

use std::collections::BTreeMap;

use beambounce_core::id::{CellId, ItemId};
use beambounce_core::item::ItemKind;
use beambounce_core::state::CellState;
use glam::Vec3;
use slotmap::SlotMap;
use tracing::{debug, trace};

pub mod cell;
pub mod layout;

pub use cell::{Cell, Occupant};
pub use layout::{Direction, GridLayout, GridPosition, MAX_GRID_SIDE, NEIGHBOR_PROBE_RADIUS};

// ---------------------------------------------------------------------------
// Errors and events
// ---------------------------------------------------------------------------

/// Errors from grid operations. All are recoverable; state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("cell {0:?} is already occupied")]
    CellOccupied(CellId),
    #[error("cell {0:?} has no occupant")]
    EmptyCell(CellId),
    #[error("cell {0:?} is not part of this grid")]
    UnknownCell(CellId),
}

/// What a grid mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    /// The displayed state of a cell changed.
    CellStateChanged {
        cell: CellId,
        from: CellState,
        to: CellState,
    },
    /// A gun's beam gate was re-evaluated. Idempotent for the receiver.
    BeamSignal { item: ItemId, enabled: bool },
}

/// Result of a successful [`PowerGrid::remove_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub occupant: Occupant,
    pub events: Vec<GridEvent>,
}

// ---------------------------------------------------------------------------
// PowerGrid
// ---------------------------------------------------------------------------

/// Owns every cell of the board and all occupancy/energize state.
#[derive(Debug, Clone)]
pub struct PowerGrid {
    cells: SlotMap<CellId, Cell>,
    index: BTreeMap<GridPosition, CellId>,
    layout: GridLayout,
}

impl PowerGrid {
    /// Build every cell the layout describes and link cardinal neighbors.
    pub fn new(layout: GridLayout) -> Self {
        let mut cells = SlotMap::with_key();
        let mut index = BTreeMap::new();
        for (pos, world, bottom_row) in layout.cells() {
            let id = cells.insert(Cell::new(pos, world, bottom_row));
            index.insert(pos, id);
        }

        let mut grid = Self {
            cells,
            index,
            layout,
        };
        grid.link_neighbors();
        debug!(
            width = grid.layout.width,
            depth = grid.layout.depth,
            cells = grid.cells.len(),
            "built power grid"
        );
        grid
    }

    /// Resolve each cell's neighbors spatially: probe one pitch away along
    /// each cardinal axis and accept the cell found within
    /// [`NEIGHBOR_PROBE_RADIUS`] of the probe point.
    fn link_neighbors(&mut self) {
        let (px, pz) = self.layout.pitch();
        let links: Vec<(CellId, [Option<CellId>; 4])> = self
            .cells
            .iter()
            .map(|(id, cell)| {
                let mut found = [None; 4];
                for dir in Direction::all() {
                    let (dx, dz) = dir.offset();
                    let probe = cell.world + Vec3::new(dx as f32 * px, 0.0, dz as f32 * pz);
                    found[dir.index()] = self
                        .index
                        .get(&cell.position.step(dir))
                        .copied()
                        .filter(|n| self.cells[*n].world.distance(probe) <= NEIGHBOR_PROBE_RADIUS);
                }
                (id, found)
            })
            .collect();

        for (id, found) in links {
            self.cells[id].neighbors = found;
        }
    }

    // -- Queries --

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// The cell at a grid position (main grid or bottom row).
    pub fn cell_at(&self, pos: GridPosition) -> Option<CellId> {
        self.index.get(&pos).copied()
    }

    /// The cell whose world position is nearest to `point`, if it lies
    /// within `radius`.
    pub fn cell_near(&self, point: Vec3, radius: f32) -> Option<CellId> {
        self.cells
            .iter()
            .map(|(id, cell)| (id, cell.world.distance(point)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether an item can be dropped into `id`. Unknown cells are never free.
    pub fn is_free(&self, id: CellId) -> bool {
        self.cells.get(id).is_some_and(Cell::is_free)
    }

    pub fn state(&self, id: CellId) -> Option<CellState> {
        self.cells.get(id).map(Cell::state)
    }

    pub fn neighbors(&self, id: CellId) -> Vec<CellId> {
        self.cells
            .get(id)
            .map(|c| c.neighbors().collect())
            .unwrap_or_default()
    }

    /// The cell currently holding `item`.
    pub fn cell_of(&self, item: ItemId) -> Option<CellId> {
        self.cells
            .iter()
            .find(|(_, c)| c.occupant.is_some_and(|o| o.item == item))
            .map(|(id, _)| id)
    }

    // -- Mutation --

    /// Put `item` into a free cell and apply its kind's effect.
    ///
    /// - Energizer: the cell becomes a source; it and its four neighbors
    ///   energize.
    /// - Gun: its beam gate follows the cell's energized flag.
    /// - Passive weapon / bouncer: occupancy only.
    pub fn place_item(
        &mut self,
        cell_id: CellId,
        item: ItemId,
        kind: ItemKind,
    ) -> Result<Vec<GridEvent>, GridError> {
        let cell = self
            .cells
            .get(cell_id)
            .ok_or(GridError::UnknownCell(cell_id))?;
        if !cell.is_free() {
            trace!(?cell_id, ?item, "placement rejected, cell occupied");
            return Err(GridError::CellOccupied(cell_id));
        }

        let is_source = kind == ItemKind::Energizer;
        let affected = self.affected(cell_id, is_source);
        let before = self.snapshot(&affected);

        let cell = &mut self.cells[cell_id];
        cell.occupant = Some(Occupant { item, kind });
        cell.hovered = false;

        match kind {
            ItemKind::Energizer => {
                cell.has_energy_source = true;
                for &id in &affected {
                    self.refresh_energy(id);
                }
            }
            ItemKind::Gun | ItemKind::PassiveWeapon | ItemKind::Bouncer => {}
        }

        let mut events = self.diff(&before);
        self.signal_guns(&affected, &mut events);
        debug!(?cell_id, ?item, ?kind, changed = events.len(), "item placed");
        Ok(events)
    }

    /// Take the occupant out of a cell and undo its kind's effect.
    ///
    /// - Energizer: the source is cleared and its ring drains. Cells still
    ///   touching another energizer stay energized, the vacated cell
    ///   included: it follows the same fed rule as every other cell.
    /// - Gun: its beam is switched off.
    /// - Passive weapon / bouncer: occupancy only.
    pub fn remove_item(&mut self, cell_id: CellId) -> Result<Removal, GridError> {
        let cell = self
            .cells
            .get(cell_id)
            .ok_or(GridError::UnknownCell(cell_id))?;
        let occupant = cell.occupant.ok_or(GridError::EmptyCell(cell_id))?;

        let is_source = occupant.kind == ItemKind::Energizer;
        let affected = self.affected(cell_id, is_source);
        let before = self.snapshot(&affected);

        let cell = &mut self.cells[cell_id];
        cell.occupant = None;

        let mut events = Vec::new();
        match occupant.kind {
            ItemKind::Energizer => {
                cell.has_energy_source = false;
                for &id in &affected {
                    self.refresh_energy(id);
                }
            }
            ItemKind::Gun => {
                events.push(GridEvent::BeamSignal {
                    item: occupant.item,
                    enabled: false,
                });
            }
            ItemKind::PassiveWeapon | ItemKind::Bouncer => {}
        }

        events.extend(self.diff(&before));
        self.signal_guns(&affected, &mut events);
        debug!(?cell_id, item = ?occupant.item, kind = ?occupant.kind, "item removed");
        Ok(Removal { occupant, events })
    }

    /// Set or clear the pointer-hover flag. Hovering only shows on a free,
    /// unpowered cell; the request is ignored otherwise.
    pub fn set_hovered(&mut self, cell_id: CellId, hovered: bool) -> Result<Vec<GridEvent>, GridError> {
        let cell = self
            .cells
            .get_mut(cell_id)
            .ok_or(GridError::UnknownCell(cell_id))?;
        let from = cell.state();
        cell.hovered = hovered && cell.is_free() && !cell.energized;
        let to = cell.state();
        Ok(if from != to {
            vec![GridEvent::CellStateChanged {
                cell: cell_id,
                from,
                to,
            }]
        } else {
            Vec::new()
        })
    }

    /// Clear every hover flag on the board.
    pub fn clear_hover(&mut self) -> Vec<GridEvent> {
        let hovered: Vec<CellId> = self
            .cells
            .iter()
            .filter(|(_, c)| c.hovered)
            .map(|(id, _)| id)
            .collect();
        let before = self.snapshot(&hovered);
        for &id in &hovered {
            self.cells[id].hovered = false;
        }
        self.diff(&before)
    }

    /// Cells whose flags break a grid invariant. Empty on a healthy grid.
    pub fn validate(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|(_, cell)| {
                let source_ok = !cell.has_energy_source
                    || (cell.energized
                        && cell.occupant.is_some_and(|o| o.kind == ItemKind::Energizer));
                let energy_ok = cell.energized == self.is_fed(cell);
                let hover_ok = !cell.hovered || (cell.is_free() && !cell.energized);
                !(source_ok && energy_ok && hover_ok)
            })
            .map(|(id, _)| id)
            .collect()
    }

    // -- Internals --

    /// The cell itself, plus its ring when an energizer is involved.
    fn affected(&self, id: CellId, with_ring: bool) -> Vec<CellId> {
        let mut out = vec![id];
        if with_ring {
            out.extend(self.cells[id].neighbors());
        }
        out
    }

    fn is_fed(&self, cell: &Cell) -> bool {
        cell.has_energy_source || cell.neighbors().any(|n| self.cells[n].has_energy_source)
    }

    fn refresh_energy(&mut self, id: CellId) {
        let fed = self.is_fed(&self.cells[id]);
        let cell = &mut self.cells[id];
        cell.energized = fed;
        if fed {
            cell.hovered = false;
        }
    }

    fn snapshot(&self, ids: &[CellId]) -> Vec<(CellId, CellState)> {
        ids.iter().map(|&id| (id, self.cells[id].state())).collect()
    }

    fn diff(&self, before: &[(CellId, CellState)]) -> Vec<GridEvent> {
        before
            .iter()
            .filter_map(|&(cell, from)| {
                let to = self.cells[cell].state();
                (from != to).then_some(GridEvent::CellStateChanged { cell, from, to })
            })
            .collect()
    }

    fn signal_guns(&self, ids: &[CellId], events: &mut Vec<GridEvent>) {
        for &id in ids {
            let cell = &self.cells[id];
            if let Some(item) = cell.gun() {
                events.push(GridEvent::BeamSignal {
                    item,
                    enabled: cell.energized,
                });
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(count: usize) -> Vec<ItemId> {
        let mut sm = SlotMap::<ItemId, ()>::with_key();
        (0..count).map(|_| sm.insert(())).collect()
    }

    fn at(grid: &PowerGrid, x: i32, z: i32) -> CellId {
        grid.cell_at(GridPosition::new(x, z)).unwrap()
    }

    fn state(grid: &PowerGrid, x: i32, z: i32) -> CellState {
        grid.state(at(grid, x, z)).unwrap()
    }

    fn signals(events: &[GridEvent]) -> Vec<(ItemId, bool)> {
        events
            .iter()
            .filter_map(|e| match e {
                GridEvent::BeamSignal { item, enabled } => Some((*item, *enabled)),
                _ => None,
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Topology
    // -----------------------------------------------------------------------

    #[test]
    fn corner_has_two_neighbors_center_has_four() {
        let grid = PowerGrid::new(GridLayout::new(3, 3));
        assert_eq!(grid.neighbors(at(&grid, 0, 0)).len(), 2);
        assert_eq!(grid.neighbors(at(&grid, 1, 0)).len(), 3);
        assert_eq!(grid.neighbors(at(&grid, 1, 1)).len(), 4);
    }

    #[test]
    fn neighbors_are_cardinal_only() {
        let grid = PowerGrid::new(GridLayout::new(3, 3));
        let center = grid.cell(at(&grid, 1, 1)).unwrap();
        assert_eq!(center.neighbor(Direction::North), Some(at(&grid, 1, 2)));
        assert_eq!(center.neighbor(Direction::East), Some(at(&grid, 2, 1)));
        assert_eq!(center.neighbor(Direction::South), Some(at(&grid, 1, 0)));
        assert_eq!(center.neighbor(Direction::West), Some(at(&grid, 0, 1)));
        assert!(!grid.neighbors(at(&grid, 1, 1)).contains(&at(&grid, 2, 2)));
    }

    #[test]
    fn spacing_is_respected_by_spatial_probe() {
        let grid = PowerGrid::new(GridLayout {
            spacing: 0.25,
            ..GridLayout::new(2, 1)
        });
        assert_eq!(grid.neighbors(at(&grid, 0, 0)), vec![at(&grid, 1, 0)]);
    }

    #[test]
    fn detached_bottom_row_is_not_adjacent() {
        let grid = PowerGrid::new(GridLayout {
            bottom_row_gap: Some(1.0),
            ..GridLayout::new(2, 2)
        });
        assert_eq!(grid.len(), 6);
        let bottom = at(&grid, 0, 2);
        assert!(grid.cell(bottom).unwrap().is_bottom_row());
        assert_eq!(grid.neighbors(bottom), vec![at(&grid, 1, 2)]);
        assert!(!grid.neighbors(at(&grid, 0, 1)).contains(&bottom));
    }

    #[test]
    fn flush_bottom_row_is_adjacent() {
        let grid = PowerGrid::new(GridLayout {
            bottom_row_gap: Some(0.0),
            ..GridLayout::new(1, 2)
        });
        assert!(grid.neighbors(at(&grid, 0, 1)).contains(&at(&grid, 0, 2)));
    }

    #[test]
    fn cell_near_finds_nearest_within_radius() {
        let grid = PowerGrid::new(GridLayout::new(3, 3));
        assert_eq!(
            grid.cell_near(Vec3::new(1.05, 0.0, 2.0), 0.1),
            Some(at(&grid, 1, 2))
        );
        assert_eq!(grid.cell_near(Vec3::new(1.5, 0.0, 2.0), 0.1), None);
    }

    // -----------------------------------------------------------------------
    // Energize / drain
    // -----------------------------------------------------------------------

    #[test]
    fn one_by_three_energize_then_drain() {
        let mut grid = PowerGrid::new(GridLayout::new(3, 1));
        let items = make_items(1);
        let b = at(&grid, 1, 0);

        grid.place_item(b, items[0], ItemKind::Energizer).unwrap();
        for x in 0..3 {
            assert_eq!(state(&grid, x, 0), CellState::Energized);
        }

        grid.remove_item(b).unwrap();
        for x in 0..3 {
            assert_eq!(state(&grid, x, 0), CellState::Default);
        }
        assert!(grid.validate().is_empty());
    }

    #[test]
    fn propagation_is_a_single_ring() {
        let mut grid = PowerGrid::new(GridLayout::new(5, 5));
        let items = make_items(1);
        grid.place_item(at(&grid, 2, 2), items[0], ItemKind::Energizer)
            .unwrap();

        let energized: Vec<GridPosition> = grid
            .cells()
            .filter(|(_, c)| c.is_energized())
            .map(|(_, c)| c.position())
            .collect();
        assert_eq!(energized.len(), 5);
        for pos in energized {
            assert!(pos.manhattan_distance(&GridPosition::new(2, 2)) <= 1);
        }
        assert_eq!(state(&grid, 2, 4), CellState::Default);
        assert_eq!(state(&grid, 3, 3), CellState::Default);
    }

    #[test]
    fn drain_spares_independent_source() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 1));
        let items = make_items(2);
        let a = at(&grid, 0, 0);
        let b = at(&grid, 1, 0);
        grid.place_item(a, items[0], ItemKind::Energizer).unwrap();
        grid.place_item(b, items[1], ItemKind::Energizer).unwrap();

        grid.remove_item(a).unwrap();
        let b_cell = grid.cell(b).unwrap();
        assert!(b_cell.has_energy_source());
        assert!(b_cell.is_energized());
        // A is still fed by B next door.
        assert_eq!(grid.state(a), Some(CellState::Energized));
    }

    #[test]
    fn shared_neighbor_stays_fed_by_remaining_source() {
        let mut grid = PowerGrid::new(GridLayout::new(3, 1));
        let items = make_items(2);
        grid.place_item(at(&grid, 0, 0), items[0], ItemKind::Energizer)
            .unwrap();
        grid.place_item(at(&grid, 2, 0), items[1], ItemKind::Energizer)
            .unwrap();

        grid.remove_item(at(&grid, 0, 0)).unwrap();
        assert_eq!(state(&grid, 1, 0), CellState::Energized);
        assert_eq!(state(&grid, 0, 0), CellState::Default);
    }

    #[test]
    fn drained_neighbor_with_item_shows_occupied() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 1));
        let items = make_items(2);
        grid.place_item(at(&grid, 0, 0), items[0], ItemKind::Energizer)
            .unwrap();
        grid.place_item(at(&grid, 1, 0), items[1], ItemKind::Bouncer)
            .unwrap();
        assert_eq!(state(&grid, 1, 0), CellState::Energized);

        let removal = grid.remove_item(at(&grid, 0, 0)).unwrap();
        assert_eq!(state(&grid, 1, 0), CellState::Occupied);
        assert!(removal.events.contains(&GridEvent::CellStateChanged {
            cell: at(&grid, 1, 0),
            from: CellState::Energized,
            to: CellState::Occupied,
        }));
    }

    // -----------------------------------------------------------------------
    // Guns
    // -----------------------------------------------------------------------

    #[test]
    fn gun_on_unpowered_cell_is_disabled() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 1));
        let items = make_items(1);
        let events = grid.place_item(at(&grid, 0, 0), items[0], ItemKind::Gun)
            .unwrap();
        assert_eq!(signals(&events), vec![(items[0], false)]);
        assert_eq!(state(&grid, 0, 0), CellState::Occupied);
    }

    #[test]
    fn energizing_neighbor_enables_gun_without_replacing_it() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 1));
        let items = make_items(2);
        grid.place_item(at(&grid, 0, 0), items[0], ItemKind::Gun)
            .unwrap();

        let events = grid
            .place_item(at(&grid, 1, 0), items[1], ItemKind::Energizer)
            .unwrap();
        assert_eq!(signals(&events), vec![(items[0], true)]);
        assert_eq!(state(&grid, 0, 0), CellState::Energized);

        let removal = grid.remove_item(at(&grid, 1, 0)).unwrap();
        assert_eq!(signals(&removal.events), vec![(items[0], false)]);
    }

    #[test]
    fn removing_gun_disables_its_beam() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 1));
        let items = make_items(2);
        grid.place_item(at(&grid, 1, 0), items[1], ItemKind::Energizer)
            .unwrap();
        grid.place_item(at(&grid, 0, 0), items[0], ItemKind::Gun)
            .unwrap();

        let removal = grid.remove_item(at(&grid, 0, 0)).unwrap();
        assert_eq!(removal.occupant.kind, ItemKind::Gun);
        assert_eq!(signals(&removal.events), vec![(items[0], false)]);
        // Still energized by the neighbor, just empty.
        assert_eq!(state(&grid, 0, 0), CellState::Energized);
    }

    // -----------------------------------------------------------------------
    // Failures
    // -----------------------------------------------------------------------

    #[test]
    fn placing_into_occupied_cell_changes_nothing() {
        let mut grid = PowerGrid::new(GridLayout::new(3, 1));
        let items = make_items(2);
        let a = at(&grid, 0, 0);
        grid.place_item(a, items[0], ItemKind::PassiveWeapon).unwrap();

        let result = grid.place_item(a, items[1], ItemKind::Energizer);
        assert_eq!(result, Err(GridError::CellOccupied(a)));
        assert_eq!(grid.cell(a).unwrap().occupant().unwrap().item, items[0]);
        assert!(!grid.cell(a).unwrap().has_energy_source());
        assert_eq!(state(&grid, 1, 0), CellState::Default);
    }

    #[test]
    fn removing_from_empty_cell_fails() {
        let mut grid = PowerGrid::new(GridLayout::new(1, 1));
        let a = at(&grid, 0, 0);
        assert_eq!(grid.remove_item(a), Err(GridError::EmptyCell(a)));
    }

    #[test]
    fn unknown_cell_is_reported() {
        let mut other = PowerGrid::new(GridLayout::new(4, 4));
        let mut grid = PowerGrid::new(GridLayout::new(1, 1));
        let foreign = at(&other, 3, 3);
        let items = make_items(1);
        assert!(!grid.is_free(foreign));
        assert_eq!(
            grid.place_item(foreign, items[0], ItemKind::Gun),
            Err(GridError::UnknownCell(foreign))
        );
        assert!(other.remove_item(foreign).is_err());
    }

    #[test]
    fn swapping_item_kinds_leaves_no_stale_flags() {
        let mut grid = PowerGrid::new(GridLayout::new(3, 1));
        let items = make_items(2);
        let b = at(&grid, 1, 0);
        grid.place_item(b, items[0], ItemKind::Energizer).unwrap();
        grid.remove_item(b).unwrap();
        grid.place_item(b, items[1], ItemKind::PassiveWeapon).unwrap();

        let cell = grid.cell(b).unwrap();
        assert!(!cell.has_energy_source());
        assert!(!cell.is_energized());
        assert_eq!(cell.occupant().unwrap().kind, ItemKind::PassiveWeapon);
        assert_eq!(state(&grid, 0, 0), CellState::Default);
        assert!(grid.validate().is_empty());
    }

    // -----------------------------------------------------------------------
    // Hover
    // -----------------------------------------------------------------------

    #[test]
    fn hover_highlights_only_free_unpowered_cells() {
        let mut grid = PowerGrid::new(GridLayout::new(3, 1));
        let items = make_items(2);
        let a = at(&grid, 0, 0);
        let c = at(&grid, 2, 0);

        let events = grid.set_hovered(a, true).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(grid.state(a), Some(CellState::Highlighted));

        grid.place_item(c, items[0], ItemKind::Bouncer).unwrap();
        assert!(grid.set_hovered(c, true).unwrap().is_empty());
        assert_eq!(grid.state(c), Some(CellState::Occupied));

        // Energizing the hovered cell wipes the highlight.
        grid.place_item(at(&grid, 1, 0), items[1], ItemKind::Energizer)
            .unwrap();
        assert!(!grid.cell(a).unwrap().is_hovered());
        grid.remove_item(at(&grid, 1, 0)).unwrap();
        assert_eq!(grid.state(a), Some(CellState::Default));
    }

    #[test]
    fn placing_clears_hover_and_clear_hover_resets_all() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 1));
        let items = make_items(1);
        let a = at(&grid, 0, 0);
        let b = at(&grid, 1, 0);
        grid.set_hovered(a, true).unwrap();
        grid.set_hovered(b, true).unwrap();

        grid.place_item(a, items[0], ItemKind::PassiveWeapon).unwrap();
        grid.remove_item(a).unwrap();
        assert_eq!(grid.state(a), Some(CellState::Default));

        let events = grid.clear_hover();
        assert_eq!(events.len(), 1);
        assert_eq!(grid.state(b), Some(CellState::Default));
    }

    #[test]
    fn cell_of_tracks_occupants() {
        let mut grid = PowerGrid::new(GridLayout::new(2, 2));
        let items = make_items(1);
        let target = at(&grid, 1, 1);
        assert_eq!(grid.cell_of(items[0]), None);
        grid.place_item(target, items[0], ItemKind::Gun).unwrap();
        assert_eq!(grid.cell_of(items[0]), Some(target));
    }

    #[test]
    fn oversized_layout_builds_clamped_grid() {
        let grid = PowerGrid::new(GridLayout::new(u32::MAX, 1));
        assert_eq!(grid.len(), MAX_GRID_SIDE as usize);
        let last = at(&grid, MAX_GRID_SIDE as i32 - 1, 0);
        assert_eq!(grid.neighbors(last).len(), 1);
        assert!(grid.validate().is_empty());
    }
}
