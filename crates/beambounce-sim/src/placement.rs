//! Drag-and-drop placement of items onto the power grid.
//!
//! [`PlacementController`] owns the item arena and is the only caller of
//! [`PowerGrid::place_item`] / [`PowerGrid::remove_item`] for dragged
//! items. It never touches power or beams directly; whatever the grid
//! reports comes back to the caller as [`GridEvent`]s.

use beambounce_core::id::{CellId, ItemId};
use beambounce_core::item::ItemKind;
use beambounce_grid::{GridError, GridEvent, PowerGrid};
use glam::Vec3;
use slotmap::SlotMap;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("item {0:?} does not exist")]
    UnknownItem(ItemId),
    #[error("item {0:?} is not being dragged")]
    NotDragging(ItemId),
    #[error("item {0:?} already sits in a cell")]
    AlreadyPlaced(ItemId),
    #[error(transparent)]
    Grid(#[from] GridError),
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A placeable item. The grid cell holds the reverse, non-owning link.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    kind: ItemKind,
    cell: Option<CellId>,
    last_cell: Option<CellId>,
    home: Vec3,
    position: Vec3,
    dragging: bool,
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The cell the item currently sits in.
    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }

    /// The last cell the item was validly placed in.
    pub fn last_cell(&self) -> Option<CellId> {
        self.last_cell
    }

    /// Where the item rests when it has no valid cell to go back to.
    pub fn home(&self) -> Vec3 {
        self.home
    }

    /// Current resting position in the world.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Where a dropped item ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// Settled into the target cell.
    Placed(CellId),
    /// Target refused; went back into the cell it was picked up from.
    Returned(CellId),
    /// Target refused and no prior cell was free; back at its home position.
    Home(Vec3),
}

impl DropOutcome {
    pub fn cell(&self) -> Option<CellId> {
        match *self {
            DropOutcome::Placed(cell) | DropOutcome::Returned(cell) => Some(cell),
            DropOutcome::Home(_) => None,
        }
    }

    pub fn was_rejected(&self) -> bool {
        !matches!(self, DropOutcome::Placed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropReport {
    pub outcome: DropOutcome,
    pub events: Vec<GridEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickUpReport {
    /// The cell the item was lifted out of, if it was placed.
    pub from: Option<CellId>,
    pub events: Vec<GridEvent>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PlacementController {
    items: SlotMap<ItemId, Item>,
    hovered: Option<CellId>,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unplaced item resting at `home`.
    pub fn spawn(&mut self, kind: ItemKind, home: Vec3) -> ItemId {
        let id = self.items.insert(Item {
            kind,
            cell: None,
            last_cell: None,
            home,
            position: home,
            dragging: false,
        });
        debug!(item = ?id, ?kind, "item spawned");
        id
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_dragging(&self) -> bool {
        self.items.values().any(|i| i.dragging)
    }

    pub fn hovered(&self) -> Option<CellId> {
        self.hovered
    }

    /// Put a resting item straight into `cell`, as a level does at start.
    pub fn place(
        &mut self,
        grid: &mut PowerGrid,
        id: ItemId,
        cell: CellId,
    ) -> Result<Vec<GridEvent>, PlacementError> {
        let item = self.items.get(id).ok_or(PlacementError::UnknownItem(id))?;
        if item.cell.is_some() {
            return Err(PlacementError::AlreadyPlaced(id));
        }
        let events = grid.place_item(cell, id, item.kind)?;
        self.settle(grid, id, cell);
        Ok(events)
    }

    /// Start dragging an item, lifting it out of its cell first.
    /// Picking up an item that is already being dragged does nothing.
    pub fn pick_up(&mut self, grid: &mut PowerGrid, id: ItemId) -> Result<PickUpReport, PlacementError> {
        let item = self.items.get(id).ok_or(PlacementError::UnknownItem(id))?;
        if item.dragging {
            return Ok(PickUpReport {
                from: None,
                events: Vec::new(),
            });
        }

        let from = item.cell;
        let events = match from {
            Some(cell) => grid.remove_item(cell)?.events,
            None => Vec::new(),
        };

        let item = &mut self.items[id];
        item.cell = None;
        item.dragging = true;
        debug!(item = ?id, ?from, "picked up");
        Ok(PickUpReport { from, events })
    }

    /// Drop a dragged item onto `target`.
    ///
    /// A free target takes the item. Otherwise (occupied, unknown, or no
    /// target at all) the item goes back to the cell it came from if that
    /// cell is still free, else to its home position.
    pub fn try_drop(
        &mut self,
        grid: &mut PowerGrid,
        id: ItemId,
        target: Option<CellId>,
    ) -> Result<DropReport, PlacementError> {
        let item = self.items.get(id).ok_or(PlacementError::UnknownItem(id))?;
        if !item.dragging {
            return Err(PlacementError::NotDragging(id));
        }
        let kind = item.kind;
        let last_cell = item.last_cell;

        let mut events = self.clear_hover(grid);

        if let Some(cell) = target.filter(|&c| grid.is_free(c)) {
            events.extend(grid.place_item(cell, id, kind)?);
            self.settle(grid, id, cell);
            debug!(item = ?id, ?cell, "dropped");
            return Ok(DropReport {
                outcome: DropOutcome::Placed(cell),
                events,
            });
        }

        trace!(item = ?id, ?target, "drop rejected");
        let outcome = match last_cell.filter(|&c| grid.is_free(c)) {
            Some(cell) => {
                events.extend(grid.place_item(cell, id, kind)?);
                self.settle(grid, id, cell);
                DropOutcome::Returned(cell)
            }
            None => {
                let item = &mut self.items[id];
                item.dragging = false;
                item.last_cell = None;
                item.position = item.home;
                DropOutcome::Home(item.home)
            }
        };
        debug!(item = ?id, ?outcome, "drop fell back");
        Ok(DropReport { outcome, events })
    }

    /// Move the drag highlight to `cell`. Only highlights while an item is
    /// being dragged; `None` or no drag clears it.
    pub fn hover(
        &mut self,
        grid: &mut PowerGrid,
        cell: Option<CellId>,
    ) -> Result<Vec<GridEvent>, PlacementError> {
        let cell = cell.filter(|_| self.is_dragging());
        if cell == self.hovered {
            return Ok(Vec::new());
        }

        let mut events = Vec::new();
        if let Some(next) = cell {
            events.extend(grid.set_hovered(next, true)?);
        }
        if let Some(prev) = self.hovered {
            events.extend(grid.set_hovered(prev, false)?);
        }
        self.hovered = cell;
        Ok(events)
    }

    // -- Internals --

    fn clear_hover(&mut self, grid: &mut PowerGrid) -> Vec<GridEvent> {
        self.hovered = None;
        grid.clear_hover()
    }

    fn settle(&mut self, grid: &PowerGrid, id: ItemId, cell: CellId) {
        let item = &mut self.items[id];
        item.cell = Some(cell);
        item.last_cell = Some(cell);
        item.dragging = false;
        if let Some(c) = grid.cell(cell) {
            item.position = c.world_position();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beambounce_core::state::CellState;
    use beambounce_grid::{GridLayout, GridPosition};

    fn setup() -> (PowerGrid, PlacementController) {
        (PowerGrid::new(GridLayout::new(3, 1)), PlacementController::new())
    }

    fn at(grid: &PowerGrid, x: i32) -> CellId {
        grid.cell_at(GridPosition::new(x, 0)).unwrap()
    }

    #[test]
    fn drop_onto_free_cell_places() {
        let (mut grid, mut ctl) = setup();
        let home = Vec3::new(0.0, 0.0, -3.0);
        let item = ctl.spawn(ItemKind::Energizer, home);
        ctl.pick_up(&mut grid, item).unwrap();

        let report = { let cell1 = at(&grid, 1); ctl.try_drop(&mut grid, item, Some(cell1)) }.unwrap();
        assert_eq!(report.outcome, DropOutcome::Placed(at(&grid, 1)));
        assert_eq!(ctl.item(item).unwrap().cell(), Some(at(&grid, 1)));
        assert_eq!(ctl.item(item).unwrap().position(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(grid.state(at(&grid, 0)), Some(CellState::Energized));
    }

    #[test]
    fn rejected_drop_returns_to_prior_cell() {
        let (mut grid, mut ctl) = setup();
        let mover = ctl.spawn(ItemKind::Bouncer, Vec3::ZERO);
        let blocker = ctl.spawn(ItemKind::PassiveWeapon, Vec3::ZERO);
        { let cell0 = at(&grid, 0); ctl.place(&mut grid, mover, cell0) }.unwrap();
        { let cell2 = at(&grid, 2); ctl.place(&mut grid, blocker, cell2) }.unwrap();

        let picked = ctl.pick_up(&mut grid, mover).unwrap();
        assert_eq!(picked.from, Some(at(&grid, 0)));
        assert!(grid.is_free(at(&grid, 0)));

        let report = { let cell2 = at(&grid, 2); ctl.try_drop(&mut grid, mover, Some(cell2)) }.unwrap();
        assert_eq!(report.outcome, DropOutcome::Returned(at(&grid, 0)));
        assert!(report.outcome.was_rejected());
        assert_eq!(grid.cell(at(&grid, 0)).unwrap().occupant().unwrap().item, mover);
        assert_eq!(grid.cell(at(&grid, 2)).unwrap().occupant().unwrap().item, blocker);
    }

    #[test]
    fn rejected_drop_without_free_prior_cell_goes_home() {
        let (mut grid, mut ctl) = setup();
        let home = Vec3::new(5.0, 0.0, 5.0);
        let mover = ctl.spawn(ItemKind::Gun, home);
        let thief = ctl.spawn(ItemKind::Bouncer, Vec3::ZERO);
        { let cell0 = at(&grid, 0); ctl.place(&mut grid, mover, cell0) }.unwrap();
        ctl.pick_up(&mut grid, mover).unwrap();
        ctl.pick_up(&mut grid, thief).unwrap();
        { let cell0 = at(&grid, 0); ctl.try_drop(&mut grid, thief, Some(cell0)) }.unwrap();

        let report = ctl.try_drop(&mut grid, mover, None).unwrap();
        assert_eq!(report.outcome, DropOutcome::Home(home));
        let item = ctl.item(mover).unwrap();
        assert_eq!(item.cell(), None);
        assert_eq!(item.position(), home);
        assert!(!item.is_dragging());
    }

    #[test]
    fn fresh_item_with_no_target_goes_home() {
        let (mut grid, mut ctl) = setup();
        let item = ctl.spawn(ItemKind::Gun, Vec3::ONE);
        ctl.pick_up(&mut grid, item).unwrap();
        let report = ctl.try_drop(&mut grid, item, None).unwrap();
        assert_eq!(report.outcome, DropOutcome::Home(Vec3::ONE));
        assert!(report.events.is_empty());
    }

    #[test]
    fn pick_up_removes_energizer_and_drains() {
        let (mut grid, mut ctl) = setup();
        let item = ctl.spawn(ItemKind::Energizer, Vec3::ZERO);
        { let cell1 = at(&grid, 1); ctl.place(&mut grid, item, cell1) }.unwrap();

        let report = ctl.pick_up(&mut grid, item).unwrap();
        assert_eq!(report.events.len(), 3);
        for x in 0..3 {
            assert_eq!(grid.state(at(&grid, x)), Some(CellState::Default));
        }
        assert!(ctl.item(item).unwrap().is_dragging());

        // Second pick-up is a no-op.
        assert!(ctl.pick_up(&mut grid, item).unwrap().events.is_empty());
    }

    #[test]
    fn drop_requires_drag() {
        let (mut grid, mut ctl) = setup();
        let item = ctl.spawn(ItemKind::Bouncer, Vec3::ZERO);
        assert_eq!(
            { let cell0 = at(&grid, 0); ctl.try_drop(&mut grid, item, Some(cell0)) },
            Err(PlacementError::NotDragging(item))
        );
    }

    #[test]
    fn place_rejects_occupied_and_already_placed() {
        let (mut grid, mut ctl) = setup();
        let a = ctl.spawn(ItemKind::Bouncer, Vec3::ZERO);
        let b = ctl.spawn(ItemKind::Bouncer, Vec3::ZERO);
        { let cell0 = at(&grid, 0); ctl.place(&mut grid, a, cell0) }.unwrap();

        assert_eq!(
            { let cell0 = at(&grid, 0); ctl.place(&mut grid, b, cell0) },
            Err(PlacementError::Grid(GridError::CellOccupied(at(&grid, 0))))
        );
        assert_eq!(
            { let cell1 = at(&grid, 1); ctl.place(&mut grid, a, cell1) },
            Err(PlacementError::AlreadyPlaced(a))
        );
        assert_eq!(ctl.item(b).unwrap().cell(), None);
    }

    #[test]
    fn hover_highlights_only_while_dragging() {
        let (mut grid, mut ctl) = setup();
        let item = ctl.spawn(ItemKind::Bouncer, Vec3::ZERO);

        assert!({ let cell0 = at(&grid, 0); ctl.hover(&mut grid, Some(cell0)) }.unwrap().is_empty());
        assert_eq!(grid.state(at(&grid, 0)), Some(CellState::Default));

        ctl.pick_up(&mut grid, item).unwrap();
        { let cell0 = at(&grid, 0); ctl.hover(&mut grid, Some(cell0)) }.unwrap();
        assert_eq!(grid.state(at(&grid, 0)), Some(CellState::Highlighted));

        { let cell1 = at(&grid, 1); ctl.hover(&mut grid, Some(cell1)) }.unwrap();
        assert_eq!(grid.state(at(&grid, 0)), Some(CellState::Default));
        assert_eq!(grid.state(at(&grid, 1)), Some(CellState::Highlighted));

        { let cell2 = at(&grid, 2); ctl.try_drop(&mut grid, item, Some(cell2)) }.unwrap();
        assert_eq!(grid.state(at(&grid, 1)), Some(CellState::Default));
        assert_eq!(ctl.hovered(), None);
    }

    #[test]
    fn unknown_item_is_reported() {
        let (mut grid, mut ctl) = setup();
        let mut other = PlacementController::new();
        let ghost = other.spawn(ItemKind::Gun, Vec3::ZERO);
        assert_eq!(
            ctl.pick_up(&mut grid, ghost),
            Err(PlacementError::UnknownItem(ghost))
        );
    }
}
