//! Property-based tests for the power grid.
//!
//! Drives a grid through random place/remove/hover sequences and checks
//! the cell invariants and the one-ring energize rule after every step.

use beambounce_core::id::ItemId;
use beambounce_core::item::ItemKind;
use beambounce_grid::{GridError, GridLayout, GridPosition, Occupant, PowerGrid};
use proptest::prelude::*;
use slotmap::SlotMap;

const SIZE: i32 = 5;

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone)]
enum GridOp {
    Place(i32, i32, ItemKind),
    Remove(i32, i32),
    Hover(i32, i32, bool),
}

fn arb_kind() -> impl Strategy<Value = ItemKind> {
    prop_oneof![
        Just(ItemKind::Energizer),
        Just(ItemKind::Gun),
        Just(ItemKind::PassiveWeapon),
        Just(ItemKind::Bouncer),
    ]
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<GridOp>> {
    proptest::collection::vec(
        prop_oneof![
            3 => (0..SIZE, 0..SIZE, arb_kind()).prop_map(|(x, z, k)| GridOp::Place(x, z, k)),
            2 => (0..SIZE, 0..SIZE).prop_map(|(x, z)| GridOp::Remove(x, z)),
            1 => (0..SIZE, 0..SIZE, any::<bool>()).prop_map(|(x, z, h)| GridOp::Hover(x, z, h)),
        ],
        1..=max_ops,
    )
}

// ===========================================================================
// Helpers
// ===========================================================================

type CellSnapshot = (GridPosition, Option<Occupant>, bool, bool, bool);

fn snapshot(grid: &PowerGrid) -> Vec<CellSnapshot> {
    let mut cells: Vec<CellSnapshot> = grid
        .cells()
        .map(|(_, c)| {
            (
                c.position(),
                c.occupant(),
                c.is_energized(),
                c.has_energy_source(),
                c.is_hovered(),
            )
        })
        .collect();
    cells.sort_by_key(|c| c.0);
    cells
}

fn sources(grid: &PowerGrid) -> Vec<GridPosition> {
    grid.cells()
        .filter(|(_, c)| c.has_energy_source())
        .map(|(_, c)| c.position())
        .collect()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Invariants hold after every operation, and failed operations leave
    /// the grid untouched.
    #[test]
    fn random_sequences_keep_invariants(ops in arb_ops(60)) {
        let mut grid = PowerGrid::new(GridLayout::new(SIZE as u32, SIZE as u32));
        let mut items = SlotMap::<ItemId, ()>::with_key();

        for op in ops {
            let before = snapshot(&grid);
            let result: Result<(), GridError> = match op {
                GridOp::Place(x, z, kind) => {
                    let cell = grid.cell_at(GridPosition::new(x, z)).unwrap();
                    let item = items.insert(());
                    grid.place_item(cell, item, kind).map(|_| ())
                }
                GridOp::Remove(x, z) => {
                    let cell = grid.cell_at(GridPosition::new(x, z)).unwrap();
                    grid.remove_item(cell).map(|_| ())
                }
                GridOp::Hover(x, z, hovered) => {
                    let cell = grid.cell_at(GridPosition::new(x, z)).unwrap();
                    grid.set_hovered(cell, hovered).map(|_| ())
                }
            };

            if result.is_err() {
                prop_assert_eq!(snapshot(&grid), before);
            }
            prop_assert!(grid.validate().is_empty());
        }
    }

    /// Every energized cell sits within one step of a source.
    #[test]
    fn energize_is_one_ring(ops in arb_ops(40)) {
        let mut grid = PowerGrid::new(GridLayout::new(SIZE as u32, SIZE as u32));
        let mut items = SlotMap::<ItemId, ()>::with_key();

        for op in ops {
            match op {
                GridOp::Place(x, z, kind) => {
                    let cell = grid.cell_at(GridPosition::new(x, z)).unwrap();
                    let _ = grid.place_item(cell, items.insert(()), kind);
                }
                GridOp::Remove(x, z) => {
                    let cell = grid.cell_at(GridPosition::new(x, z)).unwrap();
                    let _ = grid.remove_item(cell);
                }
                GridOp::Hover(..) => {}
            }
        }

        let sources = sources(&grid);
        for (_, cell) in grid.cells() {
            let near_source = sources
                .iter()
                .any(|s| s.manhattan_distance(&cell.position()) <= 1);
            prop_assert_eq!(cell.is_energized(), near_source);
        }
    }

    /// Removing one energizer never drains another energizer's cell.
    #[test]
    fn drain_never_touches_other_sources(
        a in (0..SIZE, 0..SIZE),
        b in (0..SIZE, 0..SIZE),
    ) {
        prop_assume!(a != b);
        let mut grid = PowerGrid::new(GridLayout::new(SIZE as u32, SIZE as u32));
        let mut items = SlotMap::<ItemId, ()>::with_key();
        let cell_a = grid.cell_at(GridPosition::new(a.0, a.1)).unwrap();
        let cell_b = grid.cell_at(GridPosition::new(b.0, b.1)).unwrap();

        grid.place_item(cell_a, items.insert(()), ItemKind::Energizer).unwrap();
        grid.place_item(cell_b, items.insert(()), ItemKind::Energizer).unwrap();
        grid.remove_item(cell_a).unwrap();

        let b_cell = grid.cell(cell_b).unwrap();
        prop_assert!(b_cell.has_energy_source());
        prop_assert!(b_cell.is_energized());
        for n in grid.neighbors(cell_b) {
            prop_assert!(grid.cell(n).unwrap().is_energized());
        }
    }
}
