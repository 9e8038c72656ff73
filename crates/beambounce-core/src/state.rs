use serde::{Deserialize, Serialize};

/// What a grid cell reports to the visual layer.
///
/// Exactly one state is reported at a time. Precedence is
/// `Energized > Occupied > Highlighted > Default`: an energized cell never
/// reports `Occupied`, and `Highlighted` only shows on an empty, unpowered
/// cell under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Default,
    Occupied,
    Energized,
    Highlighted,
}

impl CellState {
    /// Resolve the displayed state from a cell's flags.
    pub fn resolve(energized: bool, occupied: bool, hovered: bool) -> CellState {
        if energized {
            CellState::Energized
        } else if occupied {
            CellState::Occupied
        } else if hovered {
            CellState::Highlighted
        } else {
            CellState::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energized_wins_over_everything() {
        assert_eq!(CellState::resolve(true, true, true), CellState::Energized);
        assert_eq!(CellState::resolve(true, false, false), CellState::Energized);
    }

    #[test]
    fn occupied_hides_highlight() {
        assert_eq!(CellState::resolve(false, true, true), CellState::Occupied);
    }

    #[test]
    fn highlight_only_on_empty_unpowered_cell() {
        assert_eq!(
            CellState::resolve(false, false, true),
            CellState::Highlighted
        );
        assert_eq!(CellState::resolve(false, false, false), CellState::Default);
    }
}
