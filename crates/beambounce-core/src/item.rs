use serde::{Deserialize, Serialize};

/// The closed set of things a player can drop into a grid cell.
///
/// Every per-kind behavior in the workspace is an exhaustive `match` on
/// this enum, so an unrecognized kind cannot reach the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Always energized; energizes the four cardinal neighbors of its cell.
    Energizer,
    /// Beam emitter. Fires only while its cell is energized.
    Gun,
    /// Grid weapon without a beam.
    PassiveWeapon,
    /// Placeable reflector.
    Bouncer,
}

impl ItemKind {
    pub fn all() -> [ItemKind; 4] {
        [
            ItemKind::Energizer,
            ItemKind::Gun,
            ItemKind::PassiveWeapon,
            ItemKind::Bouncer,
        ]
    }

    /// Whether items of this kind carry a beam emitter.
    pub fn has_emitter(self) -> bool {
        matches!(self, ItemKind::Gun)
    }
}
