use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a cell in the power grid's cell arena.
    pub struct CellId;

    /// Identifies a placeable item (energizer, gun, passive weapon, bouncer).
    pub struct ItemId;

    /// Identifies a beam emitter attached to a gun item.
    pub struct EmitterId;
}

/// Identifies a host-side entity hit by a ray (an enemy, a connector, a
/// wall). The simulation never owns these; it only hands them back to the
/// host through the sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);
