//! BeamBounce simulation: placement and the per-tick engine.
//!
//! [`placement::PlacementController`] mediates between dragged items and the
//! power grid. [`engine::Simulation`] ties grid, items, beam emitters, host
//! sinks and the event bus together and advances them tick by tick.

pub mod engine;
pub mod placement;

pub use engine::{AdvanceResult, Simulation};
pub use placement::{DropOutcome, Item, PlacementController, PlacementError};
