//! Level data for BeamBounce: file formats and simulation building.

pub mod loader;
pub mod schema;

pub use loader::{BuiltLevel, DataLoadError, build_simulation, load_level};
pub use schema::LevelData;
