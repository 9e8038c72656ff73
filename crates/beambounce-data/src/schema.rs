//! Serde data file structs for level definitions.
//!
//! A level file describes the board layout, the beam rules shared by every
//! gun, the clock, and the roster of items with their starting positions.
//! Files are deserialized from RON, JSON, or TOML and then turned into a
//! running simulation by the loader.

use beambounce_beam::FireDirection;
use beambounce_core::item::ItemKind;
use beambounce_core::sim::{DEFAULT_TICKS_PER_SECOND, SimulationStrategy};
use glam::Vec3;
use serde::Deserialize;

// ===========================================================================
// Level
// ===========================================================================

/// A whole level file.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: Option<String>,
    pub grid: GridData,
    #[serde(default)]
    pub beam: BeamData,
    #[serde(default)]
    pub simulation: SimulationData,
    #[serde(default)]
    pub items: Vec<ItemData>,
}

// ===========================================================================
// Grid
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GridData {
    pub width: u32,
    pub depth: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: Vec3,
    #[serde(default)]
    pub spacing: f32,
    #[serde(default)]
    pub origin: Vec3,
    /// Gap before a detached extra row after the last one. Absent means no
    /// extra row.
    #[serde(default)]
    pub bottom_row_gap: Option<f32>,
}

fn default_cell_size() -> Vec3 {
    Vec3::ONE
}

// ===========================================================================
// Beam
// ===========================================================================

/// Beam rules shared by every gun in the level. Layers are given as
/// indices 0..=31.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BeamData {
    pub max_reflections: u32,
    pub max_distance: f32,
    pub reflective_layers: Vec<u8>,
    pub ignore_layers: Vec<u8>,
    pub connector_layers: Vec<u8>,
    pub enemy_layers: Vec<u8>,
    /// Damage per pulse.
    pub damage: u32,
    /// Seconds of continuous contact between recurring pulses.
    pub damage_interval_seconds: f32,
}

impl Default for BeamData {
    fn default() -> Self {
        Self {
            max_reflections: 5,
            max_distance: 100.0,
            reflective_layers: Vec::new(),
            ignore_layers: Vec::new(),
            connector_layers: Vec::new(),
            enemy_layers: Vec::new(),
            damage: 10,
            damage_interval_seconds: 1.0,
        }
    }
}

// ===========================================================================
// Simulation
// ===========================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationData {
    pub ticks_per_second: u64,
    pub strategy: SimulationStrategy,
}

impl Default for SimulationData {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            strategy: SimulationStrategy::Tick,
        }
    }
}

// ===========================================================================
// Items
// ===========================================================================

/// A grid coordinate in a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CellRef {
    pub x: i32,
    pub z: i32,
}

/// One item on the level roster.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub kind: ItemKind,
    /// Resting position when not in a cell.
    #[serde(default)]
    pub home: Vec3,
    /// Cell the item starts in. Absent means it starts at `home`.
    #[serde(default)]
    pub cell: Option<CellRef>,
    /// Guns only.
    #[serde(default)]
    pub fire_direction: FireDirection,
    /// Guns only.
    #[serde(default)]
    pub muzzle_offset: Vec3,
    /// Guns only: rotation about world Y, in degrees.
    #[serde(default)]
    pub yaw_degrees: f32,
}
