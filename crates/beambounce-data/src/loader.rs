//! Level loading: reads a level file and builds a ready-to-run simulation.
//!
//! Provides format detection (RON/JSON/TOML), deserialization helpers, and
//! the conversion from [`LevelData`] into a [`Simulation`] with every item
//! spawned and its starting placement applied.

use std::path::{Path, PathBuf};

use beambounce_beam::{BeamSettings, ContactMasks, DamageSettings, EmitterConfig};
use beambounce_core::id::ItemId;
use beambounce_core::item::ItemKind;
use beambounce_core::layer::{Layer, LayerMask, MAX_LAYER};
use beambounce_core::sim::Ticks;
use beambounce_grid::{GridLayout, GridPosition, MAX_GRID_SIDE};
use beambounce_sim::{PlacementError, Simulation};
use glam::Quat;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::schema::{BeamData, ItemData, LevelData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during level loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A board side larger than the grid supports.
    #[error("grid {width}x{depth} exceeds the {MAX_GRID_SIDE}-cell side limit")]
    InvalidGrid { width: u32, depth: u32 },

    /// A layer index outside 0..=31.
    #[error("layer {layer} is out of range (max {MAX_LAYER})")]
    InvalidLayer { layer: u8 },

    /// An item starts in a cell the grid does not have.
    #[error("item {item} starts in cell ({x}, {z}) which is not on the grid")]
    UnknownCell { item: usize, x: i32, z: i32 },

    /// An item's starting placement was refused.
    #[error("item {item} could not be placed: {source}")]
    Placement {
        item: usize,
        #[source]
        source: PlacementError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` only labels errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Read a level file.
pub fn load_level(path: &Path) -> Result<LevelData, DataLoadError> {
    let level: LevelData = deserialize_file(path)?;
    info!(
        file = %path.display(),
        name = level.name.as_deref().unwrap_or(""),
        items = level.items.len(),
        "level loaded"
    );
    Ok(level)
}

// ===========================================================================
// Building
// ===========================================================================

/// A simulation built from a level, plus the id each roster entry got.
pub struct BuiltLevel {
    pub simulation: Simulation,
    /// `items[i]` is the id of `LevelData::items[i]`.
    pub items: Vec<ItemId>,
}

/// Convert a list of layer indices into a mask.
pub fn layer_mask(layers: &[u8]) -> Result<LayerMask, DataLoadError> {
    layers
        .iter()
        .map(|&layer| Layer::new(layer).ok_or(DataLoadError::InvalidLayer { layer }))
        .collect::<Result<Vec<_>, _>>()
        .map(LayerMask::from_layers)
}

/// Seconds to whole ticks, at least one.
fn seconds_to_ticks(seconds: f32, ticks_per_second: Ticks) -> Ticks {
    ((seconds.max(0.0) * ticks_per_second as f32).round() as Ticks).max(1)
}

fn emitter_config(
    beam: &BeamData,
    item: &ItemData,
    ticks_per_second: Ticks,
) -> Result<EmitterConfig, DataLoadError> {
    Ok(EmitterConfig {
        fire_direction: item.fire_direction,
        orientation: Quat::from_rotation_y(item.yaw_degrees.to_radians()),
        muzzle_offset: item.muzzle_offset,
        beam: BeamSettings {
            max_reflections: beam.max_reflections,
            max_distance: beam.max_distance,
            reflective: layer_mask(&beam.reflective_layers)?,
            ignore: layer_mask(&beam.ignore_layers)?,
        },
        contacts: ContactMasks {
            connector: layer_mask(&beam.connector_layers)?,
            enemy: layer_mask(&beam.enemy_layers)?,
        },
        damage: DamageSettings {
            amount: beam.damage,
            interval: seconds_to_ticks(beam.damage_interval_seconds, ticks_per_second),
        },
    })
}

/// Build a simulation from level data: lay out the grid, spawn every item,
/// and apply starting placements in roster order.
pub fn build_simulation(level: &LevelData) -> Result<BuiltLevel, DataLoadError> {
    let layout = GridLayout {
        width: level.grid.width,
        depth: level.grid.depth,
        cell_size: level.grid.cell_size,
        spacing: level.grid.spacing,
        origin: level.grid.origin,
        bottom_row_gap: level.grid.bottom_row_gap,
    };
    if !layout.is_within_limits() {
        return Err(DataLoadError::InvalidGrid {
            width: layout.width,
            depth: layout.depth,
        });
    }
    let mut simulation = Simulation::new(layout, level.simulation.strategy);
    let tps = level.simulation.ticks_per_second;

    let mut items = Vec::with_capacity(level.items.len());
    for data in &level.items {
        let id = match data.kind {
            ItemKind::Gun => simulation.spawn_gun(data.home, emitter_config(&level.beam, data, tps)?),
            ItemKind::Energizer | ItemKind::PassiveWeapon | ItemKind::Bouncer => {
                simulation.spawn_item(data.kind, data.home)
            }
        };
        items.push(id);
    }

    for (index, (data, &id)) in level.items.iter().zip(&items).enumerate() {
        let Some(cell_ref) = data.cell else { continue };
        let cell = simulation
            .grid()
            .cell_at(GridPosition::new(cell_ref.x, cell_ref.z))
            .ok_or(DataLoadError::UnknownCell {
                item: index,
                x: cell_ref.x,
                z: cell_ref.z,
            })?;
        simulation
            .place(id, cell)
            .map_err(|source| DataLoadError::Placement {
                item: index,
                source,
            })?;
    }

    debug!(
        cells = simulation.grid().len(),
        items = items.len(),
        "simulation built from level"
    );
    Ok(BuiltLevel { simulation, items })
}
