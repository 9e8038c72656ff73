//! Reflecting beam tracer.
//!
//! [`trace_beam`] walks a beam from its fire point through up to
//! `max_reflections` ray queries. Each query either misses (the beam
//! extends to full range and stops), hits a reflective layer (the beam
//! bounces and continues), or hits anything else (the beam is absorbed at
//! the hit point). Layers in the ignore mask are removed from the query
//! mask, so the tracer never observes them.

use beambounce_core::geometry::{RayCaster, RayHit, reflect};
use beambounce_core::layer::LayerMask;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How far past a reflection point the next query starts, along the
/// reflected direction, so it does not re-hit the same surface.
pub const REFLECTION_OFFSET: f32 = 0.01;

pub const DEFAULT_MAX_REFLECTIONS: u32 = 5;
pub const DEFAULT_MAX_DISTANCE: f32 = 100.0;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Tracing parameters for one emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamSettings {
    /// Maximum number of ray queries per trace. The path never holds more
    /// than `max_reflections + 1` points.
    pub max_reflections: u32,
    /// Range of each individual query.
    pub max_distance: f32,
    /// Hits on these layers bounce the beam.
    pub reflective: LayerMask,
    /// These layers are transparent to the beam.
    pub ignore: LayerMask,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            max_reflections: DEFAULT_MAX_REFLECTIONS,
            max_distance: DEFAULT_MAX_DISTANCE,
            reflective: LayerMask::NONE,
            ignore: LayerMask::NONE,
        }
    }
}

impl BeamSettings {
    /// The mask passed to every ray query.
    pub fn collision_mask(&self) -> LayerMask {
        !self.ignore
    }
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// Why a trace stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terminal {
    /// The last query found nothing; the final point is at full range.
    Miss,
    /// The beam stopped on a non-reflective hit.
    Absorbed(RayHit),
    /// No queries left to spend, or no direction to travel in. The final
    /// point is the last reflection (or the origin).
    Exhausted,
}

/// The geometry of one trace: ordered points from the fire origin to the
/// terminus, plus every hit that produced a point.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamPath {
    pub(crate) points: Vec<Vec3>,
    pub(crate) hits: Vec<RayHit>,
    pub(crate) terminal: Terminal,
}

impl BeamPath {
    fn start(origin: Vec3) -> Self {
        Self {
            points: vec![origin],
            hits: Vec::new(),
            terminal: Terminal::Exhausted,
        }
    }

    /// Points in travel order. Never empty; the first is the fire origin.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Every obstruction the beam touched, in travel order.
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    pub fn origin(&self) -> Vec3 {
        self.points[0]
    }

    pub fn terminus(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// The hit the beam ended on, if it ended on one.
    pub fn terminal_hit(&self) -> Option<RayHit> {
        match self.terminal {
            Terminal::Miss => None,
            Terminal::Absorbed(hit) => Some(hit),
            Terminal::Exhausted => self.hits.last().copied(),
        }
    }

    /// Number of reflections along the path.
    pub fn bounces(&self) -> usize {
        match self.terminal {
            Terminal::Absorbed(_) => self.hits.len() - 1,
            Terminal::Miss | Terminal::Exhausted => self.hits.len(),
        }
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Total travelled length.
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Trace a beam from `origin` along `direction`.
///
/// `direction` need not be normalized. A zero direction, a zero bounce
/// budget or a non-positive range yield a single-point path at `origin`.
/// Never fails.
pub fn trace_beam<C>(origin: Vec3, direction: Vec3, settings: &BeamSettings, caster: &C) -> BeamPath
where
    C: RayCaster + ?Sized,
{
    let mut path = BeamPath::start(origin);
    let mut dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO || settings.max_distance.is_nan() || settings.max_distance <= 0.0 {
        return path;
    }

    let mask = settings.collision_mask();
    let mut current = origin;
    for _ in 0..settings.max_reflections {
        let Some(hit) = caster.cast(current, dir, settings.max_distance, mask) else {
            path.points.push(current + dir * settings.max_distance);
            path.terminal = Terminal::Miss;
            break;
        };

        path.points.push(hit.point);
        path.hits.push(hit);
        if !settings.reflective.contains(hit.layer) {
            path.terminal = Terminal::Absorbed(hit);
            break;
        }

        dir = reflect(dir, hit.normal).normalize_or_zero();
        current = hit.point + dir * REFLECTION_OFFSET;
    }

    trace!(
        points = path.points.len(),
        bounces = path.bounces(),
        terminal = ?path.terminal,
        "beam traced"
    );
    path
}
