//! Shared test helpers for unit tests, integration tests and headless runs.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::geometry::{RayHit, Vec3};
use crate::id::EntityId;
use crate::layer::{Layer, LayerMask};
use crate::sink::{ConnectorSink, DamageSink};

// ===========================================================================
// Recording sinks
// ===========================================================================

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    Damage { target: EntityId, amount: u32 },
    ConnectorHit(EntityId),
    ConnectorIdle(EntityId),
}

/// Records every damage pulse and connector notification in arrival order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total damage applied to `target`.
    pub fn damage_to(&self, target: EntityId) -> u32 {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Damage { target: t, amount } if *t == target => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Number of damage pulses applied to `target`.
    pub fn pulses_to(&self, target: EntityId) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::Damage { target: t, .. } if *t == target))
            .count()
    }

    pub fn hits(&self, connector: EntityId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == SinkCall::ConnectorHit(connector))
            .count()
    }

    pub fn idles(&self, connector: EntityId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == SinkCall::ConnectorIdle(connector))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DamageSink for RecordingSink {
    fn apply_damage(&mut self, target: EntityId, amount: u32) {
        self.calls.push(SinkCall::Damage { target, amount });
    }
}

impl ConnectorSink for RecordingSink {
    fn on_hit(&mut self, connector: EntityId) {
        self.calls.push(SinkCall::ConnectorHit(connector));
    }

    fn on_idle(&mut self, connector: EntityId) {
        self.calls.push(SinkCall::ConnectorIdle(connector));
    }
}

// ===========================================================================
// Layers and casters
// ===========================================================================

pub fn layer(index: u8) -> Layer {
    Layer::new(index).expect("test layer index out of range")
}

pub fn mask(indices: &[u8]) -> LayerMask {
    LayerMask::from_layers(indices.iter().map(|&i| layer(i)))
}

/// A caster that never hits anything.
pub fn empty_caster() -> impl Fn(Vec3, Vec3, f32, LayerMask) -> Option<RayHit> {
    |_, _, _, _| None
}

/// A caster for an infinite mirror plane `dot(p - point, normal) = 0` on
/// `layer`. Only hits when the ray travels against the normal.
pub fn plane_caster(
    point: Vec3,
    normal: Vec3,
    layer: Layer,
    entity: Option<EntityId>,
) -> impl Fn(Vec3, Vec3, f32, LayerMask) -> Option<RayHit> {
    let normal = normal.normalize();
    move |origin, dir, max, mask| {
        if !mask.contains(layer) {
            return None;
        }
        let denom = dir.dot(normal);
        if denom >= 0.0 {
            return None;
        }
        let t = (point - origin).dot(normal) / denom;
        (t >= 0.0 && t <= max).then(|| RayHit {
            point: origin + dir * t,
            normal,
            layer,
            entity,
        })
    }
}
