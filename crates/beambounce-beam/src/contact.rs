//! Per-emitter contact bookkeeping across ticks.
//!
//! A traced path is classified into the connectors it touches and the
//! enemy it hits. [`ConnectorTracker`] turns the per-tick connector set into
//! edge-triggered hit/idle transitions; [`DamageTracker`] turns the per-tick
//! enemy into damage pulses on a fixed tick interval.

use std::collections::BTreeSet;

use beambounce_core::id::EntityId;
use beambounce_core::layer::LayerMask;
use beambounce_core::sim::{DEFAULT_TICKS_PER_SECOND, Ticks};
use serde::{Deserialize, Serialize};

use crate::trace::BeamPath;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Which hit layers count as connectors and which as enemies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactMasks {
    pub connector: LayerMask,
    pub enemy: LayerMask,
}

/// What one traced path is touching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Every connector entity hit anywhere along the path.
    pub connectors: BTreeSet<EntityId>,
    /// The first enemy entity along the path.
    pub enemy: Option<EntityId>,
}

impl Contacts {
    /// Classify the hits of `path`. Hits without an entity are ignored.
    pub fn from_path(path: &BeamPath, masks: &ContactMasks) -> Self {
        let mut contacts = Contacts::default();
        for hit in path.hits() {
            let Some(entity) = hit.entity else { continue };
            if masks.connector.contains(hit.layer) {
                contacts.connectors.insert(entity);
            }
            if contacts.enemy.is_none() && masks.enemy.contains(hit.layer) {
                contacts.enemy = Some(entity);
            }
        }
        contacts
    }
}

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

/// Connector transitions produced by one update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorChanges {
    pub hit: Vec<EntityId>,
    pub idle: Vec<EntityId>,
}

impl ConnectorChanges {
    pub fn is_empty(&self) -> bool {
        self.hit.is_empty() && self.idle.is_empty()
    }
}

/// Remembers which connectors the beam touched last tick.
#[derive(Debug, Clone, Default)]
pub struct ConnectorTracker {
    touching: BTreeSet<EntityId>,
}

impl ConnectorTracker {
    pub fn touching(&self) -> &BTreeSet<EntityId> {
        &self.touching
    }

    /// Replace the touched set with `now` and report what changed.
    pub fn update(&mut self, now: BTreeSet<EntityId>) -> ConnectorChanges {
        let changes = ConnectorChanges {
            hit: now.difference(&self.touching).copied().collect(),
            idle: self.touching.difference(&now).copied().collect(),
        };
        self.touching = now;
        changes
    }

    /// Drop every contact, returning the connectors that go idle.
    pub fn release(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.touching).into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Damage
// ---------------------------------------------------------------------------

/// Damage dealt to enemies in the beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageSettings {
    /// Damage applied per pulse.
    pub amount: u32,
    /// Ticks of continuous contact between recurring pulses. Zero is
    /// treated as one.
    pub interval: Ticks,
}

impl Default for DamageSettings {
    fn default() -> Self {
        Self {
            amount: 10,
            interval: DEFAULT_TICKS_PER_SECOND,
        }
    }
}

/// A damage pulse that is due this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub target: EntityId,
    pub amount: u32,
}

/// Tracks the current enemy and how long the beam has stayed on it.
///
/// First contact with a new target pulses immediately. Staying on the same
/// target pulses again every `interval` ticks. Losing contact or switching
/// targets starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageTracker {
    target: Option<EntityId>,
    elapsed: Ticks,
}

impl DamageTracker {
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Ticks spent on the current target since its last pulse.
    pub fn elapsed(&self) -> Ticks {
        self.elapsed
    }

    /// Advance one tick with `enemy` as this tick's contact.
    pub fn update(&mut self, enemy: Option<EntityId>, settings: &DamageSettings) -> Option<Pulse> {
        let Some(enemy) = enemy else {
            self.reset();
            return None;
        };

        if self.target == Some(enemy) {
            self.elapsed += 1;
            if self.elapsed < settings.interval.max(1) {
                return None;
            }
        } else {
            self.target = Some(enemy);
        }
        self.elapsed = 0;
        Some(Pulse {
            target: enemy,
            amount: settings.amount,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
