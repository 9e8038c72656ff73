//! Beam emitter runtime.
//!
//! A [`BeamEmitter`] is the per-gun state that survives across ticks: the
//! requested and active beam flags, the mount position and orientation,
//! the last traced path, and the connector/damage scratch. The grid flips
//! the request through [`BeamEmitter::enable_beam`] and
//! [`BeamEmitter::disable_beam`]; the emitter reads it once per
//! [`BeamEmitter::tick`].

use beambounce_core::geometry::RayCaster;
use beambounce_core::id::EntityId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::contact::{ConnectorTracker, ContactMasks, Contacts, DamageSettings, DamageTracker};
use crate::trace::{BeamPath, BeamSettings, trace_beam};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which local axis the beam leaves along.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireDirection {
    /// Local +Z.
    #[default]
    Forward,
    /// Local +Y.
    Up,
    /// Local +X.
    Right,
    /// Straight at a world point.
    ToTarget(Vec3),
}

impl FireDirection {
    /// World-space unit direction for an emitter firing from `origin` with
    /// `orientation`. A target at the origin falls back to forward.
    pub fn resolve(&self, orientation: Quat, origin: Vec3) -> Vec3 {
        match *self {
            FireDirection::Forward => orientation * Vec3::Z,
            FireDirection::Up => orientation * Vec3::Y,
            FireDirection::Right => orientation * Vec3::X,
            FireDirection::ToTarget(target) => {
                let to = target - origin;
                if to.length_squared() <= f32::EPSILON {
                    orientation * Vec3::Z
                } else {
                    to.normalize()
                }
            }
        }
    }
}

/// Everything that shapes an emitter's beam.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub fire_direction: FireDirection,
    pub orientation: Quat,
    /// Fire point relative to the mount position, in local space.
    pub muzzle_offset: Vec3,
    pub beam: BeamSettings,
    pub contacts: ContactMasks,
    pub damage: DamageSettings,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Something an emitter tick produced for its owner to forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamEvent {
    Enabled,
    Disabled,
    ConnectorHit(EntityId),
    ConnectorIdle(EntityId),
    EnemyDamaged { enemy: EntityId, amount: u32 },
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BeamEmitter {
    config: EmitterConfig,
    position: Vec3,
    requested: bool,
    active: bool,
    path: Option<BeamPath>,
    connectors: ConnectorTracker,
    damage: DamageTracker,
}

impl BeamEmitter {
    /// A disabled emitter mounted at `position`.
    pub fn new(config: EmitterConfig, position: Vec3) -> Self {
        Self {
            config,
            position,
            requested: false,
            active: false,
            path: None,
            connectors: ConnectorTracker::default(),
            damage: DamageTracker::default(),
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    // -- Beam signal --

    /// Request the beam on. Takes effect on the next tick. Idempotent.
    pub fn enable_beam(&mut self) {
        self.requested = true;
    }

    /// Request the beam off. Damage scratch resets now; connectors are
    /// released on the next tick. Idempotent.
    pub fn disable_beam(&mut self) {
        self.requested = false;
        self.damage.reset();
    }

    /// Route a gate signal to [`Self::enable_beam`] or [`Self::disable_beam`].
    pub fn set_beam(&mut self, enabled: bool) {
        if enabled {
            self.enable_beam();
        } else {
            self.disable_beam();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Whether the beam was live as of the last tick.
    pub fn is_active(&self) -> bool {
        self.active
    }

    // -- Mounting --

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.config.orientation = orientation;
    }

    pub fn set_fire_direction(&mut self, fire_direction: FireDirection) {
        self.config.fire_direction = fire_direction;
    }

    /// World-space point the beam starts from.
    pub fn fire_origin(&self) -> Vec3 {
        self.position + self.config.orientation * self.config.muzzle_offset
    }

    /// World-space unit direction the beam leaves in.
    pub fn direction(&self) -> Vec3 {
        self.config
            .fire_direction
            .resolve(self.config.orientation, self.fire_origin())
    }

    // -- Observation --

    /// The path traced on the last active tick. `None` while disabled.
    pub fn path(&self) -> Option<&BeamPath> {
        self.path.as_ref()
    }

    pub fn touching(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.connectors.touching().iter().copied()
    }

    pub fn damage_target(&self) -> Option<EntityId> {
        self.damage.target()
    }

    // -- Tick --

    /// Sync the beam signal, then trace and update contacts if active.
    pub fn tick<C>(&mut self, caster: &C) -> Vec<BeamEvent>
    where
        C: RayCaster + ?Sized,
    {
        let mut events = Vec::new();

        if self.requested && !self.active {
            self.active = true;
            debug!(origin = ?self.fire_origin(), "beam enabled");
            events.push(BeamEvent::Enabled);
        } else if !self.requested && self.active {
            self.active = false;
            self.path = None;
            self.damage.reset();
            debug!(origin = ?self.fire_origin(), "beam disabled");
            events.push(BeamEvent::Disabled);
            events.extend(self.connectors.release().into_iter().map(BeamEvent::ConnectorIdle));
        }

        if !self.active {
            return events;
        }

        let path = trace_beam(self.fire_origin(), self.direction(), &self.config.beam, caster);
        let contacts = Contacts::from_path(&path, &self.config.contacts);
        self.path = Some(path);

        let changes = self.connectors.update(contacts.connectors);
        for &connector in &changes.hit {
            trace!(?connector, "connector hit");
            events.push(BeamEvent::ConnectorHit(connector));
        }
        for &connector in &changes.idle {
            trace!(?connector, "connector idle");
            events.push(BeamEvent::ConnectorIdle(connector));
        }

        if let Some(pulse) = self.damage.update(contacts.enemy, &self.config.damage) {
            trace!(enemy = ?pulse.target, amount = pulse.amount, "damage pulse");
            events.push(BeamEvent::EnemyDamaged {
                enemy: pulse.target,
                amount: pulse.amount,
            });
        }

        events
    }
}
