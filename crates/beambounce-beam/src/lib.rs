//! Beam tracing for BeamBounce.
//!
//! Emitters project a beam that reflects off surfaces on reflective layers
//! and stops on anything else. Each tick an active emitter re-traces its
//! whole path, then updates connector contacts and enemy damage from what
//! the path touched.
//!
//! # Design
//!
//! - [`trace::trace_beam`] is a pure function of origin, direction,
//!   [`trace::BeamSettings`] and a [`RayCaster`]. It never fails; odd
//!   inputs give a degenerate single-point path.
//! - [`emitter::BeamEmitter`] owns the state that must survive across ticks:
//!   requested/active beam flags, the last path, touched connectors and the
//!   damage timer.
//! - Connector notifications are edge-triggered; damage pulses on first
//!   contact and then once per interval of continuous contact.
//! - [`scene::Scene`] is a reference [`RayCaster`] over boxes and spheres.
//!
//! [`RayCaster`]: beambounce_core::geometry::RayCaster

pub mod contact;
pub mod emitter;
pub mod scene;
pub mod trace;

pub use contact::{ContactMasks, Contacts, DamageSettings};
pub use emitter::{BeamEmitter, BeamEvent, EmitterConfig, FireDirection};
pub use scene::{Collider, ColliderId, Scene, Shape};
pub use trace::{BeamPath, BeamSettings, REFLECTION_OFFSET, Terminal, trace_beam};
