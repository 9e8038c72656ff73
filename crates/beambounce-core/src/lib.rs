//! BeamBounce Core -- shared vocabulary for the beam/power simulation.
//!
//! This crate holds the types every other BeamBounce crate speaks: arena
//! keys, layer masks, the ray-query capability the host supplies, item
//! kinds, displayed cell states, the collaborator sinks the simulation
//! reports into, and the typed event bus.
//!
//! # Key Types
//!
//! - [`id::CellId`], [`id::ItemId`], [`id::EmitterId`] -- slotmap keys for
//!   the cell, item, and emitter arenas. [`id::EntityId`] names host-side
//!   entities (enemies, connectors) returned by ray queries.
//! - [`layer::LayerMask`] -- 32-bit physics layer set used for reflection,
//!   ignore, connector, and enemy classification.
//! - [`geometry::RayCaster`] -- "cast a ray and return the nearest
//!   obstruction", the only physics the simulation consumes.
//! - [`sink::DamageSink`] / [`sink::ConnectorSink`] -- what the simulation
//!   pushes into the host.
//! - [`event::EventBus`] -- buffered, subscription-based event delivery.
//! - [`sim::SimulationStrategy`] -- tick vs. delta time advancement.

pub mod event;
pub mod geometry;
pub mod id;
pub mod item;
pub mod layer;
pub mod sim;
pub mod sink;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
