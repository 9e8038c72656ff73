//! The simulation engine: owns the grid, the items, the beam emitters and
//! the event bus, and runs the per-tick beam pipeline.
//!
//! # Architecture
//!
//! The `Simulation` owns:
//! - A [`PowerGrid`] (cells, occupancy, energize state)
//! - A [`PlacementController`] (item arena, drag state)
//! - One [`BeamEmitter`] per gun, keyed by [`EmitterId`]
//! - A [`SimState`] (tick counter, accumulator) and [`SimulationStrategy`]
//! - An [`EventBus`] for typed simulation events
//!
//! Placement calls run immediately and route the grid's beam signals to the
//! matching emitters. Their events are buffered and delivered with the next
//! step.
//!
//! # Pipeline
//!
//! Each `step()` runs:
//! 1. **Beams** -- every emitter syncs its signal, re-traces if active, and
//!    updates connector and damage contacts
//! 2. **Sinks** -- damage pulses and connector transitions go to the host
//! 3. **Post-tick** -- deliver buffered events to subscribers
//! 4. **Bookkeeping** -- advance the tick counter

use beambounce_beam::{BeamEmitter, BeamEvent, BeamPath, EmitterConfig};
use beambounce_core::event::{Event, EventBus, EventKind, PassiveListener};
use beambounce_core::geometry::RayCaster;
use beambounce_core::id::{CellId, EmitterId, ItemId};
use beambounce_core::item::ItemKind;
use beambounce_core::sim::{SimState, SimulationStrategy, Ticks};
use beambounce_core::sink::{ConnectorSink, DamageSink};
use beambounce_grid::{GridEvent, GridLayout, PowerGrid};
use glam::Vec3;
use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, warn};

use crate::placement::{DropOutcome, PlacementController, PlacementError};

// ---------------------------------------------------------------------------
// Advance result
// ---------------------------------------------------------------------------

/// What one `advance()`/`step()` call did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvanceResult {
    pub steps_run: u64,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub struct Simulation {
    grid: PowerGrid,
    placement: PlacementController,
    emitters: SlotMap<EmitterId, BeamEmitter>,
    emitter_of: SecondaryMap<ItemId, EmitterId>,
    item_of: SecondaryMap<EmitterId, ItemId>,
    event_bus: EventBus,
    sim_state: SimState,
    strategy: SimulationStrategy,
    paused: bool,
}

impl Simulation {
    pub fn new(layout: GridLayout, strategy: SimulationStrategy) -> Self {
        Self {
            grid: PowerGrid::new(layout),
            placement: PlacementController::new(),
            emitters: SlotMap::with_key(),
            emitter_of: SecondaryMap::new(),
            item_of: SecondaryMap::new(),
            event_bus: EventBus::default(),
            sim_state: SimState::new(),
            strategy,
            paused: false,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn grid(&self) -> &PowerGrid {
        &self.grid
    }

    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    pub fn sim_state(&self) -> &SimState {
        &self.sim_state
    }

    pub fn tick(&self) -> Ticks {
        self.sim_state.tick
    }

    pub fn strategy(&self) -> SimulationStrategy {
        self.strategy
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // -----------------------------------------------------------------------
    // Items and emitters
    // -----------------------------------------------------------------------

    /// Spawn an unplaced item. Guns get an emitter with default settings.
    pub fn spawn_item(&mut self, kind: ItemKind, home: Vec3) -> ItemId {
        match kind {
            ItemKind::Gun => self.spawn_gun(home, EmitterConfig::default()),
            ItemKind::Energizer | ItemKind::PassiveWeapon | ItemKind::Bouncer => {
                self.placement.spawn(kind, home)
            }
        }
    }

    /// Spawn an unplaced gun with its own emitter configuration.
    pub fn spawn_gun(&mut self, home: Vec3, config: EmitterConfig) -> ItemId {
        let item = self.placement.spawn(ItemKind::Gun, home);
        let emitter = self.emitters.insert(BeamEmitter::new(config, home));
        self.emitter_of.insert(item, emitter);
        self.item_of.insert(emitter, item);
        item
    }

    pub fn emitter_for(&self, item: ItemId) -> Option<EmitterId> {
        self.emitter_of.get(item).copied()
    }

    pub fn item_for(&self, emitter: EmitterId) -> Option<ItemId> {
        self.item_of.get(emitter).copied()
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&BeamEmitter> {
        self.emitters.get(id)
    }

    /// Mutable emitter access for aiming (orientation, fire direction).
    pub fn emitter_mut(&mut self, id: EmitterId) -> Option<&mut BeamEmitter> {
        self.emitters.get_mut(id)
    }

    pub fn emitters(&self) -> impl Iterator<Item = (EmitterId, &BeamEmitter)> {
        self.emitters.iter()
    }

    /// The beam path an emitter traced last tick, if its beam is live.
    pub fn beam_path(&self, id: EmitterId) -> Option<&BeamPath> {
        self.emitters.get(id).and_then(BeamEmitter::path)
    }

    /// Every live beam path, for drawing.
    pub fn beam_paths(&self) -> impl Iterator<Item = (EmitterId, &BeamPath)> {
        self.emitters
            .iter()
            .filter_map(|(id, e)| e.path().map(|p| (id, p)))
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Put a resting item directly into a cell.
    pub fn place(&mut self, item: ItemId, cell: CellId) -> Result<(), PlacementError> {
        let events = self.placement.place(&mut self.grid, item, cell)?;
        self.emit_placed(item, cell);
        self.apply_grid_events(events);
        Ok(())
    }

    pub fn pick_up(&mut self, item: ItemId) -> Result<(), PlacementError> {
        let was_dragging = self.placement.item(item).is_some_and(|i| i.is_dragging());
        let report = self.placement.pick_up(&mut self.grid, item)?;
        if was_dragging {
            return Ok(());
        }

        let tick = self.sim_state.tick;
        let kind = self.placement.item(item).map(|i| i.kind());
        if let (Some(cell), Some(kind)) = (report.from, kind) {
            self.event_bus.emit(Event::ItemRemoved {
                item,
                cell,
                kind,
                tick,
            });
        }
        self.apply_grid_events(report.events);
        self.event_bus.emit(Event::DragStarted { item, tick });
        Ok(())
    }

    pub fn try_drop(&mut self, item: ItemId, target: Option<CellId>) -> Result<DropOutcome, PlacementError> {
        let report = self.placement.try_drop(&mut self.grid, item, target)?;
        let tick = self.sim_state.tick;

        if let Some(cell) = target.filter(|_| report.outcome.was_rejected()) {
            self.event_bus.emit(Event::PlacementRejected { item, cell, tick });
        }
        match report.outcome {
            DropOutcome::Placed(cell) | DropOutcome::Returned(cell) => self.emit_placed(item, cell),
            DropOutcome::Home(home) => {
                if let Some(emitter) = self.emitter_of.get(item).copied() {
                    self.emitters[emitter].set_position(home);
                }
            }
        }
        self.apply_grid_events(report.events);
        self.event_bus.emit(Event::DragEnded { item, tick });
        Ok(report.outcome)
    }

    /// Move the drag highlight to `cell` (or clear it with `None`).
    pub fn hover(&mut self, cell: Option<CellId>) -> Result<(), PlacementError> {
        let events = self.placement.hover(&mut self.grid, cell)?;
        self.apply_grid_events(events);
        Ok(())
    }

    fn emit_placed(&mut self, item: ItemId, cell: CellId) {
        let Some(kind) = self.placement.item(item).map(|i| i.kind()) else {
            return;
        };
        if let (Some(emitter), Some(c)) = (self.emitter_of.get(item).copied(), self.grid.cell(cell)) {
            self.emitters[emitter].set_position(c.world_position());
        }
        self.event_bus.emit(Event::ItemPlaced {
            item,
            cell,
            kind,
            tick: self.sim_state.tick,
        });
    }

    /// Forward grid state changes to the bus and beam signals to emitters.
    fn apply_grid_events(&mut self, events: Vec<GridEvent>) {
        let tick = self.sim_state.tick;
        for event in events {
            match event {
                GridEvent::CellStateChanged { cell, from, to } => {
                    self.event_bus.emit(Event::CellStateChanged {
                        cell,
                        from,
                        to,
                        tick,
                    });
                }
                GridEvent::BeamSignal { item, enabled } => match self.emitter_of.get(item) {
                    Some(&emitter) => self.emitters[emitter].set_beam(enabled),
                    None => warn!(?item, "beam signal for an item with no emitter"),
                },
            }
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Pause the simulation. While paused, `advance()` and `step()` are no-ops.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // -----------------------------------------------------------------------
    // Event system
    // -----------------------------------------------------------------------

    /// Suppress an event kind. Suppressed events are never buffered.
    pub fn suppress_event(&mut self, kind: EventKind) {
        self.event_bus.suppress(kind);
    }

    pub fn on_passive(&mut self, kind: EventKind, listener: PassiveListener) {
        self.event_bus.on_passive(kind, listener);
    }

    // -----------------------------------------------------------------------
    // Advance
    // -----------------------------------------------------------------------

    /// Advance the simulation according to the configured strategy.
    ///
    /// - **Tick mode**: `dt` is ignored; exactly one step runs.
    /// - **Delta mode**: `dt` is accumulated; as many fixed steps run as fit.
    pub fn advance<C, S>(&mut self, dt: Ticks, caster: &C, sinks: &mut S) -> AdvanceResult
    where
        C: RayCaster + ?Sized,
        S: DamageSink + ConnectorSink + ?Sized,
    {
        if self.paused {
            return AdvanceResult::default();
        }
        let mut result = AdvanceResult::default();
        let steps = self.strategy.steps_for(dt, &mut self.sim_state.accumulator);
        for _ in 0..steps {
            self.step_internal(caster, sinks, &mut result);
        }
        result
    }

    /// Run a single simulation step (convenience for tick mode).
    ///
    /// Equivalent to `advance(0, ..)`, so in delta mode it runs no steps and
    /// leaves the tick unchanged. Use [`advance`](Self::advance) there.
    pub fn step<C, S>(&mut self, caster: &C, sinks: &mut S) -> AdvanceResult
    where
        C: RayCaster + ?Sized,
        S: DamageSink + ConnectorSink + ?Sized,
    {
        self.advance(0, caster, sinks)
    }

    fn step_internal<C, S>(&mut self, caster: &C, sinks: &mut S, result: &mut AdvanceResult)
    where
        C: RayCaster + ?Sized,
        S: DamageSink + ConnectorSink + ?Sized,
    {
        self.phase_beams(caster, sinks);
        self.event_bus.deliver();
        self.sim_state.tick += 1;
        result.steps_run += 1;
    }

    fn phase_beams<C, S>(&mut self, caster: &C, sinks: &mut S)
    where
        C: RayCaster + ?Sized,
        S: DamageSink + ConnectorSink + ?Sized,
    {
        let tick = self.sim_state.tick;
        for (emitter, beam) in self.emitters.iter_mut() {
            for event in beam.tick(caster) {
                let out = match event {
                    BeamEvent::Enabled => Event::BeamEnabled { emitter, tick },
                    BeamEvent::Disabled => Event::BeamDisabled { emitter, tick },
                    BeamEvent::ConnectorHit(connector) => {
                        sinks.on_hit(connector);
                        Event::ConnectorHit {
                            emitter,
                            connector,
                            tick,
                        }
                    }
                    BeamEvent::ConnectorIdle(connector) => {
                        sinks.on_idle(connector);
                        Event::ConnectorIdle {
                            emitter,
                            connector,
                            tick,
                        }
                    }
                    BeamEvent::EnemyDamaged { enemy, amount } => {
                        debug!(?emitter, ?enemy, amount, "enemy damaged");
                        sinks.apply_damage(enemy, amount);
                        Event::EnemyDamaged {
                            emitter,
                            enemy,
                            amount,
                            tick,
                        }
                    }
                };
                self.event_bus.emit(out);
            }
        }
    }
}
