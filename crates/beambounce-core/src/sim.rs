//! Simulation strategy and state types.
//!
//! The simulation is frame-stepped: every state transition happens inside a
//! discrete tick. A [`SimulationStrategy`] decides how many ticks run per
//! `advance()` call; the tick body is the same either way.

use serde::{Deserialize, Serialize};

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Default tick rate. One simulated second is this many ticks.
pub const DEFAULT_TICKS_PER_SECOND: Ticks = 60;

// ---------------------------------------------------------------------------
// Simulation strategy
// ---------------------------------------------------------------------------

/// How the simulation advances time. Chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStrategy {
    /// Single step per call. The host calls `step()` once per frame.
    #[default]
    Tick,

    /// The host calls `advance(dt)` with elapsed ticks; the simulation runs
    /// as many fixed steps as fit and carries the remainder forward.
    Delta {
        /// Duration of one fixed simulation step, in ticks.
        fixed_timestep: Ticks,
    },
}

impl SimulationStrategy {
    /// Number of steps to run for `dt` elapsed ticks given the current
    /// accumulator. Updates the accumulator in place.
    pub fn steps_for(&self, dt: Ticks, accumulator: &mut Ticks) -> u64 {
        match *self {
            SimulationStrategy::Tick => 1,
            SimulationStrategy::Delta { fixed_timestep } => {
                let step_size = fixed_timestep.max(1);
                *accumulator += dt;
                let steps = *accumulator / step_size;
                *accumulator %= step_size;
                steps
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Mutable clock state tracked by the simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimState {
    /// Current tick counter. Incremented by 1 for each simulation step.
    pub tick: Ticks,

    /// Time remainder carried between `advance()` calls in delta mode.
    pub accumulator: Ticks,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }
}
