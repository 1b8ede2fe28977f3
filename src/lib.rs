pub mod config;
pub mod error;
pub mod euler;
pub mod ffl;
pub mod grid;
pub mod hiv;
pub mod life;
pub mod motifs;
pub mod phase;
pub mod render;
pub mod rng;
pub mod special;

use std::time::Instant;

pub use error::{Error, Result};
use grid::Grid;
use life::{Simulator, Status};
use rng::Rng;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Everything the CLI and server need from a finished automaton run.
pub struct LifeOutcome {
    pub status: Status,
    pub turns_run: usize,
    pub initial: Grid,
    pub final_grid: Grid,
    /// Alive-cell count per generation, starting at generation 0.
    pub population: Vec<usize>,
}

/// Seed, build and run the automaton to a terminal status.
pub fn run_life(
    seed: u64,
    size: usize,
    begin_alive: usize,
    turns: usize,
) -> Result<(LifeOutcome, Vec<Timing>)> {
    let mut timings = Vec::new();

    let t = Instant::now();
    let mut rng = Rng::new(seed);
    let mut sim = Simulator::new(size, begin_alive, turns, &mut rng)?;
    let initial = sim.grid().clone();
    timings.push(Timing {
        name: "init",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    let mut population = Vec::new();
    let status = sim.run_with(|grid, _turn| {
        population.push(grid.sum());
    });
    timings.push(Timing {
        name: "run",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let outcome = LifeOutcome {
        status,
        turns_run: sim.turns_run(),
        final_grid: sim.grid().clone(),
        initial,
        population,
    };
    Ok((outcome, timings))
}
