use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::rng::Rng;

/// Where a run ended up. `Running` is only observable between steps; the
/// other three are terminal and reported as values, never as errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Fixed point: the board came out of a step identical to how it went in.
    Stalled,
    /// Every cell dead.
    Extinct,
    /// Turn budget spent without reaching a fixed point or extinction.
    Exhausted,
}

impl Status {
    pub fn name(self) -> &'static str {
        match self {
            Status::Running => "running",
            Status::Stalled => "stalled",
            Status::Extinct => "extinct",
            Status::Exhausted => "exhausted",
        }
    }
}

/// Game-of-Life automaton over a bounded board. Owns its `Grid` exclusively;
/// each generation is computed from an unmodified snapshot of the previous
/// one and swapped in wholesale, so no partial generation is ever visible.
#[derive(Debug)]
pub struct Simulator {
    grid: Grid,
    max_turns: usize,
    turns_run: usize,
    status: Status,
}

impl Simulator {
    /// Validates the configuration before any board is allocated.
    pub fn new(size: usize, initial_alive: usize, max_turns: usize, rng: &mut Rng) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfiguration(
                "board size must be positive".into(),
            ));
        }
        if initial_alive > size * size {
            return Err(Error::InvalidConfiguration(format!(
                "{} initial alive cells exceed the {} positions of a {}x{} board",
                initial_alive,
                size * size,
                size,
                size
            )));
        }
        let mut grid = Grid::new(size)?;
        grid.random_init(rng, initial_alive)?;
        Ok(Self {
            grid,
            max_turns,
            turns_run: 0,
            status: Status::Running,
        })
    }

    /// Start from an explicit board instead of a random one. Used by tests
    /// and by callers replaying known patterns.
    pub fn from_grid(grid: Grid, max_turns: usize) -> Self {
        Self {
            grid,
            max_turns,
            turns_run: 0,
            status: Status::Running,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn turns_run(&self) -> usize {
        self.turns_run
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Transition rule, per cell, reading only the previous generation:
    /// alive with 2 or 3 neighbors survives, dead with exactly 3 is born,
    /// everything else is dead next turn.
    #[inline]
    fn next_state(alive: u8, neighbors: u8) -> u8 {
        match (alive, neighbors) {
            (1, 2 | 3) => 1,
            (0, 3) => 1,
            _ => 0,
        }
    }

    /// Advance one generation and return the board as it was before the step.
    fn step_swap(&mut self) -> Vec<u8> {
        let size = self.grid.size();
        let mut next = vec![0u8; size * size];
        for row in 0..size {
            for col in 0..size {
                let alive = self.grid.cells()[row * size + col];
                let neighbors = self.grid.neighbor_count(row, col);
                next[row * size + col] = Self::next_state(alive, neighbors);
            }
        }
        let prev = self.grid.cells().to_vec();
        self.grid.replace_cells(next);
        self.turns_run += 1;
        prev
    }

    /// Advance exactly one generation.
    pub fn step(&mut self) {
        let _ = self.step_swap();
    }

    /// Run to a terminal status, invoking `observer` with each new
    /// generation's board and the turn number. The observer sees the board
    /// read-only and is also given the initial board as turn 0.
    pub fn run_with<F>(&mut self, mut observer: F) -> Status
    where
        F: FnMut(&Grid, usize),
    {
        if self.status != Status::Running {
            return self.status;
        }
        observer(&self.grid, 0);
        loop {
            if self.turns_run == self.max_turns {
                self.status = Status::Exhausted;
                break;
            }
            let prev = self.step_swap();
            observer(&self.grid, self.turns_run);
            if self.grid.sum() == 0 {
                self.status = Status::Extinct;
                break;
            }
            if self.grid.cells() == &prev[..] {
                self.status = Status::Stalled;
                break;
            }
        }
        self.status
    }

    /// Run to a terminal status without observing intermediate generations.
    pub fn run(&mut self) -> Status {
        self.run_with(|_, _| {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> Grid {
        let mut g = Grid::new(rows.len()).unwrap();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == 'o' {
                    g.set_value(r, c, 1).unwrap();
                }
            }
        }
        g
    }

    #[test]
    fn oversubscribed_board_is_rejected() {
        let mut rng = Rng::new(1);
        let err = Simulator::new(5, 30, 10, &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn lone_cell_goes_extinct_in_one_step() {
        let grid = grid_from(&["...", ".o.", "..."]);
        let mut sim = Simulator::from_grid(grid, 10);
        let status = sim.run();
        assert_eq!(status, Status::Extinct);
        assert_eq!(sim.turns_run(), 1);
        assert_eq!(sim.grid().sum(), 0);
    }

    #[test]
    fn block_stalls_after_one_step() {
        let grid = grid_from(&["....", ".oo.", ".oo.", "...."]);
        let expected = grid.clone();
        let mut sim = Simulator::from_grid(grid, 5);
        let status = sim.run();
        assert_eq!(status, Status::Stalled);
        assert_eq!(sim.turns_run(), 1);
        assert_eq!(*sim.grid(), expected);
    }

    #[test]
    fn extinction_beats_turn_budget() {
        // A bar collapses to its center cell, which then dies alone.
        let grid = grid_from(&[".....", ".....", ".ooo.", ".....", "....."]);
        let mut sim = Simulator::from_grid(grid, 100);
        assert_eq!(sim.run(), Status::Extinct);
        assert_eq!(sim.turns_run(), 2);
    }

    #[test]
    fn zero_budget_exhausts_immediately() {
        let grid = grid_from(&["oo", "oo"]);
        let mut sim = Simulator::from_grid(grid, 0);
        assert_eq!(sim.run(), Status::Exhausted);
        assert_eq!(sim.turns_run(), 0);
        assert_eq!(sim.grid().sum(), 4);
    }

    #[test]
    fn budget_cuts_off_a_changing_board() {
        let grid = grid_from(&[".....", ".....", ".ooo.", ".....", "....."]);
        let mut sim = Simulator::from_grid(grid, 1);
        assert_eq!(sim.run(), Status::Exhausted);
        assert_eq!(sim.turns_run(), 1);
        // One survivor: the center cell kept exactly two neighbors.
        assert_eq!(sim.grid().sum(), 1);
        assert_eq!(sim.grid().get_value(2, 2).unwrap(), 1);
    }

    #[test]
    fn terminated_run_does_not_restart() {
        let grid = grid_from(&["...", ".o.", "..."]);
        let mut sim = Simulator::from_grid(grid, 10);
        assert_eq!(sim.run(), Status::Extinct);
        let turns = sim.turns_run();
        assert_eq!(sim.run(), Status::Extinct);
        assert_eq!(sim.turns_run(), turns);
    }

    #[test]
    fn observer_sees_every_generation() {
        let grid = grid_from(&[".....", ".....", ".ooo.", ".....", "....."]);
        let mut sim = Simulator::from_grid(grid, 100);
        let mut turns = Vec::new();
        sim.run_with(|g, turn| {
            assert_eq!(g.size(), 5);
            turns.push(turn);
        });
        assert_eq!(turns, vec![0, 1, 2]);
    }

    #[test]
    fn step_counts_neighbors_from_the_old_generation() {
        // Row-major in-place updating would kill the left cell first and
        // then see only one neighbor at the center; the snapshot keeps the
        // center alive with two.
        let grid = grid_from(&[".....", ".....", ".ooo.", ".....", "....."]);
        let mut sim = Simulator::from_grid(grid, 10);
        sim.step();
        assert_eq!(sim.grid().get_value(2, 2).unwrap(), 1);
        assert_eq!(sim.grid().sum(), 1);
    }
}
