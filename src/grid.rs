use crate::error::{Error, Result};
use crate::rng::Rng;

/// Square binary board, row-major flat storage. No per-cell objects.
/// Bounded topology: edges are hard borders, nothing wraps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfiguration(
                "board size must be positive".into(),
            ));
        }
        Ok(Self {
            cells: vec![0; size * size],
            size,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }

    pub fn get_value(&self, row: usize, col: usize) -> Result<u8> {
        if row >= self.size || col >= self.size {
            return Err(Error::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        Ok(self.cells[row * self.size + col])
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        if row >= self.size || col >= self.size {
            return Err(Error::OutOfRange {
                row,
                col,
                size: self.size,
            });
        }
        if value > 1 {
            return Err(Error::InvalidValue(value));
        }
        self.cells[row * self.size + col] = value;
        Ok(())
    }

    /// Clear the board, then turn on exactly `num_alive` cells chosen
    /// uniformly without replacement among all `size * size` positions.
    pub fn random_init(&mut self, rng: &mut Rng, num_alive: usize) -> Result<()> {
        let total = self.size * self.size;
        if num_alive > total {
            return Err(Error::InvalidConfiguration(format!(
                "{} alive cells requested but the board only has {} positions",
                num_alive, total
            )));
        }
        self.cells.fill(0);
        for i in rng.sample_distinct(total, num_alive) {
            self.cells[i] = 1;
        }
        Ok(())
    }

    /// Alive cells among the orthogonal neighbors that exist. Cells past an
    /// edge contribute nothing, so the result is always in 0..=4.
    #[inline]
    pub fn neighbor_count(&self, row: usize, col: usize) -> u8 {
        debug_assert!(row < self.size && col < self.size);
        let mut count = 0;
        if row > 0 {
            count += self.cells[self.idx(row - 1, col)];
        }
        if row < self.size - 1 {
            count += self.cells[self.idx(row + 1, col)];
        }
        if col > 0 {
            count += self.cells[self.idx(row, col - 1)];
        }
        if col < self.size - 1 {
            count += self.cells[self.idx(row, col + 1)];
        }
        count
    }

    /// Total alive cells.
    pub fn sum(&self) -> usize {
        self.cells.iter().map(|&c| c as usize).sum()
    }

    /// Read-only view of the whole board for rendering.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Replace the whole board in one move. `next` must have matching
    /// dimensions; used by the simulator's generation swap.
    pub(crate) fn replace_cells(&mut self, next: Vec<u8>) {
        debug_assert_eq!(next.len(), self.cells.len());
        self.cells = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            Grid::new(0),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn get_set_bounds_and_values() {
        let mut g = Grid::new(3).unwrap();
        g.set_value(2, 1, 1).unwrap();
        assert_eq!(g.get_value(2, 1).unwrap(), 1);
        assert!(matches!(
            g.get_value(3, 0),
            Err(Error::OutOfRange { row: 3, col: 0, size: 3 })
        ));
        assert!(matches!(
            g.set_value(0, 3, 1),
            Err(Error::OutOfRange { .. })
        ));
        assert!(matches!(g.set_value(0, 0, 2), Err(Error::InvalidValue(2))));
    }

    #[test]
    fn random_init_hits_exact_count() {
        let mut g = Grid::new(10).unwrap();
        let mut rng = Rng::new(99);
        for k in [0, 1, 50, 100] {
            g.random_init(&mut rng, k).unwrap();
            assert_eq!(g.sum(), k);
        }
        assert!(g.random_init(&mut rng, 101).is_err());
    }

    #[test]
    fn neighbor_count_bounded_at_edges() {
        let mut g = Grid::new(3).unwrap();
        // Fill everything; corner sees 2, edge 3, center 4.
        for r in 0..3 {
            for c in 0..3 {
                g.set_value(r, c, 1).unwrap();
            }
        }
        assert_eq!(g.neighbor_count(0, 0), 2);
        assert_eq!(g.neighbor_count(0, 1), 3);
        assert_eq!(g.neighbor_count(1, 1), 4);
    }

    #[test]
    fn neighbor_count_ignores_diagonals() {
        let mut g = Grid::new(3).unwrap();
        g.set_value(0, 0, 1).unwrap();
        g.set_value(0, 2, 1).unwrap();
        g.set_value(2, 0, 1).unwrap();
        g.set_value(2, 2, 1).unwrap();
        assert_eq!(g.neighbor_count(1, 1), 0);
    }
}
