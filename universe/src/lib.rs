// lib.rs - Toroidal Conway's Game of Life living in a linear memory arena
//
// The cell grid is one row-major byte buffer inside `LinearMemory`. Readers
// get the raw arena plus an offset, never a copy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

pub mod memory;
pub mod patterns;

pub use memory::LinearMemory;
pub use patterns::{PATTERNS, Pattern};

pub const DEFAULT_WIDTH: u32 = 64;
pub const DEFAULT_HEIGHT: u32 = 64;

/// Byte encoding of one cell. Readers treat any non-zero byte as alive.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Dead = 0,
    Alive = 1,
}

impl Cell {
    pub fn from_byte(byte: u8) -> Self {
        if byte == Cell::Dead as u8 { Cell::Dead } else { Cell::Alive }
    }

    fn toggled(self) -> Self {
        match self {
            Cell::Dead => Cell::Alive,
            Cell::Alive => Cell::Dead,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UniverseError {
    #[error("universe dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("cell ({row}, {col}) is outside the {width}x{height} universe")]
    OutOfBounds { row: u32, col: u32, width: u32, height: u32 },
}

pub struct Universe {
    width: u32,
    height: u32,
    memory: LinearMemory,
    front: usize, // live generation
    back: usize,  // scratch buffer for the next generation
    generation: u64,
    epoch: u64,
    rng: StdRng,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// 64x64 universe seeded with the `i % 2 == 0 || i % 7 == 0` pattern.
    pub fn new() -> Self {
        let mut universe = Self::allocate(DEFAULT_WIDTH, DEFAULT_HEIGHT, StdRng::from_entropy());
        universe.seed_classic();
        universe
    }

    /// Like [`Universe::new`] at any size.
    pub fn with_classic_seed(width: u32, height: u32) -> Result<Self, UniverseError> {
        let mut universe = Self::with_size(width, height)?;
        universe.seed_classic();
        Ok(universe)
    }

    fn seed_classic(&mut self) {
        for (i, cell) in self.cells_mut().iter_mut().enumerate() {
            if i % 2 == 0 || i % 7 == 0 {
                *cell = Cell::Alive as u8;
            }
        }
    }

    /// Empty universe of the given size.
    pub fn with_size(width: u32, height: u32) -> Result<Self, UniverseError> {
        check_dimensions(width, height)?;
        Ok(Self::allocate(width, height, StdRng::from_entropy()))
    }

    /// Makes `reset_cells` reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn allocate(width: u32, height: u32, rng: StdRng) -> Self {
        let mut memory = LinearMemory::default();
        let len = width as usize * height as usize;
        let front = memory.alloc(len);
        let back = memory.alloc(len);
        Self {
            width,
            height,
            memory,
            front,
            back,
            generation: 0,
            epoch: 0,
            rng,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Offset of the live cell buffer inside `memory()`. Changes every tick.
    pub fn cells_offset(&self) -> usize {
        self.front
    }

    /// The whole arena. Only `[cells_offset(), cells_offset() + width*height)` is the grid.
    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped whenever the live buffer moves or is rewritten wholesale.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn cells_mut(&mut self) -> &mut [u8] {
        let len = self.len();
        self.memory.slice_mut(self.front, len)
    }

    fn index(&self, row: u32, col: u32) -> usize {
        cell_index(self.width, row, col)
    }

    fn check(&self, row: u32, col: u32) -> Result<(), UniverseError> {
        if row < self.height && col < self.width {
            Ok(())
        } else {
            Err(UniverseError::OutOfBounds { row, col, width: self.width, height: self.height })
        }
    }

    pub fn get(&self, row: u32, col: u32) -> Result<Cell, UniverseError> {
        self.check(row, col)?;
        let byte = self.memory.slice(self.front, self.len())[self.index(row, col)];
        Ok(Cell::from_byte(byte))
    }

    /// Advances one generation. The result is written into the scratch
    /// buffer and the two buffers swap roles.
    pub fn tick(&mut self) {
        let (width, height, len) = (self.width, self.height, self.len());
        let (current, next) = self.memory.read_write(self.front, self.back, len);

        for row in 0..height {
            for col in 0..width {
                let idx = cell_index(width, row, col);
                let alive = current[idx] != Cell::Dead as u8;
                let count = live_neighbor_count(current, width, height, row, col);

                let next_cell = match (alive, count) {
                    (true, 2) | (true, 3) => Cell::Alive, // Survival
                    (false, 3) => Cell::Alive,            // Birth
                    _ => Cell::Dead,                      // Death or stays dead
                };
                next[idx] = next_cell as u8;
            }
        }

        std::mem::swap(&mut self.front, &mut self.back);
        self.generation += 1;
        self.epoch += 1;
    }

    pub fn toggle_cell(&mut self, row: u32, col: u32) -> Result<(), UniverseError> {
        self.check(row, col)?;
        let idx = self.index(row, col);
        let cells = self.cells_mut();
        cells[idx] = Cell::from_byte(cells[idx]).toggled() as u8;
        Ok(())
    }

    /// Re-randomizes every cell with a 50% chance of being alive.
    pub fn reset_cells(&mut self) {
        let len = self.len();
        let (front, rng) = (self.front, &mut self.rng);
        for cell in self.memory.slice_mut(front, len) {
            let next = if rng.gen_bool(0.5) { Cell::Alive } else { Cell::Dead };
            *cell = next as u8;
        }
        self.generation = 0;
        self.epoch += 1;
        tracing::debug!(width = self.width, height = self.height, "cells reset");
    }

    /// Kills every cell.
    pub fn clear(&mut self) {
        self.cells_mut().fill(Cell::Dead as u8);
        self.generation = 0;
        self.epoch += 1;
    }

    /// Sets the listed cells alive. Out-of-range cells are rejected before
    /// anything is written.
    pub fn set_cells(&mut self, cells: &[(u32, u32)]) -> Result<(), UniverseError> {
        for &(row, col) in cells {
            self.check(row, col)?;
        }
        for &(row, col) in cells {
            let idx = self.index(row, col);
            self.cells_mut()[idx] = Cell::Alive as u8;
        }
        Ok(())
    }

    /// Clears the universe and stamps `pattern` in the middle. Cells that
    /// fall outside a universe smaller than the pattern are dropped.
    pub fn load_pattern(&mut self, pattern: &Pattern) {
        self.clear();
        let (rows, cols) = pattern.extent();
        let top = self.height.saturating_sub(rows) / 2;
        let left = self.width.saturating_sub(cols) / 2;
        for &(row, col) in pattern.cells {
            let (row, col) = (top + row, left + col);
            if row < self.height && col < self.width {
                let idx = self.index(row, col);
                self.cells_mut()[idx] = Cell::Alive as u8;
            }
        }
    }

    /// Resizing reallocates both buffers and kills every cell.
    pub fn set_width(&mut self, width: u32) -> Result<(), UniverseError> {
        self.resize(width, self.height)
    }

    /// See [`Universe::set_width`].
    pub fn set_height(&mut self, height: u32) -> Result<(), UniverseError> {
        self.resize(self.width, height)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), UniverseError> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.memory.release_all();
        let len = self.len();
        self.front = self.memory.alloc(len);
        self.back = self.memory.alloc(len);
        self.generation = 0;
        self.epoch += 1;
        tracing::debug!(width, height, "universe resized");
        Ok(())
    }

    pub fn live_cells(&self) -> usize {
        self.memory
            .slice(self.front, self.len())
            .iter()
            .filter(|&&byte| byte != Cell::Dead as u8)
            .count()
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), UniverseError> {
    if width == 0 || height == 0 {
        return Err(UniverseError::EmptyDimensions { width, height });
    }
    Ok(())
}

/// Row-major byte index, computed in `usize` like `len()`.
fn cell_index(width: u32, row: u32, col: u32) -> usize {
    row as usize * width as usize + col as usize
}

fn live_neighbor_count(cells: &[u8], width: u32, height: u32, row: u32, col: u32) -> u8 {
    let mut count = 0;
    for delta_row in [height - 1, 0, 1] {
        for delta_col in [width - 1, 0, 1] {
            if delta_row == 0 && delta_col == 0 {
                continue;
            }
            let neighbor_row = ((u64::from(row) + u64::from(delta_row)) % u64::from(height)) as u32;
            let neighbor_col = ((u64::from(col) + u64::from(delta_col)) % u64::from(width)) as u32;
            let idx = cell_index(width, neighbor_row, neighbor_col);
            if cells[idx] != Cell::Dead as u8 {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_index_does_not_wrap_past_u32() {
        assert_eq!(cell_index(70_000, 70_000, 5), 4_900_000_005);
        assert_eq!(cell_index(u32::MAX, 1, 0), u32::MAX as usize);
        assert_eq!(cell_index(5, 2, 3), 13);
    }

    fn universe_with(width: u32, height: u32, alive: &[(u32, u32)]) -> Universe {
        let mut universe = Universe::with_size(width, height).unwrap().with_seed(7);
        universe.set_cells(alive).unwrap();
        universe
    }

    fn alive_cells(universe: &Universe) -> Vec<(u32, u32)> {
        let mut alive = Vec::new();
        for row in 0..universe.height() {
            for col in 0..universe.width() {
                if universe.get(row, col).unwrap() == Cell::Alive {
                    alive.push((row, col));
                }
            }
        }
        alive
    }

    #[test]
    fn default_universe_uses_classic_seed() {
        let universe = Universe::new();
        assert_eq!((universe.width(), universe.height()), (64, 64));
        assert_eq!(universe.get(0, 0).unwrap(), Cell::Alive);
        assert_eq!(universe.get(0, 1).unwrap(), Cell::Dead);
        assert_eq!(universe.get(0, 7).unwrap(), Cell::Alive);
    }

    #[test]
    fn classic_seed_at_any_size() {
        let universe = Universe::with_classic_seed(10, 3).unwrap();
        // Index 7 is odd but a multiple of 7.
        assert_eq!(universe.get(0, 7).unwrap(), Cell::Alive);
        assert_eq!(universe.get(0, 9).unwrap(), Cell::Dead);
        assert!(Universe::with_classic_seed(0, 3).is_err());
    }

    #[test]
    fn isolated_cell_dies() {
        let mut universe = universe_with(8, 8, &[(0, 0)]);
        universe.tick();
        assert_eq!(universe.live_cells(), 0);
        assert_eq!(universe.generation(), 1);
    }

    #[test]
    fn blinker_oscillates() {
        let mut universe = universe_with(5, 5, &[(2, 1), (2, 2), (2, 3)]);
        universe.tick();
        assert_eq!(alive_cells(&universe), vec![(1, 2), (2, 2), (3, 2)]);
        universe.tick();
        assert_eq!(alive_cells(&universe), vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn neighbours_wrap_around_edges() {
        // Vertical blinker through the top/bottom seam of a 6x6 torus.
        let mut universe = universe_with(6, 6, &[(5, 2), (0, 2), (1, 2)]);
        universe.tick();
        assert_eq!(alive_cells(&universe), vec![(0, 1), (0, 2), (0, 3)]);
    }

    #[test]
    fn tick_moves_live_buffer() {
        let mut universe = universe_with(4, 4, &[]);
        let before = (universe.cells_offset(), universe.epoch());
        universe.tick();
        assert_ne!(universe.cells_offset(), before.0);
        assert_eq!(universe.epoch(), before.1 + 1);
    }

    #[test]
    fn toggle_flips_and_rejects_out_of_range() {
        let mut universe = universe_with(4, 3, &[]);
        universe.toggle_cell(2, 3).unwrap();
        assert_eq!(universe.get(2, 3).unwrap(), Cell::Alive);
        universe.toggle_cell(2, 3).unwrap();
        assert_eq!(universe.get(2, 3).unwrap(), Cell::Dead);
        assert_eq!(
            universe.toggle_cell(3, 0),
            Err(UniverseError::OutOfBounds { row: 3, col: 0, width: 4, height: 3 })
        );
    }

    #[test]
    fn seeded_reset_is_reproducible() {
        let mut a = Universe::with_size(16, 16).unwrap().with_seed(42);
        let mut b = Universe::with_size(16, 16).unwrap().with_seed(42);
        a.reset_cells();
        b.reset_cells();
        assert_eq!(alive_cells(&a), alive_cells(&b));
        assert!(a.live_cells() > 0 && a.live_cells() < 256);
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut universe = universe_with(4, 4, &[(1, 1)]);
        let epoch = universe.epoch();
        universe.set_width(200).unwrap();
        universe.set_height(100).unwrap();
        assert_eq!((universe.width(), universe.height()), (200, 100));
        assert_eq!(universe.live_cells(), 0);
        assert!(universe.epoch() > epoch);
        assert!(universe.memory().relocations() > 0);
        assert_eq!(
            universe.set_width(0),
            Err(UniverseError::EmptyDimensions { width: 0, height: 100 })
        );
    }

    #[test]
    fn load_pattern_centres_shape() {
        let mut universe = universe_with(5, 5, &[(0, 0)]);
        universe.load_pattern(Pattern::find("Blinker").unwrap());
        assert_eq!(alive_cells(&universe), vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn load_pattern_clips_to_small_universe() {
        let mut universe = universe_with(10, 10, &[]);
        universe.load_pattern(Pattern::find("Gosper Glider Gun").unwrap());
        assert!(universe.live_cells() > 0);
        assert!(universe.live_cells() < 36);
    }
}
