// simulation.rs - What the bridge needs from a simulation, and the `universe` binding

use universe::{Universe, UniverseError};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    /// Fails fast with `InvalidCoordinate` when `coord` is off the grid.
    pub fn check(&self, coord: CellCoord) -> Result<()> {
        if self.contains(coord) {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                row: coord.row,
                col: coord.col,
                width: self.width,
                height: self.height,
            })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A simulation whose live cells are exposed as `width * height` raw bytes
/// somewhere inside `memory()`, starting at `cell_buffer_offset()`.
///
/// Byte encoding: `0` is dead, anything else is alive.
///
/// The bridge only writes through `toggle_cell` and `reset_cells`; it never
/// touches `memory()` directly. `memory_epoch` must change whenever the live
/// bytes move or are rewritten wholesale (advance, reset, resize), so that
/// descriptors taken earlier can be detected as stale.
pub trait Simulation {
    /// Fixed for the lifetime of the instance unless it is explicitly resized.
    fn dimensions(&self) -> Dimensions;

    /// Advances one generation in place.
    fn advance(&mut self);

    /// Callers clamp first; out-of-range coordinates are a contract violation.
    fn toggle_cell(&mut self, coord: CellCoord) -> Result<()>;

    fn reset_cells(&mut self);

    fn cell_buffer_offset(&self) -> usize;

    fn memory(&self) -> &[u8];

    fn memory_epoch(&self) -> u64;

    fn generation(&self) -> Option<u64> {
        None
    }
}

impl From<UniverseError> for Error {
    fn from(err: UniverseError) -> Self {
        match err {
            UniverseError::OutOfBounds { row, col, width, height } => {
                Error::InvalidCoordinate { row, col, width, height }
            }
            UniverseError::EmptyDimensions { .. } => Error::InvalidConfig("empty universe"),
        }
    }
}

impl Simulation for Universe {
    fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    fn advance(&mut self) {
        self.tick();
    }

    fn toggle_cell(&mut self, coord: CellCoord) -> Result<()> {
        Universe::toggle_cell(self, coord.row, coord.col)?;
        Ok(())
    }

    fn reset_cells(&mut self) {
        Universe::reset_cells(self);
    }

    fn cell_buffer_offset(&self) -> usize {
        self.cells_offset()
    }

    fn memory(&self) -> &[u8] {
        Universe::memory(self).as_bytes()
    }

    fn memory_epoch(&self) -> u64 {
        self.epoch()
    }

    fn generation(&self) -> Option<u64> {
        Some(Universe::generation(self))
    }
}
