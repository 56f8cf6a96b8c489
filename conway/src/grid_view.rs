// grid_view.rs - Zero-copy, read-only window over a simulation's cell bytes
//
// A `GridView` borrows the simulation, so the compiler refuses to keep one
// alive across `advance`/`reset_cells`. `CellRegion` is the owned form for
// callers that need to remember where the grid was; it re-checks the epoch
// before handing out a view.

use crate::error::{Error, Result};
use crate::simulation::{CellCoord, Dimensions, Simulation};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Dead,
    Alive,
}

impl CellState {
    /// `0` is dead; every other byte is alive.
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 { CellState::Dead } else { CellState::Alive }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [u8],
    dimensions: Dimensions,
}

impl<'a> GridView<'a> {
    /// Borrows `width * height` bytes of `memory` starting at `offset`.
    pub fn new(memory: &'a [u8], offset: usize, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig("grid dimensions must be non-zero"));
        }
        let dimensions = Dimensions::new(width, height);
        let end = offset
            .checked_add(dimensions.cell_count())
            .filter(|&end| end <= memory.len())
            .ok_or_else(|| {
                Error::StaleMemoryView(format!(
                    "{width}x{height} grid at offset {offset} exceeds {} bytes of memory",
                    memory.len()
                ))
            })?;
        Ok(Self { cells: &memory[offset..end], dimensions })
    }

    /// Re-derives the view from the simulation's current offset and size.
    pub fn acquire<S: Simulation + ?Sized>(simulation: &'a S) -> Result<Self> {
        let Dimensions { width, height } = simulation.dimensions();
        Self::new(simulation.memory(), simulation.cell_buffer_offset(), width, height)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn value_at(&self, row: u32, col: u32) -> Result<CellState> {
        self.dimensions.check(CellCoord::new(row, col))?;
        let idx = row as usize * self.width() as usize + col as usize;
        Ok(CellState::from_byte(self.cells[idx]))
    }

    /// The aliased bytes themselves.
    pub fn bytes(&self) -> &'a [u8] {
        self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + use<'a> {
        self.cells.chunks_exact(self.width() as usize)
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&byte| byte != 0).count()
    }
}

/// Where a simulation's grid lived when it was captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRegion {
    pub offset: usize,
    pub dimensions: Dimensions,
    pub epoch: u64,
}

impl CellRegion {
    pub fn capture<S: Simulation + ?Sized>(simulation: &S) -> Self {
        Self {
            offset: simulation.cell_buffer_offset(),
            dimensions: simulation.dimensions(),
            epoch: simulation.memory_epoch(),
        }
    }

    /// Fails with `StaleMemoryView` if the simulation advanced, reset or
    /// resized since the region was captured.
    pub fn view<'a, S: Simulation + ?Sized>(&self, simulation: &'a S) -> Result<GridView<'a>> {
        let current = Self::capture(simulation);
        if current != *self {
            return Err(Error::StaleMemoryView(format!(
                "region captured at epoch {} (offset {}), simulation is at epoch {} (offset {})",
                self.epoch, self.offset, current.epoch, current.offset
            )));
        }
        let Dimensions { width, height } = self.dimensions;
        GridView::new(simulation.memory(), self.offset, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use universe::Universe;

    #[test]
    fn reads_cells_row_major() {
        let memory = [9, 9, 0, 1, 0, 0, 0, 7];
        let view = GridView::new(&memory, 2, 3, 2).unwrap();
        assert_eq!(view.value_at(0, 0).unwrap(), CellState::Dead);
        assert_eq!(view.value_at(0, 1).unwrap(), CellState::Alive);
        assert_eq!(view.value_at(1, 2).unwrap(), CellState::Alive);
        assert_eq!(view.live_count(), 2);
        assert_eq!(view.rows().collect::<Vec<_>>(), vec![&[0, 1, 0][..], &[0, 0, 7][..]]);
    }

    #[test]
    fn view_aliases_memory_without_copying() {
        let memory = vec![0u8; 64];
        let view = GridView::new(&memory, 16, 4, 4).unwrap();
        assert!(std::ptr::eq(view.bytes().as_ptr(), memory[16..].as_ptr()));
    }

    #[test]
    fn out_of_range_reads_fail() {
        let memory = [0u8; 6];
        let view = GridView::new(&memory, 0, 3, 2).unwrap();
        assert_eq!(
            view.value_at(2, 0),
            Err(Error::InvalidCoordinate { row: 2, col: 0, width: 3, height: 2 })
        );
        assert!(view.value_at(0, 3).is_err());
    }

    #[test]
    fn empty_grid_is_rejected() {
        let memory = [0u8; 4];
        for (width, height) in [(0, 0), (0, 2), (2, 0)] {
            assert_eq!(
                GridView::new(&memory, 3, width, height).map(|view| view.dimensions()),
                Err(Error::InvalidConfig("grid dimensions must be non-zero"))
            );
        }
    }

    #[test]
    fn region_past_end_of_memory_is_stale() {
        let memory = [0u8; 10];
        assert!(matches!(GridView::new(&memory, 4, 3, 3), Err(Error::StaleMemoryView(_))));
        assert!(matches!(GridView::new(&memory, usize::MAX, 1, 1), Err(Error::StaleMemoryView(_))));
    }

    #[test]
    fn acquire_follows_the_live_buffer() {
        let mut universe = Universe::with_size(4, 4).unwrap();
        universe.set_cells(&[(1, 1), (1, 2), (2, 1), (2, 2)]).unwrap();
        let first = GridView::acquire(&universe).unwrap().bytes().as_ptr();
        universe.tick();
        let view = GridView::acquire(&universe).unwrap();
        assert_ne!(view.bytes().as_ptr(), first);
        // A block is still life.
        assert_eq!(view.live_count(), 4);
        assert_eq!(view.value_at(1, 1).unwrap(), CellState::Alive);
    }

    #[test]
    fn region_detects_intervening_advance() {
        let mut universe = Universe::with_size(4, 4).unwrap();
        let region = CellRegion::capture(&universe);
        assert!(region.view(&universe).is_ok());
        universe.tick();
        assert!(matches!(region.view(&universe), Err(Error::StaleMemoryView(_))));
        assert!(CellRegion::capture(&universe).view(&universe).is_ok());
    }

    #[test]
    fn region_detects_reset_and_resize() {
        let mut universe = Universe::with_size(4, 4).unwrap().with_seed(1);
        let region = CellRegion::capture(&universe);
        universe.reset_cells();
        assert!(region.view(&universe).is_err());

        let region = CellRegion::capture(&universe);
        universe.set_width(8).unwrap();
        assert!(region.view(&universe).is_err());
    }
}
