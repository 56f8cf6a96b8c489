// config.rs - Drawing configuration

use egui::Color32;

use crate::error::{Error, Result};

pub const CELL_SIZE: u32 = 8;
pub const GRID_COLOR: Color32 = Color32::from_rgb(0xCC, 0xCC, 0xCC);
pub const DEAD_COLOR: Color32 = Color32::WHITE;
pub const ALIVE_COLOR: Color32 = Color32::BLACK;
/// Largest canvas, in pixels, the renderer will allocate.
pub const MAX_CANVAS_PIXELS: u64 = 1 << 26;

/// Cell size and palette shared by the renderer and the input mapper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    /// Inner size of one cell in canvas pixels, excluding its border.
    pub cell_size: u32,
    pub grid_color: Color32,
    pub dead_color: Color32,
    pub alive_color: Color32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            grid_color: GRID_COLOR,
            dead_color: DEAD_COLOR,
            alive_color: ALIVE_COLOR,
        }
    }
}

impl ViewConfig {
    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Distance between two grid lines.
    pub fn pitch(&self) -> u32 {
        self.cell_size + 1
    }

    /// Canvas size in pixels for a `width` x `height` grid: one border line
    /// per cell plus the closing line.
    pub fn canvas_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        canvas_size(self.cell_size, width, height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(Error::InvalidConfig("cell_size must be > 0"));
        }
        if self.cell_size > 256 {
            return Err(Error::InvalidConfig("cell_size must be <= 256"));
        }
        Ok(())
    }
}

/// Pixel size of the canvas for a grid, `(cell_size + 1) * dim + 1` per
/// axis. Fails instead of wrapping, and refuses canvases over
/// `MAX_CANVAS_PIXELS`.
pub fn canvas_size(cell_size: u32, width: u32, height: u32) -> Result<(u32, u32)> {
    let axis = |cells: u32| {
        cell_size
            .checked_add(1)
            .and_then(|pitch| pitch.checked_mul(cells))
            .and_then(|span| span.checked_add(1))
            .ok_or(Error::InvalidConfig("canvas size overflows u32"))
    };
    let (canvas_width, canvas_height) = (axis(width)?, axis(height)?);
    if u64::from(canvas_width) * u64::from(canvas_height) > MAX_CANVAS_PIXELS {
        return Err(Error::InvalidConfig("canvas exceeds the maximum pixel count"));
    }
    Ok((canvas_width, canvas_height))
}
