// render.rs - Paints grid lines and cell colours onto a canvas
//
// Layout for cell size `s` (pitch `s + 1`): grid line `i` occupies pixel
// column/row `i * (s + 1)`, and cell `(row, col)` fills the `s x s` square
// whose top-left pixel is `(col * (s + 1) + 1, row * (s + 1) + 1)`. Every
// cell therefore sits inside a crisp 1px border.

use egui::Color32;

use crate::canvas::Canvas;
use crate::config::{self, ViewConfig};
use crate::error::{Error, Result};
use crate::grid_view::{CellState, GridView};
use crate::simulation::Dimensions;

#[derive(Clone, Debug)]
pub struct Renderer {
    config: ViewConfig,
}

impl Renderer {
    pub fn new(config: ViewConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn set_palette(&mut self, grid: Color32, dead: Color32, alive: Color32) {
        self.config.grid_color = grid;
        self.config.dead_color = dead;
        self.config.alive_color = alive;
    }

    pub fn color_for(&self, state: CellState) -> Color32 {
        match state {
            CellState::Dead => self.config.dead_color,
            CellState::Alive => self.config.alive_color,
        }
    }

    /// Draws `width + 1` vertical and `height + 1` horizontal lines.
    pub fn draw_grid<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        width: u32,
        height: u32,
        cell_size: u32,
    ) -> Result<()> {
        let (canvas_width, canvas_height) = check_canvas(canvas, width, height, cell_size)?;
        let pitch = cell_size + 1;
        let color = self.config.grid_color;

        // Vertical lines.
        for i in 0..=width {
            canvas.fill_rect(i * pitch, 0, 1, canvas_height, color);
        }

        // Horizontal lines.
        for j in 0..=height {
            canvas.fill_rect(0, j * pitch, canvas_width, 1, color);
        }

        Ok(())
    }

    /// Fills every cell with the palette colour for its state.
    pub fn draw_cells<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        view: &GridView<'_>,
        width: u32,
        height: u32,
        cell_size: u32,
    ) -> Result<()> {
        check_canvas(canvas, width, height, cell_size)?;
        let expected = Dimensions::new(width, height);
        if view.dimensions() != expected {
            return Err(Error::StaleMemoryView(format!(
                "view is {}x{}, drawing {width}x{height}",
                view.width(),
                view.height()
            )));
        }

        let pitch = cell_size + 1;
        for (row, cells) in view.rows().enumerate() {
            for (col, &byte) in cells.iter().enumerate() {
                let color = self.color_for(CellState::from_byte(byte));
                canvas.fill_rect(
                    col as u32 * pitch + 1,
                    row as u32 * pitch + 1,
                    cell_size,
                    cell_size,
                    color,
                );
            }
        }

        Ok(())
    }

    /// Full frame: grid lines, then cells, using the configured cell size.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, view: &GridView<'_>) -> Result<()> {
        let (width, height, cell_size) = (view.width(), view.height(), self.config.cell_size);
        self.draw_grid(canvas, width, height, cell_size)?;
        self.draw_cells(canvas, view, width, height, cell_size)
    }
}

/// Rejects a canvas whose size was not fixed for this grid, before any pixel
/// is touched.
fn check_canvas<C: Canvas + ?Sized>(
    canvas: &C,
    width: u32,
    height: u32,
    cell_size: u32,
) -> Result<(u32, u32)> {
    let expected = config::canvas_size(cell_size, width, height)?;
    let actual = canvas.size();
    if actual != expected {
        return Err(Error::CanvasMismatch { expected, actual });
    }
    Ok(actual)
}
