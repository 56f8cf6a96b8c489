// input.rs - Pointer position (screen points) -> grid cell

use egui::{Pos2, Rect, Vec2};

use crate::error::{Error, Result};
use crate::simulation::{CellCoord, Dimensions};

/// The canvas as laid out on screen: where it was drawn and how many
/// logical pixels it holds. The two differ whenever the host scales the
/// image (zoom, high-DPI).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub bounds: Rect,
    pub logical: Vec2,
}

impl ScreenRect {
    pub fn new(bounds: Rect, logical_width: u32, logical_height: u32) -> Self {
        Self {
            bounds,
            logical: Vec2::new(logical_width as f32, logical_height as f32),
        }
    }

    /// Logical pixels per screen point on each axis.
    pub fn scale(&self) -> Result<Vec2> {
        let size = self.bounds.size();
        if !(size.x.is_finite() && size.y.is_finite()) || size.x <= 0.0 || size.y <= 0.0 {
            return Err(Error::InvalidPointer("canvas bounding rectangle is empty"));
        }
        Ok(Vec2::new(self.logical.x / size.x, self.logical.y / size.y))
    }
}

/// Maps a pointer position to the cell under it, clamped into the grid.
///
/// Pure: identical inputs always give the same cell.
pub fn map_pointer_to_cell(
    pointer: Pos2,
    screen: &ScreenRect,
    width: u32,
    height: u32,
    cell_size: u32,
) -> Result<CellCoord> {
    if !(pointer.x.is_finite() && pointer.y.is_finite()) {
        return Err(Error::InvalidPointer("pointer position is not finite"));
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidPointer("grid has no cells"));
    }
    let scale = screen.scale()?;

    let canvas_left = (pointer.x - screen.bounds.min.x) * scale.x;
    let canvas_top = (pointer.y - screen.bounds.min.y) * scale.y;

    let pitch = cell_size as f32 + 1.0;
    let row = clamp_to_axis(canvas_top / pitch, height);
    let col = clamp_to_axis(canvas_left / pitch, width);

    let coord = CellCoord::new(row, col);
    Dimensions::new(width, height).check(coord)?;
    Ok(coord)
}

fn clamp_to_axis(cells: f32, dimension: u32) -> u32 {
    cells.floor().clamp(0.0, (dimension - 1) as f32) as u32
}

/// Per-grid wrapper around [`map_pointer_to_cell`].
#[derive(Clone, Copy, Debug)]
pub struct InputMapper {
    dimensions: Dimensions,
    cell_size: u32,
}

impl InputMapper {
    pub fn new(dimensions: Dimensions, cell_size: u32) -> Self {
        Self { dimensions, cell_size }
    }

    pub fn map(&self, pointer: Pos2, screen: &ScreenRect) -> Result<CellCoord> {
        let Dimensions { width, height } = self.dimensions;
        map_pointer_to_cell(pointer, screen, width, height, self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    const CELL: u32 = 8;

    fn screen(min: Pos2, zoom: f32, width: u32, height: u32) -> ScreenRect {
        let logical = ((CELL + 1) * width + 1, (CELL + 1) * height + 1);
        let size = Vec2::new(logical.0 as f32 * zoom, logical.1 as f32 * zoom);
        ScreenRect::new(Rect::from_min_size(min, size), logical.0, logical.1)
    }

    /// Screen position of the centre pixel of a cell.
    fn centre_of(screen: &ScreenRect, row: u32, col: u32) -> Pos2 {
        let pitch = (CELL + 1) as f32;
        let logical_x = col as f32 * pitch + 1.0 + CELL as f32 / 2.0;
        let logical_y = row as f32 * pitch + 1.0 + CELL as f32 / 2.0;
        let scale = screen.scale().unwrap();
        pos2(
            screen.bounds.min.x + logical_x / scale.x,
            screen.bounds.min.y + logical_y / scale.y,
        )
    }

    #[test]
    fn cell_centres_round_trip() {
        for zoom in [1.0, 0.5, 1.5, 2.0] {
            let (width, height) = (13, 7);
            let screen = screen(pos2(40.0, 25.0), zoom, width, height);
            for row in 0..height {
                for col in 0..width {
                    let pointer = centre_of(&screen, row, col);
                    let coord = map_pointer_to_cell(pointer, &screen, width, height, CELL).unwrap();
                    assert_eq!(coord, CellCoord::new(row, col), "zoom {zoom}");
                }
            }
        }
    }

    #[test]
    fn positions_outside_are_clamped() {
        let screen = screen(pos2(100.0, 100.0), 1.0, 10, 6);
        let outside = [
            (pos2(0.0, 0.0), CellCoord::new(0, 0)),
            (pos2(-5000.0, 130.0), CellCoord::new(3, 0)),
            (pos2(10_000.0, 10_000.0), CellCoord::new(5, 9)),
            (pos2(145.0, 99.0), CellCoord::new(0, 5)),
            (pos2(100.0 + 91.0, 100.0 + 55.0), CellCoord::new(5, 9)),
        ];
        for (pointer, expected) in outside {
            assert_eq!(map_pointer_to_cell(pointer, &screen, 10, 6, CELL).unwrap(), expected);
        }
    }

    #[test]
    fn scaled_canvas_uses_scale_factors() {
        // Displayed at half size: 1 screen point = 2 logical pixels.
        let screen = screen(pos2(0.0, 0.0), 0.5, 4, 4);
        let coord = map_pointer_to_cell(pos2(5.0, 14.0), &screen, 4, 4, CELL).unwrap();
        assert_eq!(coord, CellCoord::new(3, 1));
    }

    #[test]
    fn mapping_is_deterministic() {
        let screen = screen(pos2(12.5, 7.25), 1.37, 20, 20);
        let pointer = pos2(83.3, 141.9);
        let first = map_pointer_to_cell(pointer, &screen, 20, 20, CELL);
        for _ in 0..10 {
            assert_eq!(map_pointer_to_cell(pointer, &screen, 20, 20, CELL), first);
        }
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let empty = ScreenRect::new(Rect::from_min_size(pos2(0.0, 0.0), Vec2::ZERO), 73, 73);
        assert!(matches!(
            map_pointer_to_cell(pos2(1.0, 1.0), &empty, 8, 8, CELL),
            Err(Error::InvalidPointer(_))
        ));

        let screen = screen(pos2(0.0, 0.0), 1.0, 8, 8);
        assert!(map_pointer_to_cell(pos2(f32::NAN, 1.0), &screen, 8, 8, CELL).is_err());
    }

    #[test]
    fn mapper_carries_grid_shape() {
        let screen = screen(pos2(0.0, 0.0), 1.0, 6, 3);
        let mapper = InputMapper::new(Dimensions::new(6, 3), CELL);
        assert_eq!(mapper.map(pos2(50.0, 20.0), &screen).unwrap(), CellCoord::new(2, 5));
    }
}
