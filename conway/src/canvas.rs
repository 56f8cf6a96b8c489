// canvas.rs - Drawing surface the renderer paints on

use egui::{Color32, ColorImage};

/// Minimal 2D surface: axis-aligned filled rectangles in whole pixels.
pub trait Canvas {
    /// Logical size in pixels (width, height).
    fn size(&self) -> (u32, u32);

    /// Fills `[x, x + w) x [y, y + h)`, clipped to the canvas.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color32);
}

/// Software RGBA canvas, row-major. Uploaded to the GPU as an egui texture.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color32::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn to_color_image(&self) -> ColorImage {
        let size = [self.width as usize, self.height as usize];
        let mut image = ColorImage::new(size, Color32::TRANSPARENT);
        image.pixels.copy_from_slice(&self.pixels);
        image
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        let stride = self.width as usize;
        for row in y..y_end {
            let start = row as usize * stride;
            self.pixels[start + x as usize..start + x_end as usize].fill(color);
        }
    }
}
