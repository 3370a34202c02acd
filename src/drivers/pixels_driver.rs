//! Pixel frame render driver.

use super::RenderInterface;
use crate::errors::CResult;
use crate::screen::Color;

/// Render driver writing RGBA pixels into a raw frame.
pub struct PixelsRenderDriver<'a> {
    frame: &'a mut [u8],
}

impl<'a> PixelsRenderDriver<'a> {
    /// Creates new driver.
    pub fn new(frame: &'a mut [u8]) -> Self {
        Self { frame }
    }
}

impl<'a> RenderInterface for PixelsRenderDriver<'a> {
    fn render_pixel(
        &mut self,
        origin_x: u32,
        origin_y: u32,
        x: usize,
        y: usize,
        scale: usize,
        color: Color,
        frame_width: usize,
    ) -> CResult {
        let rgba = [color.r, color.g, color.b, color.a];
        let left = origin_x as usize + x * scale;
        let top = origin_y as usize + y * scale;

        for row in top..top + scale {
            for column in left..left + scale {
                let cursor = (row * frame_width + column) * 4;
                self.frame[cursor..cursor + 4].copy_from_slice(&rgba);
            }
        }

        Ok(())
    }
}
