// Monochrome frame raster - the unit written to bitmap files and the panel
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::Rectangle,
    Pixel,
};
use thiserror::Error;

/// Landscape frame size used by every layout (the 2.7" panel rotated)
pub const FRAME_WIDTH: u32 = 264;
pub const FRAME_HEIGHT: u32 = 176;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame is {frame_width}x{frame_height}, panel expects {panel_width}x{panel_height} in either orientation")]
    SizeMismatch {
        frame_width: u32,
        frame_height: u32,
        panel_width: u32,
        panel_height: u32,
    },
}

/// 1 bit per pixel, rows packed MSB first, `1` = white paper, `0` = black ink.
///
/// `BinaryColor::On` draws ink. The packing is the same as the panel RAM
/// and the bottom-up rows of a 1-bit BMP, only the row order differs.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl Frame {
    /// All-white frame
    pub fn blank(width: u32, height: u32) -> Self {
        let stride = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            stride,
            data: vec![0xFF; stride * height as usize],
        }
    }

    /// Landscape frame for the layouts
    pub fn landscape() -> Self {
        Self::blank(FRAME_WIDTH, FRAME_HEIGHT)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per packed row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Packed row `y`, top row first
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.stride]
    }

    pub fn is_black(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y as usize * self.stride + (x / 8) as usize];
        byte & (0x80 >> (x % 8)) == 0
    }

    pub fn set_black(&mut self, x: u32, y: u32, black: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y as usize * self.stride + (x / 8) as usize;
        let mask = 0x80 >> (x % 8);
        if black {
            self.data[idx] &= !mask;
        } else {
            self.data[idx] |= mask;
        }
    }

    pub fn black_pixel_count(&self) -> usize {
        (0..self.height)
            .map(|y| (0..self.width).filter(|&x| self.is_black(x, y)).count())
            .sum()
    }

    /// Threshold an 8-bit grayscale image: luma below 128 becomes ink
    pub fn from_luma(image: &image::GrayImage) -> Self {
        let mut frame = Self::blank(image.width(), image.height());
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[0] < 128 {
                frame.set_black(x, y, true);
            }
        }
        frame
    }

    /// Pack the frame for a panel whose native size is `panel_width` x `panel_height`.
    ///
    /// A frame with swapped dimensions is rotated so that frame pixel
    /// `(x, y)` lands on panel pixel `(y, panel_height - 1 - x)`.
    pub fn to_panel_buffer(&self, panel_width: u32, panel_height: u32) -> Result<Vec<u8>, FrameError> {
        let panel_stride = (panel_width as usize).div_ceil(8);
        let mut buffer = vec![0xFF; panel_stride * panel_height as usize];

        if self.width == panel_width && self.height == panel_height {
            for y in 0..self.height {
                let start = y as usize * panel_stride;
                buffer[start..start + panel_stride].copy_from_slice(self.row(y));
            }
        } else if self.width == panel_height && self.height == panel_width {
            for y in 0..self.height {
                for x in 0..self.width {
                    if self.is_black(x, y) {
                        let new_x = y;
                        let new_y = panel_height - x - 1;
                        let idx = new_y as usize * panel_stride + (new_x / 8) as usize;
                        buffer[idx] &= !(0x80 >> (new_x % 8));
                    }
                }
            }
        } else {
            return Err(FrameError::SizeMismatch {
                frame_width: self.width,
                frame_height: self.height,
                panel_width,
                panel_height,
            });
        }

        Ok(buffer)
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("black_pixels", &self.black_pixel_count())
            .finish()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                self.set_black(point.x as u32, point.y as u32, color.is_on());
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        for y in area.rows() {
            for x in area.columns() {
                self.set_black(x as u32, y as u32, color.is_on());
            }
        }
        Ok(())
    }
}
