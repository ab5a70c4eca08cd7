// 1-bit BMP codec for frame files
use thiserror::Error;

use crate::presentation::frame::Frame;

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PALETTE_LEN: u32 = 8;
const PIXEL_OFFSET: u32 = FILE_HEADER_LEN + INFO_HEADER_LEN + PALETTE_LEN;
/// 72 dpi
const PIXELS_PER_METER: i32 = 2835;

#[derive(Debug, Error)]
pub enum BitmapError {
    #[error("failed to decode bitmap: {0}")]
    Decode(#[from] image::ImageError),
}

fn padded_stride(width: u32) -> usize {
    (width as usize).div_ceil(32) * 4
}

/// Encode as an uncompressed 1-bit BMP with a black/white palette (index 0 = black)
pub fn encode(frame: &Frame) -> Vec<u8> {
    let stride = padded_stride(frame.width());
    let image_len = (stride * frame.height() as usize) as u32;
    let file_len = PIXEL_OFFSET + image_len;

    let mut out = Vec::with_capacity(file_len as usize);
    // File header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_len.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&PIXEL_OFFSET.to_le_bytes());
    // BITMAPINFOHEADER, positive height = bottom-up rows
    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&(frame.width() as i32).to_le_bytes());
    out.extend_from_slice(&(frame.height() as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&image_len.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    // Palette, BGRX
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    out.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0x00]);

    let padding = stride - frame.stride();
    for y in (0..frame.height()).rev() {
        out.extend_from_slice(frame.row(y));
        out.extend(std::iter::repeat_n(0u8, padding));
    }
    out
}

/// Decode any BMP the `image` crate understands into a thresholded frame
pub fn decode(bytes: &[u8]) -> Result<Frame, BitmapError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Bmp)?;
    Ok(Frame::from_luma(&image.to_luma8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::frame::{FRAME_HEIGHT, FRAME_WIDTH};

    fn pattern() -> Frame {
        let mut frame = Frame::landscape();
        for i in 0..FRAME_HEIGHT {
            frame.set_black(i, i, true);
        }
        frame.set_black(FRAME_WIDTH - 1, 0, true);
        frame.set_black(0, FRAME_HEIGHT - 1, true);
        frame
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode(&Frame::landscape());
        assert_eq!(&bytes[0..2], b"BM");
        // 264 px -> 36 byte rows
        assert_eq!(bytes.len(), 62 + 36 * 176);
        assert_eq!(u32::from_le_bytes(bytes[2..6].try_into().unwrap()) as usize, bytes.len());
        assert_eq!(u32::from_le_bytes(bytes[10..14].try_into().unwrap()), 62);
        assert_eq!(u16::from_le_bytes(bytes[28..30].try_into().unwrap()), 1);
    }

    #[test]
    fn test_rows_are_bottom_up() {
        let mut frame = Frame::blank(8, 2);
        frame.set_black(0, 0, true);
        let bytes = encode(&frame);
        // Bottom row first: all white, then the top row with its first pixel black
        assert_eq!(&bytes[62..66], &[0xFF, 0, 0, 0]);
        assert_eq!(&bytes[66..70], &[0x7F, 0, 0, 0]);
    }

    #[test]
    fn test_image_crate_reads_same_pixels() {
        let frame = pattern();
        let image = image::load_from_memory(&encode(&frame)).unwrap().to_luma8();
        assert_eq!((image.width(), image.height()), (FRAME_WIDTH, FRAME_HEIGHT));
        for (x, y, pixel) in image.enumerate_pixels() {
            assert_eq!(pixel.0[0] == 0, frame.is_black(x, y), "pixel {},{}", x, y);
        }
        assert_eq!(decode(&encode(&frame)).unwrap(), frame);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(decode(b"not a bitmap").is_err());
    }
}
