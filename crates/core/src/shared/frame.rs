use image::GrayImage;
use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::region::Region;

/// A single camera frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the pixels inside `region` (clamped to the frame) into a new frame.
    ///
    /// Returns `None` when the clamped region is empty.
    pub fn crop(&self, region: &Region) -> Option<Frame> {
        let r = region.clamped(self.width, self.height)?;
        let channels = self.channels as usize;
        let (x1, y1) = (r.x as usize, r.y as usize);
        let (w, h) = (r.width as usize, r.height as usize);
        let stride = self.width as usize * channels;

        let mut data = Vec::with_capacity(w * h * channels);
        for row in y1..y1 + h {
            let start = row * stride + x1 * channels;
            data.extend_from_slice(&self.data[start..start + w * channels]);
        }

        Some(Frame::new(data, w as u32, h as u32, self.channels, self.index))
    }

    /// Converts to 8-bit luma using the ITU-R BT.601 weights.
    pub fn to_gray(&self) -> GrayImage {
        let channels = self.channels as usize;
        let pixels = self
            .data
            .chunks_exact(channels)
            .map(|px| {
                if channels < 3 {
                    px[0]
                } else {
                    let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
                    luma.round().clamp(0.0, 255.0) as u8
                }
            })
            .collect();
        GrayImage::from_raw(self.width, self.height, pixels)
            .expect("luma buffer length must match dimensions")
    }

    /// Expands to tightly-packed RGBA, the layout GUI image handles expect.
    pub fn to_rgba(&self) -> Vec<u8> {
        let channels = self.channels as usize;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.data.chunks_exact(channels) {
            if channels < 3 {
                out.extend_from_slice(&[px[0], px[0], px[0], 255]);
            } else {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        out
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: i32, y: i32, width: i32, height: i32) -> Region {
        Region {
            x,
            y,
            width,
            height,
            score: 1.0,
        }
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_data_mut_allows_modification() {
        let mut frame = Frame::new(vec![0u8; 6], 2, 1, 3, 0);
        frame.data_mut()[0] = 255;
        assert_eq!(frame.data()[0], 255);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 3, 0);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let mut data = vec![0u8; 12];
        data[6] = 255; // row=1, col=0, R
        let frame = Frame::new(data, 2, 2, 3, 0);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_crop_copies_region_pixels() {
        // 4x4 frame where each pixel's R value is its column index
        let mut data = Vec::new();
        for _row in 0..4 {
            for col in 0..4u8 {
                data.extend_from_slice(&[col, 0, 0]);
            }
        }
        let frame = Frame::new(data, 4, 4, 3, 7);
        let crop = frame.crop(&region(1, 1, 2, 2)).unwrap();
        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        assert_eq!(crop.index(), 7);
        assert_eq!(crop.as_ndarray()[[0, 0, 0]], 1);
        assert_eq!(crop.as_ndarray()[[1, 1, 0]], 2);
    }

    #[test]
    fn test_crop_clamps_to_frame() {
        let frame = Frame::new(vec![9u8; 10 * 10 * 3], 10, 10, 3, 0);
        let crop = frame.crop(&region(-5, 6, 8, 20)).unwrap();
        assert_eq!(crop.width(), 3);
        assert_eq!(crop.height(), 4);
    }

    #[test]
    fn test_crop_outside_frame_is_none() {
        let frame = Frame::new(vec![0u8; 10 * 10 * 3], 10, 10, 3, 0);
        assert!(frame.crop(&region(20, 20, 5, 5)).is_none());
    }

    #[test]
    fn test_to_gray_weights() {
        let frame = Frame::new(vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255], 4, 1, 3, 0);
        let gray = frame.to_gray();
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
        assert_eq!(gray.get_pixel(1, 0).0[0], 150);
        assert_eq!(gray.get_pixel(2, 0).0[0], 29);
        assert_eq!(gray.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn test_to_rgba_appends_opaque_alpha() {
        let frame = Frame::new(vec![1, 2, 3], 1, 1, 3, 0);
        assert_eq!(frame.to_rgba(), vec![1, 2, 3, 255]);
    }
}
