use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::shared::constants::FACE_SIZE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Cuts a detected face out of a frame and brings it to the shape the
/// recogniser is trained on: grayscale, `FACE_SIZE` square.
///
/// Returns `None` when the box lies entirely outside the frame.
pub fn normalize_face(frame: &Frame, region: &Region) -> Option<GrayImage> {
    let crop = frame.crop(region)?;
    let gray = crop.to_gray();
    if gray.dimensions() == (FACE_SIZE, FACE_SIZE) {
        return Some(gray);
    }
    Some(imageops::resize(&gray, FACE_SIZE, FACE_SIZE, FilterType::Triangle))
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
            score: 0.9,
        }
    }

    #[test]
    fn test_output_is_face_size() {
        let frame = Frame::new(vec![90; 320 * 240 * 3], 320, 240, 3, 0);
        let face = normalize_face(&frame, &region(40, 30, 80, 100)).unwrap();
        assert_eq!(face.dimensions(), (FACE_SIZE, FACE_SIZE));
        assert!(face.pixels().all(|p| p.0[0].abs_diff(90) <= 1));
    }

    #[test]
    fn test_box_outside_frame_is_none() {
        let frame = Frame::new(vec![0; 100 * 100 * 3], 100, 100, 3, 0);
        assert!(normalize_face(&frame, &region(200, 200, 50, 50)).is_none());
    }

    #[test]
    fn test_full_size_crop_is_unchanged() {
        let data: Vec<u8> = (0..FACE_SIZE * FACE_SIZE).map(|i| (i % 251) as u8).collect();
        let frame = Frame::new(data.clone(), FACE_SIZE, FACE_SIZE, 1, 0);
        let side = FACE_SIZE as i32;
        let face = normalize_face(&frame, &region(0, 0, side, side)).unwrap();
        assert_eq!(face.into_raw(), data);
    }
}
