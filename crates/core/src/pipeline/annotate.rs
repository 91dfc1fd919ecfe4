use crate::shared::frame::Frame;
use crate::shared::region::Region;

const BOX_THICKNESS: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxColor {
    /// Captured sample, or the student that was just marked.
    Green,
    /// Recognised, still counting.
    Orange,
    /// Unknown face.
    Red,
}

impl BoxColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            BoxColor::Green => [0, 200, 0],
            BoxColor::Orange => [255, 165, 0],
            BoxColor::Red => [220, 0, 0],
        }
    }
}

/// One box to draw on a frame and the caption that goes with it.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub region: Region,
    pub color: BoxColor,
    pub label: String,
}

impl Annotation {
    pub fn new(region: Region, color: BoxColor, label: impl Into<String>) -> Self {
        Self {
            region,
            color,
            label: label.into(),
        }
    }
}

/// Draws the outline of every annotation's box into the frame.
///
/// Boxes are clipped to the frame. Captions are left to the front end.
pub fn draw_annotations(frame: &mut Frame, annotations: &[Annotation]) {
    for a in annotations {
        draw_box(frame, &a.region, a.color.rgb());
    }
}

fn draw_box(frame: &mut Frame, region: &Region, rgb: [u8; 3]) {
    let Some(r) = region.clamped(frame.width(), frame.height()) else {
        return;
    };
    let (x1, y1) = (r.x, r.y);
    let (x2, y2) = (r.x + r.width - 1, r.y + r.height - 1);
    let t = BOX_THICKNESS.min(r.width).min(r.height);

    for d in 0..t {
        for x in x1..=x2 {
            put_pixel(frame, x, y1 + d, rgb);
            put_pixel(frame, x, y2 - d, rgb);
        }
        for y in y1..=y2 {
            put_pixel(frame, x1 + d, y, rgb);
            put_pixel(frame, x2 - d, y, rgb);
        }
    }
}

fn put_pixel(frame: &mut Frame, x: i32, y: i32, rgb: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width() as i32 || y >= frame.height() as i32 {
        return;
    }
    let channels = frame.channels() as usize;
    let offset = (y as usize * frame.width() as usize + x as usize) * channels;
    let px = &mut frame.data_mut()[offset..offset + channels];
    if channels < 3 {
        px[0] = rgb.iter().map(|&c| c as u16).max().unwrap_or(0) as u8;
    } else {
        px[..3].copy_from_slice(&rgb);
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

    fn pixel(frame: &Frame, x: usize, y: usize) -> [u8; 3] {
        let i = (y * frame.width() as usize + x) * 3;
        [frame.data()[i], frame.data()[i + 1], frame.data()[i + 2]]
    }

    #[test]
    fn test_draws_outline_not_interior() {
        let mut frame = Frame::new(vec![0; 20 * 20 * 3], 20, 20, 3, 0);
        let boxes = [Annotation::new(region(2, 2, 10, 10), BoxColor::Green, "")];
        draw_annotations(&mut frame, &boxes);

        assert_eq!(pixel(&frame, 2, 2), BoxColor::Green.rgb());
        assert_eq!(pixel(&frame, 11, 11), BoxColor::Green.rgb());
        assert_eq!(pixel(&frame, 3, 6), BoxColor::Green.rgb());
        assert_eq!(pixel(&frame, 6, 6), [0, 0, 0]);
        assert_eq!(pixel(&frame, 15, 15), [0, 0, 0]);
    }

    #[test]
    fn test_box_partly_outside_is_clipped() {
        let mut frame = Frame::new(vec![0; 10 * 10 * 3], 10, 10, 3, 0);
        let boxes = [Annotation::new(region(-5, -5, 10, 10), BoxColor::Red, "Unknown")];
        draw_annotations(&mut frame, &boxes);
        assert_eq!(pixel(&frame, 4, 0), BoxColor::Red.rgb());
        assert_eq!(pixel(&frame, 9, 9), [0, 0, 0]);
    }

    #[test]
    fn test_box_fully_outside_is_ignored() {
        let mut frame = Frame::new(vec![7; 10 * 10 * 3], 10, 10, 3, 0);
        let boxes = [Annotation::new(region(50, 50, 5, 5), BoxColor::Orange, "")];
        draw_annotations(&mut frame, &boxes);
        assert!(frame.data().iter().all(|&v| v == 7));
    }

    #[test]
    fn test_single_channel_frame() {
        let mut frame = Frame::new(vec![0; 8 * 8], 8, 8, 1, 0);
        let boxes = [Annotation::new(region(0, 0, 8, 8), BoxColor::Green, "")];
        draw_annotations(&mut frame, &boxes);
        assert_eq!(frame.data()[0], 200);
    }
}
