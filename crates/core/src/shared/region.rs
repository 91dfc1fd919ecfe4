/// An axis-aligned face box in frame pixel coordinates.
///
/// Detectors may emit boxes that extend past the frame edges; use
/// [`Region::clamped`] before indexing pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub score: f64,
}

impl Region {
    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    pub fn iou(&self, other: &Region) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.area() as f64;
        let area_b = other.area() as f64;
        inter / (area_a + area_b - inter)
    }

    /// Intersection with a `frame_width` x `frame_height` frame, or `None`
    /// when nothing of the box is visible.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Option<Region> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(frame_width as i32);
        let y2 = (self.y + self.height).min(frame_height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Region {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            score: self.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region {
            x,
            y,
            width: w,
            height: h,
            score: 0.9,
        }
    }

    // ── IoU ──────────────────────────────────────────────────────────

    #[test]
    fn test_iou_identical_regions() {
        let a = region(10, 10, 100, 100);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_iou_disjoint_regions() {
        let a = region(0, 0, 10, 10);
        let b = region(50, 50, 10, 10);
        assert_relative_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn test_iou_half_overlap() {
        let a = region(0, 0, 10, 10);
        let b = region(5, 0, 10, 10);
        // inter 50, union 150
        assert_relative_eq!(a.iou(&b), 1.0 / 3.0, epsilon = 1e-9);
    }

    // ── Clamping ─────────────────────────────────────────────────────

    #[rstest]
    #[case(region(10, 10, 20, 20), Some((10, 10, 20, 20)))]
    #[case(region(-5, -5, 20, 20), Some((0, 0, 15, 15)))]
    #[case(region(90, 90, 20, 20), Some((90, 90, 10, 10)))]
    #[case(region(100, 0, 20, 20), None)]
    #[case(region(-30, 0, 20, 20), None)]
    fn test_clamped(#[case] input: Region, #[case] expected: Option<(i32, i32, i32, i32)>) {
        let got = input
            .clamped(100, 100)
            .map(|r| (r.x, r.y, r.width, r.height));
        assert_eq!(got, expected);
    }

    #[test]
    fn test_clamped_keeps_score() {
        let r = region(-1, -1, 5, 5).clamped(10, 10).unwrap();
        assert_relative_eq!(r.score, 0.9);
    }

    #[test]
    fn test_area_of_degenerate_box_is_zero() {
        assert_eq!(region(0, 0, -4, 10).area(), 0);
    }
}
