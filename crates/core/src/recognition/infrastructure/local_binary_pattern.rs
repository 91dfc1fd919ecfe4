use std::f64::consts::PI;

use image::GrayImage;
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Neighbours within this of the centre count as equal to it.
const EQUAL_TOLERANCE: f64 = 1e-6;

/// Circular LBP operator and spatial-histogram layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LbpParams {
    pub radius: u32,
    pub neighbors: u32,
    pub grid_x: u32,
    pub grid_y: u32,
}

impl Default for LbpParams {
    fn default() -> Self {
        Self {
            radius: 1,
            neighbors: 8,
            grid_x: 8,
            grid_y: 8,
        }
    }
}

impl LbpParams {
    pub fn bins(&self) -> usize {
        1 << self.neighbors
    }

    /// Smallest image side that still leaves one code per grid cell.
    pub fn min_side(&self) -> u32 {
        2 * self.radius + self.grid_x.max(self.grid_y)
    }
}

fn to_array(img: &GrayImage) -> Array2<f64> {
    let (w, h) = img.dimensions();
    Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
        img.get_pixel(x as u32, y as u32).0[0] as f64
    })
}

/// Extended (circular) LBP codes with bilinear sampling of the neighbours.
///
/// The output is `2 * radius` smaller than the input on each axis.
pub fn lbp_codes(img: &GrayImage, params: &LbpParams) -> Array2<u32> {
    let src = to_array(img);
    let (rows, cols) = src.dim();
    let r = params.radius as usize;
    let out_rows = rows.saturating_sub(2 * r);
    let out_cols = cols.saturating_sub(2 * r);
    let mut dst = Array2::<u32>::zeros((out_rows, out_cols));
    if out_rows == 0 || out_cols == 0 {
        return dst;
    }

    let radius = params.radius as f64;
    for n in 0..params.neighbors {
        let angle = 2.0 * PI * n as f64 / params.neighbors as f64;
        let x = radius * angle.cos();
        let y = -radius * angle.sin();
        let (fx, fy) = (x.floor(), y.floor());
        let (cx, cy) = (x.ceil(), y.ceil());
        let (tx, ty) = (x - fx, y - fy);
        let w1 = (1.0 - tx) * (1.0 - ty);
        let w2 = tx * (1.0 - ty);
        let w3 = (1.0 - tx) * ty;
        let w4 = tx * ty;
        let (fx, fy, cx, cy) = (fx as isize, fy as isize, cx as isize, cy as isize);

        for i in r..rows - r {
            for j in r..cols - r {
                let at = |dy: isize, dx: isize| {
                    src[[(i as isize + dy) as usize, (j as isize + dx) as usize]]
                };
                let t = w1 * at(fy, fx) + w2 * at(fy, cx) + w3 * at(cy, fx) + w4 * at(cy, cx);
                let center = src[[i, j]];
                if t > center || (t - center).abs() < EQUAL_TOLERANCE {
                    dst[[i - r, j - r]] += 1 << n;
                }
            }
        }
    }
    dst
}

/// Concatenated per-cell histograms of `codes`, each normalised to sum to 1.
pub fn spatial_histogram(codes: ArrayView2<u32>, params: &LbpParams) -> Vec<f32> {
    let bins = params.bins();
    let (grid_x, grid_y) = (params.grid_x as usize, params.grid_y as usize);
    let (rows, cols) = codes.dim();
    let cell_w = cols / grid_x;
    let cell_h = rows / grid_y;

    let mut hist = vec![0f32; grid_x * grid_y * bins];
    if cell_w == 0 || cell_h == 0 {
        return hist;
    }

    let per_cell = (cell_w * cell_h) as f32;
    for gy in 0..grid_y {
        for gx in 0..grid_x {
            let offset = (gy * grid_x + gx) * bins;
            let cell = codes.slice(s![
                gy * cell_h..(gy + 1) * cell_h,
                gx * cell_w..(gx + 1) * cell_w
            ]);
            for &code in cell.iter() {
                hist[offset + code as usize] += 1.0;
            }
            for v in &mut hist[offset..offset + bins] {
                *v /= per_cell;
            }
        }
    }
    hist
}

/// Symmetric chi-square distance, `sum 2 (a - b)^2 / (a + b)`.
pub fn chi_square(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&a, &b)| {
            let (a, b) = (a as f64, b as f64);
            let sum = a + b;
            if sum > 0.0 {
                2.0 * (a - b) * (a - b) / sum
            } else {
                0.0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat(w: u32, h: u32, v: u8) -> GrayImage {
        GrayImage::from_pixel(w, h, image::Luma([v]))
    }

    #[test]
    fn test_default_params_are_classic_lbph() {
        let p = LbpParams::default();
        assert_eq!((p.radius, p.neighbors, p.grid_x, p.grid_y), (1, 8, 8, 8));
        assert_eq!(p.bins(), 256);
    }

    #[test]
    fn test_codes_shrink_by_radius() {
        let codes = lbp_codes(&flat(10, 6, 50), &LbpParams::default());
        assert_eq!(codes.dim(), (4, 8));
    }

    #[test]
    fn test_flat_image_sets_every_bit() {
        // Equal neighbours count as "greater or equal"
        let codes = lbp_codes(&flat(5, 5, 90), &LbpParams::default());
        assert!(codes.iter().all(|&c| c == 255));
    }

    #[test]
    fn test_dark_center_pixel_sets_every_bit() {
        let mut img = flat(3, 3, 200);
        img.put_pixel(1, 1, image::Luma([10]));
        let codes = lbp_codes(&img, &LbpParams::default());
        assert_eq!(codes[[0, 0]], 255);
    }

    #[test]
    fn test_bright_center_pixel_clears_every_bit() {
        let mut img = flat(3, 3, 10);
        img.put_pixel(1, 1, image::Luma([200]));
        let codes = lbp_codes(&img, &LbpParams::default());
        assert_eq!(codes[[0, 0]], 0);
    }

    #[test]
    fn test_tiny_image_yields_no_codes() {
        let codes = lbp_codes(&flat(2, 2, 0), &LbpParams::default());
        assert_eq!(codes.len(), 0);
    }

    #[test]
    fn test_histogram_cells_are_normalised() {
        let params = LbpParams::default();
        let codes = lbp_codes(&flat(18, 18, 70), &params);
        let hist = spatial_histogram(codes.view(), &params);
        assert_eq!(hist.len(), 64 * 256);
        for cell in hist.chunks(256) {
            assert_relative_eq!(cell.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_chi_square_identical_is_zero() {
        let h = [0.25f32, 0.75, 0.0];
        assert_relative_eq!(chi_square(&h, &h), 0.0);
    }

    #[test]
    fn test_chi_square_disjoint() {
        // 2*(1^2)/1 + 2*(1^2)/1
        assert_relative_eq!(chi_square(&[1.0, 0.0], &[0.0, 1.0]), 4.0);
    }
}
