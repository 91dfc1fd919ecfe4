//! Face detector running a YOLO pose/face model through ONNX Runtime.
//!
//! Frames are letterboxed into the square model input, the raw output rows
//! are decoded back into frame coordinates and overlapping boxes are
//! suppressed. Boxes are returned unclamped; cropping clamps them later.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Used when the model declares a dynamic input size.
const FALLBACK_INPUT_SIDE: u32 = 640;

const OVERLAP_IOU: f64 = 0.45;

/// Letterbox padding value, the YOLO convention of 114/255 gray.
const PAD_LEVEL: f32 = 114.0 / 255.0;

pub struct OnnxYoloDetector {
    session: ort::session::Session,
    confidence: f64,
    input_side: u32,
}

impl OnnxYoloDetector {
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;
        let input_side = declared_input_side(&session).unwrap_or(FALLBACK_INPUT_SIDE);
        log::debug!(
            "Loaded face detector {} ({input_side}x{input_side} input)",
            model_path.display()
        );
        Ok(Self {
            session,
            confidence,
            input_side,
        })
    }
}

/// Height of an NCHW square input, if the model fixes it.
fn declared_input_side(session: &ort::session::Session) -> Option<u32> {
    let input = session.inputs().first()?;
    let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() else {
        return None;
    };
    (shape.len() >= 4 && shape[2] > 0).then(|| shape[2] as u32)
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        let (input, fit) = letterbox(frame, self.input_side);

        let input = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input])?;
        if outputs.len() == 0 {
            return Err("face model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let data = tensor.as_slice().ok_or("face model output is not contiguous")?;

        let candidates = decode(data, tensor.shape(), self.confidence, &fit)?;
        Ok(suppress_overlaps(candidates, OVERLAP_IOU)
            .into_iter()
            .map(Candidate::into_region)
            .collect())
    }
}

/// How a frame was scaled and padded into the model input.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    /// Maps a centre/size box in model space back to frame corners.
    fn to_frame(&self, cx: f64, cy: f64, w: f64, h: f64, score: f64) -> Candidate {
        let x = |v: f64| (v - self.pad_x as f64) / self.scale;
        let y = |v: f64| (v - self.pad_y as f64) / self.scale;
        Candidate {
            left: x(cx - w / 2.0),
            top: y(cy - h / 2.0),
            right: x(cx + w / 2.0),
            bottom: y(cy + h / 2.0),
            score,
        }
    }
}

/// Nearest-neighbour resize into a gray-padded `side`×`side` NCHW tensor.
///
/// Grayscale frames are replicated into all three channels.
fn letterbox(frame: &Frame, side: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let (fw, fh) = (frame.width() as f64, frame.height() as f64);
    let scale = (side as f64 / fw).min(side as f64 / fh);
    let fitted_w = (fw * scale).round() as u32;
    let fitted_h = (fh * scale).round() as u32;
    let fit = Letterbox {
        scale,
        pad_x: (side - fitted_w) / 2,
        pad_y: (side - fitted_h) / 2,
    };

    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, side as usize, side as usize), PAD_LEVEL);
    let pixels = frame.as_ndarray();
    let last_row = frame.height() as usize - 1;
    let last_col = frame.width() as usize - 1;
    let last_channel = frame.channels() as usize - 1;

    for y in 0..fitted_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(last_row);
        for x in 0..fitted_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(last_col);
            for c in 0..3 {
                tensor[[0, c, fit.pad_y as usize + y, fit.pad_x as usize + x]] =
                    pixels[[src_y, src_x, c.min(last_channel)]] as f32 / 255.0;
            }
        }
    }

    (tensor, fit)
}

/// Reads `[cx, cy, w, h, score, keypoints...]` rows out of a `[1, A, B]`
/// output, whichever axis holds the features.
fn decode(
    data: &[f32],
    shape: &[usize],
    confidence: f64,
    fit: &Letterbox,
) -> Result<Vec<Candidate>, Box<dyn std::error::Error>> {
    let [_, a, b] = shape else {
        return Err(format!("unexpected face model output shape {shape:?}").into());
    };
    let features_first = a < b;
    let (rows, features) = if features_first { (*b, *a) } else { (*a, *b) };
    if features < 5 {
        return Ok(Vec::new());
    }
    let at = |row: usize, feature: usize| {
        let i = if features_first {
            feature * rows + row
        } else {
            row * features + feature
        };
        data[i] as f64
    };

    Ok((0..rows)
        .filter(|&row| at(row, 4) >= confidence)
        .map(|row| fit.to_frame(at(row, 0), at(row, 1), at(row, 2), at(row, 3), at(row, 4)))
        .collect())
}

#[derive(Clone, Debug, PartialEq)]
struct Candidate {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    score: f64,
}

impl Candidate {
    fn area(&self) -> f64 {
        (self.right - self.left) * (self.bottom - self.top)
    }

    fn iou(&self, other: &Candidate) -> f64 {
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0.0);
        let overlap = w * h;
        if overlap == 0.0 {
            return 0.0;
        }
        overlap / (self.area() + other.area() - overlap)
    }

    fn into_region(self) -> Region {
        let x = self.left.round() as i32;
        let y = self.top.round() as i32;
        Region {
            x,
            y,
            width: self.right.round() as i32 - x,
            height: self.bottom.round() as i32 - y,
            score: self.score,
        }
    }
}

/// Greedy non-maximum suppression, highest score first.
fn suppress_overlaps(mut candidates: Vec<Candidate>, max_iou: f64) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| k.iou(&candidate) <= max_iou) {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: Letterbox = Letterbox {
        scale: 1.0,
        pad_x: 0,
        pad_y: 0,
    };

    fn candidate(left: f64, top: f64, right: f64, bottom: f64, score: f64) -> Candidate {
        Candidate {
            left,
            top,
            right,
            bottom,
            score,
        }
    }

    #[test]
    fn test_letterbox_pads_the_short_side() {
        let frame = Frame::new(vec![128u8; 200 * 100 * 3], 200, 100, 3, 0);
        let (tensor, fit) = letterbox(&frame, 640);

        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert_relative_eq!(fit.scale, 3.2);
        assert_eq!((fit.pad_x, fit.pad_y), (0, 160));
        assert_relative_eq!(tensor[[0, 0, 0, 0]], PAD_LEVEL);
        assert_relative_eq!(tensor[[0, 1, 200, 10]], 128.0 / 255.0);
    }

    #[test]
    fn test_letterbox_replicates_gray_frames() {
        let frame = Frame::new(vec![255u8; 10 * 10], 10, 10, 1, 0);
        let (tensor, _) = letterbox(&frame, 64);
        for c in 0..3 {
            assert_relative_eq!(tensor[[0, c, 5, 5]], 1.0);
        }
    }

    #[test]
    fn test_to_frame_undoes_padding_and_scale() {
        let fit = Letterbox {
            scale: 2.0,
            pad_x: 0,
            pad_y: 20,
        };
        let c = fit.to_frame(40.0, 60.0, 20.0, 40.0, 0.9);
        assert_eq!(c, candidate(15.0, 10.0, 25.0, 30.0, 0.9));
    }

    #[test]
    fn test_decode_rows_layout() {
        // six detections of five features; only the first passes
        let mut data = vec![0.0f32; 6 * 5];
        data[..5].copy_from_slice(&[50.0, 50.0, 20.0, 20.0, 0.9]);
        data[5..10].copy_from_slice(&[10.0, 10.0, 4.0, 4.0, 0.2]);
        let found = decode(&data, &[1, 6, 5], 0.5, &IDENTITY).unwrap();
        assert_eq!(found.len(), 1);
        assert_relative_eq!(found[0].left, 40.0);
        assert_relative_eq!(found[0].right, 60.0);
        assert_relative_eq!(found[0].score, 0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_decode_features_first_layout() {
        // five features for eight detections; only the third passes
        let mut data = vec![0.0f32; 5 * 8];
        for (feature, value) in [30.0, 40.0, 10.0, 10.0, 0.8].into_iter().enumerate() {
            data[feature * 8 + 2] = value;
        }
        let found = decode(&data, &[1, 5, 8], 0.5, &IDENTITY).unwrap();
        assert_eq!(found.len(), 1);
        assert_relative_eq!(found[0].left, 25.0);
        assert_relative_eq!(found[0].bottom, 45.0);
    }

    #[test]
    fn test_decode_rejects_unexpected_rank() {
        assert!(decode(&[0.0; 4], &[2, 2], 0.5, &IDENTITY).is_err());
    }

    #[test]
    fn test_decode_without_score_column_finds_nothing() {
        let found = decode(&[0.0; 8], &[1, 2, 4], 0.5, &IDENTITY).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_suppression_keeps_the_stronger_box() {
        let kept = suppress_overlaps(
            vec![
                candidate(0.0, 0.0, 100.0, 100.0, 0.5),
                candidate(2.0, 2.0, 102.0, 102.0, 0.9),
                candidate(200.0, 200.0, 250.0, 250.0, 0.7),
            ],
            0.3,
        );
        let scores: Vec<f64> = kept.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.9, 0.7]);
    }

    #[test]
    fn test_iou() {
        let a = candidate(0.0, 0.0, 10.0, 10.0, 1.0);
        assert_relative_eq!(a.iou(&a), 1.0);
        assert_relative_eq!(a.iou(&candidate(20.0, 20.0, 30.0, 30.0, 1.0)), 0.0);
        assert_relative_eq!(a.iou(&candidate(5.0, 0.0, 15.0, 10.0, 1.0)), 50.0 / 150.0);
    }

    #[test]
    fn test_into_region_rounds_corners() {
        let r = candidate(-3.4, 10.6, 50.5, 80.2, 0.7).into_region();
        assert_eq!((r.x, r.y, r.width, r.height), (-3, 11, 54, 69));
        assert_relative_eq!(r.score, 0.7);
    }
}
