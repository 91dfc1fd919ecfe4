use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::recognition::domain::face_recognizer::{FaceRecognizer, Prediction, RecognizerError};
use crate::samples::domain::face_sample::LabeledFace;

use super::local_binary_pattern::{chi_square, lbp_codes, spatial_histogram, LbpParams};

/// Serialized recogniser state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct LbphModel {
    params: LbpParams,
    labels: Vec<String>,
    histograms: Vec<Vec<f32>>,
}

/// Local binary pattern histogram recogniser.
///
/// Each training face is reduced to a spatial histogram of LBP codes.
/// A query is answered with the label of the closest training histogram
/// under the chi-square distance.
pub struct LbphRecognizer {
    model: LbphModel,
}

impl LbphRecognizer {
    pub fn new(params: LbpParams) -> Self {
        Self {
            model: LbphModel {
                params,
                ..LbphModel::default()
            },
        }
    }

    pub fn params(&self) -> LbpParams {
        self.model.params
    }

    /// Number of training histograms held.
    pub fn len(&self) -> usize {
        self.model.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.model.labels.is_empty()
    }

    fn histogram(&self, face: &GrayImage) -> Result<Vec<f32>, RecognizerError> {
        let params = &self.model.params;
        let (width, height) = face.dimensions();
        if width.min(height) < params.min_side() {
            return Err(RecognizerError::FaceTooSmall { width, height });
        }
        let codes = lbp_codes(face, params);
        Ok(spatial_histogram(codes.view(), params))
    }
}

impl Default for LbphRecognizer {
    fn default() -> Self {
        Self::new(LbpParams::default())
    }
}

impl FaceRecognizer for LbphRecognizer {
    fn train(&mut self, faces: &[LabeledFace]) -> Result<(), RecognizerError> {
        if faces.is_empty() {
            return Err(RecognizerError::EmptyTrainingSet);
        }
        let mut labels = Vec::with_capacity(faces.len());
        let mut histograms = Vec::with_capacity(faces.len());
        for face in faces {
            histograms.push(self.histogram(&face.image)?);
            labels.push(face.label.clone());
        }
        self.model.labels = labels;
        self.model.histograms = histograms;
        Ok(())
    }

    fn predict(&self, face: &GrayImage) -> Result<Prediction, RecognizerError> {
        if self.is_empty() {
            return Err(RecognizerError::NotTrained);
        }
        let query = self.histogram(face)?;
        let (best, distance) = self
            .model
            .histograms
            .iter()
            .enumerate()
            .map(|(i, h)| (i, chi_square(h, &query)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(RecognizerError::NotTrained)?;
        Ok(Prediction {
            label: self.model.labels[best].clone(),
            distance,
        })
    }

    fn is_trained(&self) -> bool {
        !self.is_empty()
    }

    fn save(&self, path: &Path) -> Result<(), RecognizerError> {
        let io_err = |source| RecognizerError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut part = path.as_os_str().to_os_string();
        part.push(".part");
        let part = Path::new(&part);

        let file = File::create(part).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        let written = bincode::serialize_into(&mut writer, &self.model)
            .map_err(|source| RecognizerError::Encode {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|()| writer.flush().map_err(io_err));
        if let Err(e) = written {
            let _ = fs::remove_file(part);
            return Err(e);
        }
        fs::rename(part, path).map_err(io_err)?;
        log::debug!("Saved {} face histograms to {}", self.len(), path.display());
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<(), RecognizerError> {
        let file = File::open(path).map_err(|source| RecognizerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: LbphModel = bincode::deserialize_from(BufReader::new(file)).map_err(|source| {
            RecognizerError::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if model.labels.len() != model.histograms.len() {
            return Err(RecognizerError::Corrupt {
                path: path.to_path_buf(),
                source: Box::new(bincode::ErrorKind::Custom(
                    "label and histogram counts differ".into(),
                )),
            });
        }
        self.model = model;
        Ok(())
    }
}
