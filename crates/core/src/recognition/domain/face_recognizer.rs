use std::path::{Path, PathBuf};

use image::GrayImage;
use thiserror::Error;

use crate::samples::domain::face_sample::LabeledFace;

#[derive(Error, Debug)]
pub enum RecognizerError {
    #[error("recogniser has not been trained")]
    NotTrained,
    #[error("no face samples to train on")]
    EmptyTrainingSet,
    #[error("face image is too small ({width}x{height})")]
    FaceTooSmall { width: u32, height: u32 },
    #[error("failed to access model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode model to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error("model file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

/// Nearest training label and its distance. Lower is more similar.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub distance: f64,
}

/// A face classifier rebuilt from scratch on every `train` call.
pub trait FaceRecognizer: Send {
    /// Replaces any previous state with one learned from `faces`.
    fn train(&mut self, faces: &[LabeledFace]) -> Result<(), RecognizerError>;

    fn predict(&self, face: &GrayImage) -> Result<Prediction, RecognizerError>;

    fn is_trained(&self) -> bool;

    fn save(&self, path: &Path) -> Result<(), RecognizerError>;

    fn load(&mut self, path: &Path) -> Result<(), RecognizerError>;
}
