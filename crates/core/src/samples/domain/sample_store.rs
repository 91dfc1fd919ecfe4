use std::path::PathBuf;

use image::GrayImage;
use thiserror::Error;

use super::face_sample::{LabeledFace, SampleName};

#[derive(Error, Debug)]
pub enum SampleStoreError {
    #[error("failed to access sample directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write sample {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The face-sample set: the source of truth the recogniser is trained from.
pub trait SampleStore: Send {
    fn save(&mut self, sample: &SampleName, face: &GrayImage) -> Result<PathBuf, SampleStoreError>;

    /// Number of samples whose label is `student_id`.
    fn count_for(&self, student_id: &str) -> Result<usize, SampleStoreError>;

    /// Deletes every sample labelled `student_id`, returning how many went.
    fn remove_for(&mut self, student_id: &str) -> Result<usize, SampleStoreError>;

    /// Every readable sample with its label. Unreadable images are skipped.
    fn load_all(&self) -> Result<Vec<LabeledFace>, SampleStoreError>;
}
