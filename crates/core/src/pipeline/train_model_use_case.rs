use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::recognition::domain::face_recognizer::FaceRecognizer;
use crate::recognition::infrastructure::lbph_recognizer::LbphRecognizer;
use crate::samples::domain::face_sample::LabeledFace;
use crate::samples::domain::sample_store::SampleStore;

pub type RecognizerFactory = Box<dyn Fn() -> Box<dyn FaceRecognizer> + Send>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrainOutcome {
    Trained { faces: usize, students: usize },
    /// There were no samples; nothing was trained and the model file was left alone.
    NoSamples,
}

/// Rebuilds the face recogniser from every stored sample and persists it.
///
/// If training or saving fails, the model file is deleted and a fresh
/// recogniser from the factory gets one more attempt. A second failure
/// is returned to the caller.
pub struct ModelTrainer {
    recognizer: Box<dyn FaceRecognizer>,
    factory: RecognizerFactory,
    model_path: PathBuf,
}

impl ModelTrainer {
    pub fn new(factory: RecognizerFactory, model_path: impl Into<PathBuf>) -> Self {
        Self {
            recognizer: factory(),
            factory,
            model_path: model_path.into(),
        }
    }

    /// Trainer for the default LBPH recogniser.
    pub fn lbph(model_path: impl Into<PathBuf>) -> Self {
        Self::new(
            Box::new(|| -> Box<dyn FaceRecognizer> { Box::new(LbphRecognizer::default()) }),
            model_path,
        )
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn has_model_file(&self) -> bool {
        self.model_path.is_file()
    }

    pub fn recognizer(&self) -> &dyn FaceRecognizer {
        self.recognizer.as_ref()
    }

    /// Loads the saved model when there is one, then retrains regardless.
    /// A model that fails to load is ignored.
    pub fn warm_start(
        &mut self,
        samples: &dyn SampleStore,
    ) -> Result<TrainOutcome, Box<dyn std::error::Error>> {
        if self.has_model_file() {
            match self.recognizer.load(&self.model_path) {
                Ok(()) => log::debug!("Loaded face model {}", self.model_path.display()),
                Err(e) => log::warn!("Ignoring unreadable face model: {e}"),
            }
        }
        self.retrain(samples)
    }

    pub fn retrain(
        &mut self,
        samples: &dyn SampleStore,
    ) -> Result<TrainOutcome, Box<dyn std::error::Error>> {
        let faces = samples.load_all()?;
        if faces.is_empty() {
            log::info!("No face samples found, skipping training");
            return Ok(TrainOutcome::NoSamples);
        }
        let students = faces
            .iter()
            .map(|f| f.label.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        if let Err(first) = self.train_and_save(&faces) {
            log::warn!("Training failed ({first}), rebuilding the model from scratch");
            remove_model_file(&self.model_path)?;
            self.recognizer = (self.factory)();
            self.train_and_save(&faces)?;
        }

        log::info!(
            "Trained face model on {} samples of {students} students",
            faces.len()
        );
        Ok(TrainOutcome::Trained {
            faces: faces.len(),
            students,
        })
    }

    fn train_and_save(
        &mut self,
        faces: &[LabeledFace],
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.recognizer.train(faces)?;
        self.recognizer.save(&self.model_path)?;
        Ok(())
    }
}

fn remove_model_file(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{checker, stripes, MemorySampleStore};
    use crate::recognition::domain::face_recognizer::{Prediction, RecognizerError};
    use image::GrayImage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // --- Stubs ---

    /// Recogniser whose save always fails.
    struct BrokenSave;

    impl FaceRecognizer for BrokenSave {
        fn train(&mut self, _faces: &[LabeledFace]) -> Result<(), RecognizerError> {
            Ok(())
        }
        fn predict(&self, _face: &GrayImage) -> Result<Prediction, RecognizerError> {
            Err(RecognizerError::NotTrained)
        }
        fn is_trained(&self) -> bool {
            true
        }
        fn save(&self, path: &Path) -> Result<(), RecognizerError> {
            Err(RecognizerError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::other("read-only"),
            })
        }
        fn load(&mut self, _path: &Path) -> Result<(), RecognizerError> {
            Ok(())
        }
    }

    /// Factory handing out a broken recogniser first, then real ones.
    fn flaky_factory(calls: Arc<AtomicUsize>) -> RecognizerFactory {
        Box::new(move || -> Box<dyn FaceRecognizer> {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Box::new(BrokenSave)
            } else {
                Box::new(LbphRecognizer::default())
            }
        })
    }

    fn two_students() -> MemorySampleStore {
        let store = MemorySampleStore::seeded("1", "Ada", &stripes(), 3);
        let other = MemorySampleStore::seeded("2", "Bob", &checker(), 2);
        store
            .samples
            .lock()
            .unwrap()
            .extend(other.samples.lock().unwrap().drain(..));
        store
    }

    // --- Tests ---

    #[test]
    fn test_trains_and_saves_model() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("trainer/face_model.bin");
        let mut trainer = ModelTrainer::lbph(&path);

        let outcome = trainer.retrain(&two_students()).unwrap();

        assert_eq!(
            outcome,
            TrainOutcome::Trained {
                faces: 5,
                students: 2
            }
        );
        assert!(path.is_file());
        assert!(trainer.recognizer().is_trained());
        let mut reloaded = LbphRecognizer::default();
        reloaded.load(&path).unwrap();
        assert_eq!(reloaded.len(), 5);
    }

    #[test]
    fn test_empty_sample_set_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("face_model.bin");
        std::fs::write(&path, b"previous").unwrap();
        let mut trainer = ModelTrainer::lbph(&path);

        let outcome = trainer.retrain(&MemorySampleStore::default()).unwrap();

        assert_eq!(outcome, TrainOutcome::NoSamples);
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
        assert!(!trainer.recognizer().is_trained());
    }

    #[test]
    fn test_fallback_replaces_corrupt_model() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("face_model.bin");
        std::fs::write(&path, b"garbage").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut trainer = ModelTrainer::new(flaky_factory(calls.clone()), &path);

        trainer.warm_start(&two_students()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let mut reloaded = LbphRecognizer::default();
        reloaded.load(&path).unwrap();
        assert_eq!(reloaded.len(), 5);
    }

    #[test]
    fn test_second_failure_propagates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("face_model.bin");
        std::fs::write(&path, b"garbage").unwrap();
        let mut trainer = ModelTrainer::new(
            Box::new(|| -> Box<dyn FaceRecognizer> { Box::new(BrokenSave) }),
            &path,
        );

        assert!(trainer.retrain(&two_students()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_warm_start_ignores_unreadable_model() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("face_model.bin");
        std::fs::write(&path, b"not bincode").unwrap();
        let mut trainer = ModelTrainer::lbph(&path);

        let outcome = trainer.warm_start(&two_students()).unwrap();
        assert!(matches!(outcome, TrainOutcome::Trained { faces: 5, .. }));
    }

    #[test]
    fn test_warm_start_without_samples_keeps_loaded_model() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("face_model.bin");
        ModelTrainer::lbph(&path).retrain(&two_students()).unwrap();

        let mut trainer = ModelTrainer::lbph(&path);
        let outcome = trainer.warm_start(&MemorySampleStore::default()).unwrap();

        assert_eq!(outcome, TrainOutcome::NoSamples);
        assert!(trainer.recognizer().is_trained());
        let prediction = trainer.recognizer().predict(&stripes()).unwrap();
        assert_eq!(prediction.label, "1");
    }
}
