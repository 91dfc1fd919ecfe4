use crate::detection::domain::face_detector::FaceDetector;
use crate::roster::domain::roster_error::RosterError;
use crate::roster::domain::student::Student;
use crate::roster::domain::student_repository::StudentRepository;
use crate::samples::domain::sample_store::SampleStore;
use crate::video::domain::camera_source::CameraSource;

use super::capture_samples_use_case::{CaptureReport, CaptureSamplesUseCase};
use super::session_observer::SessionObserver;
use super::train_model_use_case::{ModelTrainer, TrainOutcome};

#[derive(Clone, Debug, PartialEq)]
pub struct RetrainReport {
    pub student: Student,
    pub removed: usize,
    pub capture: CaptureReport,
    pub training: TrainOutcome,
}

/// Replaces a registered student's face samples with a fresh set.
///
/// The old samples are deleted before capture starts. The model is
/// retrained afterwards even when capture ended early. If no samples are
/// left at all the old model file stays, and attendance refuses to run
/// until someone is registered again.
pub struct RetrainStudentUseCase {
    students: Box<dyn StudentRepository>,
    samples: Box<dyn SampleStore>,
    camera: Box<dyn CameraSource>,
    detector: Box<dyn FaceDetector>,
    trainer: ModelTrainer,
    capture: CaptureSamplesUseCase,
}

impl RetrainStudentUseCase {
    pub fn new(
        students: Box<dyn StudentRepository>,
        samples: Box<dyn SampleStore>,
        camera: Box<dyn CameraSource>,
        detector: Box<dyn FaceDetector>,
        trainer: ModelTrainer,
        capture: CaptureSamplesUseCase,
    ) -> Self {
        Self {
            students,
            samples,
            camera,
            detector,
            trainer,
            capture,
        }
    }

    pub fn execute(
        &mut self,
        id: &str,
        observer: &mut dyn SessionObserver,
    ) -> Result<RetrainReport, Box<dyn std::error::Error>> {
        let id = id.trim();
        let student = self
            .students
            .get(id)
            .cloned()
            .ok_or_else(|| RosterError::UnknownStudent(id.to_string()))?;

        let removed = self.samples.remove_for(&student.id)?;
        log::info!("Removed {removed} old samples for {}", student.id);

        let captured = self.capture.execute(
            self.camera.as_mut(),
            self.detector.as_mut(),
            self.samples.as_mut(),
            &student,
            observer,
        );

        observer.info("Training face model...");
        let training = self.trainer.retrain(self.samples.as_ref())?;
        let capture = captured?;
        if capture.is_complete() {
            observer.info(&format!("Retrained {}", student.name));
        } else {
            observer.info(&format!(
                "Retraining of {} ended early with {}/{} samples",
                student.name, capture.captured, capture.target
            ));
        }

        Ok(RetrainReport {
            student,
            removed,
            capture,
            training,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::session_observer::NullSessionObserver;
    use crate::pipeline::test_support::{
        checker, frame_of, stripes, MemorySampleStore, MemoryStudents, StubCamera, StubDetector,
    };
    use crate::recognition::domain::face_recognizer::FaceRecognizer;
    use crate::recognition::infrastructure::lbph_recognizer::LbphRecognizer;
    use crate::shared::constants::SAMPLE_TARGET;
    use crate::shared::frame::Frame;
    use std::time::Duration;

    // --- Helpers ---

    fn face_frames(n: usize) -> Vec<Frame> {
        (0..n).map(|i| frame_of(&checker(), i)).collect()
    }

    fn use_case(
        samples: &MemorySampleStore,
        frames: Vec<Frame>,
        model: &std::path::Path,
    ) -> RetrainStudentUseCase {
        RetrainStudentUseCase::new(
            Box::new(MemoryStudents::with(&[("1", "Ada"), ("2", "Bob")])),
            Box::new(samples.clone()),
            Box::new(StubCamera::new(frames)),
            Box::new(StubDetector::whole_frame()),
            ModelTrainer::lbph(model),
            CaptureSamplesUseCase::new(None, Some(Duration::ZERO), None),
        )
    }

    // --- Tests ---

    #[test]
    fn test_replaces_samples_with_exactly_target() {
        let tmp = tempfile::tempdir().unwrap();
        let model = tmp.path().join("face_model.bin");
        let samples = MemorySampleStore::seeded("1", "Ada", &stripes(), 13);

        let report = use_case(&samples, face_frames(40), &model)
            .execute("1", &mut NullSessionObserver)
            .unwrap();

        assert_eq!(report.removed, 13);
        assert!(report.capture.is_complete());
        assert_eq!(samples.count_for("1").unwrap(), SAMPLE_TARGET);

        let mut recognizer = LbphRecognizer::default();
        recognizer.load(&model).unwrap();
        assert_eq!(recognizer.len(), SAMPLE_TARGET);
        assert_eq!(recognizer.predict(&checker()).unwrap().label, "1");
    }

    #[test]
    fn test_unknown_student_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let samples = MemorySampleStore::seeded("9", "Ghost", &stripes(), 3);

        let err = use_case(&samples, face_frames(40), &tmp.path().join("m.bin"))
            .execute("9", &mut NullSessionObserver)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Student ID not found. Please register the student first."
        );
        assert_eq!(samples.count_for("9").unwrap(), 3);
    }

    #[test]
    fn test_early_end_still_retrains() {
        let tmp = tempfile::tempdir().unwrap();
        let model = tmp.path().join("face_model.bin");
        let samples = MemorySampleStore::seeded("1", "Ada", &stripes(), 20);
        let other = MemorySampleStore::seeded("2", "Bob", &stripes(), 4);
        let other_samples = other.samples.lock().unwrap().clone();
        samples.samples.lock().unwrap().extend(other_samples);

        let report = use_case(&samples, face_frames(3), &model)
            .execute("1", &mut NullSessionObserver)
            .unwrap();

        assert!(!report.capture.is_complete());
        assert_eq!(samples.count_for("1").unwrap(), 3);
        assert_eq!(
            report.training,
            TrainOutcome::Trained {
                faces: 7,
                students: 2
            }
        );
        assert!(model.is_file());
    }
}
