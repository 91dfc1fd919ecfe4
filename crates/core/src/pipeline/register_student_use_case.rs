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
pub enum RegistrationOutcome {
    /// The student is on the roster and the model includes their samples.
    Registered {
        student: Student,
        capture: CaptureReport,
        training: TrainOutcome,
    },
    /// Capture ended before the target. Partial samples were removed and
    /// the roster is unchanged.
    Incomplete { capture: CaptureReport },
}

/// Enrols a new student: captures their face samples, adds them to the
/// roster and retrains the model.
pub struct RegisterStudentUseCase {
    students: Box<dyn StudentRepository>,
    samples: Box<dyn SampleStore>,
    camera: Box<dyn CameraSource>,
    detector: Box<dyn FaceDetector>,
    trainer: ModelTrainer,
    capture: CaptureSamplesUseCase,
}

impl RegisterStudentUseCase {
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

    /// Validation and duplicate errors are returned before the camera is
    /// touched.
    pub fn execute(
        &mut self,
        id: &str,
        name: &str,
        observer: &mut dyn SessionObserver,
    ) -> Result<RegistrationOutcome, Box<dyn std::error::Error>> {
        let student = Student::new(id, name)?;
        if self.students.contains(&student.id) {
            return Err(RosterError::DuplicateStudent(student.id).into());
        }

        let orphans = self.samples.remove_for(&student.id)?;
        if orphans > 0 {
            log::warn!(
                "Removed {orphans} orphan samples for unregistered id {}",
                student.id
            );
        }

        let captured = self.capture.execute(
            self.camera.as_mut(),
            self.detector.as_mut(),
            self.samples.as_mut(),
            &student,
            observer,
        );
        let capture = match captured {
            Ok(report) if report.is_complete() => report,
            Ok(report) => {
                self.discard_partial(&student.id);
                observer.info("Registration cancelled, no samples were kept");
                return Ok(RegistrationOutcome::Incomplete { capture: report });
            }
            Err(e) => {
                self.discard_partial(&student.id);
                return Err(e);
            }
        };

        self.students.add(student.clone())?;
        log::info!("Registered student {} ({})", student.id, student.name);
        observer.info("Training face model...");
        let training = self.trainer.retrain(self.samples.as_ref())?;
        observer.info(&format!("Student {} registered", student.name));

        Ok(RegistrationOutcome::Registered {
            student,
            capture,
            training,
        })
    }

    fn discard_partial(&mut self, student_id: &str) {
        match self.samples.remove_for(student_id) {
            Ok(n) => log::info!("Discarded {n} partial samples for {student_id}"),
            Err(e) => log::error!("Failed to discard partial samples for {student_id}: {e}"),
        }
    }
}
