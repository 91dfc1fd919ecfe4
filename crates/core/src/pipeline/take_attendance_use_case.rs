use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::attendance::domain::attendance_log::AttendanceLog;
use crate::attendance::domain::attendance_record::AttendanceRecord;
use crate::attendance::domain::attendance_session::{AttendanceSession, FaceVerdict};
use crate::detection::domain::face_detector::FaceDetector;
use crate::roster::domain::roster_error::RosterError;
use crate::roster::domain::student::Student;
use crate::roster::domain::student_repository::StudentRepository;
use crate::roster::domain::subject::{parse_choice, Subject};
use crate::roster::domain::subject_repository::SubjectRepository;
use crate::samples::domain::sample_store::SampleStore;
use crate::shared::constants::{RECOGNITION_THRESHOLD, REQUIRED_RECOGNITIONS};
use crate::video::domain::camera_source::CameraSource;

use super::annotate::{draw_annotations, Annotation, BoxColor};
use super::face_crop::normalize_face;
use super::session_observer::SessionObserver;
use super::train_model_use_case::{ModelTrainer, TrainOutcome};

pub const NO_MODEL_MESSAGE: &str = "No trained model found. Please register students first.";
pub const NO_SUBJECT_MESSAGE: &str = "Please choose a subject first.";

const UNKNOWN_LABEL: &str = "Unknown";

/// Resolves a subject picker label to a rostered subject.
pub fn select_subject(
    choice: &str,
    subjects: &dyn SubjectRepository,
) -> Result<Subject, Box<dyn std::error::Error>> {
    let code = parse_choice(choice).ok_or(NO_SUBJECT_MESSAGE)?;
    subjects
        .get(code)
        .cloned()
        .ok_or_else(|| RosterError::UnknownSubject(code.to_string()).into())
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttendanceOutcome {
    /// A student was recognised often enough. `newly_recorded` is false
    /// when they were already in today's log.
    Marked {
        record: AttendanceRecord,
        newly_recorded: bool,
    },
    /// Cancelled by the user.
    Stopped,
    /// The camera failed or ran out of frames.
    SourceEnded,
}

/// Runs one attendance session for a subject.
///
/// The model is retrained from the stored samples first. Then every face
/// in every frame is classified until one student has been recognised
/// `required` times; that student is marked present and the session ends.
pub struct TakeAttendanceUseCase {
    students: Box<dyn StudentRepository>,
    log: Box<dyn AttendanceLog>,
    samples: Box<dyn SampleStore>,
    camera: Box<dyn CameraSource>,
    detector: Box<dyn FaceDetector>,
    trainer: ModelTrainer,
    threshold: f64,
    required: u32,
    cancelled: Arc<AtomicBool>,
}

impl TakeAttendanceUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        students: Box<dyn StudentRepository>,
        log: Box<dyn AttendanceLog>,
        samples: Box<dyn SampleStore>,
        camera: Box<dyn CameraSource>,
        detector: Box<dyn FaceDetector>,
        trainer: ModelTrainer,
        threshold: Option<f64>,
        required: Option<u32>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            students,
            log,
            samples,
            camera,
            detector,
            trainer,
            threshold: threshold.unwrap_or(RECOGNITION_THRESHOLD),
            required: required.unwrap_or(REQUIRED_RECOGNITIONS),
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(
        &mut self,
        subject: &Subject,
        observer: &mut dyn SessionObserver,
    ) -> Result<AttendanceOutcome, Box<dyn std::error::Error>> {
        if !self.trainer.has_model_file() {
            return Err(NO_MODEL_MESSAGE.into());
        }
        observer.info("Training face model...");
        // A saved model with no samples behind it may name deleted students.
        let training = self.trainer.warm_start(self.samples.as_ref())?;
        if training == TrainOutcome::NoSamples || !self.trainer.recognizer().is_trained() {
            return Err(NO_MODEL_MESSAGE.into());
        }

        let info = self.camera.open()?;
        observer.info(&format!(
            "Taking attendance for {} from {}",
            subject.choice_label(),
            info.description
        ));
        let mut session = AttendanceSession::new(self.threshold, self.required);
        let result = self.run(&mut session, observer);
        self.camera.close();
        session.finish();

        let outcome = match result? {
            Some(student) => {
                let mark = self.log.mark(&subject.code, &student.id, &student.name)?;
                if mark.is_new() {
                    observer.info(&format!("Attendance marked for {}", student.name));
                } else {
                    observer.info(&format!("{} is already marked present", student.name));
                }
                AttendanceOutcome::Marked {
                    record: mark.record().clone(),
                    newly_recorded: mark.is_new(),
                }
            }
            None if self.cancelled.load(Ordering::Relaxed) => AttendanceOutcome::Stopped,
            None => AttendanceOutcome::SourceEnded,
        };
        log::info!("Attendance session for {} ended: {outcome:?}", subject.code);
        Ok(outcome)
    }

    /// Classifies frames until a student reaches the requirement, the user
    /// cancels or the camera stops.
    fn run(
        &mut self,
        session: &mut AttendanceSession,
        observer: &mut dyn SessionObserver,
    ) -> Result<Option<Student>, Box<dyn std::error::Error>> {
        let Self {
            students,
            camera,
            detector,
            trainer,
            cancelled,
            ..
        } = self;
        let recognizer = trainer.recognizer();
        let required = session.required();

        for frame in camera.frames() {
            if cancelled.load(Ordering::Relaxed) {
                return Ok(None);
            }
            let mut frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Camera read failed: {e}");
                    return Ok(None);
                }
            };

            let mut annotations = Vec::new();
            let mut reached = None;
            let mut best = 0;
            for region in detector.detect(&frame)? {
                let Some(face) = normalize_face(&frame, &region) else {
                    continue;
                };
                let prediction = match recognizer.predict(&face) {
                    Ok(p) => p,
                    Err(e) => {
                        log::warn!("Skipping face in frame {}: {e}", frame.index());
                        continue;
                    }
                };
                let annotation = match session.observe(&prediction, &**students) {
                    FaceVerdict::Unknown => Annotation::new(region, BoxColor::Red, UNKNOWN_LABEL),
                    FaceVerdict::Counting { student, count } => {
                        best = best.max(count);
                        let label = format!("{} [{count}/{required}]", student.name);
                        Annotation::new(region, BoxColor::Orange, label)
                    }
                    FaceVerdict::Reached { student } => {
                        best = required;
                        let label = student.name.clone();
                        reached = Some(student);
                        Annotation::new(region, BoxColor::Green, label)
                    }
                };
                annotations.push(annotation);
            }

            draw_annotations(&mut frame, &annotations);
            observer.frame(&frame, &annotations);
            observer.progress(best as usize, required as usize);

            if reached.is_some() {
                return Ok(reached);
            }
        }

        Ok(None)
    }
}
