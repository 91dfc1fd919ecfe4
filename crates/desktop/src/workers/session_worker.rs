use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use rollcall_core::attendance::domain::clock::SystemClock;
use rollcall_core::attendance::infrastructure::csv_attendance_log::CsvAttendanceLog;
use rollcall_core::detection::domain::face_detector::FaceDetector;
use rollcall_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use rollcall_core::pipeline::annotate::{Annotation, BoxColor};
use rollcall_core::pipeline::capture_samples_use_case::CaptureSamplesUseCase;
use rollcall_core::pipeline::register_student_use_case::{
    RegisterStudentUseCase, RegistrationOutcome,
};
use rollcall_core::pipeline::retrain_student_use_case::{RetrainReport, RetrainStudentUseCase};
use rollcall_core::pipeline::session_observer::SessionObserver;
use rollcall_core::pipeline::take_attendance_use_case::{AttendanceOutcome, TakeAttendanceUseCase};
use rollcall_core::pipeline::train_model_use_case::{ModelTrainer, TrainOutcome};
use rollcall_core::roster::domain::student::Student;
use rollcall_core::roster::domain::student_repository::StudentRepository;
use rollcall_core::roster::domain::subject::Subject;
use rollcall_core::roster::infrastructure::csv_student_repository::CsvStudentRepository;
use rollcall_core::samples::domain::sample_store::SampleStore;
use rollcall_core::samples::infrastructure::image_sample_store::ImageSampleStore;
use rollcall_core::shared::constants::DETECTION_CONFIDENCE;
use rollcall_core::shared::data_layout::DataLayout;
use rollcall_core::shared::frame::Frame;
use rollcall_core::video::domain::camera_source::CameraSource;
use rollcall_core::video::infrastructure::ffmpeg_camera::FfmpegCamera;
use rollcall_core::video::infrastructure::image_folder_source::ImageFolderSource;

use super::model_cache::ModelCache;

/// A workflow run off the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Load the saved model and retrain it from the stored samples.
    Train,
    Register { id: String, name: String },
    Retrain { id: String },
    Attend { subject: Subject },
    /// Remove a student and their samples, then retrain.
    Remove { id: String },
}

impl Job {
    pub fn uses_camera(&self) -> bool {
        matches!(
            self,
            Job::Register { .. } | Job::Retrain { .. } | Job::Attend { .. }
        )
    }
}

/// Messages sent from the worker thread to the UI.
#[derive(Debug)]
pub enum WorkerMessage {
    DownloadProgress(u64, u64),
    Frame(FramePreview),
    Progress(usize, usize),
    Info(String),
    Complete(JobResult),
    Error(String),
    Cancelled,
}

/// An annotated camera frame, converted to RGBA for display.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePreview {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub captions: Vec<(String, BoxColor)>,
}

impl FramePreview {
    pub fn new(frame: &Frame, annotations: &[Annotation]) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            rgba: frame.to_rgba(),
            captions: annotations
                .iter()
                .filter(|a| !a.label.is_empty())
                .map(|a| (a.label.clone(), a.color))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    Trained(TrainOutcome),
    Registered(RegistrationOutcome),
    Retrained(RetrainReport),
    Attendance(AttendanceOutcome),
    Removed {
        student: Student,
        samples: usize,
        training: TrainOutcome,
    },
}

impl JobResult {
    /// One-line status for the tab that started the job.
    pub fn summary(&self) -> String {
        match self {
            JobResult::Trained(TrainOutcome::Trained { faces, students }) => {
                format!("Face model ready: {faces} samples of {students} students")
            }
            JobResult::Trained(TrainOutcome::NoSamples) => {
                "No face samples yet. Register students to train the model.".into()
            }
            JobResult::Registered(RegistrationOutcome::Registered { .. }) => {
                "Registration completed successfully!".into()
            }
            JobResult::Registered(RegistrationOutcome::Incomplete { capture }) => format!(
                "Registration stopped after {}/{} samples. Nothing was saved.",
                capture.captured, capture.target
            ),
            JobResult::Retrained(report) if report.capture.is_complete() => {
                "Student retraining completed successfully!".into()
            }
            JobResult::Retrained(report) => format!(
                "Retraining of {} ended early with {}/{} samples",
                report.student.name, report.capture.captured, report.capture.target
            ),
            JobResult::Attendance(AttendanceOutcome::Marked {
                record,
                newly_recorded: true,
            }) => format!("Attendance marked for {}", record.name),
            JobResult::Attendance(AttendanceOutcome::Marked { record, .. }) => {
                format!("{} is already marked present", record.name)
            }
            JobResult::Attendance(AttendanceOutcome::Stopped) => "Attendance stopped".into(),
            JobResult::Attendance(AttendanceOutcome::SourceEnded) => {
                "Camera stopped before anyone was recognised".into()
            }
            JobResult::Removed { student, samples, .. } => format!(
                "Removed {} ({}) and {samples} face samples",
                student.name, student.id
            ),
        }
    }

    /// Whether the result deserves a dialog rather than just a status line.
    pub fn is_milestone(&self) -> bool {
        matches!(
            self,
            JobResult::Registered(RegistrationOutcome::Registered { .. })
                | JobResult::Retrained(_)
                | JobResult::Attendance(AttendanceOutcome::Marked { .. })
                | JobResult::Removed { .. }
        )
    }
}

/// Parameters for a job.
pub struct JobParams {
    pub job: Job,
    pub layout: DataLayout,
    /// Capture device, or a folder of images to replay.
    pub camera_device: String,
    pub model_cache: Arc<ModelCache>,
}

/// Forwards session events to the UI thread.
pub struct ChannelObserver {
    tx: Sender<WorkerMessage>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<WorkerMessage>) -> Self {
        Self { tx }
    }
}

impl SessionObserver for ChannelObserver {
    fn frame(&mut self, frame: &Frame, annotations: &[Annotation]) {
        let _ = self
            .tx
            .send(WorkerMessage::Frame(FramePreview::new(frame, annotations)));
    }

    fn progress(&mut self, current: usize, total: usize) {
        let _ = self.tx.send(WorkerMessage::Progress(current, total));
    }

    fn info(&mut self, message: &str) {
        let _ = self.tx.send(WorkerMessage::Info(message.to_string()));
    }
}

/// Spawn a background job. Returns the channel receiver and cancellation token.
pub fn spawn(params: JobParams) -> (Receiver<WorkerMessage>, Arc<AtomicBool>) {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();
    let cancelled = Arc::new(AtomicBool::new(false));
    let cancelled_clone = cancelled.clone();

    thread::spawn(move || {
        let message = match run_job(&tx, &cancelled_clone, &params) {
            Ok(result) => WorkerMessage::Complete(result),
            Err(_) if cancelled_clone.load(Ordering::Relaxed) => WorkerMessage::Cancelled,
            Err(e) => {
                log::error!("{:?} failed: {e}", params.job);
                WorkerMessage::Error(e.to_string())
            }
        };
        let _ = tx.send(message);
    });

    (rx, cancelled)
}

fn run_job(
    tx: &Sender<WorkerMessage>,
    cancelled: &Arc<AtomicBool>,
    params: &JobParams,
) -> Result<JobResult, Box<dyn std::error::Error>> {
    let layout = &params.layout;
    layout.ensure()?;
    let mut observer = ChannelObserver::new(tx.clone());
    let capture = || CaptureSamplesUseCase::new(None, None, Some(cancelled.clone()));

    match &params.job {
        Job::Train => {
            observer.info("Training face model...");
            let samples = ImageSampleStore::new(layout.samples_dir());
            let mut trainer = ModelTrainer::lbph(layout.model_file());
            Ok(JobResult::Trained(trainer.warm_start(&samples)?))
        }
        Job::Register { id, name } => {
            let detector = build_detector(tx, cancelled, &params.model_cache)?;
            let mut use_case = RegisterStudentUseCase::new(
                Box::new(CsvStudentRepository::open(layout.students_file())?),
                Box::new(ImageSampleStore::new(layout.samples_dir())),
                open_camera(&params.camera_device),
                detector,
                ModelTrainer::lbph(layout.model_file()),
                capture(),
            );
            observer.info("Please move your face in different positions and angles...");
            Ok(JobResult::Registered(
                use_case.execute(id, name, &mut observer)?,
            ))
        }
        Job::Retrain { id } => {
            let detector = build_detector(tx, cancelled, &params.model_cache)?;
            let mut use_case = RetrainStudentUseCase::new(
                Box::new(CsvStudentRepository::open(layout.students_file())?),
                Box::new(ImageSampleStore::new(layout.samples_dir())),
                open_camera(&params.camera_device),
                detector,
                ModelTrainer::lbph(layout.model_file()),
                capture(),
            );
            observer.info("Please move your face in different positions and angles...");
            Ok(JobResult::Retrained(use_case.execute(id, &mut observer)?))
        }
        Job::Attend { subject } => {
            let detector = build_detector(tx, cancelled, &params.model_cache)?;
            let mut use_case = TakeAttendanceUseCase::new(
                Box::new(CsvStudentRepository::open(layout.students_file())?),
                Box::new(CsvAttendanceLog::new(
                    layout.attendance_dir(),
                    Box::new(SystemClock),
                )),
                Box::new(ImageSampleStore::new(layout.samples_dir())),
                open_camera(&params.camera_device),
                detector,
                ModelTrainer::lbph(layout.model_file()),
                None,
                None,
                Some(cancelled.clone()),
            );
            Ok(JobResult::Attendance(
                use_case.execute(subject, &mut observer)?,
            ))
        }
        Job::Remove { id } => {
            let mut students = CsvStudentRepository::open(layout.students_file())?;
            let student = students.remove(id)?;
            let mut samples = ImageSampleStore::new(layout.samples_dir());
            let removed = samples.remove_for(&student.id)?;
            observer.info("Training face model...");
            let training = ModelTrainer::lbph(layout.model_file()).retrain(&samples)?;
            Ok(JobResult::Removed {
                student,
                samples: removed,
                training,
            })
        }
    }
}

/// A directory replays the images inside it; anything else is a capture device.
fn open_camera(device: &str) -> Box<dyn CameraSource> {
    if Path::new(device).is_dir() {
        Box::new(ImageFolderSource::new(device))
    } else {
        Box::new(FfmpegCamera::new(device))
    }
}

fn build_detector(
    tx: &Sender<WorkerMessage>,
    cancelled: &Arc<AtomicBool>,
    model_cache: &ModelCache,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let tx_dl = tx.clone();
    let model_path = model_cache
        .wait_for_model(
            &|dl, total| {
                let _ = tx_dl.send(WorkerMessage::DownloadProgress(dl, total));
            },
            cancelled,
        )
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

    if cancelled.load(Ordering::Relaxed) {
        return Err("Cancelled".into());
    }

    Ok(Box::new(OnnxYoloDetector::new(
        &model_path,
        DETECTION_CONFIDENCE,
    )?))
}
