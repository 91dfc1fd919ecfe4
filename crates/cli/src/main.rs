use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use rollcall_core::attendance::domain::attendance_log::AttendanceLog;
use rollcall_core::attendance::domain::attendance_record::{
    no_records_message, records_title, DISPLAY_DATE_FORMAT,
};
use rollcall_core::attendance::domain::clock::SystemClock;
use rollcall_core::attendance::infrastructure::csv_attendance_log::CsvAttendanceLog;
use rollcall_core::detection::domain::face_detector::FaceDetector;
use rollcall_core::detection::infrastructure::model_resolver;
use rollcall_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use rollcall_core::pipeline::capture_samples_use_case::CaptureSamplesUseCase;
use rollcall_core::pipeline::register_student_use_case::{
    RegisterStudentUseCase, RegistrationOutcome,
};
use rollcall_core::pipeline::retrain_student_use_case::RetrainStudentUseCase;
use rollcall_core::pipeline::session_observer::LogSessionObserver;
use rollcall_core::pipeline::take_attendance_use_case::{
    select_subject, AttendanceOutcome, TakeAttendanceUseCase,
};
use rollcall_core::pipeline::train_model_use_case::{ModelTrainer, TrainOutcome};
use rollcall_core::roster::domain::student_repository::StudentRepository;
use rollcall_core::roster::domain::subject::Subject;
use rollcall_core::roster::domain::subject_repository::SubjectRepository;
use rollcall_core::roster::infrastructure::csv_student_repository::CsvStudentRepository;
use rollcall_core::roster::infrastructure::csv_subject_repository::CsvSubjectRepository;
use rollcall_core::samples::domain::sample_store::SampleStore;
use rollcall_core::samples::infrastructure::image_sample_store::ImageSampleStore;
use rollcall_core::shared::constants::{
    DEFAULT_CAMERA_DEVICE, DETECTION_CONFIDENCE, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use rollcall_core::shared::data_layout::DataLayout;
use rollcall_core::video::domain::camera_source::CameraSource;
use rollcall_core::video::infrastructure::ffmpeg_camera::FfmpegCamera;
use rollcall_core::video::infrastructure::image_folder_source::ImageFolderSource;

/// Face-recognition attendance from the command line.
#[derive(Parser)]
#[command(name = "rollcall")]
struct Cli {
    /// Directory holding the rosters, samples, model and attendance logs.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Capture device (or a video file) to read faces from.
    #[arg(long, global = true)]
    camera: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List or remove registered students.
    Students {
        #[command(subcommand)]
        action: StudentAction,
    },
    /// List, add or remove subjects.
    Subjects {
        #[command(subcommand)]
        action: SubjectAction,
    },
    /// Rebuild the face model from the stored samples.
    Train,
    /// Register a new student and capture their face samples.
    Register {
        id: String,
        name: String,
        /// Read frames from a folder of images instead of the camera.
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Replace a registered student's face samples.
    Retrain {
        id: String,
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Run one attendance session for a subject (code or "code - name").
    Attend {
        subject: String,
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Show the attendance log of a subject for one day.
    Records {
        subject: String,
        /// Day to show, YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// List the days that have a log instead.
        #[arg(long)]
        list_dates: bool,
    },
}

#[derive(Subcommand)]
enum StudentAction {
    List,
    /// Remove a student together with their face samples.
    Remove { id: String },
}

#[derive(Subcommand)]
enum SubjectAction {
    List,
    Add { code: String, name: String },
    Remove { code: String },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let layout = DataLayout::new(cli.data_dir.unwrap_or_else(DataLayout::default_root));
    layout.ensure()?;
    log::debug!("Using data directory {}", layout.root().display());

    match cli.command {
        Command::Students { action } => run_students(&layout, action),
        Command::Subjects { action } => run_subjects(&layout, action),
        Command::Train => run_train(&layout),
        Command::Register { id, name, frames } => {
            run_register(&layout, &id, &name, open_camera(cli.camera, frames))
        }
        Command::Retrain { id, frames } => {
            run_retrain(&layout, &id, open_camera(cli.camera, frames))
        }
        Command::Attend { subject, frames } => {
            run_attend(&layout, &subject, open_camera(cli.camera, frames))
        }
        Command::Records {
            subject,
            date,
            list_dates,
        } => run_records(&layout, &subject, date, list_dates),
    }
}

fn run_students(
    layout: &DataLayout,
    action: StudentAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut students = CsvStudentRepository::open(layout.students_file())?;
    match action {
        StudentAction::List => {
            println!("{:>4}  {:<12}  Name", "No.", "Student ID");
            for (i, s) in students.all().iter().enumerate() {
                println!("{:>4}  {:<12}  {}", i + 1, s.id, s.name);
            }
            println!("Total: {} students", students.len());
        }
        StudentAction::Remove { id } => {
            let removed = students.remove(id.trim())?;
            let mut samples = ImageSampleStore::new(layout.samples_dir());
            let deleted = samples.remove_for(&removed.id)?;
            println!(
                "Removed {} ({}) and {deleted} face samples",
                removed.id, removed.name
            );
            report_training(ModelTrainer::lbph(layout.model_file()).retrain(&samples)?);
        }
    }
    Ok(())
}

fn run_subjects(
    layout: &DataLayout,
    action: SubjectAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut subjects = CsvSubjectRepository::open(layout.subjects_file())?;
    match action {
        SubjectAction::List => {
            for s in subjects.all() {
                println!("{}", s.choice_label());
            }
        }
        SubjectAction::Add { code, name } => {
            let subject = Subject::new(&code, &name)?;
            let label = subject.choice_label();
            subjects.add(subject)?;
            println!("Added {label}");
        }
        SubjectAction::Remove { code } => {
            let removed = subjects.remove(code.trim())?;
            println!("Removed {}", removed.choice_label());
        }
    }
    Ok(())
}

fn run_train(layout: &DataLayout) -> Result<(), Box<dyn std::error::Error>> {
    let samples = ImageSampleStore::new(layout.samples_dir());
    let mut trainer = ModelTrainer::lbph(layout.model_file());
    report_training(trainer.warm_start(&samples)?);
    Ok(())
}

fn run_register(
    layout: &DataLayout,
    id: &str,
    name: &str,
    camera: Box<dyn CameraSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case = RegisterStudentUseCase::new(
        Box::new(CsvStudentRepository::open(layout.students_file())?),
        Box::new(ImageSampleStore::new(layout.samples_dir())),
        camera,
        build_detector()?,
        ModelTrainer::lbph(layout.model_file()),
        CaptureSamplesUseCase::new(None, None, None),
    );

    match use_case.execute(id, name, &mut LogSessionObserver::new())? {
        RegistrationOutcome::Registered { student, .. } => {
            println!("Registered {} ({})", student.id, student.name);
        }
        RegistrationOutcome::Incomplete { capture } => {
            return Err(format!(
                "Capture ended after {}/{} samples; nothing was registered",
                capture.captured, capture.target
            )
            .into());
        }
    }
    Ok(())
}

fn run_retrain(
    layout: &DataLayout,
    id: &str,
    camera: Box<dyn CameraSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case = RetrainStudentUseCase::new(
        Box::new(CsvStudentRepository::open(layout.students_file())?),
        Box::new(ImageSampleStore::new(layout.samples_dir())),
        camera,
        build_detector()?,
        ModelTrainer::lbph(layout.model_file()),
        CaptureSamplesUseCase::new(None, None, None),
    );

    let report = use_case.execute(id, &mut LogSessionObserver::new())?;
    println!(
        "Replaced {} samples of {} with {}/{}",
        report.removed, report.student.id, report.capture.captured, report.capture.target
    );
    Ok(())
}

fn run_attend(
    layout: &DataLayout,
    subject: &str,
    camera: Box<dyn CameraSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let subjects = CsvSubjectRepository::open(layout.subjects_file())?;
    let subject = select_subject(subject, &subjects)?;

    let mut use_case = TakeAttendanceUseCase::new(
        Box::new(CsvStudentRepository::open(layout.students_file())?),
        Box::new(CsvAttendanceLog::new(
            layout.attendance_dir(),
            Box::new(SystemClock),
        )),
        Box::new(ImageSampleStore::new(layout.samples_dir())),
        camera,
        build_detector()?,
        ModelTrainer::lbph(layout.model_file()),
        None,
        None,
        None,
    );

    match use_case.execute(&subject, &mut LogSessionObserver::new())? {
        AttendanceOutcome::Marked {
            record,
            newly_recorded: true,
        } => println!("Marked {} ({}) at {}", record.student_id, record.name, record.time),
        AttendanceOutcome::Marked { record, .. } => println!(
            "{} ({}) was already marked at {}",
            record.student_id, record.name, record.time
        ),
        AttendanceOutcome::Stopped => println!("Session stopped"),
        AttendanceOutcome::SourceEnded => println!("Camera stopped before anyone was recognised"),
    }
    Ok(())
}

fn run_records(
    layout: &DataLayout,
    subject: &str,
    date: Option<NaiveDate>,
    list_dates: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let subjects = CsvSubjectRepository::open(layout.subjects_file())?;
    let subject = select_subject(subject, &subjects)?;
    let log = CsvAttendanceLog::new(layout.attendance_dir(), Box::new(SystemClock));

    if list_dates {
        for d in log.dates(&subject.code)? {
            println!("{}", d.format(DISPLAY_DATE_FORMAT));
        }
        return Ok(());
    }

    let date = date.unwrap_or_else(|| log.today());
    let records = log.records(&subject.code, date)?;
    if records.is_empty() {
        println!("{}", no_records_message(&subject.name, date));
        return Ok(());
    }
    println!("{}", records_title(&subject.name, date));
    println!("{:>4}  {:<12}  {:<24}  Time", "No.", "Student ID", "Name");
    for (i, r) in records.iter().enumerate() {
        println!("{:>4}  {:<12}  {:<24}  {}", i + 1, r.student_id, r.name, r.time);
    }
    Ok(())
}

fn open_camera(device: Option<String>, frames: Option<PathBuf>) -> Box<dyn CameraSource> {
    match frames {
        Some(dir) => Box::new(ImageFolderSource::new(dir)),
        None => Box::new(FfmpegCamera::new(
            device.unwrap_or_else(|| DEFAULT_CAMERA_DEVICE.to_string()),
        )),
    }
}

fn build_detector() -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    Ok(Box::new(OnnxYoloDetector::new(
        &model_path,
        DETECTION_CONFIDENCE,
    )?))
}

fn report_training(outcome: TrainOutcome) {
    match outcome {
        TrainOutcome::Trained { faces, students } => {
            println!("Trained on {faces} samples of {students} students");
        }
        TrainOutcome::NoSamples => println!("No face samples yet, nothing to train"),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
