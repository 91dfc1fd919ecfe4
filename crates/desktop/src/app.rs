use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::{AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};

use rollcall_core::access::domain::access_gate::AccessGate;
use rollcall_core::attendance::domain::attendance_log::AttendanceLog;
use rollcall_core::attendance::domain::clock::SystemClock;
use rollcall_core::attendance::infrastructure::csv_attendance_log::CsvAttendanceLog;
use rollcall_core::pipeline::take_attendance_use_case::{select_subject, NO_MODEL_MESSAGE};
use rollcall_core::pipeline::train_model_use_case::ModelTrainer;
use rollcall_core::roster::domain::student::Student;
use rollcall_core::roster::domain::student_repository::StudentRepository;
use rollcall_core::roster::domain::subject::{Subject, SUBJECT_PLACEHOLDER};
use rollcall_core::roster::domain::subject_repository::SubjectRepository;
use rollcall_core::roster::infrastructure::csv_student_repository::CsvStudentRepository;
use rollcall_core::roster::infrastructure::csv_subject_repository::CsvSubjectRepository;
use rollcall_core::shared::data_layout::DataLayout;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::tabs::login_tab::LOGIN_FAILED_MESSAGE;
use crate::tabs::records_tab::RecordsState;
use crate::theme;
use crate::widgets::camera_feed::FeedState;
use crate::workers::model_cache::ModelCache;
use crate::workers::session_worker::{self, Job, JobParams, WorkerMessage};

const FEED_IDLE: &str = "Ready";

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Attendance,
    Admin,
    Register,
    Subjects,
    Students,
    Records,
    Logout,
    Settings,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[
        Tab::Attendance,
        Tab::Admin,
        Tab::Register,
        Tab::Subjects,
        Tab::Students,
        Tab::Records,
        Tab::Logout,
        Tab::Settings,
        Tab::About,
    ];

    fn label(self) -> &'static str {
        match self {
            Tab::Attendance => "Take Attendance",
            Tab::Admin => "Admin",
            Tab::Register => "Register Student",
            Tab::Subjects => "Manage Subjects",
            Tab::Students => "View Students",
            Tab::Records => "Check Records",
            Tab::Logout => "Log out",
            Tab::Settings => "Settings",
            Tab::About => "About",
        }
    }

    /// Admin screens replace the attendance and login tabs once logged in.
    fn is_admin(self) -> bool {
        matches!(
            self,
            Tab::Register | Tab::Subjects | Tab::Students | Tab::Records | Tab::Logout
        )
    }

    pub fn visible(logged_in: bool) -> Vec<Tab> {
        Tab::ALL
            .iter()
            .copied()
            .filter(|tab| match tab {
                Tab::Attendance | Tab::Admin => !logged_in,
                Tab::Settings | Tab::About => true,
                other => other.is_admin() && logged_in,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    // Login
    UsernameChanged(String),
    PasswordChanged(String),
    SubmitLogin,
    Logout,
    // Attendance
    SubjectChosen(String),
    StartAttendance,
    StopSession,
    // Registration
    StudentIdChanged(String),
    StudentNameChanged(String),
    RegisterStudent,
    RetrainStudent,
    // Subjects
    SubjectCodeChanged(String),
    SubjectNameChanged(String),
    AddSubject,
    SubjectSelected(usize),
    DeleteSubject,
    DeleteSubjectConfirmed(String, bool),
    // Students
    StudentSelected(usize),
    RefreshStudents,
    RemoveStudent,
    RemoveStudentConfirmed(String, bool),
    // Records
    RecordsSubjectSelected(String),
    RecordsShiftDate(i64),
    RecordsToday,
    RecordsDatePicked(NaiveDate),
    OpenAttendanceFolder,
    // Settings
    SelectDataDir,
    DataDirSelected(Option<PathBuf>),
    CameraDeviceChanged(String),
    RestoreDefaults,
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    OpenDataFolder,
    // Background
    PollWorker,
    PollSystemTheme,
    DialogClosed,
}

impl Message {
    /// Settings changes that re-point the rosters or camera the admin
    /// screens act on.
    fn requires_admin(&self) -> bool {
        matches!(
            self,
            Message::SelectDataDir
                | Message::DataDirSelected(_)
                | Message::CameraDeviceChanged(_)
                | Message::RestoreDefaults
        )
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

struct Rosters {
    students: CsvStudentRepository,
    subjects: CsvSubjectRepository,
}

struct ActiveJob {
    job: Job,
    rx: Receiver<WorkerMessage>,
    cancelled: Arc<AtomicBool>,
}

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    layout: DataLayout,
    gate: AccessGate,
    model_cache: Arc<ModelCache>,
    rosters: Option<Rosters>,
    worker: Option<ActiveJob>,
    username: String,
    password: String,
    subject_choice: Option<String>,
    student_id: String,
    student_name: String,
    subject_code: String,
    subject_name: String,
    selected_subject: Option<usize>,
    selected_student: Option<usize>,
    records: RecordsState,
    attendance_feed: FeedState,
    register_feed: FeedState,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let layout = settings.layout();
        let gate = AccessGate::new(Box::new(settings.credentials()));
        let mut app = Self {
            active_tab: Tab::Attendance,
            settings,
            records: RecordsState::new(chrono::Local::now().date_naive()),
            layout,
            gate,
            model_cache: ModelCache::new(),
            rosters: None,
            worker: None,
            username: String::new(),
            password: String::new(),
            subject_choice: None,
            student_id: String::new(),
            student_name: String::new(),
            subject_code: String::new(),
            subject_name: String::new(),
            selected_subject: None,
            selected_student: None,
            attendance_feed: FeedState::new(FEED_IDLE),
            register_feed: FeedState::new(FEED_IDLE),
        };
        let task = app.open_data_dir();
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        if message.requires_admin() && !self.gate.is_logged_in() {
            log::warn!("Ignoring {message:?} while logged out");
            return Task::none();
        }
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::UsernameChanged(value) => self.username = value,
            Message::PasswordChanged(value) => self.password = value,
            Message::SubmitLogin => {
                if self.gate.login(&self.username, &self.password) {
                    log::info!("Admin logged in");
                    self.password.clear();
                    self.active_tab = Tab::Register;
                } else {
                    self.password.clear();
                    return show_error(LOGIN_FAILED_MESSAGE);
                }
            }
            Message::Logout => {
                self.cancel_worker();
                self.gate.logout();
                self.username.clear();
                self.active_tab = Tab::Attendance;
                log::info!("Admin logged out");
            }
            Message::SubjectChosen(choice) => self.subject_choice = Some(choice),
            Message::StartAttendance => return self.start_attendance(),
            Message::StopSession => self.cancel_worker(),
            Message::StudentIdChanged(value) => self.student_id = value,
            Message::StudentNameChanged(value) => self.student_name = value,
            Message::RegisterStudent => {
                match tabs::register_tab::validate_registration(
                    self.students(),
                    &self.student_id,
                    &self.student_name,
                ) {
                    Ok(student) => {
                        return self.start_job(Job::Register {
                            id: student.id,
                            name: student.name,
                        });
                    }
                    Err(e) => return show_error(e),
                }
            }
            Message::RetrainStudent => {
                match tabs::register_tab::validate_retrain(self.students(), &self.student_id) {
                    Ok(student) => {
                        self.student_name = student.name;
                        return self.start_job(Job::Retrain { id: student.id });
                    }
                    Err(e) => return show_error(e),
                }
            }
            Message::SubjectCodeChanged(value) => self.subject_code = value,
            Message::SubjectNameChanged(value) => self.subject_name = value,
            Message::AddSubject => return self.add_subject(),
            Message::SubjectSelected(index) => self.selected_subject = Some(index),
            Message::DeleteSubject => {
                let Some(subject) = self.selected_subject.and_then(|i| self.subjects().get(i))
                else {
                    return show_error("Please select a subject to delete");
                };
                let code = subject.code.clone();
                return confirm(tabs::subjects_tab::DELETE_CONFIRMATION, move |yes| {
                    Message::DeleteSubjectConfirmed(code, yes)
                });
            }
            Message::DeleteSubjectConfirmed(code, true) => return self.delete_subject(&code),
            Message::DeleteSubjectConfirmed(_, false) => {}
            Message::StudentSelected(index) => self.selected_student = Some(index),
            Message::RefreshStudents => return self.reload_rosters(),
            Message::RemoveStudent => {
                let Some(student) = self.selected_student.and_then(|i| self.students().get(i))
                else {
                    return show_error("Please select a student to remove");
                };
                let id = student.id.clone();
                return confirm(tabs::students_tab::REMOVE_CONFIRMATION, move |yes| {
                    Message::RemoveStudentConfirmed(id, yes)
                });
            }
            Message::RemoveStudentConfirmed(id, true) => {
                self.selected_student = None;
                return self.start_job(Job::Remove { id });
            }
            Message::RemoveStudentConfirmed(_, false) => {}
            Message::RecordsSubjectSelected(code) => {
                self.records.subject = self.subjects().iter().find(|s| s.code == code).cloned();
                return self.load_records();
            }
            Message::RecordsShiftDate(days) => {
                self.records.shift(days);
                return self.load_records();
            }
            Message::RecordsToday => {
                self.records.date = self.attendance_log().today();
                return self.load_records();
            }
            Message::RecordsDatePicked(date) => {
                self.records.date = date;
                return self.load_records();
            }
            Message::OpenAttendanceFolder => open_folder(self.layout.attendance_dir()),
            Message::OpenDataFolder => open_folder(self.layout.root().to_path_buf()),
            Message::SelectDataDir => {
                let start = self.settings.data_dir.clone();
                return Task::perform(
                    async move {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select data folder")
                            .set_directory(start)
                            .pick_folder()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::DataDirSelected,
                );
            }
            Message::DataDirSelected(Some(dir)) => {
                self.settings.data_dir = dir;
                self.settings.save();
                return self.open_data_dir();
            }
            Message::DataDirSelected(None) => {}
            Message::CameraDeviceChanged(device) => {
                self.settings.camera_device = device;
                self.settings.save();
            }
            Message::RestoreDefaults => {
                let defaults = Settings::default();
                let moved = defaults.data_dir != self.settings.data_dir;
                // Stored credentials are left alone.
                self.settings.data_dir = defaults.data_dir;
                self.settings.camera_device = defaults.camera_device;
                self.settings.appearance = defaults.appearance;
                self.settings.high_contrast = defaults.high_contrast;
                self.settings.font_scale = defaults.font_scale;
                self.settings.save();
                if moved {
                    return self.open_data_dir();
                }
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::PollWorker => return self.poll_worker(),
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
            Message::DialogClosed => {}
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;
        let theme = self.theme();
        let idle = self.worker.is_none();
        let running = self
            .worker
            .as_ref()
            .is_some_and(|active| active.job.uses_camera());

        let tab_bar = row(Tab::visible(self.gate.is_logged_in())
            .into_iter()
            .map(|tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Attendance => tabs::attendance_tab::view(
                fs,
                self.subject_choices(),
                self.subject_choice.clone(),
                idle,
                running,
                &self.attendance_feed,
                &theme,
            ),
            Tab::Admin => tabs::login_tab::view(fs, &self.username, &self.password, &theme),
            Tab::Register => tabs::register_tab::view(
                fs,
                &self.student_id,
                &self.student_name,
                idle,
                running,
                &self.register_feed,
                &theme,
            ),
            Tab::Subjects => tabs::subjects_tab::view(
                fs,
                &self.subject_code,
                &self.subject_name,
                self.subjects(),
                self.selected_subject,
                &theme,
            ),
            Tab::Students => tabs::students_tab::view(
                fs,
                self.students(),
                self.selected_student,
                idle,
                &theme,
            ),
            Tab::Records => tabs::records_tab::view(fs, self.subjects(), &self.records, &theme),
            Tab::Logout => tabs::logout_tab::view(fs, running),
            Tab::Settings => tabs::settings_tab::view(
                &self.settings,
                idle,
                self.gate.is_logged_in(),
                &theme,
            ),
            Tab::About => tabs::about_tab::view(fs, &self.layout),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();
        if self.worker.is_some() {
            subscriptions
                .push(iced::time::every(Duration::from_millis(33)).map(|_| Message::PollWorker));
        }
        if self.settings.appearance == Appearance::System {
            subscriptions
                .push(iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme));
        }
        Subscription::batch(subscriptions)
    }

    // --- Data ---

    /// Points the app at the configured data directory and warm-starts
    /// the face model from its samples.
    fn open_data_dir(&mut self) -> Task<Message> {
        if let Some(active) = self.worker.take() {
            active.cancelled.store(true, Ordering::Relaxed);
        }
        self.layout = self.settings.layout();
        self.gate.set_verifier(Box::new(self.settings.credentials()));
        self.selected_student = None;
        self.selected_subject = None;
        self.records = RecordsState::new(self.attendance_log().today());

        if let Err(e) = self.layout.ensure() {
            self.rosters = None;
            return show_error(format!(
                "Cannot use data folder {}: {e}",
                self.layout.root().display()
            ));
        }
        let reload = self.reload_rosters();
        if self.rosters.is_none() {
            return reload;
        }
        Task::batch([reload, self.start_job(Job::Train)])
    }

    fn reload_rosters(&mut self) -> Task<Message> {
        let opened = CsvStudentRepository::open(self.layout.students_file()).and_then(|students| {
            let subjects = CsvSubjectRepository::open(self.layout.subjects_file())?;
            Ok(Rosters { students, subjects })
        });
        match opened {
            Ok(rosters) => {
                self.rosters = Some(rosters);
                if self
                    .selected_student
                    .is_some_and(|i| i >= self.students().len())
                {
                    self.selected_student = None;
                }
                if self
                    .selected_subject
                    .is_some_and(|i| i >= self.subjects().len())
                {
                    self.selected_subject = None;
                }
                Task::none()
            }
            Err(e) => {
                log::error!("Failed to load rosters: {e}");
                self.rosters = None;
                show_error(e)
            }
        }
    }

    fn students(&self) -> &[Student] {
        self.rosters.as_ref().map_or(&[], |r| r.students.all())
    }

    fn subjects(&self) -> &[Subject] {
        self.rosters.as_ref().map_or(&[], |r| r.subjects.all())
    }

    fn subject_choices(&self) -> Vec<String> {
        self.rosters.as_ref().map_or_else(
            || vec![SUBJECT_PLACEHOLDER.to_string()],
            |r| r.subjects.choices(),
        )
    }

    fn attendance_log(&self) -> CsvAttendanceLog {
        CsvAttendanceLog::new(self.layout.attendance_dir(), Box::new(SystemClock))
    }

    fn add_subject(&mut self) -> Task<Message> {
        let subject = match tabs::subjects_tab::parse_subject(&self.subject_code, &self.subject_name)
        {
            Ok(subject) => subject,
            Err(e) => return show_error(e),
        };
        let Some(rosters) = self.rosters.as_mut() else {
            return show_error("The data folder is not available");
        };
        match rosters.subjects.add(subject) {
            Ok(()) => {
                self.subject_code.clear();
                self.subject_name.clear();
                show_info("Subject added successfully")
            }
            Err(e) => show_error(e),
        }
    }

    fn delete_subject(&mut self, code: &str) -> Task<Message> {
        let Some(rosters) = self.rosters.as_mut() else {
            return Task::none();
        };
        match rosters.subjects.remove(code) {
            Ok(subject) => {
                log::info!("Deleted subject {}", subject.code);
                self.selected_subject = None;
                if self
                    .subject_choice
                    .as_deref()
                    .is_some_and(|c| c == subject.choice_label())
                {
                    self.subject_choice = None;
                }
                if self.records.subject.as_ref() == Some(&subject) {
                    self.records.subject = None;
                    self.records.rows.clear();
                    self.records.dates.clear();
                }
                show_info("Subject deleted successfully")
            }
            Err(e) => show_error(e),
        }
    }

    fn load_records(&mut self) -> Task<Message> {
        let Some(subject) = self.records.subject.clone() else {
            return Task::none();
        };
        let log = self.attendance_log();
        let loaded = log.dates(&subject.code).and_then(|dates| {
            let rows = log.records(&subject.code, self.records.date)?;
            Ok((dates, rows))
        });
        match loaded {
            Ok((dates, rows)) => {
                self.records.dates = dates;
                self.records.rows = rows;
                Task::none()
            }
            Err(e) => {
                self.records.rows.clear();
                show_error(e)
            }
        }
    }

    // --- Workers ---

    fn start_attendance(&mut self) -> Task<Message> {
        let Some(rosters) = self.rosters.as_ref() else {
            return show_error("The data folder is not available");
        };
        let choice = self.subject_choice.as_deref().unwrap_or(SUBJECT_PLACEHOLDER);
        let subject = match select_subject(choice, &rosters.subjects) {
            Ok(subject) => subject,
            Err(e) => return show_error(e),
        };
        if !ModelTrainer::lbph(self.layout.model_file()).has_model_file() {
            return show_error(NO_MODEL_MESSAGE);
        }
        self.start_job(Job::Attend { subject })
    }

    fn start_job(&mut self, job: Job) -> Task<Message> {
        if self.worker.is_some() {
            return show_error("Another camera session is still running");
        }
        log::info!("Starting {job:?}");
        if let Some(feed) = self.feed_for(&job) {
            feed.stop();
            feed.set_status("Starting camera...");
        }
        let (rx, cancelled) = session_worker::spawn(JobParams {
            job: job.clone(),
            layout: self.layout.clone(),
            camera_device: self.settings.camera_device.clone(),
            model_cache: self.model_cache.clone(),
        });
        self.worker = Some(ActiveJob { job, rx, cancelled });
        Task::none()
    }

    fn cancel_worker(&mut self) {
        if let Some(active) = &self.worker {
            active.cancelled.store(true, Ordering::Relaxed);
        }
    }

    fn feed_for(&mut self, job: &Job) -> Option<&mut FeedState> {
        match job {
            Job::Attend { .. } => Some(&mut self.attendance_feed),
            Job::Register { .. } | Job::Retrain { .. } => Some(&mut self.register_feed),
            Job::Train | Job::Remove { .. } => None,
        }
    }

    fn poll_worker(&mut self) -> Task<Message> {
        let Some(active) = self.worker.take() else {
            return Task::none();
        };
        loop {
            let message = match active.rx.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Empty) => {
                    self.worker = Some(active);
                    return Task::none();
                }
                Err(TryRecvError::Disconnected) => {
                    log::error!("{:?} worker exited without reporting", active.job);
                    self.finish_job(&active.job, "Stopped");
                    return self.reload_rosters();
                }
            };
            match message {
                WorkerMessage::DownloadProgress(done, total) => {
                    if let Some(feed) = self.feed_for(&active.job) {
                        feed.set_status(download_status(done, total));
                    }
                }
                WorkerMessage::Frame(preview) => {
                    if let Some(feed) = self.feed_for(&active.job) {
                        feed.show(preview);
                    }
                }
                WorkerMessage::Progress(current, total) => {
                    if let Some(feed) = self.feed_for(&active.job) {
                        feed.set_progress(current, total);
                    }
                }
                WorkerMessage::Info(info) => {
                    log::info!("{info}");
                    if let Some(feed) = self.feed_for(&active.job) {
                        feed.set_status(info);
                    }
                }
                WorkerMessage::Complete(result) => {
                    let summary = result.summary();
                    log::info!("{summary}");
                    self.finish_job(&active.job, &summary);
                    if matches!(active.job, Job::Register { .. } | Job::Retrain { .. })
                        && result.is_milestone()
                    {
                        self.student_id.clear();
                        self.student_name.clear();
                    }
                    let reload = self.reload_rosters();
                    let records = self.load_records();
                    return if result.is_milestone() {
                        Task::batch([reload, records, show_info(summary)])
                    } else {
                        Task::batch([reload, records])
                    };
                }
                WorkerMessage::Error(e) => {
                    self.finish_job(&active.job, &e);
                    let reload = self.reload_rosters();
                    return Task::batch([reload, show_error(e)]);
                }
                WorkerMessage::Cancelled => {
                    self.finish_job(&active.job, "Stopped");
                    return self.reload_rosters();
                }
            }
        }
    }

    fn finish_job(&mut self, job: &Job, status: &str) {
        if let Some(feed) = self.feed_for(job) {
            feed.stop();
            feed.set_status(status);
        }
    }
}

fn download_status(done: u64, total: u64) -> String {
    if total > 0 {
        format!(
            "Downloading face detection model... {}%",
            done.saturating_mul(100) / total
        )
    } else {
        format!("Downloading face detection model... {} KB", done / 1024)
    }
}

fn open_folder(path: PathBuf) {
    if let Err(e) = open::that(&path) {
        log::warn!("Failed to open {}: {e}", path.display());
    }
}

fn show_error(message: impl ToString) -> Task<Message> {
    dialog(MessageLevel::Error, "Error", message.to_string())
}

fn show_info(message: impl ToString) -> Task<Message> {
    dialog(MessageLevel::Info, "Success", message.to_string())
}

fn dialog(level: MessageLevel, title: &'static str, message: String) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(level)
                .set_title(title)
                .set_description(message)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::DialogClosed,
    )
}

fn confirm(
    question: &'static str,
    on_answer: impl FnOnce(bool) -> Message + Send + 'static,
) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Warning)
                .set_title("Confirm")
                .set_description(question)
                .set_buttons(MessageButtons::YesNo)
                .show()
                .await
        },
        move |result| on_answer(matches!(result, MessageDialogResult::Yes)),
    )
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}
