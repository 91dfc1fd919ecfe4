use iced::widget::{column, row, text};
use iced::{Element, Theme};

use rollcall_core::roster::domain::roster_error::RosterError;
use rollcall_core::roster::domain::student::Student;

use crate::app::{scaled, Message};
use crate::widgets::camera_feed::{self, FeedState};
use crate::widgets::form_field::form_field;
use crate::widgets::primary_button::{danger_button, primary_button};

/// Checks the form before the camera is opened for a new student.
pub fn validate_registration(
    students: &[Student],
    id: &str,
    name: &str,
) -> Result<Student, String> {
    if id.trim().is_empty() || name.trim().is_empty() {
        return Err("Please enter both Student ID and Name".into());
    }
    let student = Student::new(id, name).map_err(|e| e.to_string())?;
    if students.iter().any(|s| s.id == student.id) {
        return Err(RosterError::DuplicateStudent(student.id).to_string());
    }
    Ok(student)
}

/// Retraining only needs the id of a registered student.
pub fn validate_retrain(students: &[Student], id: &str) -> Result<Student, String> {
    let id = id.trim();
    if id.is_empty() {
        return Err("Please enter the Student ID to retrain".into());
    }
    students
        .iter()
        .find(|s| s.id == id)
        .cloned()
        .ok_or_else(|| RosterError::UnknownStudent(id.to_string()).to_string())
}

pub fn view<'a>(
    fs: f32,
    id: &str,
    name: &str,
    idle: bool,
    running: bool,
    feed: &'a FeedState,
    theme: &Theme,
) -> Element<'a, Message> {
    let buttons = row![
        primary_button(
            text("Register Student").size(scaled(14.0, fs)),
            idle.then_some(Message::RegisterStudent),
        ),
        primary_button(
            text("Retrain Student").size(scaled(14.0, fs)),
            idle.then_some(Message::RetrainStudent),
        ),
        danger_button(
            text("Stop").size(scaled(14.0, fs)),
            running.then_some(Message::StopSession),
        ),
    ]
    .spacing(10);

    column![
        text("Student Information").size(scaled(16.0, fs)),
        row![
            form_field(fs, "Student ID", id, Message::StudentIdChanged, None),
            form_field(fs, "Name", name, Message::StudentNameChanged, None),
        ]
        .spacing(12),
        buttons,
        text("Camera Feed").size(scaled(16.0, fs)),
        camera_feed::view(feed, fs, theme),
    ]
    .spacing(12)
    .into()
}
