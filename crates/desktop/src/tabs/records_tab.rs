use chrono::{NaiveDate, TimeDelta};
use iced::widget::{button, column, pick_list, row, text, Space};
use iced::{Element, Length, Theme};

use rollcall_core::attendance::domain::attendance_record::{
    no_records_message, records_title, AttendanceRecord, DISPLAY_DATE_FORMAT,
};
use rollcall_core::roster::domain::subject::Subject;

use crate::app::{scaled, Message};
use crate::theme::muted_color;
use crate::widgets::primary_button::primary_button;
use crate::widgets::table;

const RECORD_HEADERS: &[&str] = &["No.", "Student ID", "Name", "Time"];

/// Which subject and day the records view is showing.
#[derive(Debug, Clone)]
pub struct RecordsState {
    pub subject: Option<Subject>,
    pub date: NaiveDate,
    /// Days that have an attendance file for `subject`, oldest first.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<AttendanceRecord>,
}

impl RecordsState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            subject: None,
            date: today,
            dates: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Moves the viewed date; out-of-range dates leave it unchanged.
    pub fn shift(&mut self, days: i64) {
        if let Some(date) = TimeDelta::try_days(days).and_then(|d| self.date.checked_add_signed(d))
        {
            self.date = date;
        }
    }

    pub fn heading(&self) -> Option<String> {
        let subject = self.subject.as_ref()?;
        Some(if self.rows.is_empty() {
            no_records_message(&subject.name, self.date)
        } else {
            records_title(&subject.name, self.date)
        })
    }

    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| vec![r.student_id.clone(), r.name.clone(), r.time.clone()])
            .collect()
    }
}

/// A picker entry for a day that has records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDate(pub NaiveDate);

impl std::fmt::Display for RecordDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_DATE_FORMAT))
    }
}

pub fn view<'a>(
    fs: f32,
    subjects: &[Subject],
    state: &RecordsState,
    theme: &Theme,
) -> Element<'a, Message> {
    if subjects.is_empty() {
        return table::empty(fs, "No subjects yet. Add one under Manage Subjects.", theme);
    }

    let selected_code = state.subject.as_ref().map(|s| s.code.as_str());
    let subject_list = column(
        subjects
            .iter()
            .map(|s| {
                let btn = button(text(s.choice_label()).size(scaled(13.0, fs)))
                    .on_press(Message::RecordsSubjectSelected(s.code.clone()))
                    .padding([6, 12])
                    .width(Length::Fill);
                if selected_code == Some(s.code.as_str()) {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>(),
    )
    .spacing(2)
    .width(Length::FillPortion(1));

    let detail: Element<'a, Message> = match state.heading() {
        None => text("Select a subject to view its attendance records.")
            .size(scaled(13.0, fs))
            .color(muted_color(theme))
            .into(),
        Some(heading) => {
            let options: Vec<RecordDate> = state.dates.iter().rev().copied().map(RecordDate).collect();
            let picked = options.iter().copied().find(|d| d.0 == state.date);
            let nav = row![
                button(text("Previous").size(scaled(13.0, fs)))
                    .on_press(Message::RecordsShiftDate(-1))
                    .style(button::secondary),
                button(text("Today").size(scaled(13.0, fs)))
                    .on_press(Message::RecordsToday)
                    .style(button::secondary),
                button(text("Next").size(scaled(13.0, fs)))
                    .on_press(Message::RecordsShiftDate(1))
                    .style(button::secondary),
                pick_list(options, picked, |d: RecordDate| Message::RecordsDatePicked(d.0))
                    .placeholder("Recorded days")
                    .text_size(scaled(13.0, fs)),
            ]
            .spacing(8)
            .align_y(iced::Alignment::Center);

            let body: Element<'a, Message> = if state.rows.is_empty() {
                Space::new().height(0).into()
            } else {
                table::table(fs, RECORD_HEADERS, table::numbered(state.table_rows()))
            };

            column![
                nav,
                text(heading).size(scaled(16.0, fs)),
                body,
                primary_button(
                    text("Open folder").size(scaled(13.0, fs)),
                    Some(Message::OpenAttendanceFolder),
                ),
            ]
            .spacing(12)
            .into()
        }
    };

    row![subject_list, column![detail].width(Length::FillPortion(3))]
        .spacing(16)
        .into()
}
