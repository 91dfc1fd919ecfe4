use iced::widget::{column, row, text};
use iced::{Element, Theme};

use rollcall_core::roster::domain::student::Student;

use crate::app::{scaled, Message};
use crate::widgets::primary_button::{danger_button, primary_button};
use crate::widgets::table;

pub const REMOVE_CONFIRMATION: &str =
    "Are you sure you want to remove this student and their face samples?";

pub fn total_label(count: usize) -> String {
    format!("Total: {count} students")
}

pub fn view<'a>(
    fs: f32,
    students: &[Student],
    selected: Option<usize>,
    idle: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let list: Element<'a, Message> = if students.is_empty() {
        table::empty(fs, "No students registered yet", theme)
    } else {
        let rows = students
            .iter()
            .map(|s| vec![s.id.clone(), s.name.clone()])
            .collect();
        table::selectable_table(
            fs,
            &["No.", "Student ID", "Name"],
            table::numbered(rows),
            selected,
            Message::StudentSelected,
        )
    };

    column![
        row![
            text("Registered Students").size(scaled(16.0, fs)),
            text(total_label(students.len())).size(scaled(13.0, fs)),
        ]
        .spacing(16)
        .align_y(iced::Alignment::Center),
        list,
        row![
            primary_button(
                text("Refresh").size(scaled(14.0, fs)),
                Some(Message::RefreshStudents),
            ),
            danger_button(
                text("Remove Selected Student").size(scaled(14.0, fs)),
                (idle && selected.is_some()).then_some(Message::RemoveStudent),
            ),
        ]
        .spacing(10),
    ]
    .spacing(14)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_label() {
        assert_eq!(total_label(0), "Total: 0 students");
        assert_eq!(total_label(12), "Total: 12 students");
    }
}
