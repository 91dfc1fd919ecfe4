use iced::widget::{column, row, text};
use iced::{Element, Theme};

use rollcall_core::roster::domain::subject::Subject;

use crate::app::{scaled, Message};
use crate::widgets::form_field::form_field;
use crate::widgets::primary_button::{danger_button, primary_button};
use crate::widgets::table;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this subject?";

pub fn parse_subject(code: &str, name: &str) -> Result<Subject, String> {
    if code.trim().is_empty() || name.trim().is_empty() {
        return Err("Please enter both Subject Code and Name".into());
    }
    Subject::new(code, name).map_err(|e| e.to_string())
}

pub fn view<'a>(
    fs: f32,
    code: &str,
    name: &str,
    subjects: &[Subject],
    selected: Option<usize>,
    theme: &Theme,
) -> Element<'a, Message> {
    let form = column![
        text("Add New Subject").size(scaled(16.0, fs)),
        row![
            form_field(
                fs,
                "Subject Code",
                code,
                Message::SubjectCodeChanged,
                Some(Message::AddSubject),
            ),
            form_field(
                fs,
                "Subject Name",
                name,
                Message::SubjectNameChanged,
                Some(Message::AddSubject),
            ),
        ]
        .spacing(12),
        primary_button(
            text("Add Subject").size(scaled(14.0, fs)),
            Some(Message::AddSubject),
        ),
    ]
    .spacing(10);

    let list: Element<'a, Message> = if subjects.is_empty() {
        table::empty(fs, "No subjects yet", theme)
    } else {
        let rows = subjects
            .iter()
            .map(|s| vec![s.code.clone(), s.name.clone()])
            .collect();
        table::selectable_table(
            fs,
            &["Subject Code", "Subject Name"],
            rows,
            selected,
            Message::SubjectSelected,
        )
    };

    column![
        form,
        text("Subjects List").size(scaled(16.0, fs)),
        list,
        danger_button(
            text("Delete Selected Subject").size(scaled(14.0, fs)),
            Some(Message::DeleteSubject),
        ),
    ]
    .spacing(14)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_fields_required() {
        assert_eq!(
            parse_subject("", "Maths").unwrap_err(),
            "Please enter both Subject Code and Name"
        );
        assert_eq!(
            parse_subject("CS101", " ").unwrap_err(),
            "Please enter both Subject Code and Name"
        );
    }

    #[test]
    fn test_valid_subject() {
        let subject = parse_subject(" CS101 ", "Intro to Programming").unwrap();
        assert_eq!(subject.code, "CS101");
        assert_eq!(subject.choice_label(), "CS101 - Intro to Programming");
    }

    #[test]
    fn test_code_may_not_contain_choice_separator() {
        assert!(parse_subject("CS - 101", "Intro").is_err());
    }
}
