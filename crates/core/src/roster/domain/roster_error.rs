use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must not contain {forbidden:?}")]
    InvalidField {
        field: &'static str,
        forbidden: &'static str,
    },
    #[error("Student ID already exists")]
    DuplicateStudent(String),
    #[error("Student ID not found. Please register the student first.")]
    UnknownStudent(String),
    #[error("Subject Code already exists")]
    DuplicateSubject(String),
    #[error("Subject {0} not found")]
    UnknownSubject(String),
    #[error("failed to access {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Trims `value` and rejects it when empty or when it contains any of
/// the `forbidden` substrings.
pub(crate) fn clean_field(
    field: &'static str,
    value: &str,
    forbidden: &[&'static str],
) -> Result<String, RosterError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RosterError::EmptyField { field });
    }
    if let Some(bad) = forbidden.iter().find(|f| value.contains(**f)) {
        return Err(RosterError::InvalidField {
            field,
            forbidden: *bad,
        });
    }
    Ok(value.to_string())
}

pub(crate) const PATH_SEPARATORS: &[&str] = &["/", "\\"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_field_trims() {
        assert_eq!(clean_field("Name", "  Ada ", &[]).unwrap(), "Ada");
    }

    #[test]
    fn test_clean_field_rejects_blank() {
        let err = clean_field("Name", "   ", &[]).unwrap_err();
        assert!(matches!(err, RosterError::EmptyField { field: "Name" }));
    }

    #[test]
    fn test_clean_field_reports_forbidden_substring() {
        let err = clean_field("Student ID", "a/b", PATH_SEPARATORS).unwrap_err();
        assert_eq!(err.to_string(), "Student ID must not contain \"/\"");
    }

    #[test]
    fn test_duplicate_messages_match_dialog_text() {
        assert_eq!(
            RosterError::DuplicateSubject("CS1".into()).to_string(),
            "Subject Code already exists"
        );
        assert_eq!(
            RosterError::UnknownStudent("7".into()).to_string(),
            "Student ID not found. Please register the student first."
        );
    }
}
