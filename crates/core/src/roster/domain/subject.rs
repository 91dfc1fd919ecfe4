use serde::{Deserialize, Serialize};

use super::roster_error::{clean_field, RosterError, PATH_SEPARATORS};

pub const SUBJECT_HEADERS: &[&str] = &["Subject Code", "Subject Name"];

/// First entry of every subject picker; selecting it means "no subject".
pub const SUBJECT_PLACEHOLDER: &str = "Please Choose Subject";

const CHOICE_SEPARATOR: &str = " - ";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(rename = "Subject Code")]
    pub code: String,
    #[serde(rename = "Subject Name")]
    pub name: String,
}

impl Subject {
    pub fn new(code: &str, name: &str) -> Result<Self, RosterError> {
        let code = clean_field("Subject Code", code, &["/", "\\", CHOICE_SEPARATOR])?;
        let name = clean_field("Subject Name", name, PATH_SEPARATORS)?;
        Ok(Self { code, name })
    }

    /// Picker label, `"{code} - {name}"`.
    pub fn choice_label(&self) -> String {
        format!("{}{CHOICE_SEPARATOR}{}", self.code, self.name)
    }
}

/// Extracts the subject code from a picker label.
///
/// Returns `None` for the placeholder and for blank input.
pub fn parse_choice(choice: &str) -> Option<&str> {
    let choice = choice.trim();
    if choice.is_empty() || choice == SUBJECT_PLACEHOLDER {
        return None;
    }
    let code = choice
        .split_once(CHOICE_SEPARATOR)
        .map_or(choice, |(code, _)| code)
        .trim();
    (!code.is_empty()).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_choice_label_format() {
        let s = Subject::new("CS101", "Intro to Computing").unwrap();
        assert_eq!(s.choice_label(), "CS101 - Intro to Computing");
    }

    #[rstest]
    #[case("CS101 - Intro to Computing", Some("CS101"))]
    #[case("MA2 - Calculus - Part II", Some("MA2"))]
    #[case("PHY", Some("PHY"))]
    #[case(SUBJECT_PLACEHOLDER, None)]
    #[case("  ", None)]
    fn test_parse_choice(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_choice(input), expected);
    }

    #[test]
    fn test_choice_round_trips_code() {
        let s = Subject::new("EE-1", "Circuits").unwrap();
        assert_eq!(parse_choice(&s.choice_label()), Some("EE-1"));
    }

    #[test]
    fn test_code_cannot_contain_choice_separator() {
        assert!(Subject::new("A - B", "x").is_err());
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(Subject::new("", "Maths").is_err());
        assert!(Subject::new("MA1", " ").is_err());
    }
}
