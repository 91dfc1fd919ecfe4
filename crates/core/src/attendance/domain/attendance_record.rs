use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const ATTENDANCE_HEADERS: &[&str] = &["Student ID", "Name", "Time"];

pub const TIME_FORMAT: &str = "%H:%M:%S";

/// How dates are shown to people, as opposed to file names.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// One row of a per-subject, per-day attendance file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "Student ID")]
    pub student_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    /// Wall-clock time of the mark, `HH:MM:SS`.
    #[serde(rename = "Time")]
    pub time: String,
}

impl AttendanceRecord {
    pub fn new(student_id: &str, name: &str, time: NaiveTime) -> Self {
        Self {
            student_id: student_id.to_string(),
            name: name.to_string(),
            time: time.format(TIME_FORMAT).to_string(),
        }
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, TIME_FORMAT).ok()
    }
}

/// Heading of a day's attendance table.
pub fn records_title(subject_name: &str, date: NaiveDate) -> String {
    format!("{subject_name} - {}", date.format(DISPLAY_DATE_FORMAT))
}

pub fn no_records_message(subject_name: &str, date: NaiveDate) -> String {
    format!(
        "No attendance records for {subject_name} on {}",
        date.format(DISPLAY_DATE_FORMAT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_formatted_without_fraction() {
        let t = NaiveTime::from_hms_milli_opt(9, 5, 7, 450).unwrap();
        let r = AttendanceRecord::new("1", "Al", t);
        assert_eq!(r.time, "09:05:07");
        assert_eq!(r.parsed_time(), NaiveTime::from_hms_opt(9, 5, 7));
    }

    #[test]
    fn test_unparseable_time_is_none() {
        let r = AttendanceRecord {
            student_id: "1".into(),
            name: "Al".into(),
            time: "noon".into(),
        };
        assert!(r.parsed_time().is_none());
    }

    #[test]
    fn test_display_strings_use_day_first_dates() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(records_title("Physics", d), "Physics - 02/03/2026");
        assert_eq!(
            no_records_message("Physics", d),
            "No attendance records for Physics on 02/03/2026"
        );
    }
}
