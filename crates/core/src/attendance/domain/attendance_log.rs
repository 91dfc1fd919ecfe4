use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use super::attendance_record::AttendanceRecord;

#[derive(Error, Debug)]
pub enum AttendanceLogError {
    #[error("failed to access attendance file {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to list attendance directory {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A new row was written.
    Recorded(AttendanceRecord),
    /// The student already had a row for that subject and day; nothing was written.
    AlreadyPresent(AttendanceRecord),
}

impl MarkOutcome {
    pub fn record(&self) -> &AttendanceRecord {
        match self {
            MarkOutcome::Recorded(r) | MarkOutcome::AlreadyPresent(r) => r,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, MarkOutcome::Recorded(_))
    }
}

/// Per-subject, per-day attendance files.
///
/// The day of a mark is the clock's local date at write time, so a new
/// file begins at midnight. Within one file a student id appears at most once.
pub trait AttendanceLog: Send {
    fn mark(
        &mut self,
        subject_code: &str,
        student_id: &str,
        name: &str,
    ) -> Result<MarkOutcome, AttendanceLogError>;

    /// Rows for one subject and day in file order; empty when no file exists.
    fn records(
        &self,
        subject_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceLogError>;

    /// Days with a log for the subject, oldest first.
    fn dates(&self, subject_code: &str) -> Result<Vec<NaiveDate>, AttendanceLogError>;

    /// The clock's current local date.
    fn today(&self) -> NaiveDate;
}
