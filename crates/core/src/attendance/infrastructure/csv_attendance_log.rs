use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::attendance::domain::attendance_log::{AttendanceLog, AttendanceLogError, MarkOutcome};
use crate::attendance::domain::attendance_record::{AttendanceRecord, ATTENDANCE_HEADERS};
use crate::attendance::domain::clock::Clock;
use crate::shared::csv_table;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Attendance files at `{dir}/{subject_code}_{YYYY-MM-DD}.csv`.
pub struct CsvAttendanceLog {
    dir: PathBuf,
    clock: Box<dyn Clock>,
}

impl CsvAttendanceLog {
    pub fn new(dir: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_for(&self, subject_code: &str, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{subject_code}_{}.csv", date.format(DATE_FORMAT)))
    }

    fn read(&self, path: &Path) -> Result<Vec<AttendanceRecord>, AttendanceLogError> {
        csv_table::read_rows(path).map_err(|source| AttendanceLogError::Storage {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl AttendanceLog for CsvAttendanceLog {
    fn mark(
        &mut self,
        subject_code: &str,
        student_id: &str,
        name: &str,
    ) -> Result<MarkOutcome, AttendanceLogError> {
        let now = self.clock.now();
        let path = self.file_for(subject_code, now.date());

        if let Some(existing) = self
            .read(&path)?
            .into_iter()
            .find(|r| r.student_id == student_id)
        {
            log::debug!("{student_id} already marked in {}", path.display());
            return Ok(MarkOutcome::AlreadyPresent(existing));
        }

        let record = AttendanceRecord::new(student_id, name, now.time());
        csv_table::append_row(&path, ATTENDANCE_HEADERS, &record).map_err(|source| {
            AttendanceLogError::Storage {
                path: path.clone(),
                source,
            }
        })?;
        log::info!("Marked {student_id} ({name}) present for {subject_code}");
        Ok(MarkOutcome::Recorded(record))
    }

    fn records(
        &self,
        subject_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceLogError> {
        self.read(&self.file_for(subject_code, date))
    }

    fn dates(&self, subject_code: &str) -> Result<Vec<NaiveDate>, AttendanceLogError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(AttendanceLogError::List {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let prefix = format!("{subject_code}_");
        let mut dates: Vec<NaiveDate> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let path = e.path();
                if path.extension().and_then(|x| x.to_str()) != Some("csv") {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                let date = stem.strip_prefix(&prefix)?;
                NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
            })
            .collect();
        dates.sort();
        Ok(dates)
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::domain::clock::FixedClock;
    use chrono::{NaiveDateTime, TimeDelta};
    use std::sync::Arc;

    struct SharedClock(Arc<FixedClock>);

    impl Clock for SharedClock {
        fn now(&self) -> NaiveDateTime {
            self.0.now()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn setup(start: NaiveDateTime) -> (tempfile::TempDir, CsvAttendanceLog, Arc<FixedClock>) {
        let tmp = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedClock::new(start));
        let log = CsvAttendanceLog::new(
            tmp.path().join("attendance"),
            Box::new(SharedClock(clock.clone())),
        );
        (tmp, log, clock)
    }

    #[test]
    fn test_mark_writes_headed_file_named_by_code_and_date() {
        let (_tmp, mut log, _) = setup(day(6).and_hms_opt(8, 30, 15).unwrap());
        let outcome = log.mark("CS101", "1", "Al").unwrap();
        assert!(outcome.is_new());
        assert_eq!(outcome.record().time, "08:30:15");

        let path = log.dir().join("CS101_2024-05-06.csv");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Student ID,Name,Time\n1,Al,08:30:15\n"
        );
    }

    #[test]
    fn test_second_mark_same_day_is_noop() {
        let (_tmp, mut log, clock) = setup(day(6).and_hms_opt(8, 0, 0).unwrap());
        log.mark("CS101", "1", "Al").unwrap();
        clock.advance(TimeDelta::hours(2));

        let outcome = log.mark("CS101", "1", "Al").unwrap();
        assert!(!outcome.is_new());
        assert_eq!(outcome.record().time, "08:00:00");
        assert_eq!(log.records("CS101", day(6)).unwrap().len(), 1);
    }

    #[test]
    fn test_same_student_other_subject_is_separate() {
        let (_tmp, mut log, _) = setup(day(6).and_hms_opt(8, 0, 0).unwrap());
        assert!(log.mark("CS101", "1", "Al").unwrap().is_new());
        assert!(log.mark("MA201", "1", "Al").unwrap().is_new());
    }

    #[test]
    fn test_new_file_after_midnight() {
        let (_tmp, mut log, clock) = setup(day(6).and_hms_opt(23, 59, 30).unwrap());
        log.mark("CS101", "1", "Al").unwrap();
        clock.advance(TimeDelta::minutes(1));
        assert!(log.mark("CS101", "1", "Al").unwrap().is_new());
        assert_eq!(log.today(), day(7));
        assert_eq!(log.dates("CS101").unwrap(), vec![day(6), day(7)]);
    }

    #[test]
    fn test_records_for_missing_day_is_empty() {
        let (_tmp, log, _) = setup(day(6).and_hms_opt(8, 0, 0).unwrap());
        assert!(log.records("CS101", day(1)).unwrap().is_empty());
    }

    #[test]
    fn test_dates_ignores_other_subjects_and_stray_files() {
        let (_tmp, mut log, clock) = setup(day(2).and_hms_opt(9, 0, 0).unwrap());
        log.mark("CS101", "1", "Al").unwrap();
        log.mark("CS1", "1", "Al").unwrap();
        clock.set(day(1).and_hms_opt(9, 0, 0).unwrap());
        log.mark("CS101", "2", "Bea").unwrap();
        fs::write(log.dir().join("CS101_notes.txt"), "x").unwrap();
        fs::write(log.dir().join("CS101_garbage.csv"), "x").unwrap();

        assert_eq!(log.dates("CS101").unwrap(), vec![day(1), day(2)]);
        assert_eq!(log.dates("CS1").unwrap(), vec![day(2)]);
    }

    #[test]
    fn test_dates_without_directory_is_empty() {
        let (_tmp, log, _) = setup(day(2).and_hms_opt(9, 0, 0).unwrap());
        assert!(log.dates("CS101").unwrap().is_empty());
    }
}
