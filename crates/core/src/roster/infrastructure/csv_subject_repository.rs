use std::path::{Path, PathBuf};

use crate::roster::domain::roster_error::RosterError;
use crate::roster::domain::subject::{Subject, SUBJECT_HEADERS};
use crate::roster::domain::subject_repository::SubjectRepository;
use crate::shared::csv_table;

use super::{dedup_by_key, keep_valid, storage_error};

/// Subject table backed by `subjects_database.csv`
/// (`Subject Code,Subject Name`).
pub struct CsvSubjectRepository {
    path: PathBuf,
    subjects: Vec<Subject>,
}

impl CsvSubjectRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RosterError> {
        let path = path.into();
        let subjects = Self::load(&path)?;
        log::debug!("Loaded {} subjects from {}", subjects.len(), path.display());
        Ok(Self { path, subjects })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Vec<Subject>, RosterError> {
        let rows = csv_table::read_rows(path).map_err(storage_error(path))?;
        let rows = keep_valid(rows, |s: &Subject| Subject::new(&s.code, &s.name), path);
        Ok(dedup_by_key(rows, |s: &Subject| s.code.as_str(), path))
    }

    fn commit(&mut self, subjects: Vec<Subject>) -> Result<(), RosterError> {
        csv_table::write_rows(&self.path, SUBJECT_HEADERS, &subjects)
            .map_err(storage_error(&self.path))?;
        self.subjects = subjects;
        Ok(())
    }
}

impl SubjectRepository for CsvSubjectRepository {
    fn all(&self) -> &[Subject] {
        &self.subjects
    }

    fn add(&mut self, subject: Subject) -> Result<(), RosterError> {
        if self.contains(&subject.code) {
            return Err(RosterError::DuplicateSubject(subject.code));
        }
        let mut next = self.subjects.clone();
        next.push(subject);
        self.commit(next)
    }

    fn remove(&mut self, code: &str) -> Result<Subject, RosterError> {
        let Some(pos) = self.subjects.iter().position(|s| s.code == code) else {
            return Err(RosterError::UnknownSubject(code.to_string()));
        };
        let mut next = self.subjects.clone();
        let removed = next.remove(pos);
        self.commit(next)?;
        Ok(removed)
    }

    fn reload(&mut self) -> Result<(), RosterError> {
        self.subjects = Self::load(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::domain::subject::SUBJECT_PLACEHOLDER;
    use std::fs;

    fn subject(code: &str, name: &str) -> Subject {
        Subject::new(code, name).unwrap()
    }

    fn open_in(dir: &tempfile::TempDir) -> CsvSubjectRepository {
        CsvSubjectRepository::open(dir.path().join("subjects_database.csv")).unwrap()
    }

    #[test]
    fn test_header_row_uses_display_names() {
        let tmp = tempfile::tempdir().unwrap();
        let mut repo = open_in(&tmp);
        repo.add(subject("CS101", "Programming")).unwrap();
        assert_eq!(
            fs::read_to_string(repo.path()).unwrap(),
            "Subject Code,Subject Name\nCS101,Programming\n"
        );
    }

    #[test]
    fn test_duplicate_code_leaves_table_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let mut repo = open_in(&tmp);
        repo.add(subject("CS101", "Programming")).unwrap();
        let before = fs::read_to_string(repo.path()).unwrap();

        let err = repo.add(subject("CS101", "Other")).unwrap_err();
        assert_eq!(err.to_string(), "Subject Code already exists");
        assert_eq!(repo.len(), 1);
        assert_eq!(fs::read_to_string(repo.path()).unwrap(), before);
    }

    #[test]
    fn test_delete_removes_only_that_subject_from_choices() {
        let tmp = tempfile::tempdir().unwrap();
        let mut repo = open_in(&tmp);
        repo.add(subject("CS101", "Programming")).unwrap();
        repo.add(subject("MA201", "Calculus")).unwrap();

        repo.remove("CS101").unwrap();

        let reopened = open_in(&tmp);
        assert_eq!(
            reopened.choices(),
            vec![SUBJECT_PLACEHOLDER.to_string(), "MA201 - Calculus".to_string()]
        );
    }

    #[test]
    fn test_remove_unknown_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut repo = open_in(&tmp);
        assert!(matches!(
            repo.remove("XX"),
            Err(RosterError::UnknownSubject(_))
        ));
    }

    #[test]
    fn test_choices_of_empty_roster_is_placeholder_only() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(open_in(&tmp).choices(), vec![SUBJECT_PLACEHOLDER]);
    }

    #[test]
    fn test_hand_edited_invalid_codes_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("subjects_database.csv");
        fs::write(
            &path,
            "Subject Code,Subject Name\nCS/1,Escape\nMA1,Maths\nA - B,Split\n",
        )
        .unwrap();
        let repo = CsvSubjectRepository::open(&path).unwrap();
        assert_eq!(repo.all(), &[subject("MA1", "Maths")]);
    }
}
