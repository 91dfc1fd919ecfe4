use std::path::{Path, PathBuf};

use crate::roster::domain::roster_error::RosterError;
use crate::roster::domain::student::{Student, STUDENT_HEADERS};
use crate::roster::domain::student_repository::StudentRepository;
use crate::shared::csv_table;

use super::{dedup_by_key, keep_valid, storage_error};

/// Student table backed by `student_database.csv` (`ID,Name`).
pub struct CsvStudentRepository {
    path: PathBuf,
    students: Vec<Student>,
}

impl CsvStudentRepository {
    /// Loads the table, treating a missing file as an empty roster.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RosterError> {
        let path = path.into();
        let students = Self::load(&path)?;
        log::debug!("Loaded {} students from {}", students.len(), path.display());
        Ok(Self { path, students })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Vec<Student>, RosterError> {
        let rows = csv_table::read_rows(path).map_err(storage_error(path))?;
        let rows = keep_valid(rows, |s: &Student| Student::new(&s.id, &s.name), path);
        Ok(dedup_by_key(rows, |s: &Student| s.id.as_str(), path))
    }

    fn commit(&mut self, students: Vec<Student>) -> Result<(), RosterError> {
        csv_table::write_rows(&self.path, STUDENT_HEADERS, &students)
            .map_err(storage_error(&self.path))?;
        self.students = students;
        Ok(())
    }
}

impl StudentRepository for CsvStudentRepository {
    fn all(&self) -> &[Student] {
        &self.students
    }

    fn add(&mut self, student: Student) -> Result<(), RosterError> {
        if self.contains(&student.id) {
            return Err(RosterError::DuplicateStudent(student.id));
        }
        let mut next = self.students.clone();
        next.push(student);
        self.commit(next)
    }

    fn remove(&mut self, id: &str) -> Result<Student, RosterError> {
        let Some(pos) = self.students.iter().position(|s| s.id == id) else {
            return Err(RosterError::UnknownStudent(id.to_string()));
        };
        let mut next = self.students.clone();
        let removed = next.remove(pos);
        self.commit(next)?;
        Ok(removed)
    }

    fn reload(&mut self) -> Result<(), RosterError> {
        self.students = Self::load(&self.path)?;
        Ok(())
    }
}
