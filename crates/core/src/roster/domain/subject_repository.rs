use super::roster_error::RosterError;
use super::subject::{Subject, SUBJECT_PLACEHOLDER};

/// Owns the subject table. Same contract as the student repository,
/// keyed by subject code.
pub trait SubjectRepository: Send {
    fn all(&self) -> &[Subject];

    fn get(&self, code: &str) -> Option<&Subject> {
        self.all().iter().find(|s| s.code == code)
    }

    fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Fails with [`RosterError::DuplicateSubject`] when the code is taken.
    fn add(&mut self, subject: Subject) -> Result<(), RosterError>;

    /// Fails with [`RosterError::UnknownSubject`] when the code is absent.
    fn remove(&mut self, code: &str) -> Result<Subject, RosterError>;

    fn reload(&mut self) -> Result<(), RosterError>;

    /// Picker entries: the placeholder followed by every subject label.
    fn choices(&self) -> Vec<String> {
        std::iter::once(SUBJECT_PLACEHOLDER.to_string())
            .chain(self.all().iter().map(Subject::choice_label))
            .collect()
    }
}
