use super::roster_error::RosterError;
use super::student::Student;

/// Owns the student table: an in-memory copy kept in file order plus the
/// backing store, rewritten in full on every mutation.
///
/// A rejected mutation leaves both the cache and the store unchanged.
pub trait StudentRepository: Send {
    fn all(&self) -> &[Student];

    fn get(&self, id: &str) -> Option<&Student> {
        self.all().iter().find(|s| s.id == id)
    }

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// Fails with [`RosterError::DuplicateStudent`] when the id is taken.
    fn add(&mut self, student: Student) -> Result<(), RosterError>;

    /// Fails with [`RosterError::UnknownStudent`] when the id is absent.
    fn remove(&mut self, id: &str) -> Result<Student, RosterError>;

    /// Re-reads the backing store, discarding the cache.
    fn reload(&mut self) -> Result<(), RosterError>;
}
