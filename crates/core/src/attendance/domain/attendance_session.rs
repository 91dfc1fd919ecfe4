use std::collections::HashMap;

use crate::recognition::domain::face_recognizer::Prediction;
use crate::roster::domain::student::Student;
use crate::roster::domain::student_repository::StudentRepository;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No prediction accepted yet.
    Waiting,
    /// At least one student has a non-zero counter.
    Recognizing,
    /// A student reached the required count; the mark has not been written yet.
    Marked,
    Done,
}

/// How one detected face was judged.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceVerdict {
    /// Distance too large, or the label is not on the roster.
    Unknown,
    /// Accepted, counter advanced but below the requirement.
    Counting { student: Student, count: u32 },
    /// Accepted and the counter reached the requirement.
    Reached { student: Student },
}

/// Recognition state of one attendance session.
///
/// Counters are cumulative per student id and are never reset by misses.
/// Only the first student to reach the requirement is marked.
pub struct AttendanceSession {
    threshold: f64,
    required: u32,
    counts: HashMap<String, u32>,
    marked: Option<Student>,
    state: SessionState,
}

impl AttendanceSession {
    pub fn new(threshold: f64, required: u32) -> Self {
        Self {
            threshold,
            required: required.max(1),
            counts: HashMap::new(),
            marked: None,
            state: SessionState::Waiting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn count(&self, student_id: &str) -> u32 {
        self.counts.get(student_id).copied().unwrap_or(0)
    }

    /// The student whose counter reached the requirement, once one has.
    pub fn marked(&self) -> Option<&Student> {
        self.marked.as_ref()
    }

    /// Judges one prediction and updates the counters.
    ///
    /// Once a student has been marked, further predictions are still
    /// judged but never produce a second [`FaceVerdict::Reached`].
    pub fn observe(
        &mut self,
        prediction: &Prediction,
        students: &dyn StudentRepository,
    ) -> FaceVerdict {
        if prediction.distance >= self.threshold {
            return FaceVerdict::Unknown;
        }
        let Some(student) = students.get(&prediction.label) else {
            log::debug!("Ignoring prediction for unrostered label {}", prediction.label);
            return FaceVerdict::Unknown;
        };

        let count = self.counts.entry(student.id.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        if self.state == SessionState::Waiting {
            self.state = SessionState::Recognizing;
        }

        if count >= self.required && self.marked.is_none() {
            self.marked = Some(student.clone());
            self.state = SessionState::Marked;
            return FaceVerdict::Reached {
                student: student.clone(),
            };
        }

        FaceVerdict::Counting {
            student: student.clone(),
            count: count.min(self.required),
        }
    }

    /// Ends the session. Called after the mark is written, on cancellation,
    /// and when the camera stops delivering frames.
    pub fn finish(&mut self) {
        self.state = SessionState::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::domain::roster_error::RosterError;

    struct Roster(Vec<Student>);

    impl StudentRepository for Roster {
        fn all(&self) -> &[Student] {
            &self.0
        }
        fn add(&mut self, _student: Student) -> Result<(), RosterError> {
            unimplemented!()
        }
        fn remove(&mut self, _id: &str) -> Result<Student, RosterError> {
            unimplemented!()
        }
        fn reload(&mut self) -> Result<(), RosterError> {
            Ok(())
        }
    }

    fn roster() -> Roster {
        Roster(vec![
            Student::new("1", "Al").unwrap(),
            Student::new("2", "Bea").unwrap(),
        ])
    }

    fn pred(label: &str, distance: f64) -> Prediction {
        Prediction {
            label: label.into(),
            distance,
        }
    }

    #[test]
    fn test_starts_waiting() {
        let s = AttendanceSession::new(65.0, 3);
        assert_eq!(s.state(), SessionState::Waiting);
        assert!(s.marked().is_none());
    }

    #[test]
    fn test_distance_at_threshold_is_unknown() {
        let mut s = AttendanceSession::new(65.0, 3);
        assert_eq!(s.observe(&pred("1", 65.0), &roster()), FaceVerdict::Unknown);
        assert_eq!(s.state(), SessionState::Waiting);
        assert_eq!(s.count("1"), 0);
    }

    #[test]
    fn test_unrostered_label_is_unknown() {
        let mut s = AttendanceSession::new(65.0, 3);
        assert_eq!(s.observe(&pred("99", 10.0), &roster()), FaceVerdict::Unknown);
        assert_eq!(s.count("99"), 0);
    }

    #[test]
    fn test_accepted_prediction_counts() {
        let mut s = AttendanceSession::new(65.0, 3);
        let verdict = s.observe(&pred("1", 40.0), &roster());
        assert_eq!(
            verdict,
            FaceVerdict::Counting {
                student: Student::new("1", "Al").unwrap(),
                count: 1
            }
        );
        assert_eq!(s.state(), SessionState::Recognizing);
    }

    #[test]
    fn test_misses_do_not_reset_counter() {
        let roster = roster();
        let mut s = AttendanceSession::new(65.0, 3);
        s.observe(&pred("1", 10.0), &roster);
        s.observe(&pred("1", 90.0), &roster);
        s.observe(&pred("2", 10.0), &roster);
        s.observe(&pred("1", 10.0), &roster);
        assert_eq!(s.count("1"), 2);
        assert_eq!(s.count("2"), 1);
    }

    #[test]
    fn test_reaching_requirement_marks_once() {
        let roster = roster();
        let mut s = AttendanceSession::new(65.0, 2);
        s.observe(&pred("1", 10.0), &roster);
        let verdict = s.observe(&pred("1", 10.0), &roster);
        assert!(matches!(verdict, FaceVerdict::Reached { ref student } if student.id == "1"));
        assert_eq!(s.state(), SessionState::Marked);

        s.observe(&pred("2", 10.0), &roster);
        let again = s.observe(&pred("2", 10.0), &roster);
        assert!(matches!(again, FaceVerdict::Counting { count: 2, .. }));
        assert_eq!(s.marked().unwrap().id, "1");
    }

    #[test]
    fn test_finish_is_done() {
        let mut s = AttendanceSession::new(65.0, 2);
        s.finish();
        assert_eq!(s.state(), SessionState::Done);
    }
}
