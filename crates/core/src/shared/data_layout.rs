use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STUDENTS_FILE: &str = "student_database.csv";
const SUBJECTS_FILE: &str = "subjects_database.csv";
const SAMPLES_DIR: &str = "student_images";
const ATTENDANCE_DIR: &str = "attendance";
const TRAINER_DIR: &str = "trainer";
const MODEL_FILE: &str = "face_model.bin";

/// On-disk locations of every table, sample and model file, relative to
/// a single data root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Platform data directory for the application.
    ///
    /// - macOS: `~/Library/Application Support/Rollcall/`
    /// - Linux: `$XDG_DATA_HOME/Rollcall/` or `~/.local/share/Rollcall/`
    /// - Windows: `%APPDATA%/Rollcall/`
    ///
    /// Falls back to `./Rollcall` when the platform directory is unknown.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("Rollcall"))
            .unwrap_or_else(|| PathBuf::from("Rollcall"))
    }

    /// Creates the root and every sub-directory if missing.
    pub fn ensure(&self) -> io::Result<()> {
        for dir in [
            self.root.clone(),
            self.samples_dir(),
            self.attendance_dir(),
            self.trainer_dir(),
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn students_file(&self) -> PathBuf {
        self.root.join(STUDENTS_FILE)
    }

    pub fn subjects_file(&self) -> PathBuf {
        self.root.join(SUBJECTS_FILE)
    }

    pub fn samples_dir(&self) -> PathBuf {
        self.root.join(SAMPLES_DIR)
    }

    pub fn attendance_dir(&self) -> PathBuf {
        self.root.join(ATTENDANCE_DIR)
    }

    pub fn trainer_dir(&self) -> PathBuf {
        self.root.join(TRAINER_DIR)
    }

    pub fn model_file(&self) -> PathBuf {
        self.trainer_dir().join(MODEL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_under_root() {
        let layout = DataLayout::new("/data");
        assert_eq!(
            layout.students_file(),
            PathBuf::from("/data/student_database.csv")
        );
        assert_eq!(
            layout.subjects_file(),
            PathBuf::from("/data/subjects_database.csv")
        );
        assert_eq!(layout.samples_dir(), PathBuf::from("/data/student_images"));
        assert_eq!(layout.attendance_dir(), PathBuf::from("/data/attendance"));
        assert_eq!(
            layout.model_file(),
            PathBuf::from("/data/trainer/face_model.bin")
        );
    }

    #[test]
    fn test_ensure_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(tmp.path().join("nested"));
        layout.ensure().unwrap();
        assert!(layout.samples_dir().is_dir());
        assert!(layout.attendance_dir().is_dir());
        assert!(layout.trainer_dir().is_dir());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(tmp.path());
        layout.ensure().unwrap();
        layout.ensure().unwrap();
    }

    #[test]
    fn test_default_root_names_app() {
        assert!(DataLayout::default_root()
            .to_string_lossy()
            .contains("Rollcall"));
    }
}
