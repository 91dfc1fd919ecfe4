use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::samples::domain::face_sample::{label_of, LabeledFace, SampleName};
use crate::samples::domain::sample_store::{SampleStore, SampleStoreError};
use crate::shared::constants::IMAGE_EXTENSIONS;

/// Face samples stored as grayscale image files in one flat directory.
pub struct ImageSampleStore {
    dir: PathBuf,
}

impl ImageSampleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Image files in the directory with their labels, sorted by name.
    fn labelled_files(&self) -> Result<Vec<(String, PathBuf)>, SampleStoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SampleStoreError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut files: Vec<(String, PathBuf)> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_image(p))
            .filter_map(|p| {
                let file_name = p.file_name()?.to_str()?;
                match label_of(file_name) {
                    Some(label) => Some((label.to_string(), p.clone())),
                    None => {
                        log::warn!("Skipping sample without id prefix: {}", p.display());
                        None
                    }
                }
            })
            .collect();
        files.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(files)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

impl SampleStore for ImageSampleStore {
    fn save(&mut self, sample: &SampleName, face: &GrayImage) -> Result<PathBuf, SampleStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| SampleStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(sample.file_name());
        face.save(&path).map_err(|source| SampleStoreError::Encode {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn count_for(&self, student_id: &str) -> Result<usize, SampleStoreError> {
        Ok(self
            .labelled_files()?
            .iter()
            .filter(|(label, _)| label == student_id)
            .count())
    }

    fn remove_for(&mut self, student_id: &str) -> Result<usize, SampleStoreError> {
        let mut removed = 0;
        for (label, path) in self.labelled_files()? {
            if label != student_id {
                continue;
            }
            fs::remove_file(&path).map_err(|source| SampleStoreError::Io {
                path: path.clone(),
                source,
            })?;
            removed += 1;
        }
        if removed > 0 {
            log::info!("Removed {removed} samples for {student_id}");
        }
        Ok(removed)
    }

    fn load_all(&self) -> Result<Vec<LabeledFace>, SampleStoreError> {
        let mut faces = Vec::new();
        for (label, path) in self.labelled_files()? {
            match image::open(&path) {
                Ok(img) => faces.push(LabeledFace {
                    label,
                    image: img.to_luma8(),
                }),
                Err(e) => log::warn!("Skipping unreadable sample {}: {e}", path.display()),
            }
        }
        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(value: u8) -> GrayImage {
        GrayImage::from_pixel(20, 20, image::Luma([value]))
    }

    fn store_in(dir: &tempfile::TempDir) -> ImageSampleStore {
        ImageSampleStore::new(dir.path().join("student_images"))
    }

    #[test]
    fn test_save_uses_sample_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_in(&tmp);
        let path = store.save(&SampleName::new("7", "Al", 3), &face(10)).unwrap();
        assert_eq!(path.file_name().unwrap(), "7_Al_3.jpg");
        assert!(path.exists());
    }

    #[test]
    fn test_count_and_remove_are_per_student() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_in(&tmp);
        for i in 0..3 {
            store.save(&SampleName::new("1", "Al", i), &face(10)).unwrap();
        }
        store.save(&SampleName::new("12", "Bea", 0), &face(10)).unwrap();

        assert_eq!(store.count_for("1").unwrap(), 3);
        assert_eq!(store.remove_for("1").unwrap(), 3);
        assert_eq!(store.count_for("1").unwrap(), 0);
        assert_eq!(store.count_for("12").unwrap(), 1);
    }

    #[test]
    fn test_load_all_labels_and_skips_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = store_in(&tmp);
        store.save(&SampleName::new("1", "Al", 0), &face(10)).unwrap();
        store.save(&SampleName::new("2", "Bea", 0), &face(200)).unwrap();
        fs::write(store.dir().join("3_Broken_0.jpg"), b"not an image").unwrap();
        fs::write(store.dir().join("notes.txt"), b"ignore").unwrap();

        let faces = store.load_all().unwrap();
        let labels: Vec<_> = faces.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["1", "2"]);
        assert_eq!(faces[0].image.dimensions(), (20, 20));
    }

    #[test]
    fn test_missing_directory_is_empty_set() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(store.count_for("1").unwrap(), 0);
    }
}
