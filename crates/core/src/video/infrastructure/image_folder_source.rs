use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::video::domain::camera_source::{CameraInfo, CameraSource};

/// Replays the images in a directory, in file-name order, as camera frames.
///
/// Lets every capture workflow run headless against prepared photos.
pub struct ImageFolderSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl ImageFolderSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }
}

fn list_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn load_frame(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, index))
}

impl CameraSource for ImageFolderSource {
    fn open(&mut self) -> Result<CameraInfo, Box<dyn std::error::Error>> {
        let files = list_images(&self.dir)
            .map_err(|e| format!("Cannot open frame folder {}: {e}", self.dir.display()))?;
        let first = files
            .first()
            .ok_or_else(|| format!("No images in {}", self.dir.display()))?;
        let (width, height) = image::image_dimensions(first)?;
        log::info!("Replaying {} frames from {}", files.len(), self.dir.display());
        self.files = files;
        Ok(CameraInfo {
            width,
            height,
            description: self.dir.display().to_string(),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        if self.files.is_empty() {
            return Box::new(std::iter::once(Err("ImageFolderSource: not opened".into())));
        }
        Box::new(
            self.files
                .iter()
                .enumerate()
                .map(|(i, path)| load_frame(path, i)),
        )
    }

    fn close(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(dir: &Path, name: &str, value: u8) {
        let img = image::RgbImage::from_pixel(40, 30, image::Rgb([value, value, value]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_replays_images_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_image(tmp.path(), "b.png", 200);
        write_image(tmp.path(), "a.png", 100);
        std::fs::write(tmp.path().join("notes.txt"), "skip").unwrap();

        let mut source = ImageFolderSource::new(tmp.path());
        let info = source.open().unwrap();
        assert_eq!((info.width, info.height), (40, 30));

        let frames: Vec<Frame> = source.frames().map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data()[0], 100);
        assert_eq!(frames[1].index(), 1);
    }

    #[test]
    fn test_empty_folder_fails_to_open() {
        let tmp = tempfile::tempdir().unwrap();
        let mut source = ImageFolderSource::new(tmp.path());
        assert!(source.open().is_err());
    }

    #[test]
    fn test_missing_folder_fails_to_open() {
        let mut source = ImageFolderSource::new("/nonexistent/frames");
        assert!(source.open().is_err());
    }

    #[test]
    fn test_unreadable_image_is_error_item() {
        let tmp = tempfile::tempdir().unwrap();
        write_image(tmp.path(), "a.png", 10);
        std::fs::write(tmp.path().join("b.png"), "not a png").unwrap();

        let mut source = ImageFolderSource::new(tmp.path());
        source.open().unwrap();
        let results: Vec<_> = source.frames().collect();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_frames_after_close_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_image(tmp.path(), "a.png", 10);
        let mut source = ImageFolderSource::new(tmp.path());
        source.open().unwrap();
        source.close();
        assert!(source.frames().next().unwrap().is_err());
    }
}
