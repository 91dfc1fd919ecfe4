//! Stubs shared by the use case tests.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use image::GrayImage;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::annotate::Annotation;
use crate::pipeline::session_observer::SessionObserver;
use crate::roster::domain::roster_error::RosterError;
use crate::roster::domain::student::Student;
use crate::roster::domain::student_repository::StudentRepository;
use crate::samples::domain::face_sample::{LabeledFace, SampleName};
use crate::samples::domain::sample_store::{SampleStore, SampleStoreError};
use crate::shared::constants::FACE_SIZE;
use crate::shared::frame::Frame;
use crate::shared::region::Region;
use crate::video::domain::camera_source::{CameraInfo, CameraSource};

// --- Images ---

/// Horizontal bands: one person's face.
pub fn stripes() -> GrayImage {
    GrayImage::from_fn(FACE_SIZE, FACE_SIZE, |_, y| {
        image::Luma([if (y / 6) % 2 == 0 { 40 } else { 210 }])
    })
}

/// Checkerboard: another person's face.
pub fn checker() -> GrayImage {
    GrayImage::from_fn(FACE_SIZE, FACE_SIZE, |x, y| {
        image::Luma([if ((x / 5) + (y / 5)) % 2 == 0 { 30 } else { 220 }])
    })
}

/// An RGB frame showing nothing but `face`.
pub fn frame_of(face: &GrayImage, index: usize) -> Frame {
    let data = face.pixels().flat_map(|p| [p.0[0]; 3]).collect();
    Frame::new(data, face.width(), face.height(), 3, index)
}

pub fn blank_frames(n: usize) -> Vec<Frame> {
    (0..n)
        .map(|i| Frame::new(vec![128; 64 * 48 * 3], 64, 48, 3, i))
        .collect()
}

// --- Camera ---

pub struct StubCamera {
    frames: Vec<Frame>,
    fail_at: Option<usize>,
    fail_open: bool,
    pub closed: Arc<Mutex<bool>>,
}

impl StubCamera {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            fail_at: None,
            fail_open: false,
            closed: Arc::new(Mutex::new(false)),
        }
    }

    /// Yields an error item in place of frame `index`.
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn unopenable(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

impl CameraSource for StubCamera {
    fn open(&mut self) -> Result<CameraInfo, Box<dyn std::error::Error>> {
        if self.fail_open {
            return Err("no such camera".into());
        }
        Ok(CameraInfo {
            width: 64,
            height: 48,
            description: "stub".into(),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let fail_at = self.fail_at;
        Box::new(self.frames.drain(..).enumerate().map(move |(i, f)| {
            if Some(i) == fail_at {
                Err("camera unplugged".into())
            } else {
                Ok(f)
            }
        }))
    }

    fn close(&mut self) {
        *self.closed.lock().unwrap() = true;
    }
}

// --- Detector ---

/// Returns queued detections frame by frame, then `fallback` for the rest.
pub struct StubDetector {
    queued: VecDeque<Vec<Region>>,
    fallback: Vec<Region>,
}

impl StubDetector {
    pub fn always(regions: Vec<Region>) -> Self {
        Self {
            queued: VecDeque::new(),
            fallback: regions,
        }
    }

    pub fn sequence(per_frame: Vec<Vec<Region>>) -> Self {
        Self {
            queued: per_frame.into(),
            fallback: Vec::new(),
        }
    }

    /// Sees one face covering the whole frame, every frame.
    pub fn whole_frame() -> Self {
        Self::always(vec![region(0, 0, FACE_SIZE as i32, FACE_SIZE as i32)])
    }
}

impl FaceDetector for StubDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
        Ok(self
            .queued
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

pub fn region(x: i32, y: i32, width: i32, height: i32) -> Region {
    Region {
        x,
        y,
        width,
        height,
        score: 0.9,
    }
}

// --- Samples ---

/// In-memory sample store; clones share the same samples.
#[derive(Clone, Default)]
pub struct MemorySampleStore {
    pub samples: Arc<Mutex<Vec<(SampleName, GrayImage)>>>,
    /// Saves fail once this many samples are held.
    pub fail_after: Option<usize>,
}

impl MemorySampleStore {
    pub fn seeded(student_id: &str, name: &str, face: &GrayImage, count: usize) -> Self {
        let store = Self::default();
        for i in 0..count {
            store
                .samples
                .lock()
                .unwrap()
                .push((SampleName::new(student_id, name, i), face.clone()));
        }
        store
    }

    pub fn names_for(&self, student_id: &str) -> Vec<SampleName> {
        self.samples
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n.student_id == student_id)
            .map(|(n, _)| n.clone())
            .collect()
    }
}

impl SampleStore for MemorySampleStore {
    fn save(
        &mut self,
        sample: &SampleName,
        face: &GrayImage,
    ) -> Result<std::path::PathBuf, SampleStoreError> {
        let mut samples = self.samples.lock().unwrap();
        if self.fail_after.is_some_and(|n| samples.len() >= n) {
            return Err(SampleStoreError::Io {
                path: sample.file_name().into(),
                source: std::io::Error::other("disk full"),
            });
        }
        samples.push((sample.clone(), face.clone()));
        Ok(sample.file_name().into())
    }

    fn count_for(&self, student_id: &str) -> Result<usize, SampleStoreError> {
        Ok(self.names_for(student_id).len())
    }

    fn remove_for(&mut self, student_id: &str) -> Result<usize, SampleStoreError> {
        let mut samples = self.samples.lock().unwrap();
        let before = samples.len();
        samples.retain(|(n, _)| n.student_id != student_id);
        Ok(before - samples.len())
    }

    fn load_all(&self) -> Result<Vec<LabeledFace>, SampleStoreError> {
        Ok(self
            .samples
            .lock()
            .unwrap()
            .iter()
            .map(|(n, img)| LabeledFace {
                label: n.student_id.clone(),
                image: img.clone(),
            })
            .collect())
    }
}

// --- Roster ---

/// In-memory student roster; clones share the same rows.
#[derive(Clone, Default)]
pub struct MemoryStudents {
    pub rows: Arc<Mutex<Vec<Student>>>,
    cache: Vec<Student>,
}

impl MemoryStudents {
    pub fn with(students: &[(&str, &str)]) -> Self {
        let rows: Vec<Student> = students
            .iter()
            .map(|(id, name)| Student::new(id, name).unwrap())
            .collect();
        Self {
            rows: Arc::new(Mutex::new(rows.clone())),
            cache: rows,
        }
    }
}

impl StudentRepository for MemoryStudents {
    fn all(&self) -> &[Student] {
        &self.cache
    }

    fn add(&mut self, student: Student) -> Result<(), RosterError> {
        if self.contains(&student.id) {
            return Err(RosterError::DuplicateStudent(student.id));
        }
        self.rows.lock().unwrap().push(student.clone());
        self.cache.push(student);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<Student, RosterError> {
        let pos = self
            .cache
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RosterError::UnknownStudent(id.into()))?;
        self.rows.lock().unwrap().retain(|s| s.id != id);
        Ok(self.cache.remove(pos))
    }

    fn reload(&mut self) -> Result<(), RosterError> {
        self.cache = self.rows.lock().unwrap().clone();
        Ok(())
    }
}

// --- Observer ---

#[derive(Clone, Default)]
pub struct RecordingObserver {
    pub labels: Arc<Mutex<Vec<Vec<String>>>>,
    pub progress: Arc<Mutex<Vec<(usize, usize)>>>,
}

impl SessionObserver for RecordingObserver {
    fn frame(&mut self, _frame: &Frame, annotations: &[Annotation]) {
        self.labels
            .lock()
            .unwrap()
            .push(annotations.iter().map(|a| a.label.clone()).collect());
    }

    fn progress(&mut self, current: usize, total: usize) {
        self.progress.lock().unwrap().push((current, total));
    }

    fn info(&mut self, _message: &str) {}
}
