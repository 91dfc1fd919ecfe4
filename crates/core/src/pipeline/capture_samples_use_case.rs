use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::detection::domain::face_detector::FaceDetector;
use crate::roster::domain::student::Student;
use crate::samples::domain::face_sample::SampleName;
use crate::samples::domain::sample_store::SampleStore;
use crate::shared::constants::{CAPTURE_INTERVAL, SAMPLE_TARGET};
use crate::video::domain::camera_source::CameraSource;

use super::annotate::{draw_annotations, Annotation, BoxColor};
use super::face_crop::normalize_face;
use super::session_observer::SessionObserver;

/// Why a capture loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureEnd {
    /// The target number of samples was saved.
    Complete,
    /// Cancelled by the user.
    Stopped,
    /// The camera failed or ran out of frames.
    SourceEnded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureReport {
    pub captured: usize,
    pub target: usize,
    pub end: CaptureEnd,
}

impl CaptureReport {
    pub fn is_complete(&self) -> bool {
        self.end == CaptureEnd::Complete
    }
}

/// Collects face samples for one student from a camera.
///
/// Every detected face becomes one sample until `target` is reached,
/// never more, even when the last frame holds several faces. After a frame
/// that yielded a sample the loop pauses for `interval`.
pub struct CaptureSamplesUseCase {
    target: usize,
    interval: Duration,
    cancelled: Arc<AtomicBool>,
}

impl CaptureSamplesUseCase {
    pub fn new(
        target: Option<usize>,
        interval: Option<Duration>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            target: target.unwrap_or(SAMPLE_TARGET).max(1),
            interval: interval.unwrap_or(CAPTURE_INTERVAL),
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Opens the camera, captures, and closes the camera again on every
    /// exit path. Samples are numbered from 0.
    pub fn execute(
        &self,
        camera: &mut dyn CameraSource,
        detector: &mut dyn FaceDetector,
        store: &mut dyn SampleStore,
        student: &Student,
        observer: &mut dyn SessionObserver,
    ) -> Result<CaptureReport, Box<dyn std::error::Error>> {
        let info = camera.open()?;
        observer.info(&format!(
            "Capturing {} samples of {} from {}",
            self.target, student.name, info.description
        ));
        let result = self.run(camera, detector, store, student, observer);
        camera.close();

        if let Ok(report) = &result {
            log::info!(
                "Captured {}/{} samples for {} ({:?})",
                report.captured,
                report.target,
                student.id,
                report.end
            );
        }
        result
    }

    fn run(
        &self,
        camera: &mut dyn CameraSource,
        detector: &mut dyn FaceDetector,
        store: &mut dyn SampleStore,
        student: &Student,
        observer: &mut dyn SessionObserver,
    ) -> Result<CaptureReport, Box<dyn std::error::Error>> {
        let mut captured = 0;
        let report = |captured, end| CaptureReport {
            captured,
            target: self.target,
            end,
        };

        for frame in camera.frames() {
            if self.cancelled.load(Ordering::Relaxed) {
                return Ok(report(captured, CaptureEnd::Stopped));
            }
            let mut frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Camera read failed: {e}");
                    return Ok(report(captured, CaptureEnd::SourceEnded));
                }
            };

            let regions = detector.detect(&frame)?;
            let mut annotations = Vec::new();
            for region in regions {
                if captured >= self.target {
                    break;
                }
                let Some(face) = normalize_face(&frame, &region) else {
                    continue;
                };
                let name = SampleName::new(&student.id, &student.name, captured);
                store.save(&name, &face)?;
                captured += 1;
                annotations.push(Annotation::new(region, BoxColor::Green, ""));
            }

            draw_annotations(&mut frame, &annotations);
            observer.frame(&frame, &annotations);
            observer.progress(captured, self.target);

            if captured >= self.target {
                return Ok(report(captured, CaptureEnd::Complete));
            }
            if !annotations.is_empty() && !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
        }

        Ok(report(captured, CaptureEnd::SourceEnded))
    }
}
