use crate::pipeline::annotate::Annotation;
use crate::shared::frame::Frame;

/// Receives what a capture or attendance workflow does, frame by frame.
///
/// Decouples the use cases from their front end: the GUI forwards events
/// over a channel, the CLI logs them, tests record or drop them.
pub trait SessionObserver: Send {
    /// A processed frame with its boxes already drawn in.
    fn frame(&mut self, frame: &Frame, annotations: &[Annotation]);

    /// Progress towards the workflow's goal, e.g. samples captured of target.
    fn progress(&mut self, current: usize, total: usize);

    /// A human-readable status message.
    fn info(&mut self, message: &str);
}

/// Discards every event.
pub struct NullSessionObserver;

impl SessionObserver for NullSessionObserver {
    fn frame(&mut self, _frame: &Frame, _annotations: &[Annotation]) {}
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn info(&mut self, _message: &str) {}
}

/// Sends events to the `log` facade.
///
/// Progress is only logged when it changes, and frames are counted
/// rather than logged.
pub struct LogSessionObserver {
    frames: usize,
    last_progress: Option<(usize, usize)>,
}

impl LogSessionObserver {
    pub fn new() -> Self {
        Self {
            frames: 0,
            last_progress: None,
        }
    }

    pub fn frames_seen(&self) -> usize {
        self.frames
    }
}

impl Default for LogSessionObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for LogSessionObserver {
    fn frame(&mut self, _frame: &Frame, annotations: &[Annotation]) {
        self.frames += 1;
        for a in annotations.iter().filter(|a| !a.label.is_empty()) {
            log::debug!("Frame {}: {}", self.frames, a.label);
        }
    }

    fn progress(&mut self, current: usize, total: usize) {
        if self.last_progress != Some((current, total)) {
            self.last_progress = Some((current, total));
            log::info!("Progress: {current}/{total}");
        }
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }
}
