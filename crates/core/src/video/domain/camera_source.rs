use crate::shared::frame::Frame;

/// What an opened source reports about itself.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraInfo {
    pub width: u32,
    pub height: u32,
    /// Device name or path, for status lines.
    pub description: String,
}

/// A live (or replayed) stream of RGB frames.
///
/// The workflow opens the source when it starts, pulls frames until it is
/// done or the iterator ends, and closes it on every exit path. An `Err`
/// item or the end of the iterator ends the capture loop.
pub trait CameraSource: Send {
    fn open(&mut self) -> Result<CameraInfo, Box<dyn std::error::Error>>;

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases the device. Safe to call more than once.
    fn close(&mut self);
}
