use std::path::Path;

use crate::shared::constants::CAMERA_INPUT_FORMAT;
use crate::shared::frame::Frame;
use crate::video::domain::camera_source::{CameraInfo, CameraSource};

/// Reads frames from a capture device via libavdevice, or from a video file
/// when `device` names an existing file.
///
/// Each decoded frame is converted to RGB24.
pub struct FfmpegCamera {
    device: String,
    capture: Option<Capture>,
}

struct Capture {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    stream_index: usize,
}

// Safety: FfmpegCamera is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCamera {}

impl FfmpegCamera {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            capture: None,
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    fn open_input(&self) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
        let path = Path::new(&self.device);
        if path.is_file() {
            return Ok(ffmpeg_next::format::input(path)?);
        }

        ffmpeg_next::device::register_all();
        let format = ffmpeg_next::device::input::video()
            .find(|f| f.name() == CAMERA_INPUT_FORMAT)
            .ok_or_else(|| format!("Capture input format {CAMERA_INPUT_FORMAT} is unavailable"))?;

        let mut options = ffmpeg_next::Dictionary::new();
        if CAMERA_INPUT_FORMAT == "avfoundation" {
            options.set("framerate", "30");
        }

        let ctx = ffmpeg_next::format::open_with(
            &self.device,
            &ffmpeg_next::format::format::Format::Input(format),
            options,
        )?;
        match ctx {
            ffmpeg_next::format::context::Context::Input(input) => Ok(input),
            ffmpeg_next::format::context::Context::Output(_) => {
                Err(format!("{} opened as an output", self.device).into())
            }
        }
    }
}

impl CameraSource for FfmpegCamera {
    fn open(&mut self) -> Result<CameraInfo, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        self.close();

        let ictx = self
            .open_input()
            .map_err(|e| format!("Cannot open camera {}: {e}", self.device))?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;
        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(format!("Camera {} reported no frame size", self.device).into());
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!("Opened camera {} ({width}x{height})", self.device);
        self.capture = Some(Capture {
            ictx,
            decoder,
            scaler,
            width,
            height,
            stream_index,
        });

        Ok(CameraInfo {
            width,
            height,
            description: self.device.clone(),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(capture) = self.capture.as_mut() else {
            return Box::new(std::iter::once(Err("FfmpegCamera: not opened".into())));
        };
        Box::new(CaptureIter {
            capture,
            frame_index: 0,
            flushing: false,
            done: false,
        })
    }

    fn close(&mut self) {
        if self.capture.take().is_some() {
            log::debug!("Closed camera {}", self.device);
        }
    }
}

/// Lazy iterator that decodes one frame per call.
struct CaptureIter<'a> {
    capture: &'a mut Capture,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl CaptureIter<'_> {
    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.capture.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        if let Err(e) = self.capture.scaler.run(&decoded, &mut rgb_frame) {
            return Some(Err(Box::new(e)));
        }

        let (width, height) = (self.capture.width, self.capture.height);
        let pixels = extract_rgb_pixels(&rgb_frame, width, height);
        let frame = Frame::new(pixels, width, height, 3, self.frame_index);
        self.frame_index += 1;
        Some(Ok(frame))
    }
}

impl Iterator for CaptureIter<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let next_packet = self.capture.ictx.packets().next();
            let Some((stream, packet)) = next_packet else {
                let _ = self.capture.decoder.send_eof();
                self.flushing = true;
                if let Some(result) = self.try_receive() {
                    return Some(result);
                }
                self.done = true;
                return None;
            };

            if stream.index() != self.capture.stream_index {
                continue;
            }

            if self.capture.decoder.send_packet(&packet).is_err() {
                continue;
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer,
/// dropping any per-row stride padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
