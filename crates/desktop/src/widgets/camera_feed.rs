use iced::border::Border;
use iced::widget::{column, container, image, progress_bar, row, text};
use iced::{ContentFit, Element, Length, Theme};

use rollcall_core::pipeline::annotate::BoxColor;

use crate::app::{scaled, Message};
use crate::theme::{box_color, surface_color, tertiary_color};
use crate::workers::session_worker::FramePreview;

const FEED_HEIGHT: f32 = 360.0;
const CORNER_RADIUS: f32 = 12.0;

/// What the camera panel of a tab currently shows.
#[derive(Debug, Clone)]
pub struct FeedState {
    frame: Option<image::Handle>,
    captions: Vec<(String, BoxColor)>,
    progress: Option<(usize, usize)>,
    status: String,
}

impl FeedState {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            frame: None,
            captions: Vec::new(),
            progress: None,
            status: status.into(),
        }
    }

    pub fn show(&mut self, preview: FramePreview) {
        self.frame = Some(image::Handle::from_rgba(
            preview.width,
            preview.height,
            preview.rgba,
        ));
        self.captions = preview.captions;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_progress(&mut self, current: usize, total: usize) {
        self.progress = Some((current, total));
    }

    /// Progress as a percentage, when the workflow has reported any.
    pub fn percent(&self) -> Option<f32> {
        match self.progress {
            Some((current, total)) if total > 0 => {
                Some((current.min(total) as f32 / total as f32) * 100.0)
            }
            _ => None,
        }
    }

    pub fn has_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Camera released: drop the last picture and reset progress, keep the
    /// status line.
    pub fn stop(&mut self) {
        self.frame = None;
        self.captions.clear();
        self.progress = None;
    }
}

pub fn view<'a>(feed: &'a FeedState, fs: f32, theme: &Theme) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);

    let picture: Element<'a, Message> = match &feed.frame {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fixed(FEED_HEIGHT))
            .into(),
        None => container(text("Camera is off").size(scaled(14.0, fs)).color(tertiary))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(FEED_HEIGHT))
            .into(),
    };

    let captions = row(feed
        .captions
        .iter()
        .map(|(label, color)| {
            text(label.as_str())
                .size(scaled(13.0, fs))
                .color(box_color(*color))
                .into()
        })
        .collect::<Vec<_>>())
    .spacing(14);

    let mut col = column![
        container(picture)
            .padding(8)
            .width(Length::Fill)
            .style(move |_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(surface)),
                border: Border {
                    radius: CORNER_RADIUS.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }),
        captions,
    ]
    .spacing(8);

    if let Some(pct) = feed.percent() {
        col = col.push(progress_bar(0.0..=100.0, pct));
    }
    col.push(text(feed.status.as_str()).size(scaled(14.0, fs)))
        .into()
}
