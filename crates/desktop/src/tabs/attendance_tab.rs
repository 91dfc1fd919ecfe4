use iced::widget::{column, pick_list, row, text};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::widgets::camera_feed::{self, FeedState};
use crate::widgets::primary_button::{danger_button, primary_button};

pub fn view<'a>(
    fs: f32,
    choices: Vec<String>,
    choice: Option<String>,
    idle: bool,
    running: bool,
    feed: &'a FeedState,
    theme: &Theme,
) -> Element<'a, Message> {
    let picker = pick_list(choices, choice, Message::SubjectChosen)
        .text_size(scaled(14.0, fs))
        .width(Length::Fill);

    let controls = row![
        primary_button(
            text("Start Attendance").size(scaled(14.0, fs)),
            idle.then_some(Message::StartAttendance),
        ),
        danger_button(
            text("Stop").size(scaled(14.0, fs)),
            running.then_some(Message::StopSession),
        ),
    ]
    .spacing(10);

    column![
        text("Attendance Details").size(scaled(16.0, fs)),
        row![text("Subject:").size(scaled(13.0, fs)), picker]
            .spacing(12)
            .align_y(iced::Alignment::Center),
        controls,
        text("Camera Feed").size(scaled(16.0, fs)),
        camera_feed::view(feed, fs, theme),
    ]
    .spacing(12)
    .into()
}
