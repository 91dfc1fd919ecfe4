use iced::widget::{checkbox, column, pick_list, row, slider, text, text_input, Space};
use iced::{Element, Theme};

use crate::app::{scaled, Message};
use crate::settings::{Appearance, Settings};
use crate::theme::muted_color;
use crate::widgets::folder_row::folder_row;
use crate::widgets::primary_button::primary_button;

/// Data folder and camera controls are only enabled for a logged-in admin.
pub fn view<'a>(
    settings: &Settings,
    idle: bool,
    admin: bool,
    theme: &Theme,
) -> Element<'a, Message> {
    let fs = settings.font_scale;
    let editable = idle && admin;
    let camera_hint = if admin {
        "A folder of images can stand in for a camera."
    } else {
        "Log in as admin to change the data folder or camera."
    };

    column![
        text("Data").size(scaled(16.0, fs)),
        Space::new().height(8),
        folder_row(
            fs,
            "Data folder",
            &settings.data_dir,
            "Change",
            editable.then_some(Message::SelectDataDir),
            theme,
        ),
        Space::new().height(12),
        text("Camera device").size(scaled(13.0, fs)),
        Space::new().height(4),
        text_input("Camera device", &settings.camera_device)
            .on_input_maybe(admin.then_some(Message::CameraDeviceChanged))
            .size(scaled(13.0, fs))
            .padding(8),
        text(camera_hint)
            .size(scaled(12.0, fs))
            .color(muted_color(theme)),
        Space::new().height(20),
        text("Theme").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Mode").size(scaled(13.0, fs)),
            pick_list(Appearance::ALL, Some(settings.appearance), |a| {
                Message::AppearanceChanged(a)
            })
            .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(12),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Font size").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            slider(0.8..=1.5, settings.font_scale, Message::FontScaleChanged).step(0.05),
            text(format!("{:.0}%", settings.font_scale * 100.0)).size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(iced::Alignment::Center),
        Space::new().height(24),
        primary_button(
            text("Restore defaults").size(scaled(13.0, fs)),
            editable.then_some(Message::RestoreDefaults),
        ),
    ]
    .spacing(0)
    .into()
}
