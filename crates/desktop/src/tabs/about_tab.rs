use iced::widget::{button, column, text, Space};
use iced::Element;

use rollcall_core::shared::data_layout::DataLayout;

use crate::app::{scaled, Message};

pub fn view<'a>(fs: f32, layout: &DataLayout) -> Element<'a, Message> {
    let version = env!("CARGO_PKG_VERSION");

    column![
        text("Rollcall").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Takes class attendance by recognizing registered students \
             through the camera. Students, subjects and attendance sheets \
             are plain CSV files in the data folder."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(12),
        text(layout.root().display().to_string()).size(scaled(12.0, fs)),
        Space::new().height(8),
        button(text("Open data folder").size(scaled(13.0, fs)))
            .on_press(Message::OpenDataFolder)
            .padding([8, 16]),
    ]
    .spacing(0)
    .into()
}
