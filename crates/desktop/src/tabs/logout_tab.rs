use iced::widget::{column, container, text, Space};
use iced::{Element, Length};

use crate::app::{scaled, Message};
use crate::widgets::primary_button::danger_button;

pub fn view<'a>(fs: f32, running: bool) -> Element<'a, Message> {
    let mut col = column![
        text("Are you sure you want to logout?").size(scaled(16.0, fs)),
        Space::new().height(12),
    ]
    .align_x(iced::Alignment::Center);

    if running {
        col = col.push(text("The running camera session will be stopped.").size(scaled(13.0, fs)));
        col = col.push(Space::new().height(8));
    }

    col = col.push(danger_button(
        text("Logout").size(scaled(14.0, fs)),
        Some(Message::Logout),
    ));

    container(col)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding([48, 0])
        .into()
}
