use iced::widget::{column, container, text, Space};
use iced::{Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::muted_color;
use crate::widgets::form_field::{form_field, password_field};
use crate::widgets::primary_button::primary_button;

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid username or password";

pub fn view<'a>(fs: f32, username: &str, password: &str, theme: &Theme) -> Element<'a, Message> {
    let form = column![
        text("Admin Login Required").size(scaled(18.0, fs)),
        text("Please login to access admin features:")
            .size(scaled(13.0, fs))
            .color(muted_color(theme)),
        Space::new().height(8),
        form_field(
            fs,
            "Username",
            username,
            Message::UsernameChanged,
            Some(Message::SubmitLogin),
        ),
        password_field(
            fs,
            "Password",
            password,
            Message::PasswordChanged,
            Some(Message::SubmitLogin),
        ),
        Space::new().height(8),
        primary_button(
            text("Login").size(scaled(14.0, fs)),
            Some(Message::SubmitLogin),
        ),
    ]
    .spacing(10)
    .max_width(360);

    container(form)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding([32, 0])
        .into()
}
