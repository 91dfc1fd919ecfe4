use iced::widget::{column, text, text_input};
use iced::Element;

use crate::app::{scaled, Message};

/// Labelled single-line input.
pub fn form_field<'a>(
    fs: f32,
    label: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Option<Message>,
) -> Element<'a, Message> {
    field(fs, label, value, on_input, on_submit, false)
}

/// Like [`form_field`], with the value masked.
pub fn password_field<'a>(
    fs: f32,
    label: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Option<Message>,
) -> Element<'a, Message> {
    field(fs, label, value, on_input, on_submit, true)
}

fn field<'a>(
    fs: f32,
    label: &str,
    value: &str,
    on_input: impl Fn(String) -> Message + 'a,
    on_submit: Option<Message>,
    secure: bool,
) -> Element<'a, Message> {
    let mut input = text_input(label, value)
        .on_input(on_input)
        .secure(secure)
        .size(scaled(14.0, fs))
        .padding([8, 10]);
    if let Some(message) = on_submit {
        input = input.on_submit(message);
    }

    column![text(format!("{label}:")).size(scaled(13.0, fs)), input]
        .spacing(4)
        .into()
}
