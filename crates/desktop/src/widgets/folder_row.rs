use std::path::Path;

use iced::widget::{button, column, container, row, text, Space};
use iced::{Color, Element, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::{surface_color, tertiary_color};

const CORNER_RADIUS: f32 = 12.0;

/// A card naming a folder, with one action button on the right.
pub fn folder_row<'a>(
    fs: f32,
    label: &str,
    path: &Path,
    action: &str,
    on_press: Option<Message>,
    theme: &Theme,
) -> Element<'a, Message> {
    let tertiary = tertiary_color(theme);
    let surface = surface_color(theme);
    let border = border_color(theme);

    let label_text = text(label.to_uppercase())
        .size(scaled(12.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Semibold,
            ..iced::Font::DEFAULT
        })
        .color(tertiary);

    let path_text = text(path.display().to_string())
        .size(scaled(14.0, fs))
        .font(iced::Font {
            weight: iced::font::Weight::Medium,
            ..iced::Font::DEFAULT
        });

    let info = column![label_text, Space::new().height(2), path_text].width(Length::Fill);

    let btn = button(text(action.to_string()).size(scaled(13.0, fs)))
        .padding([6, 14])
        .on_press_maybe(on_press)
        .style(button::secondary);

    container(row![info, btn].spacing(8).align_y(iced::Alignment::Center))
        .padding([14, 16])
        .width(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(surface)),
            border: iced::border::Border {
                color: border,
                width: 1.0,
                radius: CORNER_RADIUS.into(),
            },
            ..container::Style::default()
        })
        .into()
}

fn border_color(theme: &Theme) -> Color {
    let p = theme.palette();
    Color { a: 0.12, ..p.text }
}
