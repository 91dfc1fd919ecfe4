use iced::border::Border;
use iced::widget::{button, Button};
use iced::{Color, Element, Shadow, Theme, Vector};

const HOVER_DARKEN: f32 = 0.05;
const CORNER_RADIUS: f32 = 10.0;
const SHADOW_BLUR: f32 = 10.0;
const SHADOW_OFFSET_Y: f32 = 3.0;
const SHADOW_ALPHA: f32 = 0.25;
const DISABLED_ALPHA: f32 = 0.45;

/// Filled accent button. Pass `None` to render it disabled, e.g. while a
/// session is running.
pub fn primary_button<'a, Message: Clone + 'a>(
    content: impl Into<Element<'a, Message>>,
    on_press: Option<Message>,
) -> Button<'a, Message> {
    button(content)
        .on_press_maybe(on_press)
        .padding([10, 22])
        .style(style)
}

/// Outlined button for stop, cancel and destructive actions.
pub fn danger_button<'a, Message: Clone + 'a>(
    content: impl Into<Element<'a, Message>>,
    on_press: Option<Message>,
) -> Button<'a, Message> {
    button(content)
        .on_press_maybe(on_press)
        .padding([10, 22])
        .style(|theme: &Theme, status| {
            let danger = theme.palette().danger;
            let base = button::Style {
                background: None,
                text_color: danger,
                border: Border {
                    color: danger,
                    width: 1.0,
                    radius: CORNER_RADIUS.into(),
                },
                ..button::Style::default()
            };
            match status {
                button::Status::Hovered | button::Status::Pressed => button::Style {
                    background: Some(Color { a: 0.10, ..danger }.into()),
                    ..base
                },
                button::Status::Disabled => button::Style {
                    text_color: Color {
                        a: DISABLED_ALPHA,
                        ..danger
                    },
                    ..base
                },
                _ => base,
            }
        })
}

fn style(theme: &Theme, status: button::Status) -> button::Style {
    let base = theme.extended_palette().primary.base.color;
    match status {
        button::Status::Hovered => styled(base, 1.0),
        button::Status::Pressed => styled(base, 2.0),
        button::Status::Disabled => button::Style {
            shadow: Shadow::default(),
            ..styled(
                Color {
                    a: DISABLED_ALPHA,
                    ..base
                },
                0.0,
            )
        },
        _ => styled(base, 0.0),
    }
}

fn styled(base: Color, darken_steps: f32) -> button::Style {
    button::Style {
        background: Some(darken(base, darken_steps).into()),
        text_color: Color::WHITE,
        border: Border {
            radius: CORNER_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color::from_rgba(base.r, base.g, base.b, SHADOW_ALPHA),
            offset: Vector::new(0.0, SHADOW_OFFSET_Y),
            blur_radius: SHADOW_BLUR,
        },
        ..button::Style::default()
    }
}

fn darken(color: Color, steps: f32) -> Color {
    let shift = HOVER_DARKEN * steps;
    Color {
        r: (color.r - shift).max(0.0),
        g: (color.g - shift).max(0.0),
        b: (color.b - shift).max(0.0),
        a: color.a,
    }
}
