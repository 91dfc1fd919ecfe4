use iced::border::Border;
use iced::widget::{button, column, container, row, text};
use iced::{Color, Element, Font, Length, Theme};

use crate::app::{scaled, Message};
use crate::theme::tertiary_color;

/// Prefixes every row with its 1-based position, for the `No.` column.
pub fn numbered(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, mut row)| {
            row.insert(0, (i + 1).to_string());
            row
        })
        .collect()
}

/// Read-only table with a header row.
pub fn table<'a>(fs: f32, headers: &[&str], rows: Vec<Vec<String>>) -> Element<'a, Message> {
    build(fs, headers, rows, None, None::<fn(usize) -> Message>)
}

/// Table whose rows can be clicked; `selected` is highlighted.
pub fn selectable_table<'a>(
    fs: f32,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    selected: Option<usize>,
    on_select: impl Fn(usize) -> Message + 'a,
) -> Element<'a, Message> {
    build(fs, headers, rows, selected, Some(on_select))
}

fn build<'a>(
    fs: f32,
    headers: &[&str],
    rows: Vec<Vec<String>>,
    selected: Option<usize>,
    on_select: Option<impl Fn(usize) -> Message + 'a>,
) -> Element<'a, Message> {
    let header = row(headers
        .iter()
        .map(|h| {
            text(h.to_string())
                .size(scaled(13.0, fs))
                .font(Font {
                    weight: iced::font::Weight::Bold,
                    ..Font::DEFAULT
                })
                .width(Length::Fill)
                .into()
        })
        .collect::<Vec<_>>())
    .padding([6, 10]);

    let mut body = column![header].spacing(2);
    for (i, cells) in rows.into_iter().enumerate() {
        let line = row(cells
            .into_iter()
            .map(|c| text(c).size(scaled(13.0, fs)).width(Length::Fill).into())
            .collect::<Vec<_>>());

        let cell: Element<'a, Message> = match &on_select {
            Some(f) => {
                let is_selected = selected == Some(i);
                button(line)
                    .on_press(f(i))
                    .padding([6, 10])
                    .width(Length::Fill)
                    .style(move |theme: &Theme, status| row_style(theme, status, is_selected))
                    .into()
            }
            None => container(line).padding([6, 10]).width(Length::Fill).into(),
        };
        body = body.push(cell);
    }

    container(body)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn row_style(theme: &Theme, status: button::Status, selected: bool) -> button::Style {
    let palette = theme.palette();
    let background = if selected {
        Some(Color { a: 0.25, ..palette.primary }.into())
    } else if status == button::Status::Hovered {
        Some(Color { a: 0.08, ..palette.text }.into())
    } else {
        None
    };
    button::Style {
        background,
        text_color: palette.text,
        border: Border {
            radius: 6.0.into(),
            ..Border::default()
        },
        ..button::Style::default()
    }
}

/// Hint shown in place of an empty table.
pub fn empty<'a>(fs: f32, message: &str, theme: &Theme) -> Element<'a, Message> {
    text(message.to_string())
        .size(scaled(13.0, fs))
        .color(tertiary_color(theme))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_numbered_starts_at_one() {
        let rows = numbered(vec![cells(&["1", "Ada"]), cells(&["7", "Bob"])]);
        assert_eq!(rows[0], cells(&["1", "1", "Ada"]));
        assert_eq!(rows[1], cells(&["2", "7", "Bob"]));
    }

    #[test]
    fn test_numbered_empty() {
        assert!(numbered(Vec::new()).is_empty());
    }
}
