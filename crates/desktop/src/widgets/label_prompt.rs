use iced::border::Border;
use iced::widget::{button, center, column, container, opaque, row, text, text_input};
use iced::{Alignment, Color, Element, Length, Theme};

use crate::app::Message;

const CARD_WIDTH: f32 = 320.0;

/// Modal "Enter name" prompt drawn over the video panel.
pub fn view(input: &str) -> Element<'_, Message> {
    let field = text_input("Name", input)
        .on_input(Message::LabelChanged)
        .on_submit(Message::LabelSubmitted)
        .padding(8);

    let actions = row![
        button("Cancel")
            .on_press(Message::LabelCancelled)
            .style(button::secondary),
        button("OK").on_press(Message::LabelSubmitted),
    ]
    .spacing(8);

    let card = container(
        column![
            text("Enter name:"),
            field,
            container(actions).width(Length::Fill).align_x(Alignment::End),
        ]
        .spacing(12),
    )
    .width(CARD_WIDTH)
    .padding(16)
    .style(|theme: &Theme| {
        let palette = theme.extended_palette();
        container::Style {
            background: Some(palette.background.base.color.into()),
            border: Border {
                radius: 8.0.into(),
                width: 1.0,
                color: palette.background.strong.color,
            },
            ..container::Style::default()
        }
    });

    opaque(center(card).style(|_theme: &Theme| container::Style {
        background: Some(
            Color {
                a: 0.6,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    }))
}
