use iced::widget::{container, image, text};
use iced::{Color, ContentFit, Element, Length, Theme};

/// The live feed, or a dark placeholder while the camera is off.
pub fn view<'a, Message: 'a>(frame: Option<&image::Handle>) -> Element<'a, Message> {
    let body: Element<'a, Message> = match frame {
        Some(handle) => image(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        None => text("Camera is off").color(Color::from_rgb(0.6, 0.6, 0.6)).into(),
    };

    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(Color::BLACK.into()),
            ..container::Style::default()
        })
        .into()
}
