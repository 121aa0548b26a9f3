//! Lightbox overlay
//!
//! A dimmed backdrop covering the whole window with the enlarged image,
//! its caption and the prev/next/close controls centered on top.

use iced::widget::{button, center, column, container, image, mouse_area, opaque, row, stack, text};
use iced::{Alignment, Color, ContentFit, Element, Length};

use crate::app::Message;
use crate::state::{Direction, LightboxView};

const BACKDROP_ALPHA: f32 = 0.9;

pub fn view(lightbox: LightboxView<'_>) -> Element<'_, Message> {
    // Clicking the dimmed area outside the panel closes the lightbox.
    // `opaque` swallows wheel events so the grid underneath can't scroll.
    let backdrop = opaque(
        mouse_area(
            container(text(""))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Color::from_rgba(0.0, 0.0, 0.0, BACKDROP_ALPHA).into()),
                    ..container::Style::default()
                }),
        )
        .on_press(Message::BackdropPressed),
    );

    let picture = image(image::Handle::from_path(lightbox.source))
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Contain);

    let caption = column![
        text(lightbox.title).size(22).color(Color::WHITE),
        text(lightbox.description).size(14).color(Color::from_rgb(0.8, 0.8, 0.8)),
        text(format!("{} / {}", lightbox.position, lightbox.total))
            .size(12)
            .color(Color::from_rgb(0.6, 0.6, 0.6)),
    ]
    .spacing(6)
    .align_x(Alignment::Center);

    let controls = row![
        button(text("‹").size(28))
            .padding([4, 16])
            .style(button::secondary)
            .on_press(Message::Navigate(Direction::Previous)),
        container(picture).width(Length::Fill).height(Length::Fill),
        button(text("›").size(28))
            .padding([4, 16])
            .style(button::secondary)
            .on_press(Message::Navigate(Direction::Next)),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .height(Length::FillPortion(8));

    let close = row![
        iced::widget::horizontal_space(),
        button(text("×").size(24))
            .padding([2, 12])
            .style(button::danger)
            .on_press(Message::LightboxClosed),
    ];

    let panel = column![close, controls, caption]
        .spacing(12)
        .padding(24)
        .width(Length::FillPortion(9))
        .align_x(Alignment::Center);

    // The panel itself is opaque so clicks on the image don't reach the backdrop
    stack![backdrop, center(opaque(panel)).padding(48)].into()
}
