//! Filter bar and card grid

use iced::widget::{button, column, container, image, row, scrollable, text, Space};
use iced::{Alignment, Element, Length, Pixels, Theme};
use iced_aw::Wrap;

use crate::app::Message;
use crate::state::{Filter, Gallery, ImageCard};

const CARD_SPACING: f32 = 16.0;
const THUMBNAIL_HEIGHT_RATIO: f32 = 0.75;

type ButtonStyle = fn(&Theme, button::Status) -> button::Style;

/// Filters offered in the filter bar: "all", every category in catalog
/// order, and the active category even when no card carries it
pub fn filter_options(gallery: &Gallery) -> Vec<Filter> {
    let mut options = vec![Filter::All];
    options.extend(
        gallery
            .categories()
            .into_iter()
            .map(|category| Filter::Category(category.to_string())),
    );
    if !options.contains(gallery.filter()) {
        options.push(gallery.filter().clone());
    }
    options
}

/// One button per filter option; the active filter is highlighted
pub fn filter_bar(gallery: &Gallery) -> Element<'_, Message> {
    let buttons: Vec<Element<'_, Message>> = filter_options(gallery)
        .into_iter()
        .map(|filter| filter_button(filter, gallery.filter()))
        .collect();

    Wrap::with_elements(buttons)
        .spacing(Pixels(8.0))
        .line_spacing(Pixels(8.0))
        .into()
}

fn filter_button<'a>(filter: Filter, active: &Filter) -> Element<'a, Message> {
    let label = match &filter {
        Filter::All => "All".to_string(),
        Filter::Category(category) => category.clone(),
    };
    let style: ButtonStyle = if *active == filter {
        button::primary
    } else {
        button::secondary
    };

    button(text(label).size(14))
        .padding([6, 14])
        .style(style)
        .on_press(Message::FilterSelected(filter))
        .into()
}

/// The filtered set laid out as wrapping cards
pub fn card_grid(gallery: &Gallery, card_width: f32) -> Element<'_, Message> {
    if gallery.visible_count() == 0 {
        let message = if gallery.cards().is_empty() {
            "No images yet. Import a folder to get started."
        } else {
            "No images in this category."
        };
        return container(text(message).size(16))
            .width(Length::Fill)
            .padding(40)
            .center_x(Length::Fill)
            .into();
    }

    let cards: Vec<Element<'_, Message>> = gallery
        .visible_cards()
        .map(|card| card_view(card, card_width))
        .collect();

    scrollable(
        container(
            Wrap::with_elements(cards)
                .spacing(Pixels(CARD_SPACING))
                .line_spacing(Pixels(CARD_SPACING)),
        )
        .padding(CARD_SPACING)
        .width(Length::Fill),
    )
    .height(Length::Fill)
    .into()
}

fn card_view(card: &ImageCard, card_width: f32) -> Element<'_, Message> {
    let thumbnail = image(image::Handle::from_path(card.grid_source()))
        .width(Length::Fixed(card_width))
        .height(Length::Fixed(card_width * THUMBNAIL_HEIGHT_RATIO))
        .content_fit(iced::ContentFit::Cover);

    let caption = column![
        text(&card.title).size(16),
        text(&card.description).size(12),
    ]
    .spacing(4)
    .width(Length::Fixed(card_width));

    button(
        column![thumbnail, caption]
            .spacing(8)
            .align_x(Alignment::Start),
    )
    .padding(8)
    .style(button::text)
    .on_press(Message::CardPressed(card.id))
    .into()
}

/// Header with the import buttons and the status line
pub fn header(status: &str) -> Element<'_, Message> {
    row![
        text("Gallery").size(32),
        Space::with_width(Length::Fill),
        text(status).size(14),
        button("Import Folder")
            .on_press(Message::ImportFolder)
            .padding(10),
        button("Import Manifest")
            .on_press(Message::ImportManifest)
            .padding(10),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
    .into()
}
