//! Gallery controller
//!
//! Owns the card list, the active category filter, the filtered set and the
//! lightbox state. The UI is a projection of this struct: every user action
//! is routed to one of the operations below and the view is rebuilt from
//! the result.

use super::data::{Direction, Filter, ImageCard};
use crate::error::GalleryError;

/// Lightbox state. The index points into the filtered set, never into the
/// full card list, and is always in bounds while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lightbox {
    #[default]
    Closed,
    Open { index: usize },
}

/// Keys the lightbox reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

/// Everything the lightbox overlay needs to render the current card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightboxView<'a> {
    pub source: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    /// 1-based position in the filtered set
    pub position: usize,
    /// Size of the filtered set
    pub total: usize,
}

/// The gallery controller
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    /// All cards in catalog order
    cards: Vec<ImageCard>,
    /// Active category filter
    filter: Filter,
    /// Positions in `cards` of the cards matching `filter`, in catalog order
    filtered: Vec<usize>,
    lightbox: Lightbox,
}

impl Gallery {
    /// Create a gallery showing every card with the lightbox closed
    pub fn new(cards: Vec<ImageCard>) -> Self {
        let mut gallery = Gallery {
            cards,
            filter: Filter::All,
            filtered: Vec::new(),
            lightbox: Lightbox::Closed,
        };
        gallery.refilter();
        gallery
    }

    /// Replace the card list (after an import or a catalog reload).
    ///
    /// The active filter is kept and re-applied; the lightbox closes since
    /// its index may no longer refer to the same card.
    pub fn set_cards(&mut self, cards: Vec<ImageCard>) {
        self.cards = cards;
        self.lightbox = Lightbox::Closed;
        self.refilter();
    }

    /// Update a single card's thumbnail path in place
    pub fn set_thumbnail(&mut self, card_id: i64, thumbnail: String) {
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == card_id) {
            card.thumbnail = Some(thumbnail);
        }
    }

    /// Make `filter` the active filter and recompute the filtered set.
    ///
    /// If the lightbox is open on a card that stays visible it follows that
    /// card to its new index; otherwise the lightbox closes.
    pub fn filter_images(&mut self, filter: Filter) {
        let shown = self.current_position();

        self.filter = filter;
        self.refilter();

        if let Some(position) = shown {
            self.lightbox = match self.filtered.iter().position(|&p| p == position) {
                Some(index) => Lightbox::Open { index },
                None => {
                    log::debug!("Lightbox card hidden by filter \"{}\", closing", self.filter);
                    Lightbox::Closed
                }
            };
        }

        log::debug!(
            "Filter \"{}\": {} of {} cards visible",
            self.filter,
            self.filtered.len(),
            self.cards.len()
        );
    }

    /// Open the lightbox on the card with `card_id`.
    ///
    /// The card must be in the filtered set; hidden or unknown cards are
    /// rejected and the state is left untouched.
    pub fn open_lightbox(&mut self, card_id: i64) -> Result<(), GalleryError> {
        let position = self
            .cards
            .iter()
            .position(|c| c.id == card_id)
            .ok_or(GalleryError::UnknownCard(card_id))?;

        let index = self
            .filtered
            .iter()
            .position(|&p| p == position)
            .ok_or_else(|| GalleryError::CardNotVisible {
                id: card_id,
                filter: self.filter.to_string(),
            })?;

        self.lightbox = Lightbox::Open { index };
        Ok(())
    }

    /// Close the lightbox and release the scroll lock. Idempotent.
    pub fn close_lightbox(&mut self) {
        self.lightbox = Lightbox::Closed;
    }

    /// A click on the dimmed area around the image closes the lightbox
    pub fn click_backdrop(&mut self) {
        self.close_lightbox();
    }

    /// Step to the previous or next card, wrapping around the filtered set.
    ///
    /// No-op while the lightbox is closed or the filtered set is empty.
    pub fn navigate_image(&mut self, direction: Direction) {
        let Lightbox::Open { index } = self.lightbox else {
            return;
        };
        let len = self.filtered.len();
        if len == 0 {
            return;
        }

        let index = match direction {
            Direction::Previous => (index + len - 1) % len,
            Direction::Next => (index + 1) % len,
        };
        self.lightbox = Lightbox::Open { index };
    }

    /// Route a key press. Returns true if the key was consumed.
    ///
    /// Keys are ignored entirely while the lightbox is closed.
    pub fn handle_key(&mut self, key: NavigationKey) -> bool {
        if !self.is_lightbox_open() {
            return false;
        }

        match key {
            NavigationKey::Escape => self.close_lightbox(),
            NavigationKey::ArrowLeft => self.navigate_image(Direction::Previous),
            NavigationKey::ArrowRight => self.navigate_image(Direction::Next),
        }
        true
    }

    /// Active filter
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn lightbox(&self) -> Lightbox {
        self.lightbox
    }

    pub fn is_lightbox_open(&self) -> bool {
        matches!(self.lightbox, Lightbox::Open { .. })
    }

    /// Grid scrolling is suspended while the lightbox is open
    pub fn scroll_locked(&self) -> bool {
        self.is_lightbox_open()
    }

    /// Current index into the filtered set, if the lightbox is open
    pub fn current_index(&self) -> Option<usize> {
        match self.lightbox {
            Lightbox::Open { index } => Some(index),
            Lightbox::Closed => None,
        }
    }

    /// All cards in catalog order, visible or not
    pub fn cards(&self) -> &[ImageCard] {
        &self.cards
    }

    /// Check whether a card is shown in the grid
    pub fn is_visible(&self, card_id: i64) -> bool {
        self.visible_cards().any(|c| c.id == card_id)
    }

    /// Cards in the filtered set, in order
    pub fn visible_cards(&self) -> impl Iterator<Item = &ImageCard> + '_ {
        self.filtered.iter().map(move |&p| &self.cards[p])
    }

    pub fn visible_count(&self) -> usize {
        self.filtered.len()
    }

    /// Card shown in the lightbox
    pub fn current_card(&self) -> Option<&ImageCard> {
        self.current_position().map(|p| &self.cards[p])
    }

    /// Render data for the lightbox overlay, None while closed
    pub fn lightbox_view(&self) -> Option<LightboxView<'_>> {
        let index = self.current_index()?;
        let card = self.current_card()?;
        Some(LightboxView {
            source: &card.source,
            title: &card.title,
            description: &card.description,
            position: index + 1,
            total: self.filtered.len(),
        })
    }

    /// Distinct categories in first-seen order, for the filter bar
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for card in &self.cards {
            if !categories.contains(&card.category.as_str()) {
                categories.push(&card.category);
            }
        }
        categories
    }

    /// Position in `cards` of the card shown in the lightbox
    fn current_position(&self) -> Option<usize> {
        self.current_index()
            .and_then(|index| self.filtered.get(index).copied())
    }

    fn refilter(&mut self) {
        self.filtered = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| self.filter.matches(card))
            .map(|(position, _)| position)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64, category: &str) -> ImageCard {
        ImageCard {
            id,
            category: category.to_string(),
            source: format!("/photos/{}.jpg", id),
            thumbnail: None,
            title: format!("Photo {}", id),
            description: format!("Description {}", id),
        }
    }

    /// nature: 1, 3, 5 / city: 2, 4 / animals: 6
    fn sample() -> Gallery {
        Gallery::new(vec![
            card(1, "nature"),
            card(2, "city"),
            card(3, "nature"),
            card(4, "city"),
            card(5, "nature"),
            card(6, "animals"),
        ])
    }

    fn visible_ids(gallery: &Gallery) -> Vec<i64> {
        gallery.visible_cards().map(|c| c.id).collect()
    }

    #[test]
    fn test_new_shows_everything() {
        let gallery = sample();
        assert_eq!(gallery.filter(), &Filter::All);
        assert_eq!(visible_ids(&gallery), vec![1, 2, 3, 4, 5, 6]);
        assert!(!gallery.is_lightbox_open());
        assert!(!gallery.scroll_locked());
    }

    #[test]
    fn test_filter_partitions_cards() {
        let mut gallery = sample();
        for label in ["all", "nature", "city", "animals", "missing"] {
            let filter = Filter::parse(label);
            gallery.filter_images(filter.clone());

            for card in gallery.cards() {
                let visible = gallery.is_visible(card.id);
                assert_eq!(visible, filter == Filter::All || card.category == label);
            }
        }
    }

    #[test]
    fn test_filter_keeps_catalog_order() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("nature"));
        assert_eq!(visible_ids(&gallery), vec![1, 3, 5]);

        gallery.filter_images(Filter::All);
        assert_eq!(visible_ids(&gallery), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_filter_with_no_matches() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("portraits"));
        assert_eq!(gallery.visible_count(), 0);
    }

    #[test]
    fn test_open_shows_card() {
        let mut gallery = sample();
        gallery.open_lightbox(4).unwrap();

        let view = gallery.lightbox_view().unwrap();
        assert_eq!(view.source, "/photos/4.jpg");
        assert_eq!(view.title, "Photo 4");
        assert_eq!(view.description, "Description 4");
        assert_eq!(view.position, 4);
        assert_eq!(view.total, 6);
        assert!(gallery.scroll_locked());
    }

    #[test]
    fn test_open_hidden_card_rejected() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("nature"));

        let err = gallery.open_lightbox(2).unwrap_err();
        assert_eq!(
            err,
            GalleryError::CardNotVisible {
                id: 2,
                filter: "nature".to_string()
            }
        );
        assert_eq!(gallery.lightbox(), Lightbox::Closed);

        // An already open lightbox stays on its card
        gallery.open_lightbox(3).unwrap();
        assert!(gallery.open_lightbox(4).is_err());
        assert_eq!(gallery.current_card().unwrap().id, 3);
    }

    #[test]
    fn test_open_unknown_card_rejected() {
        let mut gallery = sample();
        assert_eq!(gallery.open_lightbox(42), Err(GalleryError::UnknownCard(42)));
        assert!(!gallery.is_lightbox_open());
    }

    #[test]
    fn test_next_wraps_around() {
        let mut gallery = Gallery::new(vec![card(1, "x"), card(2, "x"), card(3, "x")]);

        gallery.open_lightbox(2).unwrap();
        assert_eq!(gallery.current_index(), Some(1));

        gallery.navigate_image(Direction::Next);
        assert_eq!(gallery.current_index(), Some(2));
        assert_eq!(gallery.current_card().unwrap().id, 3);

        gallery.navigate_image(Direction::Next);
        assert_eq!(gallery.current_index(), Some(0));
        assert_eq!(gallery.current_card().unwrap().id, 1);
    }

    #[test]
    fn test_previous_wraps_around() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("city"));
        gallery.open_lightbox(2).unwrap();

        gallery.navigate_image(Direction::Previous);
        assert_eq!(gallery.current_card().unwrap().id, 4);
        gallery.navigate_image(Direction::Previous);
        assert_eq!(gallery.current_card().unwrap().id, 2);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("nature"));
        gallery.open_lightbox(5).unwrap();

        let steps = [
            Direction::Next,
            Direction::Next,
            Direction::Previous,
            Direction::Previous,
            Direction::Previous,
            Direction::Previous,
            Direction::Next,
        ];
        for direction in steps.iter().cycle().take(50) {
            gallery.navigate_image(*direction);
            let index = gallery.current_index().unwrap();
            assert!(index < gallery.visible_count());
            assert_eq!(gallery.current_card().unwrap().category, "nature");
        }
    }

    #[test]
    fn test_single_card_navigation() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("animals"));
        gallery.open_lightbox(6).unwrap();

        gallery.navigate_image(Direction::Next);
        assert_eq!(gallery.current_card().unwrap().id, 6);
        gallery.navigate_image(Direction::Previous);
        assert_eq!(gallery.current_card().unwrap().id, 6);
    }

    #[test]
    fn test_navigate_while_closed_is_noop() {
        let mut gallery = sample();
        gallery.navigate_image(Direction::Next);
        assert_eq!(gallery.lightbox(), Lightbox::Closed);
    }

    #[test]
    fn test_navigate_empty_gallery_is_noop() {
        let mut gallery = Gallery::new(Vec::new());
        gallery.navigate_image(Direction::Next);
        gallery.navigate_image(Direction::Previous);
        assert_eq!(gallery.lightbox(), Lightbox::Closed);
        assert!(gallery.lightbox_view().is_none());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("city"));
        gallery.open_lightbox(4).unwrap();

        gallery.close_lightbox();
        let filter = gallery.filter().clone();
        let visible = visible_ids(&gallery);

        for _ in 0..3 {
            gallery.close_lightbox();
            assert_eq!(gallery.lightbox(), Lightbox::Closed);
            assert!(!gallery.scroll_locked());
            assert_eq!(gallery.filter(), &filter);
            assert_eq!(visible_ids(&gallery), visible);
        }
    }

    #[test]
    fn test_backdrop_click_closes() {
        let mut gallery = sample();
        gallery.open_lightbox(1).unwrap();
        gallery.click_backdrop();
        assert!(!gallery.is_lightbox_open());
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut gallery = sample();
        for key in [NavigationKey::Escape, NavigationKey::ArrowLeft, NavigationKey::ArrowRight] {
            assert!(!gallery.handle_key(key));
            assert_eq!(gallery.lightbox(), Lightbox::Closed);
        }
    }

    #[test]
    fn test_keys_while_open() {
        let mut gallery = sample();
        gallery.open_lightbox(1).unwrap();

        assert!(gallery.handle_key(NavigationKey::ArrowRight));
        assert_eq!(gallery.current_card().unwrap().id, 2);

        assert!(gallery.handle_key(NavigationKey::ArrowLeft));
        assert!(gallery.handle_key(NavigationKey::ArrowLeft));
        assert_eq!(gallery.current_card().unwrap().id, 6);

        assert!(gallery.handle_key(NavigationKey::Escape));
        assert!(!gallery.is_lightbox_open());
    }

    #[test]
    fn test_filter_follows_open_card() {
        let mut gallery = sample();
        gallery.open_lightbox(5).unwrap();
        assert_eq!(gallery.current_index(), Some(4));

        gallery.filter_images(Filter::parse("nature"));
        assert_eq!(gallery.current_index(), Some(2));
        assert_eq!(gallery.current_card().unwrap().id, 5);
    }

    #[test]
    fn test_filter_hiding_open_card_closes() {
        let mut gallery = sample();
        gallery.open_lightbox(2).unwrap();

        gallery.filter_images(Filter::parse("nature"));
        assert!(!gallery.is_lightbox_open());
    }

    #[test]
    fn test_set_cards_reapplies_filter() {
        let mut gallery = sample();
        gallery.filter_images(Filter::parse("city"));
        gallery.open_lightbox(2).unwrap();

        gallery.set_cards(vec![card(10, "city"), card(11, "nature"), card(12, "city")]);
        assert_eq!(visible_ids(&gallery), vec![10, 12]);
        assert!(!gallery.is_lightbox_open());
    }

    #[test]
    fn test_set_thumbnail() {
        let mut gallery = sample();
        gallery.set_thumbnail(3, "/cache/3.jpg".to_string());
        let card = gallery.cards().iter().find(|c| c.id == 3).unwrap();
        assert_eq!(card.grid_source(), "/cache/3.jpg");
    }

    #[test]
    fn test_categories_first_seen_order() {
        let gallery = sample();
        assert_eq!(gallery.categories(), vec!["nature", "city", "animals"]);
    }
}
