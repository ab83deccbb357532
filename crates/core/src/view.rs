//! Presentational card state for front ends.

use crate::{
    models::{Card, CardId},
    session::Session,
};

/// What a renderer needs to draw one card and route its click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView<'a> {
    /// The card being drawn.
    pub card: &'a Card,
    /// Front visible: matched, or selected this turn.
    pub face_up: bool,
    /// Input lock of the turn in progress.
    pub locked: bool,
}

impl<'a> CardView<'a> {
    /// Card id to forward to the controller, or `None` while input is locked.
    pub fn click(&self) -> Option<CardId> {
        if self.locked {
            None
        } else {
            Some(self.card.id)
        }
    }
}

impl Session {
    /// Views for every card in table order.
    pub fn card_views(&self) -> impl Iterator<Item = CardView<'_>> + '_ {
        let locked = self.is_locked();
        self.cards().iter().map(move |card| CardView {
            card,
            face_up: self.is_face_up(card),
            locked,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{config::Timings, models::ImageKey};

    use super::*;

    fn dealt() -> Session {
        let faces = [ImageKey::new("sun"), ImageKey::new("moon")];
        Session::new()
            .start(&faces, &mut StdRng::seed_from_u64(21))
            .session
    }

    #[test]
    fn fresh_deck_is_face_down_and_clickable() {
        let session = dealt();
        let views: Vec<CardView<'_>> = session.card_views().collect();
        assert_eq!(views.len(), 4);
        for view in views {
            assert!(!view.face_up);
            assert_eq!(view.click(), Some(view.card.id));
        }
    }

    #[test]
    fn selected_cards_face_up_and_clicks_blocked_while_locked() {
        let session = dealt();
        let first = session.cards()[0].clone();
        let second = session
            .cards()
            .iter()
            .find(|card| card.image != first.image)
            .cloned()
            .unwrap();
        let timings = Timings::default();
        let session = session.select_card(first.id, &timings).session;
        let session = session.select_card(second.id, &timings).session;

        for view in session.card_views() {
            let selected = view.card.id == first.id || view.card.id == second.id;
            assert_eq!(view.face_up, selected);
            assert_eq!(view.click(), None);
        }
    }
}
