#![allow(missing_docs)]

use std::fmt;

use crate::{
    deck::Deck,
    models::{Card, CardId},
};

/// Identity of one play-through. Bumped on every start and reset, so timers
/// armed for an older session can be recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl SessionId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    NotStarted,
    Playing,
    Won,
}

/// Transient indicator shown above the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// A pair was just found.
    Match,
    /// Every pair has been found.
    Victory,
}

impl Banner {
    pub fn message(&self) -> &'static str {
        match self {
            Banner::Match => "Nice! Those two match.",
            Banner::Victory => "Congratulations, you won the game!",
        }
    }
}

/// Selections of the turn in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Turn {
    pub first: Option<CardId>,
    pub second: Option<CardId>,
    /// Set while a resolved pair waits for its timer.
    pub locked: bool,
}

impl Turn {
    pub fn contains(&self, id: CardId) -> bool {
        self.first == Some(id) || self.second == Some(id)
    }
}

/// Complete game state. Every operation consumes a session and yields the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) deck: Deck,
    pub(crate) turn: Turn,
    pub(crate) moves: u32,
    pub(crate) status: Status,
    pub(crate) banner: Option<Banner>,
}

impl Session {
    /// A session waiting for the player to press start.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cards(&self) -> &[Card] {
        self.deck.cards()
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    /// Completed turns since the last start or reset.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn is_locked(&self) -> bool {
        self.turn.locked
    }

    /// A card shows its front when matched or selected this turn.
    pub fn is_face_up(&self, card: &Card) -> bool {
        card.matched || self.turn.contains(card.id)
    }
}
