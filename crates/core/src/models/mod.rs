//! Shared card models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the pictured item on a card face (e.g. `apple`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageKey(String);

impl ImageKey {
    /// Wrap a face name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the face name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Face name formatted for display, with the first letter capitalised.
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of one card instance within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single card on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Picture shown on the front.
    pub image: ImageKey,
    /// Distinguishes the two copies of the same picture.
    pub id: CardId,
    /// Set once the pair is found; never cleared within a session.
    pub matched: bool,
}

impl Card {
    /// A face-down, unmatched card.
    pub fn new(image: ImageKey, id: CardId) -> Self {
        Self {
            image,
            id,
            matched: false,
        }
    }
}
