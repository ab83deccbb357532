#![allow(missing_docs)]

//! Pure session transitions.
//!
//! Each operation takes a [`Session`] by value and returns a [`Transition`]
//! holding the next session plus any timers the caller must arm. Nothing here
//! touches a clock or a runtime.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    config::Timings,
    deck::Deck,
    models::{CardId, ImageKey},
};

use super::models::{Banner, Session, SessionId, Status, Turn};

/// Deferred transitions a session can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Clear the match banner and end the turn.
    MatchResolved,
    /// Flip the mismatched pair back and end the turn.
    MismatchResolved,
    /// Clear the victory banner.
    VictoryCleared,
}

/// A timer expiry addressed to a specific session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub session: SessionId,
    pub kind: TimerKind,
}

/// Request to deliver `event` after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub event: TimerEvent,
    pub delay: Duration,
}

/// Result of applying an operation to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub scheduled: Vec<Scheduled>,
}

impl Transition {
    fn idle(session: Session) -> Self {
        Self {
            session,
            scheduled: Vec::new(),
        }
    }
}

impl Session {
    /// Deal a fresh deck and begin play. Ignored unless the game has not started.
    pub fn start<R>(self, faces: &[ImageKey], rng: &mut R) -> Transition
    where
        R: Rng + ?Sized,
    {
        if self.status != Status::NotStarted {
            debug!(session = %self.id, status = ?self.status, "Ignoring start");
            return Transition::idle(self);
        }
        Transition::idle(self.fresh(faces, rng))
    }

    /// Throw away the current session and deal again. Ignored before the first start.
    pub fn reset<R>(self, faces: &[ImageKey], rng: &mut R) -> Transition
    where
        R: Rng + ?Sized,
    {
        if self.status == Status::NotStarted {
            debug!("Ignoring reset before the game has started");
            return Transition::idle(self);
        }
        Transition::idle(self.fresh(faces, rng))
    }

    fn fresh<R>(self, faces: &[ImageKey], rng: &mut R) -> Session
    where
        R: Rng + ?Sized,
    {
        let session = Session {
            id: self.id.next(),
            deck: Deck::shuffled(faces, rng),
            turn: Turn::default(),
            moves: 0,
            status: Status::Playing,
            banner: None,
        };
        info!(session = %session.id, cards = session.deck.len(), "Game dealt");
        session
    }

    /// Flip a card. Clicks on locked, matched, unknown, or already selected cards
    /// are ignored.
    pub fn select_card(self, card: CardId, timings: &Timings) -> Transition {
        if self.status != Status::Playing {
            debug!(%card, status = ?self.status, "Ignoring selection outside play");
            return Transition::idle(self);
        }
        if self.turn.locked {
            debug!(%card, "Ignoring selection while input is locked");
            return Transition::idle(self);
        }
        match self.deck.get(card).map(|found| found.matched) {
            None => {
                debug!(%card, "Ignoring selection of unknown card");
                return Transition::idle(self);
            }
            Some(true) => {
                debug!(%card, "Ignoring selection of matched card");
                return Transition::idle(self);
            }
            Some(false) => {}
        }
        if self.turn.contains(card) {
            debug!(%card, "Ignoring repeated selection");
            return Transition::idle(self);
        }

        let mut next = self;
        match next.turn.first {
            None => {
                debug!(session = %next.id, %card, "First card selected");
                next.turn.first = Some(card);
                Transition::idle(next)
            }
            Some(first) => {
                debug!(session = %next.id, %card, "Second card selected");
                next.turn.second = Some(card);
                next.evaluate(first, card, timings)
            }
        }
    }

    fn evaluate(mut self, first: CardId, second: CardId, timings: &Timings) -> Transition {
        self.turn.locked = true;
        let images = (
            self.deck.get(first).map(|card| card.image.clone()),
            self.deck.get(second).map(|card| card.image.clone()),
        );
        let (Some(first_image), Some(second_image)) = images else {
            return Transition::idle(self);
        };

        if first_image != second_image {
            debug!(session = %self.id, first = %first_image, second = %second_image, "Mismatch");
            let scheduled = vec![self.schedule(TimerKind::MismatchResolved, timings.mismatch_delay())];
            return Transition {
                session: self,
                scheduled,
            };
        }

        info!(session = %self.id, image = %first_image, "Pair matched");
        self.deck.mark_matched(&first_image);
        self.banner = Some(Banner::Match);
        let mut scheduled = vec![self.schedule(TimerKind::MatchResolved, timings.match_delay())];
        scheduled.extend(self.check_completion(timings));
        Transition {
            session: self,
            scheduled,
        }
    }

    fn check_completion(&mut self, timings: &Timings) -> Option<Scheduled> {
        if self.status != Status::Playing || !self.deck.is_complete() {
            return None;
        }
        info!(session = %self.id, moves = self.moves + 1, "Game won");
        self.status = Status::Won;
        self.banner = Some(Banner::Victory);
        Some(self.schedule(TimerKind::VictoryCleared, timings.victory_delay()))
    }

    fn schedule(&self, kind: TimerKind, delay: Duration) -> Scheduled {
        Scheduled {
            event: TimerEvent {
                session: self.id,
                kind,
            },
            delay,
        }
    }

    /// Apply an expired timer. Timers addressed to another session do nothing.
    pub fn fire(mut self, event: TimerEvent) -> Session {
        if event.session != self.id {
            debug!(current = %self.id, stale = %event.session, kind = ?event.kind, "Dropping stale timer");
            return self;
        }
        match event.kind {
            TimerKind::MatchResolved => {
                if self.banner == Some(Banner::Match) {
                    self.banner = None;
                }
                self.end_turn()
            }
            TimerKind::MismatchResolved => self.end_turn(),
            TimerKind::VictoryCleared => {
                if self.banner == Some(Banner::Victory) {
                    self.banner = None;
                }
                self.turn = Turn::default();
                self
            }
        }
    }

    fn end_turn(mut self) -> Session {
        self.moves += 1;
        self.turn = Turn::default();
        debug!(session = %self.id, moves = self.moves, "Turn ended");
        self
    }
}
