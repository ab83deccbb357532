use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::mpsc;
use tracing::info;

use crate::{
    config::{AppConfig, Timings},
    models::{CardId, ImageKey},
    timer::Scheduler,
};

use super::{
    machine::{TimerEvent, Transition},
    models::Session,
};

/// Owns the current [`Session`] and arms the timers its transitions request.
pub struct GameController {
    faces: Vec<ImageKey>,
    timings: Timings,
    rng: StdRng,
    session: Session,
    scheduler: Scheduler,
}

impl GameController {
    /// Build a controller whose timer expiries are sent on `timers`.
    ///
    /// Expiries must be fed back through [`GameController::handle_timer`].
    pub fn new(config: &AppConfig, timers: mpsc::Sender<TimerEvent>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            faces: config.image_keys(),
            timings: config.timings,
            rng,
            session: Session::new(),
            scheduler: Scheduler::new(timers),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn start_game(&mut self) {
        let session = std::mem::take(&mut self.session);
        let transition = session.start(&self.faces, &mut self.rng);
        self.apply(transition);
    }

    /// Deal again from `Playing` or `Won`, dropping any pending timers.
    pub fn reset_game(&mut self) {
        let previous = self.session.id();
        let session = std::mem::take(&mut self.session);
        let transition = session.reset(&self.faces, &mut self.rng);
        if transition.session.id() != previous {
            info!(previous = %previous, next = %transition.session.id(), "Game reset");
            self.scheduler.cancel_all();
        }
        self.apply(transition);
    }

    pub fn select_card(&mut self, card: CardId) {
        let session = std::mem::take(&mut self.session);
        let transition = session.select_card(card, &self.timings);
        self.apply(transition);
    }

    pub fn handle_timer(&mut self, event: TimerEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = session.fire(event);
    }

    fn apply(&mut self, transition: Transition) {
        let Transition { session, scheduled } = transition;
        self.session = session;
        for entry in scheduled {
            self.scheduler.schedule(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{advance, timeout};

    use super::*;
    use crate::session::{Banner, Status, TimerKind};

    fn config() -> AppConfig {
        AppConfig {
            faces: vec!["a".to_string(), "b".to_string()],
            columns: 2,
            seed: Some(99),
            timings: Timings::default(),
        }
    }

    fn pair_of(controller: &GameController, image: &str) -> (CardId, CardId) {
        let ids: Vec<CardId> = controller
            .session()
            .cards()
            .iter()
            .filter(|card| card.image.as_str() == image)
            .map(|card| card.id)
            .collect();
        (ids[0], ids[1])
    }

    async fn next_timer(rx: &mut mpsc::Receiver<TimerEvent>) -> TimerEvent {
        rx.recv().await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn plays_two_pair_game_to_victory() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut controller = GameController::new(&config(), tx);
        controller.start_game();
        assert_eq!(controller.session().status(), Status::Playing);

        let (a1, a2) = pair_of(&controller, "a");
        controller.select_card(a1);
        controller.select_card(a2);
        assert!(controller.session().is_locked());

        let event = next_timer(&mut rx).await;
        assert_eq!(event.kind, TimerKind::MatchResolved);
        controller.handle_timer(event);
        assert_eq!(controller.session().moves(), 1);
        assert!(!controller.session().is_locked());

        let (b1, b2) = pair_of(&controller, "b");
        controller.select_card(b1);
        controller.select_card(b2);
        assert_eq!(controller.session().status(), Status::Won);
        assert_eq!(controller.session().banner(), Some(Banner::Victory));

        let event = next_timer(&mut rx).await;
        controller.handle_timer(event);
        assert_eq!(controller.session().moves(), 2);

        let event = next_timer(&mut rx).await;
        assert_eq!(event.kind, TimerKind::VictoryCleared);
        controller.handle_timer(event);
        assert_eq!(controller.session().banner(), None);
        assert_eq!(controller.session().status(), Status::Won);
    }

    #[tokio::test(start_paused = true)]
    async fn mismatch_unlocks_after_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut controller = GameController::new(&config(), tx);
        controller.start_game();

        let (a1, _) = pair_of(&controller, "a");
        let (b1, _) = pair_of(&controller, "b");
        controller.select_card(a1);
        controller.select_card(b1);

        advance(Duration::from_millis(1000)).await;
        assert!(rx.try_recv().is_err());

        let event = next_timer(&mut rx).await;
        assert_eq!(event.kind, TimerKind::MismatchResolved);
        controller.handle_timer(event);

        let session = controller.session();
        assert_eq!(session.moves(), 1);
        assert!(session.cards().iter().all(|card| !card.matched));

        controller.select_card(a1);
        assert_eq!(controller.session().turn().first, Some(a1));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_timers() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut controller = GameController::new(&config(), tx);
        controller.start_game();

        let (a1, _) = pair_of(&controller, "a");
        let (b1, _) = pair_of(&controller, "b");
        controller.select_card(a1);
        controller.select_card(b1);
        let stale = controller.session().id();

        controller.reset_game();
        assert_ne!(controller.session().id(), stale);
        assert_eq!(controller.session().moves(), 0);
        assert!(!controller.session().is_locked());

        let waited = timeout(Duration::from_secs(5), rx.recv()).await;
        assert!(waited.is_err(), "cancelled timer still fired");

        // A late event from the old session changes nothing.
        let before = controller.session().clone();
        controller.handle_timer(TimerEvent {
            session: stale,
            kind: TimerKind::MismatchResolved,
        });
        assert_eq!(controller.session(), &before);
    }

    #[tokio::test]
    async fn start_is_ignored_while_playing() {
        let (tx, _rx) = mpsc::channel(8);
        let mut controller = GameController::new(&config(), tx);
        controller.start_game();
        let dealt = controller.session().clone();
        controller.start_game();
        assert_eq!(controller.session(), &dealt);
    }
}
