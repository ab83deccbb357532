#![warn(clippy::all, missing_docs)]

//! Core game logic for the memtui memory-matching game.
//!
//! This crate hosts the card models, deck construction, the session
//! state machine and its timer scheduling, and configuration handling
//! used by the terminal UI and any future frontends.

pub mod config;
pub mod deck;
pub mod error;
pub mod models;
pub mod session;
pub mod timer;
pub mod view;

pub use crate::config::{AppConfig, Timings};
pub use deck::Deck;
pub use error::ConfigError;
pub use models::{Card, CardId, ImageKey};
pub use session::{Banner, GameController, Session, SessionId, Status, TimerEvent, TimerKind};
pub use view::CardView;
