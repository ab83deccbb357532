#![allow(missing_docs)]

//! Game session state machine and its controller.

mod controller;
mod machine;
mod models;

pub use controller::GameController;
pub use machine::{Scheduled, TimerEvent, TimerKind, Transition};
pub use models::{Banner, Session, SessionId, Status, Turn};
