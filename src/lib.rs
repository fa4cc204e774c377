//! # Quizboard Game Library
//!
//! This library provides the core logic of a single-screen party quiz: a
//! board of 30 point-valued questions, a roster of competing teams taking
//! turns, a pass phase after a wrong answer, an optional countdown, and the
//! final standings fed to a staged winners reveal.
//!
//! Rendering is left to the caller. A presentation layer implements
//! [`session::Observer`], forwards operator intents as [`game::Action`]s,
//! and runs a one-second clock whenever the controller asks for a
//! [`countdown::AlarmMessage`] to be scheduled.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
use serde::Serialize;

pub mod bank;
pub mod constants;
pub mod countdown;
pub mod game;
pub mod reveal;
pub mod session;
pub mod team;

/// Messages sent to the presentation layer after a transition
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum SyncMessage {
    /// Full snapshot of the match
    Board(Box<game::Game>),
    /// Final standings, best first, sent once the match has ended
    Standings(Vec<team::Team>),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
