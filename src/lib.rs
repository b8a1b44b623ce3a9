//! # Photo Quiz Client
//!
//! This library drives the client side of a party photo quiz: players take
//! turns guessing what a progressively unlocked set of photos shows, the
//! answer is revealed, and a scoreboard kept by the server follows the game
//! until the final standings are shown.
//!
//! The [`game::Game`] state machine holds all client state and performs no
//! I/O. The [`controller::Controller`] connects it to a [`api::GameApi`]
//! implementation and a [`view::View`], and runs the scoreboard poll while a
//! round is being played.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
use serde::Serialize;

pub mod api;
pub mod carousel;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod game;
mod poller;
pub mod round;
pub mod scoreboard;
pub mod session;
pub mod telemetry;
pub mod view;

pub use config::ClientConfig;
pub use controller::Controller;
pub use error::{Error, Result};

/// Messages sent to the view when something visible changes
///
/// Each message replaces the corresponding part of the display; none of
/// them is incremental.
#[derive(Debug, Serialize, Clone, PartialEq, derive_more::From)]
pub enum UpdateMessage {
    /// Switch to another screen
    #[from]
    Screen(view::ScreenKind),
    /// Show or hide the loading indicator
    Busy(bool),
    /// Update the carousel counters and controls
    #[from]
    Carousel(carousel::CarouselMessage),
    /// Display a photo and report back through `Controller::image_loaded`
    ShowPhoto {
        /// Location of the photo
        url: String,
        /// Ticket to hand back once the image has loaded or failed
        ticket: game::LoadTicket,
    },
    /// Name of the player whose turn it is
    CurrentPlayer(Option<String>),
    /// Revealed answer, or `None` to hide it
    Answer(Option<String>),
    /// Show or hide the waiting-for-score hint below the answer
    AnswerWaiting(bool),
    /// In-game standings
    Scoreboard(Vec<scoreboard::Standing>),
    /// Final standings with the winner marked
    FinalScoreboard(Vec<scoreboard::Standing>),
    /// Number of rounds left in the pool
    Remaining(u32),
    /// Transient notice
    #[from]
    Notice(view::Notice),
    /// Update the player entry form
    #[from]
    Roster(session::RosterMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}
