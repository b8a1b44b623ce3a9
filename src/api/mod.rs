//! Game server API
//!
//! This module defines the operations the client performs against the game
//! server and the replies it gets back. Replies are decoded once at this
//! boundary into tagged enums, so the rest of the crate never inspects raw
//! JSON flags. A refusal by the server (`success: false`) is a regular
//! `Rejected` reply, not an error; errors are reserved for the cases where no
//! usable reply was obtained.

use async_trait::async_trait;
use serde::Serialize;

use crate::{error::Result, scoreboard::ScoreEntry, session::CreateSession};

pub mod http;
pub mod wire;

pub use http::HttpApi;

/// Everything the server sends when a round begins
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundStart {
    /// First photo of the round
    pub photo_url: String,
    /// Number of photos the round offers
    pub total_photos: usize,
    /// Name of the player whose turn it is
    pub current_player: Option<String>,
    /// Standings at the start of the round
    pub scoreboard: Vec<ScoreEntry>,
    /// Round counter, when the server reports it
    pub current_round: Option<u32>,
}

/// Reply to starting the game or advancing to the next round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RoundReply {
    /// A new round has begun
    Round(RoundStart),
    /// There are no rounds left
    GameOver {
        /// Final standings
        scoreboard: Vec<ScoreEntry>,
    },
    /// The server refused, optionally explaining why
    Rejected(Option<String>),
}

/// Reply to unlocking another photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PhotoReply {
    /// A photo was unlocked
    Unlocked {
        /// Location of the new photo
        url: String,
        /// Updated number of photos in the round, if sent
        total_photos: Option<usize>,
    },
    /// The server refused, optionally explaining why
    Rejected(Option<String>),
}

/// Reply to revealing the answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnswerReply {
    /// The answer of the current round
    Revealed(String),
    /// The server refused, optionally explaining why
    Rejected(Option<String>),
}

/// Reply to creating a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionReply {
    /// The session exists and the game can be started
    Created,
    /// The server refused, optionally explaining why
    Rejected(Option<String>),
}

/// Latest standings as seen by a poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreboardSnapshot {
    /// Standings in the order sent by the server
    pub entries: Vec<ScoreEntry>,
    /// Round counter on the server, when reported
    pub current_round: Option<u32>,
}

/// Reply to a scoreboard poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScoreboardReply {
    /// Current standings
    Snapshot(ScoreboardSnapshot),
    /// The server refused, optionally explaining why
    Rejected(Option<String>),
}

/// Progress through the pool of rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Number of rounds in the pool
    pub total: Option<u32>,
    /// Number of rounds already played
    pub used: Option<u32>,
    /// Number of rounds left
    pub remaining: u32,
}

/// Operations offered by the game server
///
/// Every method performs exactly one request. Implementations must not
/// retry; the caller decides what a failure means.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Registers the players of a new session
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn create_session(&self, request: &CreateSession) -> Result<SessionReply>;

    /// Starts the game and its first round
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn start_game(&self) -> Result<RoundReply>;

    /// Unlocks the next photo of the current round
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn unlock_photo(&self) -> Result<PhotoReply>;

    /// Reveals the answer of the current round
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn reveal_answer(&self) -> Result<AnswerReply>;

    /// Finishes the current round and starts the next one
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn advance_round(&self) -> Result<RoundReply>;

    /// Fetches the current standings
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn scoreboard(&self) -> Result<ScoreboardReply>;

    /// Fetches how many rounds remain
    ///
    /// # Errors
    ///
    /// Returns an error if no decodable reply was obtained.
    async fn stats(&self) -> Result<Stats>;
}
