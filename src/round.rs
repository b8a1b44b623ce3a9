//! A single guessing round
//!
//! A round is created when the server starts it and replaced wholesale when
//! the next one begins. The answer text only exists once it is revealed.

use serde::Serialize;

/// Whether the answer of the round has been shown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum Answer {
    /// Players are still guessing
    #[default]
    Pending,
    /// The answer was revealed with this text
    Revealed(String),
}

impl Answer {
    /// Whether the answer has been revealed
    pub fn is_revealed(&self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// The revealed text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Pending => None,
            Self::Revealed(text) => Some(text),
        }
    }
}

/// The round currently being played
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    /// Round counter as last known from the server
    pub number: u32,
    /// Name of the player whose turn it is
    pub current_player: Option<String>,
    /// Answer state of the round
    pub answer: Answer,
}

impl Round {
    /// Starts a fresh round with the answer still pending
    pub fn new(number: u32, current_player: Option<String>) -> Self {
        Self {
            number,
            current_player,
            answer: Answer::Pending,
        }
    }

    /// Records the revealed answer
    ///
    /// # Returns
    ///
    /// `false` if the answer had already been revealed, in which case the
    /// round is left unchanged
    pub fn reveal(&mut self, text: impl Into<String>) -> bool {
        if self.answer.is_revealed() {
            return false;
        }
        self.answer = Answer::Revealed(text.into());
        true
    }
}
