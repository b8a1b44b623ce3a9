//! Scoreboard standings
//!
//! The server owns the scores; this module only keeps the latest ranked
//! list it sent and derives what the client shows from it: positions,
//! medals for the podium, the winner on the final screen and a compact
//! score display.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One player's score as reported by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Player name
    pub name: String,
    /// Accumulated points, possibly fractional
    pub score: f64,
    /// Whether it is this player's turn
    #[serde(default)]
    pub is_current_player: bool,
}

/// Podium medal for the first three positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Medal {
    /// First place
    Gold,
    /// Second place
    Silver,
    /// Third place
    Bronze,
}

impl Medal {
    /// Medal for a one-based position, if it is on the podium
    pub fn for_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }
}

/// A scoreboard row ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// One-based rank
    pub position: usize,
    /// Podium medal, if any
    pub medal: Option<Medal>,
    /// Player name
    pub name: String,
    /// Raw score
    pub score: f64,
    /// Score formatted for display
    pub score_display: String,
    /// Whether it is this player's turn
    pub is_current_player: bool,
    /// Whether this row is the winner of a finished game
    pub is_winner: bool,
}

/// Formats a score as an integer when whole, otherwise with one decimal
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.is_finite() {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

/// Ranked scores of the session, best first
///
/// The whole list is replaced on every update; entries are never patched
/// individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    /// Builds a scoreboard from server entries
    ///
    /// Entries are ordered by descending score; entries with equal scores
    /// keep the order the server sent them in.
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let entries = entries
            .into_iter()
            .sorted_by(|a, b| b.score.total_cmp(&a.score))
            .collect_vec();
        Self { entries }
    }

    /// Entries in rank order
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Whether there is nothing to show
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best-ranked entry
    pub fn leader(&self) -> Option<&ScoreEntry> {
        self.entries.first()
    }

    /// The entry whose turn it is
    pub fn current_player(&self) -> Option<&ScoreEntry> {
        self.entries.iter().find(|entry| entry.is_current_player)
    }

    /// Rows for the in-game scoreboard
    pub fn standings(&self) -> Vec<Standing> {
        self.rows(false)
    }

    /// Rows for the final screen, with the first row marked as winner
    pub fn final_standings(&self) -> Vec<Standing> {
        self.rows(true)
    }

    fn rows(&self, finished: bool) -> Vec<Standing> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let position = index + 1;
                Standing {
                    position,
                    medal: Medal::for_position(position),
                    name: entry.name.clone(),
                    score: entry.score,
                    score_display: format_score(entry.score),
                    is_current_player: entry.is_current_player && !finished,
                    is_winner: finished && position == 1,
                }
            })
            .collect()
    }
}

impl From<Vec<ScoreEntry>> for Scoreboard {
    fn from(entries: Vec<ScoreEntry>) -> Self {
        Self::from_entries(entries)
    }
}
