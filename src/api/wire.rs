//! JSON shapes exchanged with the game server
//!
//! The server answers every game operation with the same loosely-populated
//! object. These types mirror it field for field and are converted into the
//! tagged replies of the parent module right after decoding.

use serde::Deserialize;

use super::{
    AnswerReply, PhotoReply, RoundReply, RoundStart, ScoreboardReply, ScoreboardSnapshot,
    SessionReply, Stats,
};
use crate::scoreboard::ScoreEntry;

/// Player reference inside a reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerRef {
    /// Player name
    pub name: String,
}

/// Body of every game operation reply
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Whether the pool of rounds is exhausted
    pub game_over: bool,
    /// Human-readable explanation, mostly on failure
    pub message: Option<String>,
    /// Location of the photo that was unlocked
    pub photo_url: Option<String>,
    /// One-based index of that photo within the round
    pub current_photo: Option<usize>,
    /// Number of photos in the round
    pub total_photos: Option<usize>,
    /// Whether more photos can be unlocked
    pub has_more: Option<bool>,
    /// Answer text
    pub answer: Option<String>,
    /// Player whose turn it is
    pub current_player: Option<PlayerRef>,
    /// Standings, best first
    pub scoreboard: Option<Vec<ScoreEntry>>,
    /// Round counter
    pub current_round: Option<u32>,
}

impl GameResponse {
    /// The explanation, if the server gave a non-empty one
    fn reason(&mut self) -> Option<String> {
        self.message.take().filter(|message| !message.trim().is_empty())
    }

    /// The photo location, if the server gave a non-empty one
    fn photo(&mut self) -> Option<String> {
        self.photo_url.take().filter(|url| !url.is_empty())
    }

    /// The round counter; zero means the server has none yet
    fn round(&self) -> Option<u32> {
        self.current_round.filter(|round| *round > 0)
    }
}

/// Body of the stats reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatsResponse {
    /// Number of rounds in the pool
    #[serde(default)]
    pub total: Option<u32>,
    /// Number of rounds already played
    #[serde(default)]
    pub used: Option<u32>,
    /// Number of rounds left
    pub remaining: u32,
}

impl From<GameResponse> for RoundReply {
    fn from(mut response: GameResponse) -> Self {
        if response.game_over {
            return Self::GameOver {
                scoreboard: response.scoreboard.unwrap_or_default(),
            };
        }
        if !response.success {
            return Self::Rejected(response.reason());
        }
        let Some(photo_url) = response.photo() else {
            return Self::Rejected(response.reason());
        };
        Self::Round(RoundStart {
            photo_url,
            total_photos: response.total_photos.unwrap_or_default(),
            current_player: response.current_player.take().map(|player| player.name),
            current_round: response.round(),
            scoreboard: response.scoreboard.unwrap_or_default(),
        })
    }
}

impl From<GameResponse> for PhotoReply {
    fn from(mut response: GameResponse) -> Self {
        match (response.success, response.photo()) {
            (true, Some(url)) => Self::Unlocked {
                url,
                total_photos: response.total_photos,
            },
            _ => Self::Rejected(response.reason()),
        }
    }
}

impl From<GameResponse> for AnswerReply {
    fn from(mut response: GameResponse) -> Self {
        if response.success {
            Self::Revealed(response.answer.unwrap_or_default())
        } else {
            Self::Rejected(response.reason())
        }
    }
}

impl From<GameResponse> for SessionReply {
    fn from(mut response: GameResponse) -> Self {
        if response.success {
            Self::Created
        } else {
            Self::Rejected(response.reason())
        }
    }
}

impl From<GameResponse> for ScoreboardReply {
    fn from(mut response: GameResponse) -> Self {
        if !response.success {
            return Self::Rejected(response.reason());
        }
        Self::Snapshot(ScoreboardSnapshot {
            current_round: response.round(),
            entries: response.scoreboard.unwrap_or_default(),
        })
    }
}

impl From<StatsResponse> for Stats {
    fn from(response: StatsResponse) -> Self {
        Self {
            total: response.total,
            used: response.used,
            remaining: response.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn decode(json: &str) -> GameResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_round_reply() {
        let reply: RoundReply = decode(
            r#"{
                "success": true,
                "photoUrl": "/api/photo/abc",
                "currentPhoto": 1,
                "totalPhotos": 4,
                "hasMore": true,
                "gameOver": false,
                "currentPlayer": {"name": "Alice"},
                "scoreboard": [{"name": "Alice", "score": 0, "isCurrentPlayer": true}],
                "currentRound": 2
            }"#,
        )
        .into();

        let RoundReply::Round(start) = reply else {
            panic!("expected a round, got {reply:?}");
        };
        assert_eq!(start.photo_url, "/api/photo/abc");
        assert_eq!(start.total_photos, 4);
        assert_eq!(start.current_player.as_deref(), Some("Alice"));
        assert_eq!(start.scoreboard.len(), 1);
        assert_eq!(start.current_round, Some(2));
    }

    #[test]
    fn test_game_over_takes_precedence() {
        let reply: RoundReply = decode(
            r#"{"success": false, "gameOver": true, "message": "All rounds played",
                "scoreboard": [{"name": "Bob", "score": 3}]}"#,
        )
        .into();
        assert!(matches!(reply, RoundReply::GameOver { scoreboard } if scoreboard.len() == 1));

        let reply: RoundReply = decode(r#"{"success": true, "gameOver": true}"#).into();
        assert!(matches!(reply, RoundReply::GameOver { scoreboard } if scoreboard.is_empty()));
    }

    #[test]
    fn test_round_without_photo_is_rejected() {
        let reply: RoundReply = decode(r#"{"success": true, "gameOver": false}"#).into();
        assert_eq!(reply, RoundReply::Rejected(None));
    }

    #[test]
    fn test_rejection_message() {
        let reply: PhotoReply =
            decode(r#"{"success": false, "message": "No more photos", "hasMore": false}"#).into();
        assert_eq!(reply, PhotoReply::Rejected(Some("No more photos".to_owned())));

        let reply: AnswerReply = decode(r#"{"success": false, "message": "  "}"#).into();
        assert_eq!(reply, AnswerReply::Rejected(None));
    }

    #[test]
    fn test_photo_reply() {
        let reply: PhotoReply =
            decode(r#"{"success": true, "photoUrl": "p2.jpg", "totalPhotos": 5}"#).into();
        assert_eq!(
            reply,
            PhotoReply::Unlocked {
                url: "p2.jpg".to_owned(),
                total_photos: Some(5),
            }
        );
    }

    #[test]
    fn test_answer_and_session_replies() {
        let reply: AnswerReply = decode(r#"{"success": true, "answer": "Paris"}"#).into();
        assert_eq!(reply, AnswerReply::Revealed("Paris".to_owned()));

        let reply: SessionReply = decode(r#"{"success": true}"#).into();
        assert_eq!(reply, SessionReply::Created);
    }

    #[test]
    fn test_scoreboard_reply_ignores_zero_round() {
        let reply: ScoreboardReply =
            decode(r#"{"success": true, "scoreboard": [], "currentRound": 0}"#).into();
        assert_eq!(
            reply,
            ScoreboardReply::Snapshot(ScoreboardSnapshot {
                entries: Vec::new(),
                current_round: None,
            })
        );
    }

    #[test]
    fn test_null_fields_are_absent() {
        let reply: ScoreboardReply =
            decode(r#"{"success": true, "scoreboard": null, "currentRound": null}"#).into();
        assert!(matches!(reply, ScoreboardReply::Snapshot(s) if s.entries.is_empty()));
    }

    #[test]
    fn test_stats() {
        let stats: Stats = serde_json::from_str::<StatsResponse>(
            r#"{"total": 12, "used": 5, "remaining": 7}"#,
        )
        .unwrap()
        .into();
        assert_eq!(stats.remaining, 7);
        assert_eq!(stats.total, Some(12));

        let stats: Stats = serde_json::from_str::<StatsResponse>(r#"{"remaining": 3}"#)
            .unwrap()
            .into();
        assert_eq!(stats.used, None);
    }
}
