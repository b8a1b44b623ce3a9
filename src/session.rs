//! Session bootstrap
//!
//! Collects the player list on the setup screen and turns it into the
//! request that creates a session on the server. The roster is a list of
//! editable name slots; only trimmed, non-empty names are submitted.

use garde::Validate;
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::constants::session::{MAX_NAME_LENGTH, MAX_PLAYER_COUNT, MIN_PLAYER_COUNT};

/// Errors that can occur while editing or submitting the roster
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No slot holds a usable name
    #[error("enter at least one player")]
    NoPlayers,
    /// The roster already has the maximum number of slots
    #[error("maximum 10 players")]
    TooManyPlayers,
    /// A name exceeds the maximum length
    #[error("player name is too long")]
    NameTooLong,
}

/// Body of the session creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CreateSession {
    /// Player names in turn order
    #[garde(
        length(min = MIN_PLAYER_COUNT, max = MAX_PLAYER_COUNT),
        inner(length(chars, min = 1, max = MAX_NAME_LENGTH))
    )]
    pub players: Vec<String>,
}

/// Display state of the roster form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterMessage {
    /// Current slot contents
    pub slots: Vec<String>,
    /// Placeholder text for each slot
    pub placeholders: Vec<String>,
    /// Whether slots can be removed
    pub can_remove: bool,
    /// Whether another slot can be added
    pub can_add: bool,
}

/// Editable list of player name slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<String>,
}

impl Default for Roster {
    /// A roster with a single empty slot
    fn default() -> Self {
        Self {
            slots: vec![String::new()],
        }
    }
}

impl Roster {
    /// Builds a roster from existing names, one slot each
    ///
    /// # Errors
    ///
    /// Returns `Error::TooManyPlayers` if more names than allowed are given.
    pub fn from_names<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = names.into_iter().map(Into::into).collect_vec();
        if slots.len() > MAX_PLAYER_COUNT {
            return Err(Error::TooManyPlayers);
        }
        if slots.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self { slots })
    }

    /// Adds an empty slot at the end
    ///
    /// # Errors
    ///
    /// Returns `Error::TooManyPlayers` if the roster is full.
    pub fn add_slot(&mut self) -> Result<usize, Error> {
        if self.slots.len() >= MAX_PLAYER_COUNT {
            return Err(Error::TooManyPlayers);
        }
        self.slots.push(String::new());
        Ok(self.slots.len() - 1)
    }

    /// Removes a slot; the last remaining slot is never removed
    ///
    /// # Returns
    ///
    /// `true` if a slot was removed
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.slots.len() <= MIN_PLAYER_COUNT || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        true
    }

    /// Replaces the contents of a slot
    ///
    /// # Errors
    ///
    /// Returns `Error::NameTooLong` if the trimmed name is over the limit.
    /// Writes to a slot that does not exist are ignored.
    pub fn set_name(&mut self, index: usize, name: &str) -> Result<(), Error> {
        if name.trim().chars().count() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong);
        }
        if let Some(slot) = self.slots.get_mut(index) {
            name.clone_into(slot);
        }
        Ok(())
    }

    /// Number of slots, filled or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the roster has no slots; never true for a roster built here
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Placeholder shown in an empty slot
    pub fn placeholder(index: usize) -> String {
        format!("Player {}", index + 1)
    }

    /// Trimmed non-empty names in slot order
    pub fn names(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Builds and validates the session creation request
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPlayers` if every slot is blank, or
    /// `Error::NameTooLong` if a name breaks the length limit.
    pub fn to_request(&self) -> Result<CreateSession, Error> {
        let players = self.names();
        if players.is_empty() {
            return Err(Error::NoPlayers);
        }
        let request = CreateSession { players };
        request.validate().map_err(|_| {
            if request.players.len() > MAX_PLAYER_COUNT {
                Error::TooManyPlayers
            } else {
                Error::NameTooLong
            }
        })?;
        Ok(request)
    }

    /// Display state of the roster form
    pub fn message(&self) -> RosterMessage {
        RosterMessage {
            slots: self.slots.clone(),
            placeholders: (0..self.slots.len()).map(Self::placeholder).collect(),
            can_remove: self.slots.len() > MIN_PLAYER_COUNT,
            can_add: self.slots.len() < MAX_PLAYER_COUNT,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_one_slot() {
        let roster = Roster::default();
        assert_eq!(roster.len(), 1);
        assert!(!roster.message().can_remove);
        assert_eq!(roster.message().placeholders, ["Player 1"]);
    }

    #[test]
    fn test_add_slot_up_to_limit() {
        let mut roster = Roster::default();
        for expected in 1..MAX_PLAYER_COUNT {
            assert_eq!(roster.add_slot(), Ok(expected));
        }
        assert_eq!(roster.add_slot(), Err(Error::TooManyPlayers));
        assert_eq!(roster.len(), MAX_PLAYER_COUNT);
        assert!(!roster.message().can_add);
    }

    #[test]
    fn test_remove_slot_keeps_last() {
        let mut roster = Roster::from_names(["Alice", "Bob"]).unwrap();
        assert!(roster.remove_slot(0));
        assert!(!roster.remove_slot(0));
        assert_eq!(roster.names(), ["Bob"]);
    }

    #[test]
    fn test_remove_slot_out_of_range() {
        let mut roster = Roster::from_names(["Alice", "Bob"]).unwrap();
        assert!(!roster.remove_slot(5));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_names_are_trimmed_and_blank_skipped() {
        let mut roster = Roster::default();
        roster.set_name(0, "  Alice ").unwrap();
        roster.add_slot().unwrap();
        roster.add_slot().unwrap();
        roster.set_name(2, "Bob").unwrap();

        assert_eq!(roster.names(), ["Alice", "Bob"]);
        assert_eq!(
            roster.to_request().unwrap().players,
            vec!["Alice".to_owned(), "Bob".to_owned()]
        );
    }

    #[test]
    fn test_blank_roster_is_rejected() {
        let mut roster = Roster::default();
        roster.set_name(0, "   ").unwrap();
        assert_eq!(roster.to_request(), Err(Error::NoPlayers));
    }

    #[test]
    fn test_name_too_long() {
        let mut roster = Roster::default();
        let long = "a".repeat(MAX_NAME_LENGTH + 1);
        assert_eq!(roster.set_name(0, &long), Err(Error::NameTooLong));
        assert!(roster.set_name(0, &"a".repeat(MAX_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let roster = Roster::from_names(["Sam", "Sam"]).unwrap();
        assert_eq!(roster.to_request().unwrap().players.len(), 2);
    }

    #[test]
    fn test_from_names_limit() {
        let names = (0..=MAX_PLAYER_COUNT).map(|i| format!("P{i}"));
        assert_eq!(Roster::from_names(names), Err(Error::TooManyPlayers));
    }

    #[test]
    fn test_request_serialization() {
        let request = Roster::from_names(["Alice", "Bob"])
            .unwrap()
            .to_request()
            .unwrap();
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"players":["Alice","Bob"]}"#
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::NoPlayers.to_string(), "enter at least one player");
        assert_eq!(Error::TooManyPlayers.to_string(), "maximum 10 players");
    }
}
