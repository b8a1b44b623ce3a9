//! Configuration constants for the photo quiz client
//!
//! This module contains the fixed limits and default timings used
//! throughout the client so that the roster, the poller and the
//! notices agree on the same boundaries.

/// Session bootstrap limits
pub mod session {
    /// Minimum number of players in a session
    pub const MIN_PLAYER_COUNT: usize = 1;
    /// Maximum number of players in a session
    pub const MAX_PLAYER_COUNT: usize = 10;
    /// Maximum length of a player name in characters
    pub const MAX_NAME_LENGTH: usize = 20;
}

/// Scoreboard sync timing
pub mod poll {
    /// Default delay between two scoreboard polls, in milliseconds
    pub const DEFAULT_INTERVAL_MS: u64 = 1500;
    /// Smallest poll interval accepted by the configuration, in milliseconds
    pub const MIN_INTERVAL_MS: u64 = 250;
    /// Largest poll interval accepted by the configuration, in milliseconds
    pub const MAX_INTERVAL_MS: u64 = 60_000;
}

/// HTTP adapter defaults
pub mod http {
    /// Default base URL of the game server
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
    /// Default request timeout in milliseconds
    pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
    /// Path prefix shared by every API endpoint
    pub const API_PREFIX: &str = "/api/";
}

/// Transient notice defaults
pub mod notice {
    /// Default time a notice stays visible, in milliseconds
    pub const DEFAULT_DURATION_MS: u64 = 3000;
    /// Longest notice duration accepted by the configuration, in milliseconds
    pub const MAX_DURATION_MS: u64 = 30_000;
}
