//! Configuration constants for the quiz board
//!
//! This module contains every limit and timing value used by the game
//! controller, the question bank and the winners reveal.

/// Team roster constants
pub mod teams {
    /// Minimum number of teams in a match
    pub const MIN_COUNT: usize = 2;
    /// Maximum number of teams in a match
    pub const MAX_COUNT: usize = 8;
    /// Number of teams shown before the roster is configured
    pub const DEFAULT_COUNT: usize = 3;
}

/// Question bank constants
pub mod bank {
    /// Number of questions on the board
    pub const SIZE: usize = 30;
    /// Number of consecutive questions sharing a category
    pub const PER_CATEGORY: usize = 10;
    /// Maximum length of a prompt or reference answer in characters
    pub const MAX_TEXT_LENGTH: usize = 500;
}

/// Scoring constants
pub mod points {
    /// Points for an easy question
    pub const EASY: u32 = 2;
    /// Points for a medium question
    pub const MEDIUM: u32 = 3;
    /// Points for a hard question
    pub const HARD: u32 = 4;
    /// Points for a correct answer claimed during the pass phase
    pub const PASS: u32 = 1;
}

/// Countdown constants (automatic mode only)
pub mod countdown {
    /// Seconds given to the team holding the turn
    pub const ANSWER_SECONDS: u32 = 30;
    /// Seconds given to the other teams once the question is passed
    pub const PASS_SECONDS: u32 = 15;
}

/// Board layout constants
pub mod board {
    /// Number of question cards per board row
    pub const COLUMNS: usize = 6;
}

/// Winners reveal timing constants, in milliseconds after the previous stage
pub mod reveal {
    /// Delay before the podium appears
    pub const PODIUM_DELAY_MS: u64 = 1000;
    /// Delay before each placed team is revealed
    pub const PLACE_DELAY_MS: u64 = 2000;
}
