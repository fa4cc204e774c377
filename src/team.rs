//! Teams and the roster palette
//!
//! Teams are created once, when the match is configured. Their ids and
//! colours never change afterwards; only the score moves.

use std::fmt::Display;

use enum_map::Enum;
use serde::{Deserialize, Serialize};

/// Identifier of a team, 1-based and sequential in roster order
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::From,
)]
#[serde(transparent)]
pub struct TeamId(usize);

impl TeamId {
    /// Creates a team id from its roster number
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the roster number
    pub fn get(self) -> usize {
        self.0
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Cosmetic colour tag, assigned round-robin from a fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum, Serialize, Deserialize)]
pub enum TeamColor {
    /// `#FF3355`
    Red,
    /// `#45CAFF`
    Sky,
    /// `#FFD700`
    Gold,
    /// `#8A2BE2`
    Violet,
    /// `#FF69B4`
    Pink,
    /// `#00FF7F`
    Spring,
    /// `#FF8C00`
    Orange,
    /// `#4B0082`
    Indigo,
}

impl TeamColor {
    /// Returns the palette colour for the team with the given id
    pub fn for_team(id: TeamId) -> Self {
        Self::from_usize(id.get().saturating_sub(1) % Self::LENGTH)
    }

    /// Returns the colour as a CSS hex string
    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#FF3355",
            Self::Sky => "#45CAFF",
            Self::Gold => "#FFD700",
            Self::Violet => "#8A2BE2",
            Self::Pink => "#FF69B4",
            Self::Spring => "#00FF7F",
            Self::Orange => "#FF8C00",
            Self::Indigo => "#4B0082",
        }
    }
}

/// A competing team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
    score: u32,
    color: TeamColor,
}

impl Team {
    /// Creates a team with a zero score, named and coloured after its id
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            name: format!("Team {id}"),
            score: 0,
            color: TeamColor::for_team(id),
        }
    }

    /// Returns the roster id
    pub fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current score
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns the colour tag
    pub fn color(&self) -> TeamColor {
        self.color
    }

    pub(crate) fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Overwrites the score, clamping negative values to zero
    pub(crate) fn set_score(&mut self, score: i64) {
        self.score = u32::try_from(score.max(0)).unwrap_or(u32::MAX);
    }
}

/// Builds a roster of `count` teams with ids `1..=count`
pub fn roster(count: usize) -> Vec<Team> {
    (1..=count).map(|id| Team::new(TeamId::new(id))).collect()
}
