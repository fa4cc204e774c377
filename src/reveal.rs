//! Winners reveal sequencing
//!
//! Once a match has ended, the podium is revealed one place at a time. The
//! sequence is pure presentation timing: it reads the final standings from
//! the controller and maps elapsed time to a [`Stage`]. Nothing here feeds
//! back into the match.

use serde::Serialize;
use web_time::{Duration, Instant};

use crate::{
    constants,
    game::{Game, State},
    team::Team,
};

/// How far the reveal has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    /// Nothing shown yet
    Hidden,
    /// The title and empty podium
    Podium,
    /// Third place is shown
    Third,
    /// Second place is shown
    Second,
    /// The winner is shown, with confetti and the option to play again
    First,
}

impl Stage {
    /// Returns the stage reached after `elapsed` since the match ended
    pub fn at(elapsed: Duration) -> Self {
        let podium = Duration::from_millis(constants::reveal::PODIUM_DELAY_MS);
        let place = Duration::from_millis(constants::reveal::PLACE_DELAY_MS);

        if elapsed < podium {
            Self::Hidden
        } else if elapsed < podium + place {
            Self::Podium
        } else if elapsed < podium + place * 2 {
            Self::Third
        } else if elapsed < podium + place * 3 {
            Self::Second
        } else {
            Self::First
        }
    }

    /// Returns whether confetti falls at this stage
    pub fn shows_confetti(self) -> bool {
        self == Self::First
    }

    /// Returns whether the "play again" control is offered at this stage
    pub fn offers_restart(self) -> bool {
        self == Self::First
    }
}

/// The top three of the final standings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Podium {
    /// Winner
    pub first: Team,
    /// Runner-up
    pub second: Team,
    /// Third place, absent in a two-team match
    pub third: Option<Team>,
}

impl Podium {
    /// Builds the podium from teams already ranked by the controller
    ///
    /// Returns `None` if fewer than two teams are given.
    pub fn from_ranked(ranked: &[&Team]) -> Option<Self> {
        match ranked {
            [first, second, rest @ ..] => Some(Self {
                first: (*first).clone(),
                second: (*second).clone(),
                third: rest.first().map(|team| (*team).clone()),
            }),
            _ => None,
        }
    }

    /// Returns the placed teams visible at `stage`, best first
    pub fn visible(&self, stage: Stage) -> Vec<&Team> {
        let mut teams = Vec::with_capacity(3);
        if stage >= Stage::First {
            teams.push(&self.first);
        }
        if stage >= Stage::Second {
            teams.push(&self.second);
        }
        if stage >= Stage::Third {
            teams.extend(self.third.as_ref());
        }
        teams
    }
}

/// A running reveal, started when the match ended
#[derive(Debug, Clone)]
pub struct Reveal {
    started: Instant,
    podium: Podium,
}

impl Reveal {
    /// Starts the reveal for a finished match
    ///
    /// Returns `None` while the match is still being configured or played.
    pub fn start(game: &Game) -> Option<Self> {
        if game.state() != State::Finished {
            return None;
        }

        Some(Self {
            started: Instant::now(),
            podium: Podium::from_ranked(&game.ranked_teams())?,
        })
    }

    /// Returns the podium being revealed
    pub fn podium(&self) -> &Podium {
        &self.podium
    }

    /// Returns the stage reached now
    pub fn stage(&self) -> Stage {
        Stage::at(self.started.elapsed())
    }
}
