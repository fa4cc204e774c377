//! Core game logic and state management
//!
//! This module contains the match controller: the roster, the board, whose
//! turn it is, the open question and its pass phase, and the countdown used
//! in automatic mode. Every operation is a total function of the current
//! state. An operation whose precondition does not hold changes nothing and
//! reports `false`; the controller never returns an error and never panics
//! on operator input, so double clicks and stale UI events are harmless.

use std::cmp::Reverse;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::{debug, trace};
use web_time::Duration;

use super::{
    SyncMessage,
    bank::{Question, QuestionBank},
    constants,
    countdown::{AlarmMessage, TICK_INTERVAL},
    session::Observer,
    team::{self, Team, TeamId},
};

/// Represents the current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Choosing the number of teams
    Configuring,
    /// Questions are being played
    Playing,
    /// The match has ended and the roster is final for ranking
    Finished,
}

/// How turns and the countdown are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The operator picks whose turn it is and may edit scores; no countdown
    Manual,
    /// Questions run on a countdown and a timeout counts as a wrong answer
    Automatic,
}

impl Mode {
    /// Returns the countdown a question phase starts with in this mode
    fn countdown(self, seconds: u32) -> Option<u32> {
        match self {
            Self::Manual => None,
            Self::Automatic => Some(seconds),
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Automatic,
            Self::Automatic => Self::Manual,
        }
    }
}

/// Sub-state of the open question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// The team holding the turn is answering
    Initial,
    /// The turn team got it wrong; any of the candidates may claim the pass
    Passing {
        /// Every roster team except the one holding the turn
        candidates: Vec<TeamId>,
    },
}

/// The question currently shown to the teams
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenQuestion {
    /// Board number of the question
    number: usize,
    /// Initial answer or pass phase
    phase: Phase,
    /// Seconds left, present only while a countdown runs
    timer: Option<u32>,
}

/// Operator intents forwarded by the presentation layer
///
/// The countdown tick is not an action: it arrives as an
/// [`AlarmMessage`] through [`Game::receive_alarm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Create the roster with this many teams (clamped to 2..=8)
    Configure(i64),
    /// Open the question with this board number
    SelectQuestion(usize),
    /// Give the turn to a team (manual mode only)
    SetCurrentTeam(TeamId),
    /// Overwrite a team's score (manual mode only)
    SetScore {
        /// The team to edit
        team: TeamId,
        /// The new score, negative values become zero
        score: i64,
    },
    /// Switch between manual and automatic mode
    ToggleMode,
    /// Credit a team with a correct answer to the open question
    MarkCorrect(TeamId),
    /// Declare the open question answered wrongly (or unclaimed in the pass)
    MarkWrong,
    /// End the match and freeze the scores
    EndMatch,
    /// Discard the match and return to configuration
    Restart,
}

/// The match controller
///
/// This struct owns the whole match state. It is mutated only through the
/// operations below; the renderer reads it through the accessors or through
/// the [`SyncMessage`] snapshots sent after each transition.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    /// The content the board was loaded from, kept for restarts
    #[serde(skip)]
    bank: QuestionBank,
    /// Roster in turn order
    teams: Vec<Team>,
    /// The board, numbered 1 to 30
    questions: Vec<Question>,
    /// The team whose turn it is
    current_team: TeamId,
    /// The question being played, if any
    open: Option<OpenQuestion>,
    /// Current phase of the match
    state: State,
    /// Manual or automatic play
    mode: Mode,
    /// Number of questions opened so far
    round: u64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(QuestionBank::default())
    }
}

impl Game {
    /// Creates a match in configuration mode
    ///
    /// The board is loaded from `bank`, a provisional roster of three teams
    /// is shown, team 1 holds the turn and play starts in manual mode.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quizboard::bank::QuestionBank;
    /// use quizboard::game::{Game, State};
    ///
    /// let mut game = Game::new(QuestionBank::default());
    /// assert_eq!(game.state(), State::Configuring);
    ///
    /// game.configure(4);
    /// assert_eq!(game.teams().len(), 4);
    /// assert_eq!(game.state(), State::Playing);
    /// ```
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            questions: bank.to_questions(),
            bank,
            teams: team::roster(constants::teams::DEFAULT_COUNT),
            current_team: TeamId::new(1),
            open: None,
            state: State::Configuring,
            mode: Mode::Manual,
            round: 0,
        }
    }

    // Transitions

    /// Applies an action and reports whether the state changed
    ///
    /// This is the pure transition function: it neither schedules ticks nor
    /// notifies anyone. See [`Game::receive_action`] for the driven variant.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Configure(count) => self.configure(count),
            Action::SelectQuestion(number) => self.select_question(number),
            Action::SetCurrentTeam(id) => self.set_current_team(id),
            Action::SetScore { team, score } => self.set_score(team, score),
            Action::ToggleMode => self.toggle_mode(),
            Action::MarkCorrect(id) => self.mark_correct(id),
            Action::MarkWrong => self.mark_wrong(),
            Action::EndMatch => self.end_match(),
            Action::Restart => self.restart(),
        }
    }

    /// Creates the roster and starts play
    ///
    /// The count is clamped to the allowed range, so any input produces a
    /// valid roster. Teams get ids `1..=count`, names `"Team {id}"`, a zero
    /// score and a palette colour. The board is left untouched.
    ///
    /// # Arguments
    ///
    /// * `team_count` - Requested number of teams
    ///
    /// # Returns
    ///
    /// `false` if the match is no longer being configured
    pub fn configure(&mut self, team_count: i64) -> bool {
        if self.state != State::Configuring {
            return false;
        }

        let (min, max) = (constants::teams::MIN_COUNT, constants::teams::MAX_COUNT);
        let count = match usize::try_from(team_count) {
            Ok(count) => count.clamp(min, max),
            Err(_) if team_count < 0 => min,
            Err(_) => max,
        };

        self.teams = team::roster(count);
        self.current_team = TeamId::new(1);
        self.state = State::Playing;

        debug!(team_count = count, mode = ?self.mode, "match configured");
        true
    }

    /// Opens a question for the team holding the turn
    ///
    /// In automatic mode the answer countdown starts.
    ///
    /// # Returns
    ///
    /// `false` if no match is being played, another question is open, the
    /// number is not on the board, or the question was already answered
    pub fn select_question(&mut self, number: usize) -> bool {
        if self.state != State::Playing || self.open.is_some() || !self.is_selectable(number) {
            return false;
        }

        self.round += 1;
        self.open = Some(OpenQuestion {
            number,
            phase: Phase::Initial,
            timer: self.mode.countdown(constants::countdown::ANSWER_SECONDS),
        });

        debug!(question = number, team = %self.current_team, "question opened");
        true
    }

    /// Gives the turn to a team (manual mode only)
    ///
    /// Neither the open question nor any score is affected.
    pub fn set_current_team(&mut self, id: TeamId) -> bool {
        if self.state != State::Playing || self.mode != Mode::Manual || self.team(id).is_none() {
            return false;
        }

        self.current_team = id;
        debug!(team = %id, "turn reassigned");
        true
    }

    /// Overwrites a team's score (manual mode only)
    ///
    /// Negative scores are stored as zero.
    pub fn set_score(&mut self, id: TeamId, score: i64) -> bool {
        if self.state != State::Playing || self.mode != Mode::Manual {
            return false;
        }
        let Some(team) = self.team_mut(id) else {
            return false;
        };

        team.set_score(score);
        debug!(team = %id, score = team.score(), "score overwritten");
        true
    }

    /// Switches between manual and automatic mode
    ///
    /// Any running countdown is cancelled, whatever the phase of the open
    /// question. Switching to automatic does not start a countdown for a
    /// question that is already open.
    pub fn toggle_mode(&mut self) -> bool {
        if self.state == State::Finished {
            return false;
        }

        self.mode = self.mode.toggled();
        if let Some(open) = &mut self.open {
            open.timer = None;
        }

        debug!(mode = ?self.mode, "mode toggled");
        true
    }

    /// Credits a team with a correct answer and closes the question
    ///
    /// The full value of the question is awarded in the initial phase and a
    /// single point during the pass phase. The question becomes answered for
    /// good. The turn then moves to the team after the one holding it, no
    /// matter which team was credited.
    ///
    /// # Arguments
    ///
    /// * `id` - The team that answered correctly
    ///
    /// # Returns
    ///
    /// `false` if no question is open or the team is not on the roster. An
    /// unknown team leaves the open question untouched rather than closing it
    /// with nobody credited.
    pub fn mark_correct(&mut self, id: TeamId) -> bool {
        if self.state != State::Playing || self.team(id).is_none() {
            return false;
        }
        let Some(open) = self.open.take() else {
            return false;
        };

        let points = match open.phase {
            Phase::Initial => self.question(open.number).map_or(0, Question::points),
            Phase::Passing { .. } => constants::points::PASS,
        };

        if let Some(team) = self.team_mut(id) {
            team.award(points);
        }
        if let Some(question) = self.question_mut(open.number) {
            question.mark_answered();
        }

        debug!(question = open.number, team = %id, points, "answered correctly");
        self.advance_turn();
        true
    }

    /// Records a wrong answer to the open question
    ///
    /// The first wrong answer passes the question to every other team and,
    /// in automatic mode, starts the shorter pass countdown. A wrong answer
    /// during the pass phase closes the question unanswered, so it can be
    /// picked again later, and moves the turn on.
    ///
    /// # Returns
    ///
    /// `false` if no question is open
    pub fn mark_wrong(&mut self) -> bool {
        if self.state != State::Playing {
            return false;
        }
        let Some(open) = &mut self.open else {
            return false;
        };

        match open.phase {
            Phase::Initial => {
                let candidates = self
                    .teams
                    .iter()
                    .map(Team::id)
                    .filter(|id| *id != self.current_team)
                    .collect_vec();

                debug!(question = open.number, ?candidates, "question passed");
                open.phase = Phase::Passing { candidates };
                open.timer = self.mode.countdown(constants::countdown::PASS_SECONDS);
            }
            Phase::Passing { .. } => {
                debug!(question = open.number, "question closed unanswered");
                self.open = None;
                self.advance_turn();
            }
        }
        true
    }

    /// Advances the countdown by one second (automatic mode only)
    ///
    /// Reaching zero is handled exactly like [`Game::mark_wrong`].
    ///
    /// # Returns
    ///
    /// `false` if no countdown is running
    pub fn tick(&mut self) -> bool {
        if self.state != State::Playing || self.mode != Mode::Automatic {
            return false;
        }
        let Some(OpenQuestion {
            timer: Some(remaining),
            ..
        }) = &mut self.open
        else {
            return false;
        };
        if *remaining == 0 {
            return false;
        }

        *remaining -= 1;
        if *remaining == 0 {
            debug!("countdown expired");
            self.mark_wrong();
        }
        true
    }

    /// Ends the match
    ///
    /// Any open question is abandoned unanswered and its countdown stops.
    /// Scores are final; [`Game::ranked_teams`] gives the standings.
    pub fn end_match(&mut self) -> bool {
        if self.state != State::Playing {
            return false;
        }

        self.open = None;
        self.state = State::Finished;

        debug!(
            leader = ?self.leader().map(Team::id),
            "match ended"
        );
        true
    }

    /// Discards the match and returns to configuration with a fresh board
    pub fn restart(&mut self) -> bool {
        let bank = std::mem::take(&mut self.bank);
        *self = Self::new(bank);

        debug!("match restarted");
        true
    }

    /// Moves the turn to the next team in roster order, wrapping around
    fn advance_turn(&mut self) {
        let position = self
            .teams
            .iter()
            .position(|team| team.id() == self.current_team)
            .unwrap_or(0);

        if let Some(next) = self.teams.get((position + 1) % self.teams.len().max(1)) {
            self.current_team = next.id();
        }
    }

    // Driving

    /// Applies an action, then schedules the countdown and notifies the
    /// observer if anything changed
    ///
    /// # Arguments
    ///
    /// * `action` - The operator intent
    /// * `schedule_message` - Function to schedule the next countdown tick
    /// * `observer` - Receiver of the resulting snapshot
    ///
    /// # Type Parameters
    ///
    /// * `O` - Type implementing the Observer trait
    /// * `S` - Function type for scheduling alarm messages
    pub fn receive_action<O: Observer, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        action: Action,
        schedule_message: S,
        observer: O,
    ) -> bool {
        let armed = self.countdown();
        let changed = self.apply(action);
        if changed {
            self.after_transition(armed, schedule_message, observer);
        }
        changed
    }

    /// Handles a countdown tick scheduled earlier
    ///
    /// The tick is applied only if `alarm` still describes the armed
    /// countdown. Ticks for a closed, passed or re-opened question, or from
    /// before a mode switch, are dropped.
    ///
    /// # Type Parameters
    ///
    /// * `O` - Type implementing the Observer trait
    /// * `S` - Function type for scheduling alarm messages
    pub fn receive_alarm<O: Observer, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        alarm: AlarmMessage,
        schedule_message: S,
        observer: O,
    ) -> bool {
        let armed = self.countdown();
        if armed != Some(alarm) {
            trace!(?alarm, "stale countdown tick dropped");
            return false;
        }

        let changed = self.tick();
        if changed {
            self.after_transition(armed, schedule_message, observer);
        }
        changed
    }

    /// Re-derives the countdown and publishes the new state
    fn after_transition<O: Observer, S: FnMut(AlarmMessage, Duration)>(
        &self,
        armed: Option<AlarmMessage>,
        mut schedule_message: S,
        observer: O,
    ) {
        let next = self.countdown();
        if next != armed {
            if let Some(alarm) = next {
                schedule_message(alarm, TICK_INTERVAL);
            }
        }

        observer.send_state(&SyncMessage::Board(Box::new(self.clone())));
        if self.state == State::Finished {
            observer.send_state(&SyncMessage::Standings(
                self.ranked_teams().into_iter().cloned().collect_vec(),
            ));
        }
    }

    // Views

    /// Returns the countdown that is currently armed, if any
    ///
    /// A countdown is armed only while a match is played in automatic mode
    /// and the open question has time left.
    pub fn countdown(&self) -> Option<AlarmMessage> {
        if self.state != State::Playing || self.mode != Mode::Automatic {
            return None;
        }
        let open = self.open.as_ref()?;
        let remaining = open.timer.filter(|remaining| *remaining > 0)?;

        Some(AlarmMessage {
            round: self.round,
            question: open.number,
            passing: matches!(open.phase, Phase::Passing { .. }),
            remaining,
        })
    }

    /// Returns the teams ordered by descending score, ties by ascending id
    pub fn ranked_teams(&self) -> Vec<&Team> {
        self.teams
            .iter()
            .sorted_by_key(|team| (Reverse(team.score()), team.id()))
            .collect_vec()
    }

    /// Returns the team at the top of the standings
    pub fn leader(&self) -> Option<&Team> {
        self.ranked_teams().into_iter().next()
    }

    /// Returns the board in rows of six questions
    pub fn board(&self) -> Vec<&[Question]> {
        self.questions
            .chunks(constants::board::COLUMNS)
            .collect_vec()
    }

    /// Returns whether the question exists and has not been answered
    pub fn is_selectable(&self, number: usize) -> bool {
        self.question(number)
            .is_some_and(|question| !question.is_answered())
    }

    /// Returns the points a correct answer would earn right now
    pub fn points_on_offer(&self) -> Option<u32> {
        let open = self.open.as_ref()?;
        match open.phase {
            Phase::Initial => self.question(open.number).map(Question::points),
            Phase::Passing { .. } => Some(constants::points::PASS),
        }
    }

    /// Returns the roster in turn order
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Returns a team by id
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id() == id)
    }

    fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|team| team.id() == id)
    }

    /// Returns every question on the board
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns a question by board number
    pub fn question(&self, number: usize) -> Option<&Question> {
        number
            .checked_sub(1)
            .and_then(|index| self.questions.get(index))
    }

    fn question_mut(&mut self, number: usize) -> Option<&mut Question> {
        number
            .checked_sub(1)
            .and_then(|index| self.questions.get_mut(index))
    }

    /// Returns the id of the team whose turn it is
    pub fn current_team_id(&self) -> TeamId {
        self.current_team
    }

    /// Returns the team whose turn it is
    pub fn current_team(&self) -> Option<&Team> {
        self.team(self.current_team)
    }

    /// Returns the number of the open question
    pub fn selected_number(&self) -> Option<usize> {
        self.open.as_ref().map(|open| open.number)
    }

    /// Returns the open question
    pub fn selected_question(&self) -> Option<&Question> {
        self.question(self.selected_number()?)
    }

    /// Returns the seconds left on the countdown
    pub fn timer(&self) -> Option<u32> {
        self.open.as_ref().and_then(|open| open.timer)
    }

    /// Returns whether the open question is in its pass phase
    pub fn passing_phase(&self) -> bool {
        matches!(
            self.open,
            Some(OpenQuestion {
                phase: Phase::Passing { .. },
                ..
            })
        )
    }

    /// Returns the teams that may claim the pass
    pub fn available_pass_teams(&self) -> &[TeamId] {
        match &self.open {
            Some(OpenQuestion {
                phase: Phase::Passing { candidates },
                ..
            }) => candidates,
            _ => &[],
        }
    }

    /// Returns the phase of the match
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns whether the roster is still being configured
    pub fn is_configuring(&self) -> bool {
        self.state == State::Configuring
    }

    /// Returns the play mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns whether the operator drives play by hand
    pub fn is_manual_mode(&self) -> bool {
        self.mode == Mode::Manual
    }

    /// Returns how many questions have been opened
    pub fn round(&self) -> u64 {
        self.round
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingObserver {
        messages: RefCell<Vec<SyncMessage>>,
    }

    impl Observer for RecordingObserver {
        fn send_state(&self, state: &SyncMessage) {
            self.messages.borrow_mut().push(state.clone());
        }
    }

    fn create_test_game(team_count: i64, mode: Mode) -> Game {
        let mut game = Game::default();
        if mode == Mode::Automatic {
            assert!(game.toggle_mode());
        }
        assert!(game.configure(team_count));
        game
    }

    fn id(id: usize) -> TeamId {
        TeamId::new(id)
    }

    fn scores(game: &Game) -> Vec<u32> {
        game.teams().iter().map(Team::score).collect()
    }

    #[test]
    fn test_new_game_defaults() {
        let game = Game::default();
        assert!(game.is_configuring());
        assert!(game.is_manual_mode());
        assert_eq!(game.teams().len(), constants::teams::DEFAULT_COUNT);
        assert_eq!(game.current_team_id(), id(1));
        assert_eq!(game.questions().len(), constants::bank::SIZE);
        assert_eq!(game.selected_number(), None);
        assert_eq!(game.timer(), None);
        assert!(!game.passing_phase());
        assert!(game.available_pass_teams().is_empty());
    }

    #[test]
    fn test_configure_in_range() {
        for count in 2..=8 {
            let game = create_test_game(count, Mode::Manual);
            assert!(!game.is_configuring());
            assert_eq!(game.teams().len(), count as usize);
            for (index, team) in game.teams().iter().enumerate() {
                assert_eq!(team.id(), id(index + 1));
                assert_eq!(team.name(), format!("Team {}", index + 1));
                assert_eq!(team.score(), 0);
            }
        }
    }

    #[test]
    fn test_configure_clamps() {
        assert_eq!(create_test_game(1, Mode::Manual).teams().len(), 2);
        assert_eq!(create_test_game(-40, Mode::Manual).teams().len(), 2);
        assert_eq!(create_test_game(9, Mode::Manual).teams().len(), 8);
        assert_eq!(create_test_game(i64::MAX, Mode::Manual).teams().len(), 8);
    }

    #[test]
    fn test_configure_only_once() {
        let mut game = create_test_game(4, Mode::Manual);
        let before = game.clone();
        assert!(!game.configure(6));
        assert_eq!(game, before);
    }

    #[test]
    fn test_gameplay_ignored_while_configuring() {
        let mut game = Game::default();
        let before = game.clone();
        assert!(!game.select_question(1));
        assert!(!game.set_score(id(1), 5));
        assert!(!game.set_current_team(id(2)));
        assert!(!game.end_match());
        assert_eq!(game, before);
    }

    #[test]
    fn test_select_question_manual() {
        let mut game = create_test_game(3, Mode::Manual);
        assert!(game.select_question(5));
        assert_eq!(game.selected_number(), Some(5));
        assert_eq!(game.timer(), None);
        assert!(!game.passing_phase());
        assert_eq!(game.round(), 1);
        assert_eq!(game.points_on_offer(), Some(2));
    }

    #[test]
    fn test_select_question_automatic_starts_countdown() {
        let mut game = create_test_game(3, Mode::Automatic);
        assert!(game.select_question(12));
        assert_eq!(game.timer(), Some(30));
        assert_eq!(
            game.countdown(),
            Some(AlarmMessage {
                round: 1,
                question: 12,
                passing: false,
                remaining: 30,
            })
        );
    }

    #[test]
    fn test_select_question_while_open_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        game.select_question(5);
        let before = game.clone();
        assert!(!game.select_question(6));
        assert_eq!(game, before);
    }

    #[test]
    fn test_select_answered_question_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        game.select_question(5);
        game.mark_correct(id(1));
        let before = game.clone();
        assert!(!game.select_question(5));
        assert_eq!(game, before);
    }

    #[test]
    fn test_select_question_out_of_range_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        let before = game.clone();
        assert!(!game.select_question(0));
        assert!(!game.select_question(31));
        assert_eq!(game, before);
    }

    #[test]
    fn test_mark_correct_awards_full_points() {
        let mut game = create_test_game(3, Mode::Manual);
        game.select_question(5);
        assert!(game.mark_correct(id(1)));

        assert_eq!(scores(&game), vec![2, 0, 0]);
        assert!(game.question(5).unwrap().is_answered());
        assert_eq!(game.selected_number(), None);
        assert_eq!(game.current_team_id(), id(2));
    }

    #[test]
    fn test_mark_correct_advances_from_turn_holder_not_credited_team() {
        let mut game = create_test_game(4, Mode::Manual);
        game.set_current_team(id(2));
        game.select_question(25);
        assert!(game.mark_correct(id(4)));

        assert_eq!(scores(&game), vec![0, 0, 0, 4]);
        assert_eq!(game.current_team_id(), id(3));
    }

    #[test]
    fn test_turn_wraps_around() {
        let mut game = create_test_game(3, Mode::Manual);
        game.set_current_team(id(3));
        game.select_question(1);
        game.mark_correct(id(3));
        assert_eq!(game.current_team_id(), id(1));
    }

    #[test]
    fn test_mark_correct_during_pass_awards_one_point() {
        let mut game = create_test_game(3, Mode::Manual);
        game.select_question(28);
        game.mark_wrong();
        assert_eq!(game.points_on_offer(), Some(1));
        assert!(game.mark_correct(id(3)));

        assert_eq!(scores(&game), vec![0, 0, 1]);
        assert!(game.question(28).unwrap().is_answered());
        assert!(!game.passing_phase());
        assert!(game.available_pass_teams().is_empty());
        assert_eq!(game.current_team_id(), id(2));
    }

    #[test]
    fn test_mark_correct_without_open_question_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        let before = game.clone();
        assert!(!game.mark_correct(id(1)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_mark_correct_unknown_team_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        game.select_question(5);
        let before = game.clone();
        assert!(!game.mark_correct(id(9)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_mark_wrong_twice() {
        let mut game = create_test_game(3, Mode::Manual);
        game.set_current_team(id(2));
        game.select_question(7);

        assert!(game.mark_wrong());
        assert!(game.passing_phase());
        assert_eq!(game.available_pass_teams(), &[id(1), id(3)]);
        assert_eq!(game.selected_number(), Some(7));
        assert!(!game.question(7).unwrap().is_answered());

        assert!(game.mark_wrong());
        assert_eq!(game.selected_number(), None);
        assert!(!game.passing_phase());
        assert!(game.available_pass_teams().is_empty());
        assert!(!game.question(7).unwrap().is_answered());
        assert_eq!(game.current_team_id(), id(3));
        assert_eq!(scores(&game), vec![0, 0, 0]);
    }

    #[test]
    fn test_turn_change_while_open_moves_advance_origin() {
        let mut game = create_test_game(4, Mode::Manual);
        game.select_question(8);
        assert!(game.set_current_team(id(3)));
        assert_eq!(game.selected_number(), Some(8));

        game.mark_wrong();
        assert_eq!(game.available_pass_teams(), &[id(1), id(2), id(4)]);
        game.mark_wrong();

        assert_eq!(game.selected_number(), None);
        assert_eq!(game.current_team_id(), id(4));
    }

    #[test]
    fn test_unanswered_question_can_be_reopened() {
        let mut game = create_test_game(2, Mode::Manual);
        game.select_question(9);
        game.mark_wrong();
        game.mark_wrong();
        assert!(game.is_selectable(9));
        assert!(game.select_question(9));
        assert_eq!(game.round(), 2);
    }

    #[test]
    fn test_two_teams_single_pass_round() {
        let mut game = create_test_game(2, Mode::Manual);
        game.select_question(3);
        game.mark_wrong();
        assert_eq!(game.available_pass_teams(), &[id(2)]);
        game.mark_wrong();
        assert_eq!(game.selected_number(), None);
        assert_eq!(game.current_team_id(), id(2));
    }

    #[test]
    fn test_mark_wrong_without_open_question_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        let before = game.clone();
        assert!(!game.mark_wrong());
        assert_eq!(game, before);
    }

    #[test]
    fn test_mark_wrong_automatic_sets_pass_countdown() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(1);
        game.tick();
        game.mark_wrong();
        assert_eq!(game.timer(), Some(15));
        assert!(game.countdown().unwrap().passing);
    }

    #[test]
    fn test_countdown_timeout_passes_then_closes() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(1);

        for expected in (1..30).rev() {
            assert!(game.tick());
            assert_eq!(game.timer(), Some(expected));
            assert!(!game.passing_phase());
        }

        assert!(game.tick());
        assert!(game.passing_phase());
        assert_eq!(game.timer(), Some(15));
        assert_eq!(game.available_pass_teams(), &[id(2), id(3)]);

        for _ in 0..14 {
            assert!(game.tick());
        }
        assert_eq!(game.timer(), Some(1));

        assert!(game.tick());
        assert_eq!(game.selected_number(), None);
        assert_eq!(game.timer(), None);
        assert!(!game.question(1).unwrap().is_answered());
        assert_eq!(game.current_team_id(), id(2));
    }

    #[test]
    fn test_tick_without_countdown_is_noop() {
        let mut manual = create_test_game(3, Mode::Manual);
        manual.select_question(1);
        let before = manual.clone();
        assert!(!manual.tick());
        assert_eq!(manual, before);

        let mut idle = create_test_game(3, Mode::Automatic);
        let before = idle.clone();
        assert!(!idle.tick());
        assert_eq!(idle, before);
    }

    #[test]
    fn test_tick_after_close_is_noop() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(2);
        game.tick();
        game.mark_correct(id(1));
        let before = game.clone();
        assert!(!game.tick());
        assert_eq!(game, before);
    }

    #[test]
    fn test_toggle_mode_clears_timer() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(2);
        assert!(game.toggle_mode());
        assert_eq!(game.timer(), None);
        assert!(game.is_manual_mode());

        game.mark_wrong();
        assert!(game.toggle_mode());
        assert!(!game.is_manual_mode());
        assert_eq!(game.timer(), None);
        assert_eq!(game.countdown(), None);
        assert!(!game.tick());
    }

    #[test]
    fn test_toggle_mode_during_pass_phase() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(2);
        game.mark_wrong();
        assert_eq!(game.timer(), Some(15));
        game.toggle_mode();
        assert_eq!(game.timer(), None);
        assert!(game.passing_phase());
    }

    #[test]
    fn test_manual_only_operations_ignored_in_automatic() {
        let mut game = create_test_game(3, Mode::Automatic);
        let before = game.clone();
        assert!(!game.set_score(id(1), 10));
        assert!(!game.set_current_team(id(3)));
        assert_eq!(game, before);
    }

    #[test]
    fn test_set_score_clamps() {
        let mut game = create_test_game(3, Mode::Manual);
        assert!(game.set_score(id(2), 9));
        assert!(game.set_score(id(3), -4));
        assert_eq!(scores(&game), vec![0, 9, 0]);
        assert!(!game.set_score(id(7), 1));
    }

    #[test]
    fn test_set_current_team_unknown_is_noop() {
        let mut game = create_test_game(3, Mode::Manual);
        assert!(!game.set_current_team(id(4)));
        assert!(!game.set_current_team(id(0)));
        assert_eq!(game.current_team_id(), id(1));
    }

    #[test]
    fn test_ranked_teams_tie_break() {
        let mut game = create_test_game(4, Mode::Manual);
        for (team, score) in [(1, 10), (2, 7), (3, 7), (4, 3)] {
            game.set_score(id(team), score);
        }
        assert!(game.end_match());

        let ranked = game.ranked_teams().iter().map(|t| t.id()).collect_vec();
        assert_eq!(ranked, vec![id(1), id(2), id(3), id(4)]);
    }

    #[test]
    fn test_ranked_teams_reverse_order() {
        let mut game = create_test_game(4, Mode::Manual);
        for (team, score) in [(1, 3), (2, 7), (3, 7), (4, 10)] {
            game.set_score(id(team), score);
        }
        let ranked = game.ranked_teams().iter().map(|t| t.id()).collect_vec();
        assert_eq!(ranked, vec![id(4), id(2), id(3), id(1)]);
        assert_eq!(game.leader().map(Team::id), Some(id(4)));
    }

    #[test]
    fn test_end_match_freezes_play() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(4);
        assert!(game.end_match());
        assert_eq!(game.state(), State::Finished);
        assert_eq!(game.selected_number(), None);
        assert_eq!(game.countdown(), None);

        let before = game.clone();
        assert!(!game.select_question(5));
        assert!(!game.mark_wrong());
        assert!(!game.tick());
        assert!(!game.toggle_mode());
        assert!(!game.end_match());
        assert_eq!(game, before);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = create_test_game(5, Mode::Manual);
        game.select_question(1);
        game.mark_correct(id(1));
        game.end_match();

        assert!(game.restart());
        assert_eq!(game, Game::default());
    }

    #[test]
    fn test_board_layout() {
        let game = Game::default();
        let board = game.board();
        assert_eq!(board.len(), 5);
        assert!(board.iter().all(|row| row.len() == 6));
        assert_eq!(board[1][0].number(), 7);
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let mut game = Game::default();
        assert!(game.apply(Action::Configure(3)));
        assert!(game.apply(Action::SelectQuestion(11)));
        assert!(game.apply(Action::MarkWrong));
        assert!(game.apply(Action::MarkCorrect(id(2))));
        assert!(game.apply(Action::SetScore {
            team: id(1),
            score: 5,
        }));
        assert_eq!(scores(&game), vec![5, 1, 0]);
        assert!(game.apply(Action::EndMatch));
        assert!(!game.apply(Action::ToggleMode));
    }

    #[test]
    fn test_action_deserializes() {
        let action: Action = serde_json::from_str(r#"{"MarkCorrect": 2}"#).unwrap();
        assert_eq!(action, Action::MarkCorrect(id(2)));
        let action: Action = serde_json::from_str(r#""MarkWrong""#).unwrap();
        assert_eq!(action, Action::MarkWrong);
    }

    #[test]
    fn test_receive_action_schedules_and_notifies() {
        let mut game = create_test_game(3, Mode::Automatic);
        let observer = RecordingObserver::default();
        let mut scheduled = Vec::new();

        assert!(game.receive_action(
            Action::SelectQuestion(1),
            |alarm, duration| scheduled.push((alarm, duration)),
            &observer,
        ));

        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].0.remaining, 30);
        assert_eq!(scheduled[0].1, TICK_INTERVAL);
        assert_eq!(observer.messages.borrow().len(), 1);
    }

    #[test]
    fn test_receive_action_noop_is_silent() {
        let mut game = create_test_game(3, Mode::Manual);
        let observer = RecordingObserver::default();
        let mut scheduled = Vec::new();

        assert!(!game.receive_action(
            Action::MarkWrong,
            |alarm, _| scheduled.push(alarm),
            &observer,
        ));
        assert!(scheduled.is_empty());
        assert!(observer.messages.borrow().is_empty());
    }

    #[test]
    fn test_receive_alarm_chain_runs_to_pass_phase() {
        let mut game = create_test_game(2, Mode::Automatic);
        let mut pending = Vec::new();
        game.receive_action(Action::SelectQuestion(1), |alarm, _| pending.push(alarm), ());

        let mut ticks = 0;
        while !game.passing_phase() {
            let alarm = pending.pop().unwrap();
            assert!(game.receive_alarm(alarm, |alarm, _| pending.push(alarm), ()));
            ticks += 1;
        }

        assert_eq!(ticks, 30);
        assert_eq!(game.timer(), Some(15));
        assert_eq!(pending.len(), 1);
        assert!(pending[0].passing);
    }

    #[test]
    fn test_stale_alarm_after_close_is_dropped() {
        let mut game = create_test_game(3, Mode::Automatic);
        let mut pending = Vec::new();
        game.receive_action(Action::SelectQuestion(1), |alarm, _| pending.push(alarm), ());
        game.receive_action(Action::MarkCorrect(id(1)), |alarm, _| pending.push(alarm), ());

        let before = game.clone();
        let observer = RecordingObserver::default();
        assert!(!game.receive_alarm(pending[0], |_, _| {}, &observer));
        assert_eq!(game, before);
        assert!(observer.messages.borrow().is_empty());
    }

    #[test]
    fn test_stale_alarm_after_reopen_is_dropped() {
        let mut game = create_test_game(3, Mode::Automatic);
        let mut pending = Vec::new();
        game.receive_action(Action::SelectQuestion(1), |alarm, _| pending.push(alarm), ());
        game.receive_action(Action::MarkWrong, |alarm, _| pending.push(alarm), ());
        game.receive_action(Action::MarkWrong, |alarm, _| pending.push(alarm), ());
        game.receive_action(Action::SelectQuestion(1), |alarm, _| pending.push(alarm), ());
        game.receive_action(Action::MarkWrong, |alarm, _| pending.push(alarm), ());

        let stale_pass = pending[1];
        let live_pass = pending[3];
        assert_eq!(stale_pass.question, live_pass.question);
        assert_eq!(stale_pass.remaining, live_pass.remaining);

        assert!(!game.receive_alarm(stale_pass, |_, _| {}, ()));
        assert_eq!(game.timer(), Some(15));
        assert!(game.receive_alarm(live_pass, |_, _| {}, ()));
        assert_eq!(game.timer(), Some(14));
    }

    #[test]
    fn test_stale_alarm_after_mode_switch_is_dropped() {
        let mut game = create_test_game(3, Mode::Automatic);
        let mut pending = Vec::new();
        game.receive_action(Action::SelectQuestion(1), |alarm, _| pending.push(alarm), ());
        game.receive_action(Action::ToggleMode, |alarm, _| pending.push(alarm), ());

        assert_eq!(pending.len(), 1);
        assert!(!game.receive_alarm(pending[0], |_, _| {}, ()));
    }

    #[test]
    fn test_end_match_sends_standings() {
        let mut game = create_test_game(2, Mode::Manual);
        game.set_score(id(2), 4);
        let observer = RecordingObserver::default();
        game.receive_action(Action::EndMatch, |_, _| {}, &observer);

        let messages = observer.messages.borrow();
        assert_eq!(messages.len(), 2);
        match &messages[1] {
            SyncMessage::Standings(teams) => {
                assert_eq!(teams[0].id(), id(2));
                assert_eq!(teams[1].id(), id(1));
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut game = create_test_game(3, Mode::Automatic);
        game.select_question(14);
        let json = SyncMessage::Board(Box::new(game)).to_message();
        assert!(json.contains("Board"));
        assert!(json.contains("\"timer\":30"));
        assert!(!json.contains("bank"));
    }
}
