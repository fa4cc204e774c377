//! Question bank and board content
//!
//! This module defines the fixed set of 30 questions placed on the board.
//! Content is loaded once at startup, either from the built-in bank or from
//! a JSON document, and is never regenerated during a match. Only the
//! `answered` flag of a [`Question`] changes after loading.

use garde::Validate;
use heck::ToTitleCase;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

/// Difficulty of a question, which fixes its point value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Questions 1 to 10
    Easy,
    /// Questions 11 to 20
    Medium,
    /// Questions 21 to 30
    Hard,
}

impl Category {
    /// Returns the points awarded for a correct first answer
    pub fn points(self) -> u32 {
        match self {
            Self::Easy => constants::points::EASY,
            Self::Medium => constants::points::MEDIUM,
            Self::Hard => constants::points::HARD,
        }
    }

    /// Returns the category of the question with the given 1-based number
    ///
    /// Numbers past the hard block are treated as hard.
    pub fn for_number(number: usize) -> Self {
        match number.saturating_sub(1) / constants::bank::PER_CATEGORY {
            0 => Self::Easy,
            1 => Self::Medium,
            _ => Self::Hard,
        }
    }

    /// Returns the display label, e.g. `"Easy"`
    pub fn label(self) -> String {
        format!("{self:?}").to_title_case()
    }
}

/// A prompt and its reference answer as supplied by the content author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Entry {
    /// The text read out to the teams
    #[garde(length(chars, min = 1, max = constants::bank::MAX_TEXT_LENGTH))]
    question: String,
    /// The answer shown to the operator, never checked by the game
    #[garde(length(chars, min = 1, max = constants::bank::MAX_TEXT_LENGTH))]
    answer: String,
}

impl Entry {
    /// Creates an entry from a prompt and its reference answer
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Errors raised while loading a question bank
#[derive(Debug, Error)]
pub enum Error {
    /// The document is not a valid bank encoding
    #[error("question bank is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document decoded but breaks a content rule
    #[error("question bank failed validation: {0}")]
    Validation(#[from] garde::Report),
}

/// The immutable content of the board
///
/// Entries are numbered by position, starting at 1. The category (and so the
/// point value) of each question follows from its number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionBank {
    #[garde(length(equal = constants::bank::SIZE), dive)]
    entries: Vec<Entry>,
}

impl QuestionBank {
    /// Builds a bank from entries, checking the content rules
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if there are not exactly 30 entries or
    /// any text is empty or too long.
    pub fn new(entries: Vec<Entry>) -> Result<Self, Error> {
        let bank = Self { entries };
        bank.validate()?;
        Ok(bank)
    }

    /// Loads a bank from a JSON document of the form
    /// `{"entries": [{"question": "...", "answer": "..."}, ...]}`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document cannot be decoded and
    /// [`Error::Validation`] if it breaks a content rule.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let bank: Self = serde_json::from_str(json)?;
        bank.validate()?;
        Ok(bank)
    }

    /// Returns the entries in board order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Produces the board questions, all unanswered
    pub fn to_questions(&self) -> Vec<Question> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Question::new(index + 1, entry))
            .collect_vec()
    }
}

impl Default for QuestionBank {
    /// The built-in Bible trivia bank
    fn default() -> Self {
        Self {
            entries: BUILT_IN
                .iter()
                .map(|(question, answer)| Entry::new(*question, *answer))
                .collect_vec(),
        }
    }
}

/// A question on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Position on the board, 1 to 30
    number: usize,
    category: Category,
    question: String,
    answer: String,
    /// Set once, when the question is resolved with a correct answer
    answered: bool,
}

impl Question {
    fn new(number: usize, entry: &Entry) -> Self {
        Self {
            number,
            category: Category::for_number(number),
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            answered: false,
        }
    }

    /// Returns the board number
    pub fn number(&self) -> usize {
        self.number
    }

    /// Returns the difficulty category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the full point value
    pub fn points(&self) -> u32 {
        self.category.points()
    }

    /// Returns the prompt text
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Returns the operator's reference answer
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns whether the question has been answered correctly
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub(crate) fn mark_answered(&mut self) {
        self.answered = true;
    }
}

const BUILT_IN: [(&str, &str); constants::bank::SIZE] = [
    ("Who built the ark?", "Noah"),
    ("What is the first book of the Bible?", "Genesis"),
    (
        "How many days did God take to create the world?",
        "6 days (rested on the 7th)",
    ),
    ("Who was swallowed by a big fish?", "Jonah"),
    (
        "What is the shortest verse in the Bible?",
        "Jesus wept (John 11:35)",
    ),
    ("What did Jesus turn water into at the wedding?", "Wine"),
    (
        "What was the name of the garden where Adam and Eve lived?",
        "The Garden of Eden",
    ),
    ("Who killed Goliath?", "David"),
    ("How many disciples did Jesus have?", "12"),
    ("What is the symbol of God's promise to Noah?", "A rainbow"),
    (
        "Which two people in the Bible never died?",
        "Enoch and Elijah",
    ),
    (
        "What did God use to speak to Moses in the wilderness?",
        "A burning bush",
    ),
    (
        "What did Jesus feed 5,000 people with?",
        "5 loaves and 2 fish",
    ),
    ("Who was the first king of Israel?", "Saul"),
    ("Which apostle walked on water with Jesus?", "Peter"),
    (
        "What fruit did Eve eat in the garden?",
        "The Bible doesn't specify, it just says 'fruit.'",
    ),
    ("How many books are in the New Testament?", "27"),
    ("What was Paul's name before he became a Christian?", "Saul"),
    ("Who was thrown into a lion's den?", "Daniel"),
    ("What is the last book of the Bible?", "Revelation"),
    ("Who was the left-handed judge who killed Eglon?", "Ehud"),
    ("What is the longest chapter in the Bible?", "Psalm 119"),
    (
        "Which prophet saw a vision of a valley of dry bones?",
        "Ezekiel",
    ),
    ("What was the occupation of Luke?", "Doctor/Physician"),
    ("How many people were saved on Noah's Ark?", "8"),
    (
        "In what language was most of the Old Testament written?",
        "Hebrew",
    ),
    ("Who interpreted Pharaoh's dreams in Egypt?", "Joseph"),
    ("Which king saw the writing on the wall?", "King Belshazzar"),
    (
        "What city did Jonah try to flee to instead of going to Nineveh?",
        "Tarshish",
    ),
    (
        "What was the name of the mountain where Moses received the Ten Commandments?",
        "Mount Sinai",
    ),
];
