use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("A deck must have 52 cards, got {0}")]
    DeckSize(usize),
    #[error("Invalid card '{0}'")]
    InvalidCard(String),
    #[error("Invalid rank '{0}'")]
    InvalidRank(String),
    #[error("Goal of {goal} is already reached with {achieved}")]
    GoalAlreadyReached { goal: u32, achieved: u32 },
    #[error("Illegal action at step {step}: {reason}")]
    IllegalAction { step: usize, reason: String },
}
