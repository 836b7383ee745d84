use thiserror::Error;

use crate::model::{Category, PlayerId, Variant};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown game variant: {0:?}")]
    InvalidVariant(String),
    #[error("{variant} expects {min}..={max} dice, got {actual}")]
    InvalidDiceCount { variant: Variant, min: usize, max: usize, actual: usize },
    #[error("die face {0} is outside 1..=6")]
    InvalidDieFace(u8),
    #[error("die index {index} is out of range for {dice} dice")]
    InvalidDieIndex { index: usize, dice: usize },
    #[error("player {player} has already scored {category}")]
    CategoryAlreadyScored { player: PlayerId, category: Category },
    #[error("unknown scoring category: {0:?}")]
    UnknownCategory(String),
    #[error("no player at seat {0}")]
    UnknownPlayer(PlayerId),
    #[error("board already seats the maximum of {max} players")]
    TooManyPlayers { max: usize },
    #[error("game is already over")]
    GameOver,
    #[error("no round is running")]
    RoundNotRunning,
    #[error("{action} is not a {variant} action")]
    UnsupportedAction { variant: Variant, action: &'static str },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
