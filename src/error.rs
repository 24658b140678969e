use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid card: {0}")]
    InvalidCard(String),

    #[error("invalid hand size: expected {expected}, got {got}")]
    InvalidHandSize { expected: String, got: usize },

    #[error("invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("duplicate card: {0}")]
    DuplicateCard(String),

    #[error("insufficient deck: need {needed} cards, only {available} remain")]
    InsufficientDeck { needed: usize, available: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
