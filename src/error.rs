use thiserror::Error;

/// Rule violations raised by the grader, the status mapper and the edit gate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProdeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown match status: {0}")]
    UnknownStatus(String),

    #[error("Match {0} is not finished")]
    MatchNotFinished(String),

    #[error("Predictions for match {0} are locked")]
    PredictionLocked(String),

    #[error("Scoring system of group {0} can no longer be changed")]
    ScoringLocked(String),

    #[error("Role {0} is not allowed to {1}")]
    Forbidden(String, &'static str),
}

/// Failures while establishing a session
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Auth request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Auth endpoint returned {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
