use std::fmt;

#[derive(Debug)]
pub enum AppError {
    InvalidCredentials,
    NotAuthenticated,
    NotFound(String),
    FetchFailure(String),
    MalformedStoredState(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::NotAuthenticated => write!(f, "Not authenticated"),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::FetchFailure(msg) => write!(f, "Fetch failure: {}", msg),
            AppError::MalformedStoredState(msg) => write!(f, "Malformed stored state: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
