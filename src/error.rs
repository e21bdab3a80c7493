//! Error types for Handi.jobs

use thiserror::Error;

use crate::validation::ValidationResult;

#[derive(Error, Debug)]
pub enum Error {
    /// Login mismatch. The message never says whether the email exists.
    #[error("Email ou mot de passe incorrect")]
    InvalidCredentials,

    #[error("Un compte existe déjà avec l'email {0}")]
    DuplicateAccount(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("No token to refresh")]
    NoTokenToRefresh,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationResult),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'handijobs init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Invalid and expired tokens are handled the same way by callers.
    pub fn is_token_error(&self) -> bool {
        matches!(self, Error::InvalidToken(_) | Error::TokenExpired)
    }
}

impl From<ValidationResult> for Error {
    fn from(result: ValidationResult) -> Self {
        Error::Validation(result)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
