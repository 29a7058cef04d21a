use thiserror::Error;

use crate::domain::Collection;

#[derive(Error, Debug)]
pub enum BriefError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Ignoring invalid {collection} ID: {token}")]
    Selection { collection: Collection, token: String },

    #[error("Already have {collection}: {uri}")]
    DuplicateKey { collection: Collection, uri: String },

    #[error("No {collection} found with ID {id}")]
    UnknownIdentifier { collection: Collection, id: i64 },

    #[error("{0}")]
    External(String),

    #[error("Invalid speed value: {0}. Please enter a positive number.")]
    InvalidSpeed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Coarse classification used by the shell to decide how loudly to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Parse,
    DuplicateKey,
    UnknownIdentifier,
    External,
    Storage,
    Usage,
}

impl BriefError {
    pub fn class(&self) -> ErrorClass {
        match self {
            BriefError::Selection { .. } => ErrorClass::Parse,
            BriefError::DuplicateKey { .. } => ErrorClass::DuplicateKey,
            BriefError::UnknownIdentifier { .. } => ErrorClass::UnknownIdentifier,
            BriefError::Http(_) | BriefError::FeedParse(_) | BriefError::External(_) => {
                ErrorClass::External
            }
            BriefError::Database(_)
            | BriefError::Migration(_)
            | BriefError::Io(_)
            | BriefError::Json(_)
            | BriefError::Storage(_) => ErrorClass::Storage,
            BriefError::InvalidUrl(_) | BriefError::InvalidSpeed(_) | BriefError::Config(_) => {
                ErrorClass::Usage
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BriefError>;
