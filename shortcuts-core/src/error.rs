use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    #[error("mismatched control flow: `{action}` at action {position}: {reason}")]
    MalformedControlFlow {
        action: String,
        position: usize,
        reason: String,
    },

    #[error("malformed variable reference in field `{field}` of action `{action}`: {source}")]
    MalformedVariableReference {
        action: String,
        field: String,
        source: TokenError,
    },

    #[error("action `{action}` is missing required field `{field}`")]
    MissingField { action: String, field: String },

    #[error("field `{field}` of action `{action}`: {reason}")]
    InvalidField {
        action: String,
        field: String,
        reason: String,
    },

    #[error("invalid property list document: {0}")]
    InvalidDocument(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("text contains an unbalanced variable reference")]
    UnbalancedBraces,

    #[error("variable reference has an empty name")]
    EmptyName,

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
