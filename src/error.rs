// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for pi-provision

use thiserror::Error;

/// Result type alias for pi-provision operations
pub type Result<T> = std::result::Result<T, SetupError>;

/// Errors that can occur while running the wizard or the derivation pipeline
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The prompt input stream ended before the questionnaire completed
    #[error("Prompt input closed before the questionnaire completed")]
    PromptClosed,

    /// A reply to a choice prompt did not name one of the options
    #[error("'{reply}' is not one of the offered choices")]
    InvalidSelection { reply: String },

    /// An accepted reply could not be coerced to the question's value kind
    #[error("Answer to '{key}' is not a valid {kind}: {input}")]
    BadAnswer {
        key: String,
        kind: String,
        input: String,
    },

    /// A derivation stage needed an answer that was never collected
    #[error("No answer recorded for '{key}'")]
    MissingAnswer { key: String },

    /// Keypair generation failed
    #[error("Key generation for '{comment}' failed: {message}")]
    KeygenFailed { comment: String, message: String },

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
