//! Error types for the translation service client.
//!
//! # Design
//! Three sub-codes reported inside the response envelope get dedicated
//! variants because callers routinely branch on "which thing was not found."
//! Any other envelope failure lands in `ServiceError` with the raw code.
//! Transport failures are split per operation so a caller that batches
//! mutations can tell which one broke. An unparsable response body is not an
//! error at all; see `Lookup::Unparsable`.

use thiserror::Error;

/// Sub-code for an unknown project token.
pub const PROJECT_NOT_FOUND_CODE: i64 = 4040;
/// Sub-code for a language the project does not carry.
pub const LANGUAGE_NOT_FOUND_CODE: i64 = 4041;
/// Sub-code for a key with no translation in the requested store.
pub const TRANSLATION_NOT_FOUND_CODE: i64 = 4042;

/// Problems with the client configuration, detected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is missing or empty")]
    Missing(&'static str),
}

/// Errors returned by `TranslationApi` and `TranslationClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Mutations only accept `en`. Raised before any request is built.
    #[error("unsupported language {language:?}: mutations accept \"en\" only")]
    UnsupportedLanguage { language: String },

    #[error("project not found")]
    ProjectNotFound,

    #[error("language not found")]
    LanguageNotFound,

    #[error("translation not found")]
    TranslationNotFound,

    /// The envelope reported `success: false` without a mapped sub-code.
    #[error("translation service error (code {code:?})")]
    ServiceError { code: Option<i64> },

    #[error("translation request failed: {0}")]
    RequestFailed(String),

    #[error("translation create failed: {0}")]
    CreateFailed(String),

    #[error("translation update failed: {0}")]
    UpdateFailed(String),

    #[error("translation delete failed: {0}")]
    DeleteFailed(String),

    /// The request parameters could not be form/query encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Map an envelope sub-code to its typed error, if it has one.
    pub fn from_sub_code(code: i64) -> Option<Self> {
        match code {
            PROJECT_NOT_FOUND_CODE => Some(ApiError::ProjectNotFound),
            LANGUAGE_NOT_FOUND_CODE => Some(ApiError::LanguageNotFound),
            TRANSLATION_NOT_FOUND_CODE => Some(ApiError::TranslationNotFound),
            _ => None,
        }
    }

    /// The service sub-code behind this error.
    pub fn sub_code(&self) -> Option<i64> {
        match self {
            ApiError::ProjectNotFound => Some(PROJECT_NOT_FOUND_CODE),
            ApiError::LanguageNotFound => Some(LANGUAGE_NOT_FOUND_CODE),
            ApiError::TranslationNotFound => Some(TRANSLATION_NOT_FOUND_CODE),
            ApiError::ServiceError { code } => *code,
            _ => None,
        }
    }
}
