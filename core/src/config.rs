//! Client configuration.
//!
//! Read once when a client is constructed and never consulted from process
//! state again.

use crate::error::ConfigError;

pub const ENDPOINT_ENV: &str = "TRANSLATION_SERVICE_ENDPOINT";
pub const TOKEN_ENV: &str = "TRANSLATION_SERVICE_TOKEN";

/// What to do when the envelope reports failure with a sub-code that has no
/// typed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedCodePolicy {
    /// Raise `ApiError::ServiceError` carrying the code.
    #[default]
    Fail,
    /// Log a warning and keep interpreting the response as if `meta` had not
    /// reported failure.
    PassThrough,
}

/// Which endpoint receives translation updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRoute {
    /// `PATCH /v1/translate/update`
    #[default]
    Translate,
    /// `POST /v1/update`
    #[deprecated(note = "use UpdateRoute::Translate (PATCH /v1/translate/update)")]
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: String,
    pub token: String,
    pub unmapped_code_policy: UnmappedCodePolicy,
    pub update_route: UpdateRoute,
}

impl Config {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.into(),
            unmapped_code_policy: UnmappedCodePolicy::default(),
            update_route: UpdateRoute::default(),
        }
    }

    /// Load `TRANSLATION_SERVICE_ENDPOINT` and `TRANSLATION_SERVICE_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` over an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let endpoint = require(ENDPOINT_ENV)?;
        let token = require(TOKEN_ENV)?;
        Ok(Self::new(endpoint, token))
    }

    pub fn with_unmapped_code_policy(mut self, policy: UnmappedCodePolicy) -> Self {
        self.unmapped_code_policy = policy;
        self
    }

    pub fn with_update_route(mut self, route: UpdateRoute) -> Self {
        self.update_route = route;
        self
    }
}
