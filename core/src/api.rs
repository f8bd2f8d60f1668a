//! Stateless request builder and envelope interpreter for the translation API.
//!
//! # Design
//! `TranslationApi` holds only what it was configured with and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the round-trip in between.
//!
//! Fetch responses go through the envelope protocol:
//! 1. parse the body as JSON; a body that is not JSON is not an error,
//! 2. `meta.success == false` maps the sub-code to a typed error regardless of
//!    the HTTP status or the shape of `data` (unmapped codes follow
//!    `UnmappedCodePolicy`),
//! 3. a status outside `[200, 400)` yields `Lookup::Missing`,
//! 4. a body that was not JSON yields `Lookup::Unparsable`,
//! 5. otherwise the requested field of `data.body`, or `Lookup::Missing`.
//!
//! Mutations only look at the HTTP status.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{Config, UnmappedCodePolicy, UpdateRoute};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Envelope, Lookup, Source, TranslationRequest, DEFAULT_LANGUAGE};

/// Sent on every request. Older service versions read `x-api-token`.
pub const TOKEN_HEADER: &str = "x-project-token";
pub const LOCALE_HEADER: &str = "x-locale";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct TranslationApi {
    base_url: String,
    token: String,
    unmapped_code_policy: UnmappedCodePolicy,
    update_route: UpdateRoute,
}

impl TranslationApi {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.endpoint.clone(),
            token: config.token.clone(),
            unmapped_code_policy: config.unmapped_code_policy,
            update_route: config.update_route,
        }
    }

    pub fn build_fetch_one(&self, request: &TranslationRequest) -> Result<HttpRequest, ApiError> {
        let query = encode(&[
            ("type", request.source.as_str()),
            ("translation_key", request.key.as_str()),
            ("language", request.language.as_str()),
        ])?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/v1/translate/show?{query}", self.base_url),
            headers: vec![self.token_header()],
            body: None,
        })
    }

    /// The locale header is `{language}_EN` verbatim; the service expects
    /// that shape and nothing validates it here.
    pub fn build_fetch_all(&self, source: Source, language: &str) -> Result<HttpRequest, ApiError> {
        let query = encode(&[("type", source.as_str())])?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/v1/translate?{query}", self.base_url),
            headers: vec![
                self.token_header(),
                (LOCALE_HEADER.to_string(), format!("{language}_EN")),
            ],
            body: None,
        })
    }

    pub fn build_create(&self, key: &str, value: &str, language: &str) -> Result<HttpRequest, ApiError> {
        ensure_mutable_language(language)?;
        let form = encode(&[
            ("translation_key", key),
            ("translation_value", value),
            ("language", language),
            ("type", Source::ServerDynamic.as_str()),
        ])?;
        Ok(self.form_request(HttpMethod::Post, "/v1/translate/create", form))
    }

    #[allow(deprecated)]
    pub fn build_update(&self, key: &str, value: &str, language: &str) -> Result<HttpRequest, ApiError> {
        ensure_mutable_language(language)?;
        let form = encode(&[
            ("translation_key", key),
            ("translation_value", value),
            ("language", language),
            ("type", Source::ServerDynamic.as_str()),
        ])?;
        let (method, path) = match self.update_route {
            UpdateRoute::Translate => (HttpMethod::Patch, "/v1/translate/update"),
            UpdateRoute::Legacy => (HttpMethod::Post, "/v1/update"),
        };
        Ok(self.form_request(method, path, form))
    }

    pub fn build_delete(&self, key: &str, language: &str) -> Result<HttpRequest, ApiError> {
        ensure_mutable_language(language)?;
        let form = encode(&[
            ("translation_key", key),
            ("type", Source::ServerDynamic.as_str()),
        ])?;
        Ok(self.form_request(HttpMethod::Delete, "/v1/translate/delete", form))
    }

    pub fn parse_fetch_one(&self, response: HttpResponse) -> Result<Lookup<String>, ApiError> {
        let envelope = decode(&response);
        if let Some(env) = &envelope {
            if let Some(code) = env.failure() {
                self.check_failure(code)?;
            }
        }
        Ok(extract(&response, envelope, Envelope::translation))
    }

    /// Any envelope failure is a `ServiceError` here; bulk fetches do not
    /// discriminate sub-codes.
    pub fn parse_fetch_all(
        &self,
        response: HttpResponse,
    ) -> Result<Lookup<BTreeMap<String, String>>, ApiError> {
        let envelope = decode(&response);
        if let Some(code) = envelope.as_ref().and_then(Envelope::failure) {
            warn!(status = response.status, ?code, "bulk translation fetch rejected");
            return Err(ApiError::ServiceError { code });
        }
        Ok(extract(&response, envelope, Envelope::translations))
    }

    /// `true` when the status is in `[200, 400)`.
    pub fn parse_mutation(&self, response: HttpResponse) -> bool {
        let ok = response.is_transport_success();
        debug!(status = response.status, ok, "mutation response");
        ok
    }

    fn check_failure(&self, code: Option<i64>) -> Result<(), ApiError> {
        if let Some(err) = code.and_then(ApiError::from_sub_code) {
            warn!(?code, "translation service reported {err}");
            return Err(err);
        }
        match self.unmapped_code_policy {
            UnmappedCodePolicy::Fail => {
                warn!(?code, "translation service reported an unmapped failure");
                Err(ApiError::ServiceError { code })
            }
            UnmappedCodePolicy::PassThrough => {
                warn!(?code, "ignoring unmapped failure code");
                Ok(())
            }
        }
    }

    fn token_header(&self) -> (String, String) {
        (TOKEN_HEADER.to_string(), self.token.clone())
    }

    fn form_request(&self, method: HttpMethod, path: &str, form: String) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![
                self.token_header(),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(form),
        }
    }
}

fn ensure_mutable_language(language: &str) -> Result<(), ApiError> {
    if language == DEFAULT_LANGUAGE {
        Ok(())
    } else {
        Err(ApiError::UnsupportedLanguage {
            language: language.to_string(),
        })
    }
}

fn encode(params: &[(&str, &str)]) -> Result<String, ApiError> {
    serde_urlencoded::to_string(params).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode(response: &HttpResponse) -> Option<Envelope> {
    let envelope = Envelope::parse(&response.body);
    if envelope.is_none() {
        debug!(status = response.status, "response body is not JSON");
    }
    envelope
}

fn extract<T, F>(response: &HttpResponse, envelope: Option<Envelope>, field: F) -> Lookup<T>
where
    F: FnOnce(&Envelope) -> Option<T>,
{
    if !response.is_transport_success() {
        debug!(status = response.status, "non-success status without failure envelope");
        return Lookup::Missing;
    }
    match envelope {
        None => Lookup::Unparsable,
        Some(env) => field(&env).map_or(Lookup::Missing, Lookup::Found),
    }
}
