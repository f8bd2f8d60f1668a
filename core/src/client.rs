//! Blocking translation service client.
//!
//! # Design
//! `TranslationClient` pairs a `TranslationApi` with one `Transport` handle
//! and runs build → execute → parse for each operation. It holds no mutable
//! state of its own, so sharing it across threads is safe whenever the
//! transport is (`UreqTransport` is `Send + Sync`).

use std::collections::BTreeMap;

use crate::api::TranslationApi;
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::transport::UreqTransport;
use crate::types::{Lookup, Source, TranslationRequest};

#[derive(Debug, Clone)]
pub struct TranslationClient<T = UreqTransport> {
    api: TranslationApi,
    transport: T,
}

impl TranslationClient<UreqTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Build a client from `TRANSLATION_SERVICE_ENDPOINT` and
    /// `TRANSLATION_SERVICE_TOKEN`.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(Config::from_env()?))
    }
}

impl<T: Transport> TranslationClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            api: TranslationApi::new(&config),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one translation. Sub-codes 4040/4041/4042 surface as
    /// `ProjectNotFound`, `LanguageNotFound` and `TranslationNotFound`.
    pub fn fetch_one(&self, request: &TranslationRequest) -> Result<Lookup<String>, ApiError> {
        let req = self.api.build_fetch_one(request)?;
        let response = self.execute(&req).map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        self.api.parse_fetch_one(response)
    }

    /// Fetch every translation in `source` for `language`.
    pub fn fetch_all(
        &self,
        source: Source,
        language: &str,
    ) -> Result<Lookup<BTreeMap<String, String>>, ApiError> {
        let req = self.api.build_fetch_all(source, language)?;
        let response = self.execute(&req).map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        self.api.parse_fetch_all(response)
    }

    pub fn create(&self, key: &str, value: &str, language: &str) -> Result<bool, ApiError> {
        let req = self.api.build_create(key, value, language)?;
        let response = self.execute(&req).map_err(|e| ApiError::CreateFailed(e.to_string()))?;
        Ok(self.api.parse_mutation(response))
    }

    pub fn update(&self, key: &str, value: &str, language: &str) -> Result<bool, ApiError> {
        let req = self.api.build_update(key, value, language)?;
        let response = self.execute(&req).map_err(|e| ApiError::UpdateFailed(e.to_string()))?;
        Ok(self.api.parse_mutation(response))
    }

    pub fn delete(&self, key: &str, language: &str) -> Result<bool, ApiError> {
        let req = self.api.build_delete(key, language)?;
        let response = self.execute(&req).map_err(|e| ApiError::DeleteFailed(e.to_string()))?;
        Ok(self.api.parse_mutation(response))
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.transport.execute(request)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned responses and records every request it was handed.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn reply(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }

        fn fail(self) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(TransportError("connection refused".to_string())));
            self
        }

        fn calls(&self) -> usize {
            self.seen.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
        }
    }

    fn client(transport: ScriptedTransport) -> TranslationClient<ScriptedTransport> {
        TranslationClient::with_transport(Config::new("http://svc", "tok"), transport)
    }

    #[test]
    fn non_english_mutations_never_reach_transport() {
        let c = client(ScriptedTransport::default());
        assert!(matches!(c.create("k", "v", "fr"), Err(ApiError::UnsupportedLanguage { .. })));
        assert!(matches!(c.update("k", "v", "de"), Err(ApiError::UnsupportedLanguage { .. })));
        assert!(matches!(c.delete("k", "es"), Err(ApiError::UnsupportedLanguage { .. })));
        assert_eq!(c.transport().calls(), 0);
    }

    #[test]
    fn fetch_one_returns_translation() {
        let c = client(ScriptedTransport::default().reply(
            200,
            r#"{"meta":{"success":true,"customStatusCode":200},"data":{"body":{"translation":"Bonjour"}}}"#,
        ));
        let req = TranslationRequest::new("hello").language("fr");
        assert_eq!(c.fetch_one(&req).unwrap(), Lookup::Found("Bonjour".to_string()));

        let seen = c.transport().seen.borrow();
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].header("x-project-token"), Some("tok"));
    }

    #[test]
    fn fetch_one_translation_not_found() {
        let c = client(
            ScriptedTransport::default()
                .reply(404, r#"{"meta":{"success":false,"customStatusCode":4042}}"#),
        );
        let err = c.fetch_one(&TranslationRequest::new("nope")).unwrap_err();
        assert!(matches!(err, ApiError::TranslationNotFound));
    }

    #[test]
    fn fetch_transport_failure_is_request_failed() {
        let c = client(ScriptedTransport::default().fail().fail());
        assert!(matches!(
            c.fetch_one(&TranslationRequest::new("k")),
            Err(ApiError::RequestFailed(_))
        ));
        assert!(matches!(
            c.fetch_all(Source::ServerStatic, "en"),
            Err(ApiError::RequestFailed(_))
        ));
    }

    #[test]
    fn mutation_transport_failures_are_operation_specific() {
        let c = client(ScriptedTransport::default().fail().fail().fail());
        assert!(matches!(c.create("k", "v", "en"), Err(ApiError::CreateFailed(_))));
        assert!(matches!(c.update("k", "v", "en"), Err(ApiError::UpdateFailed(_))));
        assert!(matches!(c.delete("k", "en"), Err(ApiError::DeleteFailed(_))));
        assert_eq!(c.transport().calls(), 3);
    }

    #[test]
    fn mutation_reports_status_outcome() {
        let c = client(ScriptedTransport::default().reply(201, "").reply(422, "{}"));
        assert!(c.create("k", "v", "en").unwrap());
        assert!(!c.update("k", "v", "en").unwrap());
    }

    #[test]
    fn fetch_all_passes_mapping_through() {
        let c = client(ScriptedTransport::default().reply(
            200,
            r#"{"data":{"body":{"translations":{"Greeting.Hello":"Hello","farewell":"Bye"}}}}"#,
        ));
        let map = c.fetch_all(Source::ClientStatic, "en").unwrap().found().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["Greeting.Hello"], "Hello");
        assert_eq!(map["farewell"], "Bye");
        assert_eq!(c.transport().seen.borrow()[0].header("x-locale"), Some("en_EN"));
    }
}
