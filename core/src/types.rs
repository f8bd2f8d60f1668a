//! Domain types and wire DTOs for the translation service.
//!
//! # Design
//! `Envelope` reads the service's `{meta, data}` JSON field by field: any
//! piece may be missing or oddly typed, and the protocol code in `api`
//! decides what that means. The mock-server crate defines its own typed
//! copies; integration tests catch schema drift.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Language used when the caller does not pick one. Mutations accept only this.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Which store a translation lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Strings bundled with the client application.
    ClientStatic,
    /// Strings bundled with the server application.
    #[default]
    ServerStatic,
    /// User-editable strings; the only store mutations touch.
    ServerDynamic,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ClientStatic => "client_static",
            Source::ServerStatic => "server_static",
            Source::ServerDynamic => "server_dynamic",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to fetch: a key, in a language, from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub key: String,
    pub language: String,
    pub source: Source,
}

impl TranslationRequest {
    /// A request for `key` in `en` from the server static store.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            source: Source::default(),
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }
}

/// Result of a fetch that reached the service and was not rejected by it.
///
/// `Unparsable` and `Missing` are separate on purpose: the first means the
/// body could not be read as an envelope at all, the second means the service
/// answered but had nothing to hand back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Missing,
    Unparsable,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing | Lookup::Unparsable => None,
        }
    }
}

/// The `{meta, data}` wrapper around every service payload.
///
/// Held as a raw JSON value and read field by field, so a body whose payload
/// has an unexpected shape still reports its `meta` failure. PHP backends
/// send `[]` for an empty map and numeric strings for codes; both are
/// accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope(Value);

impl Envelope {
    /// `None` only when `body` is not JSON at all.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok().map(Envelope)
    }

    /// `Some(code)` when `meta.success` is explicitly false.
    pub fn failure(&self) -> Option<Option<i64>> {
        let meta = self.0.get("meta")?;
        if meta.get("success") != Some(&Value::Bool(false)) {
            return None;
        }
        Some(meta.get("customStatusCode").and_then(as_code))
    }

    /// `data.body.translation` when it is a string or a number.
    pub fn translation(&self) -> Option<String> {
        self.body()?.get("translation").and_then(as_text)
    }

    /// `data.body.translations` as a key → text map. Null entries are
    /// dropped; an empty array counts as an empty map.
    pub fn translations(&self) -> Option<BTreeMap<String, String>> {
        match self.body()?.get("translations")? {
            Value::Object(map) => Some(
                map.iter()
                    .filter_map(|(key, value)| as_text(value).map(|text| (key.clone(), text)))
                    .collect(),
            ),
            Value::Array(items) if items.is_empty() => Some(BTreeMap::new()),
            _ => None,
        }
    }

    fn body(&self) -> Option<&Value> {
        self.0.get("data")?.get("body")
    }
}

fn as_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> Envelope {
        Envelope::parse(body).unwrap()
    }

    #[test]
    fn source_wire_names() {
        assert_eq!(serde_json::to_value(Source::ClientStatic).unwrap(), "client_static");
        assert_eq!(serde_json::to_value(Source::ServerStatic).unwrap(), "server_static");
        assert_eq!(serde_json::to_value(Source::ServerDynamic).unwrap(), "server_dynamic");
        assert_eq!(Source::ServerDynamic.to_string(), "server_dynamic");
    }

    #[test]
    fn request_defaults_to_english_server_static() {
        let req = TranslationRequest::new("greeting");
        assert_eq!(req.language, "en");
        assert_eq!(req.source, Source::ServerStatic);

        let req = req.language("de").source(Source::ClientStatic);
        assert_eq!(req.language, "de");
        assert_eq!(req.source, Source::ClientStatic);
    }

    #[test]
    fn only_valid_json_parses() {
        assert!(Envelope::parse("<html>").is_none());
        assert!(Envelope::parse("").is_none());
        assert!(Envelope::parse("null").is_some());
        assert!(Envelope::parse("[]").is_some());
    }

    #[test]
    fn meta_without_success_counts_as_success() {
        assert!(envelope(r#"{"meta":{"customStatusCode":200}}"#).failure().is_none());
        assert!(envelope(r#"{"meta":{"success":true}}"#).failure().is_none());
        assert!(envelope("[]").failure().is_none());
    }

    #[test]
    fn failure_carries_sub_code() {
        let env = envelope(r#"{"meta":{"success":false,"customStatusCode":4042}}"#);
        assert_eq!(env.failure(), Some(Some(4042)));

        let env = envelope(r#"{"meta":{"success":false,"customStatusCode":"4041"}}"#);
        assert_eq!(env.failure(), Some(Some(4041)));

        let env = envelope(r#"{"meta":{"success":false,"customStatusCode":"oops"}}"#);
        assert_eq!(env.failure(), Some(None));

        let env = envelope(r#"{"meta":{"success":false}}"#);
        assert_eq!(env.failure(), Some(None));
    }

    #[test]
    fn failure_survives_odd_payload() {
        let env = envelope(
            r#"{"meta":{"success":false,"customStatusCode":4042},"data":{"body":{"translation":false,"translations":[]}}}"#,
        );
        assert_eq!(env.failure(), Some(Some(4042)));
        assert_eq!(env.translation(), None);
    }

    #[test]
    fn translation_is_optional_at_every_level() {
        assert_eq!(envelope("{}").translation(), None);
        assert_eq!(envelope(r#"{"data":{}}"#).translation(), None);
        assert_eq!(envelope(r#"{"data":{"body":[]}}"#).translation(), None);
        assert_eq!(envelope(r#"{"data":{"body":{"translation":null}}}"#).translation(), None);
        assert_eq!(
            envelope(r#"{"data":{"body":{"translation":"Hallo"}}}"#).translation().as_deref(),
            Some("Hallo")
        );
    }

    #[test]
    fn translations_tolerate_php_shapes() {
        let map = envelope(r#"{"data":{"body":{"translations":[]}}}"#).translations().unwrap();
        assert!(map.is_empty());

        let map = envelope(r#"{"data":{"body":{"translations":{"a":"A","n":null,"count":3}}}}"#)
            .translations()
            .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], "A");
        assert_eq!(map["count"], "3");

        assert!(envelope(r#"{"data":{"body":{"translations":["x"]}}}"#).translations().is_none());
    }

    #[test]
    fn lookup_found_extracts_value() {
        assert_eq!(Lookup::Found("x").found(), Some("x"));
        assert_eq!(Lookup::<&str>::Missing.found(), None);
        assert_eq!(Lookup::<&str>::Unparsable.found(), None);
    }
}
