use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const TOKEN_HEADER: &str = "x-project-token";
pub const LOCALE_HEADER: &str = "x-locale";

pub const PROJECT_NOT_FOUND: u16 = 4040;
pub const LANGUAGE_NOT_FOUND: u16 = 4041;
pub const TRANSLATION_NOT_FOUND: u16 = 4042;
pub const TRANSLATION_EXISTS: u16 = 4090;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    ClientStatic,
    ServerStatic,
    ServerDynamic,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub meta: Meta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meta {
    pub success: bool,
    #[serde(rename = "customStatusCode")]
    pub custom_status_code: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Data {
    pub body: Body,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Body {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<BTreeMap<String, String>>,
}

/// Project token, supported languages and initial contents of the service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub token: String,
    pub languages: Vec<String>,
    pub seed: Vec<(Source, String, String, String)>,
}

impl ServiceConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            languages: vec!["en".to_string(), "de".to_string(), "fr".to_string()],
            seed: Vec::new(),
        }
    }

    pub fn with_translation(mut self, source: Source, language: &str, key: &str, value: &str) -> Self {
        self.seed
            .push((source, language.to_string(), key.to_string(), value.to_string()));
        self
    }
}

/// Keyed by (store, language, translation key).
pub type Db = Arc<RwLock<HashMap<(Source, String, String), String>>>;

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    languages: Arc<[String]>,
    db: Db,
}

#[derive(Deserialize)]
pub struct ShowQuery {
    #[serde(rename = "type")]
    pub source: Source,
    pub translation_key: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub source: Source,
}

#[derive(Deserialize)]
pub struct WriteForm {
    pub translation_key: String,
    pub translation_value: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(rename = "type")]
    pub source: Source,
}

#[derive(Deserialize)]
pub struct DeleteForm {
    pub translation_key: String,
    #[serde(rename = "type")]
    pub source: Source,
}

fn default_language() -> String {
    "en".to_string()
}

type Reply = (StatusCode, Json<Envelope>);

fn ok(status: StatusCode, body: Body) -> Reply {
    let envelope = Envelope {
        meta: Meta {
            success: true,
            custom_status_code: status.as_u16(),
        },
        data: Some(Data { body }),
    };
    (status, Json(envelope))
}

/// Failures still carry an empty `data.body`, like the real service.
fn fail(status: StatusCode, code: u16) -> Reply {
    let envelope = Envelope {
        meta: Meta {
            success: false,
            custom_status_code: code,
        },
        data: Some(Data {
            body: Body::default(),
        }),
    };
    (status, Json(envelope))
}

pub fn app(config: ServiceConfig) -> Router {
    let db: Db = Arc::new(RwLock::new(
        config
            .seed
            .into_iter()
            .map(|(source, language, key, value)| ((source, language, key), value))
            .collect(),
    ));
    let state = AppState {
        token: config.token.into(),
        languages: config.languages.into(),
        db,
    };
    Router::new()
        .route("/v1/translate", get(list_translations))
        .route("/v1/translate/show", get(show_translation))
        .route("/v1/translate/create", post(create_translation))
        .route("/v1/translate/update", patch(update_translation))
        .route("/v1/update", post(update_translation))
        .route("/v1/translate/delete", delete(delete_translation))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: ServiceConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

impl AppState {
    fn authorize(&self, headers: &HeaderMap) -> Result<(), Reply> {
        let token = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok());
        if token == Some(&*self.token) {
            Ok(())
        } else {
            Err(fail(StatusCode::NOT_FOUND, PROJECT_NOT_FOUND))
        }
    }

    fn check_language(&self, language: &str) -> Result<(), Reply> {
        if self.languages.iter().any(|l| l == language) {
            Ok(())
        } else {
            Err(fail(StatusCode::NOT_FOUND, LANGUAGE_NOT_FOUND))
        }
    }
}

/// `x-locale` looks like `de_EN`; the language is the part before `_`.
fn locale_language(headers: &HeaderMap) -> String {
    headers
        .get(LOCALE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split('_').next())
        .filter(|v| !v.is_empty())
        .map_or_else(default_language, str::to_string)
}

async fn show_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ShowQuery>,
) -> Reply {
    if let Err(reply) = state.authorize(&headers).and_then(|_| state.check_language(&query.language)) {
        return reply;
    }
    debug!(key = %query.translation_key, language = %query.language, "show");
    let db = state.db.read().await;
    match db.get(&(query.source, query.language, query.translation_key)) {
        Some(value) => ok(
            StatusCode::OK,
            Body {
                translation: Some(value.clone()),
                ..Body::default()
            },
        ),
        None => fail(StatusCode::NOT_FOUND, TRANSLATION_NOT_FOUND),
    }
}

async fn list_translations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Reply {
    let language = locale_language(&headers);
    if let Err(reply) = state.authorize(&headers).and_then(|_| state.check_language(&language)) {
        return reply;
    }
    debug!(source = ?query.source, %language, "list");
    let db = state.db.read().await;
    let translations = db
        .iter()
        .filter(|((source, lang, _), _)| *source == query.source && *lang == language)
        .map(|((_, _, key), value)| (key.clone(), value.clone()))
        .collect();
    ok(
        StatusCode::OK,
        Body {
            translations: Some(translations),
            ..Body::default()
        },
    )
}

async fn create_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<WriteForm>,
) -> Reply {
    if let Err(reply) = state.authorize(&headers).and_then(|_| state.check_language(&form.language)) {
        return reply;
    }
    debug!(key = %form.translation_key, "create");
    let mut db = state.db.write().await;
    let id = (form.source, form.language, form.translation_key);
    if db.contains_key(&id) {
        return fail(StatusCode::CONFLICT, TRANSLATION_EXISTS);
    }
    db.insert(id, form.translation_value.clone());
    ok(
        StatusCode::CREATED,
        Body {
            translation: Some(form.translation_value),
            ..Body::default()
        },
    )
}

async fn update_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<WriteForm>,
) -> Reply {
    if let Err(reply) = state.authorize(&headers).and_then(|_| state.check_language(&form.language)) {
        return reply;
    }
    debug!(key = %form.translation_key, "update");
    let mut db = state.db.write().await;
    match db.get_mut(&(form.source, form.language, form.translation_key)) {
        Some(value) => {
            *value = form.translation_value.clone();
            ok(
                StatusCode::OK,
                Body {
                    translation: Some(form.translation_value),
                    ..Body::default()
                },
            )
        }
        None => fail(StatusCode::NOT_FOUND, TRANSLATION_NOT_FOUND),
    }
}

/// Removes the key in every language of the given store.
async fn delete_translation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<DeleteForm>,
) -> Reply {
    if let Err(reply) = state.authorize(&headers) {
        return reply;
    }
    debug!(key = %form.translation_key, "delete");
    let mut db = state.db.write().await;
    let before = db.len();
    db.retain(|(source, _, key), _| !(*source == form.source && *key == form.translation_key));
    if db.len() < before {
        ok(StatusCode::OK, Body::default())
    } else {
        fail(StatusCode::NOT_FOUND, TRANSLATION_NOT_FOUND)
    }
}
