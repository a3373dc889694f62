//! Routes and handlers.
//!
//! | method | path                              |
//! |--------|-----------------------------------|
//! | GET    | `/healthz`                        |
//! | GET    | `/api/corpora`                    |
//! | POST   | `/api/predictions/{corpus}`       |
//! | POST   | `/predictions/english-predidctions/` |
//! | POST   | `/predictions/english-predictions/` |
//! | GET    | `/api/stats`                      |
//! | GET    | `/api/messages?limit=N`           |
//! | POST   | `/api/messages`                   |
//! | GET    | `/api/messages/{id}`              |
//!
//! Both `/predictions/english-*` paths are fixed aliases for
//! `/api/predictions/english`; the first keeps the spelling older clients use.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use smsguard_classify::CorpusSet;
use smsguard_core::{CorpusSummary, MessageStats, PredictionResult, StoredMessage};
use smsguard_store::{DEFAULT_RECENT_LIMIT, DuckStore};
use tracing::{debug, info};

use crate::error::ApiError;

/// Corpus served by the `/predictions/english-*` aliases.
const ALIAS_CORPUS: &str = "english";

/// Shared request state: the frozen corpora and the message store.
#[derive(Clone)]
pub struct AppState {
    corpora: Arc<CorpusSet>,
    store: Arc<Mutex<DuckStore>>,
}

impl AppState {
    pub fn new(corpora: CorpusSet, store: DuckStore) -> Self {
        Self {
            corpora: Arc::new(corpora),
            store: Arc::new(Mutex::new(store)),
        }
    }

    pub fn corpora(&self) -> &CorpusSet {
        &self.corpora
    }

    fn store(&self) -> Result<MutexGuard<'_, DuckStore>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::Internal("message store lock poisoned".into()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz).fallback(method_not_allowed))
        .route("/api/corpora", get(list_corpora).fallback(method_not_allowed))
        .route(
            "/api/predictions/{corpus}",
            post(predict).fallback(method_not_allowed),
        )
        .route(
            "/predictions/english-predidctions/",
            post(alias_predict).fallback(method_not_allowed),
        )
        .route(
            "/predictions/english-predictions/",
            post(alias_predict).fallback(method_not_allowed),
        )
        .route("/api/stats", get(stats).fallback(method_not_allowed))
        .route(
            "/api/messages",
            get(list_messages)
                .post(create_message)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/messages/{id}",
            get(get_message).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateMessageRequest {
    message: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_corpora(State(state): State<AppState>) -> Json<Vec<CorpusSummary>> {
    Json(state.corpora.summaries())
}

async fn predict(
    State(state): State<AppState>,
    Path(corpus): Path<String>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    classify(&state, &corpus, body)
}

async fn alias_predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    classify(&state, ALIAS_CORPUS, body)
}

fn classify(
    state: &AppState,
    corpus: &str,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(req) = body?;
    let message = required(req.message, "message")?;
    let classifier = state
        .corpora
        .get(corpus)
        .ok_or_else(|| ApiError::UnknownCorpus(corpus.to_string()))?;

    let result = classifier.classify(&message);
    debug!(
        corpus,
        prediction = %result.prediction,
        accuracy = result.confidence,
        "classified message"
    );
    Ok(Json(result))
}

async fn stats(State(state): State<AppState>) -> Result<Json<MessageStats>, ApiError> {
    Ok(Json(state.store()?.stats()?))
}

async fn list_messages(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<StoredMessage>>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    Ok(Json(state.store()?.recent_messages(limit)?))
}

async fn get_message(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<StoredMessage>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.store()?.get_message(id)?))
}

async fn create_message(
    State(state): State<AppState>,
    body: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredMessage>), ApiError> {
    let Json(req) = body?;
    let message = required(req.message, "message")?;
    let label = required(req.label, "label")?;

    let stored = state.store()?.create_message(&label, &message)?;
    info!(id = stored.id, label = %stored.label, "message added");
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// A field that must be present and non-empty.
fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use smsguard_classify::CorpusClassifier;
    use smsguard_core::{
        CleanPolicy, CorpusConfig, LabelPair, LabeledRecord, Scale, ScoringMode, SourceConfig,
        StopwordConfig, StopwordSet,
    };
    use tower::ServiceExt;

    fn corpus(name: &str) -> CorpusClassifier {
        let config = CorpusConfig {
            name: name.to_string(),
            source: SourceConfig::Store,
            labels: LabelPair::default(),
            mode: ScoringMode::Multiset,
            scale: Scale::Ratio,
            policy: CleanPolicy::Tokenize,
            stopwords: StopwordConfig::Named(StopwordSet::None),
            allow_empty: false,
        };
        let records = vec![
            LabeledRecord::new("spam", "free prize call now"),
            LabeledRecord::new("ham", "are you coming home now"),
        ];
        CorpusClassifier::build(&config, &records).unwrap()
    }

    fn app() -> Router {
        let mut corpora = CorpusSet::new();
        corpora.insert(corpus("english")).unwrap();
        router(AppState::new(corpora, DuckStore::open().unwrap()))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn healthz_ok() {
        let resp = app()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn predict_returns_prediction_and_accuracy() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json("/api/predictions/english", r#"{"message":"free call"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prediction": "spam", "accuracy": 1.0}));
    }

    #[tokio::test]
    async fn predict_tie_is_unknown() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json("/api/predictions/english", r#"{"message":"now"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"prediction": "unknown", "accuracy": 0.0}));
    }

    #[tokio::test]
    async fn english_aliases_use_english_corpus() {
        let app = app();
        for path in [
            "/predictions/english-predidctions/",
            "/predictions/english-predictions/",
        ] {
            let (status, body) =
                send(&app, post_json(path, r#"{"message":"coming home"}"#)).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body["prediction"], "ham");
        }
    }

    #[tokio::test]
    async fn predict_rejects_missing_or_empty_message() {
        let app = app();
        for body in [r#"{}"#, r#"{"message":""}"#, r#"{"message":null}"#] {
            let (status, json) = send(&app, post_json("/api/predictions/english", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json["error"], "No message provided in request body");
        }
    }

    #[tokio::test]
    async fn predict_rejects_invalid_json() {
        let app = app();
        let (status, body) = send(&app, post_json("/api/predictions/english", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn predict_unknown_corpus_is_404() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json("/api/predictions/klingon", r#"{"message":"hello"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "unknown corpus \"klingon\"");
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_error_body() {
        let app = app();
        let req = Request::get("/api/predictions/english")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "method not allowed");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app();
        let (status, body) = send(&app, Request::get("/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not found");
    }

    #[tokio::test]
    async fn corpora_lists_summaries() {
        let app = app();
        let (status, body) =
            send(&app, Request::get("/api/corpora").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "english");
        assert_eq!(body[0]["scale"], "ratio");
        assert_eq!(body[0]["spam_label"], "spam");
    }

    #[tokio::test]
    async fn create_list_and_count_messages() {
        let app = app();
        let (status, created) = send(
            &app,
            post_json("/api/messages", r#"{"message":"win a prize","label":"scam"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["label"], "scam");
        assert_eq!(created["message"], "win a prize");

        send(
            &app,
            post_json("/api/messages", r#"{"message":"dinner at 7","label":"ham"}"#),
        )
        .await;

        let (status, stats) =
            send(&app, Request::get("/api/stats").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            stats,
            json!({"total_messages": 2, "scam_messages": 1, "ham_messages": 1})
        );

        let (status, list) = send(
            &app,
            Request::get("/api/messages?limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["message"], "dinner at 7");
    }

    #[tokio::test]
    async fn create_message_validates_fields() {
        let app = app();
        let (status, body) = send(&app, post_json("/api/messages", r#"{"message":"hi"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No label provided in request body");

        let (status, _) = send(
            &app,
            post_json("/api/messages", r#"{"message":"hi","label":"spam"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stored_messages_do_not_change_built_indices() {
        let app = app();
        send(
            &app,
            post_json("/api/messages", r#"{"message":"quarterly budget","label":"scam"}"#),
        )
        .await;
        let (_, body) = send(
            &app,
            post_json("/api/predictions/english", r#"{"message":"quarterly budget"}"#),
        )
        .await;
        assert_eq!(body["prediction"], "unknown");
    }

    #[tokio::test]
    async fn oversized_limit_is_capped() {
        let app = app();
        send(
            &app,
            post_json("/api/messages", r#"{"message":"hello","label":"ham"}"#),
        )
        .await;
        let (status, list) = send(
            &app,
            Request::get("/api/messages?limit=18446744073709551615")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_message_by_id() {
        let app = app();
        let (_, created) = send(
            &app,
            post_json("/api/messages", r#"{"message":"call me","label":"ham"}"#),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Request::get(format!("/api/messages/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "call me");

        let (status, body) = send(
            &app,
            Request::get("/api/messages/9999").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no results for query");

        let (status, _) = send(
            &app,
            Request::get("/api/messages/abc").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_limit_is_400() {
        let app = app();
        let (status, body) = send(
            &app,
            Request::get("/api/messages?limit=lots")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
