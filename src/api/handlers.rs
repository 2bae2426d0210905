use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::types::*;
use crate::error::CuttleError;
use crate::models::{Document, SearchMode, SearchOptions};

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Engine(CuttleError),
    BadRequest(String),
}

impl From<CuttleError> for ApiError {
    fn from(e: CuttleError) -> Self {
        ApiError::Engine(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Engine(e @ CuttleError::DocumentNotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ApiError::Engine(e @ CuttleError::InvalidRequest(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

impl InsertDocumentRequest {
    /// Validate required fields and build the document. `id_override`
    /// carries the path id for `PUT /documents/:id`.
    fn into_document(self, id_override: Option<String>) -> Result<Document, ApiError> {
        let id = id_override.unwrap_or_else(|| self.id.clone());
        if id.is_empty() {
            return Err(ApiError::BadRequest("id is required".to_string()));
        }
        if self.title.is_empty() {
            return Err(ApiError::BadRequest("title is required".to_string()));
        }
        if self.content.is_empty() {
            return Err(ApiError::BadRequest("content is required".to_string()));
        }

        let mut doc = Document::new(id, self.title, self.content);
        doc.url = self.url.filter(|url| !url.is_empty());
        Ok(doc)
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(SuccessBody::data("OK"))
}

/// POST /documents
pub async fn insert_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InsertDocumentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let doc = req.into_document(None)?;

    state.engine.upsert_document(doc)?;

    Ok(Json(SuccessBody::<()>::message(
        "Document inserted successfully",
    )))
}

/// POST /documents/batch
///
/// Validation failures reject the whole batch up front; an engine error
/// stops the loop and surfaces as 500, leaving prior inserts in place.
pub async fn batch_insert(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchInsertRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let mut docs = Vec::with_capacity(req.documents.len());
    for doc_req in req.documents {
        docs.push(doc_req.into_document(None)?);
    }

    for doc in docs {
        state.engine.upsert_document(doc)?;
    }

    Ok(Json(SuccessBody::<()>::message(
        "Documents inserted successfully",
    )))
}

/// GET /documents/:id
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    match state.engine.get_document(&id)? {
        Some(doc) => Ok(Json(SuccessBody::data(doc))),
        None => Err(ApiError::Engine(CuttleError::DocumentNotFound(id))),
    }
}

/// PUT /documents/:id — the path id overrides the body id.
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<InsertDocumentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let doc = req.into_document(Some(id))?;

    state.engine.upsert_document(doc)?;

    Ok(Json(SuccessBody::<()>::message(
        "Document updated successfully",
    )))
}

/// DELETE /documents/:id — idempotent.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.engine.delete_document(&id)?;

    Ok(Json(SuccessBody::<()>::message(
        "Document deleted successfully",
    )))
}

/// GET /search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = params.query.unwrap_or_default();
    if query.is_empty() {
        return Err(ApiError::BadRequest(
            "query parameter is required".to_string(),
        ));
    }

    let mut options = SearchOptions::default();
    if params.mode.as_deref() == Some("or") {
        options.mode = SearchMode::Or;
    }
    if params.ranked.as_deref() == Some("false") {
        options.use_ranking = false;
    }
    if let Some(limit) = params.limit.as_deref().and_then(|v| v.parse::<i64>().ok()) {
        if limit > 0 {
            options.limit = limit as usize;
        }
    }
    if let Some(offset) = params.offset.as_deref().and_then(|v| v.parse::<i64>().ok()) {
        if offset >= 0 {
            options.offset = offset as usize;
        }
    }

    let result = state.engine.search(&query, &options)?;

    Ok(Json(SuccessBody::data(SearchResponseBody {
        documents: result.documents,
        total: result.total,
        query,
        scores: result.scores,
    })))
}

/// GET /stats
pub async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(SuccessBody::data(state.engine.stats()))
}
