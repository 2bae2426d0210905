use serde::{Deserialize, Serialize};

use crate::models::Document;

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> SuccessBody<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Error envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Body of `POST /documents` and `PUT /documents/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct InsertDocumentRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Body of `POST /documents/batch`
#[derive(Debug, Deserialize)]
pub struct BatchInsertRequest {
    pub documents: Vec<InsertDocumentRequest>,
}

/// Query string of `GET /search`
///
/// `limit` and `offset` stay strings here; values that fail to parse
/// fall back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub mode: Option<String>,
    pub ranked: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Payload of a successful `GET /search`
#[derive(Debug, Serialize)]
pub struct SearchResponseBody {
    pub documents: Vec<Document>,
    pub total: usize,
    pub query: String,
    #[serde(skip_serializing_if = "scores_empty")]
    pub scores: Option<Vec<f64>>,
}

fn scores_empty(scores: &Option<Vec<f64>>) -> bool {
    scores.as_ref().map_or(true, Vec::is_empty)
}
