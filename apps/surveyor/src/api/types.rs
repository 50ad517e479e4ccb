//! # API Request/Response Types
//!
//! Form bodies accepted by the survey pages and the JSON structures they
//! render.

use serde::{Deserialize, Serialize};
use surveyor_core::{Response, View};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub surveys: usize,
}

impl HealthResponse {
    pub fn new(surveys: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            surveys,
        }
    }
}

// =============================================================================
// SELECT FORM
// =============================================================================

/// Body of `POST /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectForm {
    pub survey_code: String,
}

// =============================================================================
// ANSWER FORM
// =============================================================================

/// Body of `POST /answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerForm {
    pub answer: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl AnswerForm {
    /// Convert to a `Response`; missing text becomes the empty string.
    pub fn into_answer(self) -> Response {
        Response::new(self.answer, self.text.unwrap_or_default())
    }
}

// =============================================================================
// PAGE RESPONSE
// =============================================================================

/// A rendered page: the view plus any one-shot messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub view: View,
    pub messages: Vec<String>,
}

impl PageResponse {
    pub fn new(view: View, messages: Vec<String>) -> Self {
        Self { view, messages }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error body for requests that cannot be served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
