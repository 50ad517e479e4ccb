//! # Core Type Definitions
//!
//! This module contains the data model for Surveyor:
//! - Survey identifiers (`SurveyId`)
//! - Survey content (`SurveyDefinition`, `Question`)
//! - Recorded answers (`Response`)
//! - Error types (`SurveyError`)
//!
//! Survey content is immutable once loaded. Only `Response` values are
//! produced at runtime, one per answered question.

use crate::primitives::MAX_SURVEY_ID_LENGTH;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// SURVEY IDENTIFIER
// =============================================================================

/// Catalog key of a survey.
///
/// A survey id ends up inside a cookie name (`completed_{id}`), so only
/// ASCII alphanumerics, `-` and `_` are accepted by [`SurveyId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(pub String);

impl SurveyId {
    /// Create a survey id without validation.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Create a survey id, rejecting empty, oversized or non-token input.
    pub fn parse(s: &str) -> Result<Self, SurveyError> {
        if s.is_empty() {
            return Err(SurveyError::InvalidCatalog(
                "Survey id must not be empty".to_string(),
            ));
        }
        if s.len() > MAX_SURVEY_ID_LENGTH {
            return Err(SurveyError::InvalidCatalog(format!(
                "Survey id length {} exceeds maximum {} bytes",
                s.len(),
                MAX_SURVEY_ID_LENGTH
            )));
        }
        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(SurveyError::InvalidCatalog(format!(
                "Survey id '{}' may only contain ASCII letters, digits, '-' and '_'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// =============================================================================
// QUESTION
// =============================================================================

/// A single survey question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt shown to the user.
    pub prompt: String,
    /// Choice labels, in display order.
    pub choices: Vec<String>,
    /// Whether the user may add a free-text elaboration.
    #[serde(default)]
    pub allow_text: bool,
}

impl Question {
    /// Create a multiple-choice question without free text.
    #[must_use]
    pub fn new(prompt: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            prompt: prompt.into(),
            choices: choices.iter().map(|c| (*c).to_string()).collect(),
            allow_text: false,
        }
    }

    /// Allow a free-text elaboration alongside the choice.
    #[must_use]
    pub fn with_text(mut self) -> Self {
        self.allow_text = true;
        self
    }
}

// =============================================================================
// SURVEY DEFINITION
// =============================================================================

/// A named, ordered set of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    /// Catalog key.
    pub id: SurveyId,
    /// Display title.
    pub title: String,
    /// Text shown on the landing page before the survey begins.
    #[serde(default)]
    pub instructions: String,
    /// Questions in the order they must be answered.
    pub questions: Vec<Question>,
}

impl SurveyDefinition {
    /// Create a new survey definition.
    #[must_use]
    pub fn new(
        id: SurveyId,
        title: impl Into<String>,
        instructions: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            instructions: instructions.into(),
            questions,
        }
    }

    /// Get the question at `index`, if any.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if the survey has no questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// One recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The selected choice label.
    pub choice: String,
    /// Free-text elaboration, empty when not supplied.
    #[serde(default)]
    pub text: String,
}

impl Response {
    /// Create a new response.
    #[must_use]
    pub fn new(choice: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            choice: choice.into(),
            text: text.into(),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Surveyor system.
///
/// Navigation mistakes are not errors: they resolve to redirects.
/// These variants cover the cases a caller must surface.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The requested survey id is not in the catalog.
    #[error("Survey not found: {0}")]
    SurveyNotFound(String),

    /// The catalog content violates a structural rule.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A submitted answer exceeds input limits.
    #[error("Invalid answer: {0}")]
    InvalidAnswer(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================
