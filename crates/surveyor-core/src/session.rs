//! # Session Module
//!
//! Per-client survey progress.
//!
//! A `SessionState` is created when a client selects a survey, reset by
//! `begin_survey`, and grown by one `Response` per answered question. The
//! host decides where it lives (cookie, server-side map) and how long; the
//! progression engine only ever receives it by mutable reference.

use crate::{Catalog, Response, SurveyId};
use serde::{Deserialize, Serialize};

/// Where a client stands in the survey flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyState {
    /// No survey selected, or the selected survey has not been begun.
    NoSurvey,
    /// Waiting for the answer to the question at this index.
    InProgress(usize),
    /// Every question has a response.
    Complete,
}

/// Transient per-client state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Survey currently selected by the client.
    pub current_survey: Option<SurveyId>,
    /// Responses recorded so far. `None` until the survey is begun.
    pub responses: Option<Vec<Response>>,
    /// One-shot messages for the next rendered page.
    #[serde(default)]
    pub flashes: Vec<String>,
}

impl SessionState {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded responses.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.responses.as_ref().map_or(0, Vec::len)
    }

    /// Queue a message for the next rendered page.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flashes.push(message.into());
    }

    /// Drain queued messages.
    pub fn take_flashes(&mut self) -> Vec<String> {
        std::mem::take(&mut self.flashes)
    }

    /// Derive the progression state against the catalog.
    ///
    /// A session pointing at a survey the catalog no longer has is treated
    /// as `NoSurvey`.
    #[must_use]
    pub fn progress(&self, catalog: &Catalog) -> SurveyState {
        let (Some(id), Some(responses)) = (&self.current_survey, &self.responses) else {
            return SurveyState::NoSurvey;
        };
        match catalog.get(id.as_str()) {
            Ok(survey) if responses.len() >= survey.len() => SurveyState::Complete,
            Ok(_) => SurveyState::InProgress(responses.len()),
            Err(_) => SurveyState::NoSurvey,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
