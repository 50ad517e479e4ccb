//! # Completion Markers
//!
//! Short-lived per-client flags that block re-submission of a survey.
//!
//! The progression engine talks to markers only through the
//! [`CompletionMarkers`] trait. The HTTP app backs it with cookies; the
//! in-process [`MemoryMarkers`] serves tests and any host that keeps
//! client state on the server.

use crate::SurveyId;
use crate::primitives::COMPLETION_MARKER_PREFIX;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Upper bound on in-process marker lifetime (one year).
const MAX_MEMORY_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Name under which the marker for `survey` is stored.
#[must_use]
pub fn marker_name(survey: &SurveyId) -> String {
    format!("{}{}", COMPLETION_MARKER_PREFIX, survey)
}

/// Completion flags for a single client.
pub trait CompletionMarkers {
    /// Whether a live marker exists for `survey`.
    fn has_completed(&self, survey: &SurveyId) -> bool;

    /// Set (or refresh) the marker for `survey`, expiring after `ttl`.
    fn mark_completed(&mut self, survey: &SurveyId, ttl: Duration);
}

/// In-process markers with deadline expiry.
#[derive(Debug, Clone, Default)]
pub struct MemoryMarkers {
    deadlines: BTreeMap<SurveyId, Instant>,
}

impl MemoryMarkers {
    /// Create an empty marker set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining lifetime of the marker for `survey`, if it is still alive.
    #[must_use]
    pub fn remaining(&self, survey: &SurveyId) -> Option<Duration> {
        self.deadlines
            .get(survey)
            .and_then(|deadline| deadline.checked_duration_since(Instant::now()))
            .filter(|left| !left.is_zero())
    }
}

impl CompletionMarkers for MemoryMarkers {
    fn has_completed(&self, survey: &SurveyId) -> bool {
        self.remaining(survey).is_some()
    }

    fn mark_completed(&mut self, survey: &SurveyId, ttl: Duration) {
        let deadline = Instant::now() + ttl.min(MAX_MEMORY_TTL);
        self.deadlines.insert(survey.clone(), deadline);
    }
}

// =============================================================================
// TESTS
// =============================================================================
