//! # Cookie Completion Markers
//!
//! Completion markers carried by the client as `completed_{survey_id}`
//! cookies with a `Max-Age` equal to the marker TTL.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::time::Duration;
use surveyor_core::primitives::COMPLETION_MARKER_VALUE;
use surveyor_core::{CompletionMarkers, SurveyId, marker_name};

/// Completion markers backed by the request's cookie jar.
///
/// Markers set during a request are added to the jar; return
/// [`CookieMarkers::into_jar`] from the handler to send them.
#[derive(Debug, Clone)]
pub struct CookieMarkers {
    jar: CookieJar,
}

impl CookieMarkers {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl CompletionMarkers for CookieMarkers {
    fn has_completed(&self, survey: &SurveyId) -> bool {
        self.jar
            .get(&marker_name(survey))
            .is_some_and(|cookie| !cookie.value().is_empty())
    }

    fn mark_completed(&mut self, survey: &SurveyId, ttl: Duration) {
        let max_age = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let cookie = Cookie::build((marker_name(survey), COMPLETION_MARKER_VALUE))
            .path("/")
            .max_age(time::Duration::seconds(max_age))
            .same_site(SameSite::Lax)
            .build();
        self.jar = self.jar.clone().add(cookie);
    }
}

// =============================================================================
// TESTS
// =============================================================================
