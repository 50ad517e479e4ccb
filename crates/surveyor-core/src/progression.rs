//! # Survey Progression
//!
//! The state machine that walks a client through a survey.
//!
//! ```text
//! NoSurvey ──select──▶ Landing ──begin──▶ InProgress(0) ──answer──▶ ... ──▶ InProgress(N-1) ──answer──▶ Complete
//! ```
//!
//! Every operation returns a [`Transition`]: either a page to render or a
//! route to redirect to. Invalid navigation never fails; it redirects to the
//! nearest valid state. The only errors are an unknown survey id and an
//! oversized answer.

use crate::markers::CompletionMarkers;
use crate::primitives::{COMPLETION_MARKER_TTL_SECS, MAX_CHOICE_LENGTH, MAX_TEXT_LENGTH};
use crate::session::SurveyState;
use crate::{Catalog, Question, Response, SessionState, SurveyDefinition, SurveyError, SurveyId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// TRANSITIONS
// =============================================================================

/// A navigable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The survey selection page.
    Selection,
    /// The question page at this index.
    Question(usize),
    /// The completion summary.
    Complete,
}

impl Route {
    /// URL path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Selection => "/".to_string(),
            Route::Question(index) => format!("/questions/{}", index),
            Route::Complete => "/complete".to_string(),
        }
    }
}

/// Catalog entry as shown on the selection page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub id: SurveyId,
    pub title: String,
    pub instructions: String,
    pub question_count: usize,
}

impl From<&SurveyDefinition> for SurveySummary {
    fn from(survey: &SurveyDefinition) -> Self {
        Self {
            id: survey.id.clone(),
            title: survey.title.clone(),
            instructions: survey.instructions.clone(),
            question_count: survey.len(),
        }
    }
}

/// A page to render, with the data it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum View {
    /// List of selectable surveys.
    Selection { surveys: Vec<SurveySummary> },
    /// The survey was completed recently and cannot be taken again yet.
    AlreadyCompleted { survey_id: SurveyId },
    /// Survey introduction, before `begin`.
    Landing { survey: SurveyDefinition },
    /// A single question.
    Question {
        survey_id: SurveyId,
        index: usize,
        total: usize,
        question: Question,
    },
    /// Summary of all responses.
    Completion {
        survey: SurveyDefinition,
        responses: Vec<Response>,
    },
}

/// Outcome of a progression operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Send the client elsewhere.
    Redirect(Route),
    /// Show a page.
    Render(View),
}

// =============================================================================
// PROGRESSION ENGINE
// =============================================================================

/// Survey progression over a fixed catalog.
#[derive(Debug, Clone, Copy)]
pub struct Progression<'a> {
    catalog: &'a Catalog,
    completion_ttl: Duration,
}

impl<'a> Progression<'a> {
    /// Create an engine with the default completion marker lifetime.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            completion_ttl: Duration::from_secs(COMPLETION_MARKER_TTL_SECS),
        }
    }

    /// Override the completion marker lifetime.
    #[must_use]
    pub fn with_completion_ttl(mut self, ttl: Duration) -> Self {
        self.completion_ttl = ttl;
        self
    }

    /// Completion marker lifetime in use.
    #[must_use]
    pub fn completion_ttl(&self) -> Duration {
        self.completion_ttl
    }

    /// The selection page.
    #[must_use]
    pub fn selection(&self) -> Transition {
        Transition::Render(View::Selection {
            surveys: self.catalog.iter().map(SurveySummary::from).collect(),
        })
    }

    /// Choose a survey.
    ///
    /// A live completion marker short-circuits to `AlreadyCompleted` without
    /// touching the session. Otherwise the survey becomes current and its
    /// landing page is shown; recorded responses stay as they are until
    /// [`Progression::begin_survey`].
    pub fn select_survey(
        &self,
        session: &mut SessionState,
        markers: &impl CompletionMarkers,
        survey_id: &str,
    ) -> Result<Transition, SurveyError> {
        let survey = self.catalog.get(survey_id)?;

        if markers.has_completed(&survey.id) {
            return Ok(Transition::Render(View::AlreadyCompleted {
                survey_id: survey.id.clone(),
            }));
        }

        session.current_survey = Some(survey.id.clone());
        Ok(Transition::Render(View::Landing {
            survey: survey.clone(),
        }))
    }

    /// Start (or restart) the current survey from question 0.
    pub fn begin_survey(&self, session: &mut SessionState) -> Transition {
        session.responses = Some(Vec::new());
        Transition::Redirect(Route::Question(0))
    }

    /// Show the question at `requested`, or redirect to where the client
    /// should be.
    ///
    /// Only the next unanswered question may be viewed. Any other index
    /// queues an "Invalid question id" message and redirects to the
    /// canonical index without changing recorded responses.
    pub fn view_question(&self, session: &mut SessionState, requested: usize) -> Transition {
        let Some((survey, answered)) = self.current(session) else {
            return Transition::Redirect(Route::Selection);
        };

        if answered >= survey.len() {
            return Transition::Redirect(Route::Complete);
        }

        if requested != answered {
            session.flash(format!("Invalid question id: {}.", requested));
            return Transition::Redirect(Route::Question(answered));
        }

        match survey.question(requested) {
            Some(question) => Transition::Render(View::Question {
                survey_id: survey.id.clone(),
                index: requested,
                total: survey.len(),
                question: question.clone(),
            }),
            None => Transition::Redirect(Route::Complete),
        }
    }

    /// Record the answer to the next unanswered question.
    ///
    /// Redirects to the following question, or to the completion page once
    /// every question has a response. An answer arriving after the last
    /// question is discarded.
    pub fn submit_answer(
        &self,
        session: &mut SessionState,
        response: Response,
    ) -> Result<Transition, SurveyError> {
        validate_response(&response)?;

        let Some(id) = session.current_survey.clone() else {
            return Ok(Transition::Redirect(Route::Selection));
        };
        let Ok(survey) = self.catalog.get(id.as_str()) else {
            return Ok(Transition::Redirect(Route::Selection));
        };

        let responses = session.responses.get_or_insert_with(Vec::new);
        if responses.len() >= survey.len() {
            return Ok(Transition::Redirect(Route::Complete));
        }

        responses.push(response);
        let answered = responses.len();
        if answered == survey.len() {
            Ok(Transition::Redirect(Route::Complete))
        } else {
            Ok(Transition::Redirect(Route::Question(answered)))
        }
    }

    /// Show the completion summary and set the completion marker.
    ///
    /// Safe to repeat: each call refreshes the marker's expiry. A client
    /// with unanswered questions is sent back to the next one and no marker
    /// is set.
    pub fn complete(
        &self,
        session: &mut SessionState,
        markers: &mut impl CompletionMarkers,
    ) -> Transition {
        let Some((survey, answered)) = self.current(session) else {
            return Transition::Redirect(Route::Selection);
        };

        if answered < survey.len() {
            return Transition::Redirect(Route::Question(answered));
        }

        markers.mark_completed(&survey.id, self.completion_ttl);
        Transition::Render(View::Completion {
            survey: survey.clone(),
            responses: session.responses.clone().unwrap_or_default(),
        })
    }

    /// Current progression state of `session`.
    #[must_use]
    pub fn state(&self, session: &SessionState) -> SurveyState {
        session.progress(self.catalog)
    }

    /// Current survey and answered count, when the survey has been begun.
    fn current(&self, session: &SessionState) -> Option<(&'a SurveyDefinition, usize)> {
        let id = session.current_survey.as_ref()?;
        let responses = session.responses.as_ref()?;
        let survey = self.catalog.get(id.as_str()).ok()?;
        Some((survey, responses.len()))
    }
}

/// Enforce input limits on a submitted answer.
fn validate_response(response: &Response) -> Result<(), SurveyError> {
    if response.choice.is_empty() {
        return Err(SurveyError::InvalidAnswer(
            "Answer must not be empty".to_string(),
        ));
    }
    if response.choice.len() > MAX_CHOICE_LENGTH {
        return Err(SurveyError::InvalidAnswer(format!(
            "Answer length {} exceeds maximum {} bytes",
            response.choice.len(),
            MAX_CHOICE_LENGTH
        )));
    }
    if response.text.len() > MAX_TEXT_LENGTH {
        return Err(SurveyError::InvalidAnswer(format!(
            "Text length {} exceeds maximum {} bytes",
            response.text.len(),
            MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::MemoryMarkers;

    fn begun(catalog: &Catalog, id: &str) -> SessionState {
        let engine = Progression::new(catalog);
        let mut session = SessionState::new();
        engine
            .select_survey(&mut session, &MemoryMarkers::new(), id)
            .expect("select");
        engine.begin_survey(&mut session);
        session
    }

    #[test]
    fn route_paths() {
        assert_eq!(Route::Selection.path(), "/");
        assert_eq!(Route::Question(3).path(), "/questions/3");
        assert_eq!(Route::Complete.path(), "/complete");
    }

    #[test]
    fn selection_lists_catalog() {
        let catalog = Catalog::builtin();
        let Transition::Render(View::Selection { surveys }) =
            Progression::new(&catalog).selection()
        else {
            unreachable!("selection always renders");
        };
        assert_eq!(surveys.len(), catalog.len());
        assert!(surveys.iter().all(|s| s.question_count > 0));
    }

    #[test]
    fn select_unknown_survey_is_error() {
        let catalog = Catalog::builtin();
        let mut session = SessionState::new();
        let result =
            Progression::new(&catalog).select_survey(&mut session, &MemoryMarkers::new(), "nope");
        assert!(matches!(result, Err(SurveyError::SurveyNotFound(_))));
        assert_eq!(session, SessionState::new());
    }

    #[test]
    fn select_keeps_responses_until_begin() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog);
        let mut session = begun(&catalog, "satisfaction");
        engine
            .submit_answer(&mut session, Response::new("Yes", ""))
            .expect("submit");

        engine
            .select_survey(&mut session, &MemoryMarkers::new(), "personality")
            .expect("select");
        assert_eq!(session.answered(), 1);

        engine.begin_survey(&mut session);
        assert_eq!(session.answered(), 0);
    }

    #[test]
    fn completed_survey_skips_session() {
        let catalog = Catalog::builtin();
        let mut markers = MemoryMarkers::new();
        markers.mark_completed(&SurveyId::new("satisfaction"), Duration::from_secs(60));

        let mut session = SessionState::new();
        let transition = Progression::new(&catalog)
            .select_survey(&mut session, &markers, "satisfaction")
            .expect("select");

        assert!(matches!(
            transition,
            Transition::Render(View::AlreadyCompleted { .. })
        ));
        assert!(session.current_survey.is_none());
    }

    #[test]
    fn view_without_survey_redirects_to_selection() {
        let catalog = Catalog::builtin();
        let mut session = SessionState::new();
        assert_eq!(
            Progression::new(&catalog).view_question(&mut session, 0),
            Transition::Redirect(Route::Selection)
        );
    }

    #[test]
    fn view_out_of_order_flashes_and_redirects() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog);
        let mut session = begun(&catalog, "satisfaction");

        assert_eq!(
            engine.view_question(&mut session, 2),
            Transition::Redirect(Route::Question(0))
        );
        assert_eq!(session.take_flashes(), vec!["Invalid question id: 2."]);
        assert_eq!(session.answered(), 0);
    }

    #[test]
    fn view_after_last_answer_redirects_to_complete() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog);
        let mut session = begun(&catalog, "satisfaction");
        for _ in 0..4 {
            engine
                .submit_answer(&mut session, Response::new("Yes", ""))
                .expect("submit");
        }
        assert_eq!(
            engine.view_question(&mut session, 0),
            Transition::Redirect(Route::Complete)
        );
        assert!(session.flashes.is_empty());
    }

    #[test]
    fn submit_without_survey_redirects_to_selection() {
        let catalog = Catalog::builtin();
        let mut session = SessionState::new();
        let transition = Progression::new(&catalog)
            .submit_answer(&mut session, Response::new("Yes", ""))
            .expect("submit");
        assert_eq!(transition, Transition::Redirect(Route::Selection));
        assert!(session.responses.is_none());
    }

    #[test]
    fn submit_past_last_question_is_discarded() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog);
        let mut session = begun(&catalog, "satisfaction");
        for _ in 0..4 {
            engine
                .submit_answer(&mut session, Response::new("Yes", ""))
                .expect("submit");
        }
        let transition = engine
            .submit_answer(&mut session, Response::new("No", ""))
            .expect("submit");
        assert_eq!(transition, Transition::Redirect(Route::Complete));
        assert_eq!(session.answered(), 4);
    }

    #[test]
    fn submit_rejects_oversized_input() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog);
        let mut session = begun(&catalog, "personality");

        let long_text = Response::new("Yes", "x".repeat(MAX_TEXT_LENGTH + 1));
        assert!(matches!(
            engine.submit_answer(&mut session, long_text),
            Err(SurveyError::InvalidAnswer(_))
        ));
        assert!(matches!(
            engine.submit_answer(&mut session, Response::new("", "")),
            Err(SurveyError::InvalidAnswer(_))
        ));
        assert_eq!(session.answered(), 0);
    }

    #[test]
    fn complete_before_last_answer_redirects_without_marker() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog);
        let mut session = begun(&catalog, "satisfaction");
        let mut markers = MemoryMarkers::new();

        assert_eq!(
            engine.complete(&mut session, &mut markers),
            Transition::Redirect(Route::Question(0))
        );
        assert!(!markers.has_completed(&SurveyId::new("satisfaction")));
    }

    #[test]
    fn complete_without_session_redirects_to_selection() {
        let catalog = Catalog::builtin();
        let mut markers = MemoryMarkers::new();
        assert_eq!(
            Progression::new(&catalog).complete(&mut SessionState::new(), &mut markers),
            Transition::Redirect(Route::Selection)
        );
    }

    #[test]
    fn custom_completion_ttl_is_used() {
        let catalog = Catalog::builtin();
        let engine = Progression::new(&catalog).with_completion_ttl(Duration::from_secs(5));
        assert_eq!(engine.completion_ttl(), Duration::from_secs(5));

        let mut session = begun(&catalog, "satisfaction");
        for _ in 0..4 {
            engine
                .submit_answer(&mut session, Response::new("Yes", ""))
                .expect("submit");
        }
        let mut markers = MemoryMarkers::new();
        engine.complete(&mut session, &mut markers);

        let left = markers
            .remaining(&SurveyId::new("satisfaction"))
            .expect("marker set");
        assert!(left <= Duration::from_secs(5));
    }
}
