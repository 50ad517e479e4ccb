//! # API Endpoint Handlers
//!
//! Each handler loads the client's session, runs one progression
//! operation, stores the session back and turns the resulting
//! `Transition` into a redirect or a JSON page.

use super::{
    AppState,
    markers::CookieMarkers,
    sessions::session_id,
    types::{AnswerForm, ErrorResponse, HealthResponse, PageResponse, SelectForm},
};
use axum::{
    Form, Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use surveyor_core::{Route, SessionState, SurveyError, Transition, View};

// =============================================================================
// RESPONSE HELPERS
// =============================================================================

/// Persist the session and realize the transition as an HTTP response.
///
/// Flash messages are drained only when a page is rendered, so they
/// survive the redirect that queued them.
async fn respond(
    state: &AppState,
    jar: CookieJar,
    sid: &str,
    mut session: SessionState,
    transition: Transition,
) -> Response {
    match transition {
        Transition::Redirect(route) => {
            state.sessions.save(sid, session).await;
            (jar, Redirect::to(&route.path())).into_response()
        }
        Transition::Render(view) => {
            let messages = session.take_flashes();
            state.sessions.save(sid, session).await;
            (jar, Json(PageResponse::new(view, messages))).into_response()
        }
    }
}

/// Map a core error to a status code and JSON body.
fn error_response(jar: CookieJar, error: &SurveyError) -> Response {
    let status = match error {
        SurveyError::SurveyNotFound(_) => StatusCode::NOT_FOUND,
        SurveyError::InvalidAnswer(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, jar, Json(ErrorResponse::new(error.to_string()))).into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::new(state.catalog.len()))
}

// =============================================================================
// SELECTION HANDLERS
// =============================================================================

/// `GET /` - list surveys.
pub async fn selection_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid) = session_id(jar);
    let session = state.sessions.load(&sid).await;
    let transition = state.progression().selection();
    respond(&state, jar, &sid, session, transition).await
}

/// `POST /` - choose a survey.
pub async fn select_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SelectForm>,
) -> Response {
    let (jar, sid) = session_id(jar);
    let mut session = state.sessions.load(&sid).await;
    let markers = CookieMarkers::new(jar);

    match state
        .progression()
        .select_survey(&mut session, &markers, &form.survey_code)
    {
        Ok(transition) => {
            if matches!(transition, Transition::Render(View::AlreadyCompleted { .. })) {
                tracing::info!(
                    event = "already_completed",
                    survey = %form.survey_code,
                    "Survey completed recently, not restarting"
                );
            }
            respond(&state, markers.into_jar(), &sid, session, transition).await
        }
        Err(e) => {
            tracing::warn!(
                event = "survey_not_found",
                survey = %form.survey_code,
                "Unknown survey selected"
            );
            error_response(markers.into_jar(), &e)
        }
    }
}

// =============================================================================
// PROGRESSION HANDLERS
// =============================================================================

/// `POST /begin` - restart the selected survey at question 0.
pub async fn begin_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid) = session_id(jar);
    let mut session = state.sessions.load(&sid).await;
    let transition = state.progression().begin_survey(&mut session);
    tracing::debug!(
        event = "survey_begun",
        survey = ?session.current_survey.as_ref().map(|id| id.as_str()),
        "Survey restarted at question 0"
    );
    respond(&state, jar, &sid, session, transition).await
}

/// `POST /answer` - record the answer to the next question.
pub async fn answer_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AnswerForm>,
) -> Response {
    let (jar, sid) = session_id(jar);
    let mut session = state.sessions.load(&sid).await;

    match state
        .progression()
        .submit_answer(&mut session, form.into_answer())
    {
        Ok(transition) => {
            tracing::debug!(
                event = "answer_recorded",
                answered = session.answered(),
                "Answer recorded"
            );
            respond(&state, jar, &sid, session, transition).await
        }
        Err(e) => {
            tracing::warn!(event = "answer_rejected", error = %e, "Answer rejected");
            error_response(jar, &e)
        }
    }
}

/// `GET /questions/{index}` - show a question or correct the client.
///
/// An index that is not a non-negative integer names no page: 404.
pub async fn question_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    index: Result<Path<usize>, PathRejection>,
) -> Response {
    let Ok(Path(index)) = index else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Question not found")),
        )
            .into_response();
    };
    let (jar, sid) = session_id(jar);
    let mut session = state.sessions.load(&sid).await;
    let transition = state.progression().view_question(&mut session, index);

    if let Transition::Redirect(Route::Question(expected)) = &transition {
        tracing::warn!(
            event = "out_of_order_question",
            requested = index,
            expected = *expected,
            "Invalid question id"
        );
    }
    respond(&state, jar, &sid, session, transition).await
}

/// `GET /complete` - summary page; sets the completion cookie.
pub async fn complete_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    let (jar, sid) = session_id(jar);
    let mut session = state.sessions.load(&sid).await;
    let mut markers = CookieMarkers::new(jar);
    let transition = state.progression().complete(&mut session, &mut markers);

    if let Transition::Render(View::Completion { survey, responses }) = &transition {
        tracing::info!(
            event = "survey_completed",
            survey = %survey.id,
            responses = responses.len(),
            "Survey completed"
        );
    }
    respond(&state, markers.into_jar(), &sid, session, transition).await
}
