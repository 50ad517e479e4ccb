//! End-to-end walks through the progression engine without a transport.

use std::time::Duration;
use surveyor_core::{
    Catalog, CompletionMarkers, MemoryMarkers, Progression, Question, Response, Route,
    SessionState, SurveyDefinition, SurveyId, SurveyState, Transition, View,
};

/// Catalog with the two-question "satisfaction" survey.
fn satisfaction_catalog() -> Catalog {
    Catalog::new(vec![SurveyDefinition::new(
        SurveyId::new("satisfaction"),
        "Satisfaction",
        "Tell us how we did.",
        vec![
            Question::new("Did you like it?", &["yes", "no"]),
            Question::new("Would you come back?", &["yes", "no"]).with_text(),
        ],
    )])
    .expect("valid catalog")
}

#[test]
fn satisfaction_walkthrough() {
    let catalog = satisfaction_catalog();
    let engine = Progression::new(&catalog);
    let mut session = SessionState::new();
    let mut markers = MemoryMarkers::new();

    let landing = engine
        .select_survey(&mut session, &markers, "satisfaction")
        .expect("select");
    assert!(matches!(landing, Transition::Render(View::Landing { .. })));

    assert_eq!(
        engine.begin_survey(&mut session),
        Transition::Redirect(Route::Question(0))
    );
    assert_eq!(session.responses, Some(vec![]));

    let Transition::Render(View::Question {
        index, question, ..
    }) = engine.view_question(&mut session, 0)
    else {
        unreachable!("question 0 must render");
    };
    assert_eq!(index, 0);
    assert_eq!(question.prompt, "Did you like it?");

    assert_eq!(
        engine
            .submit_answer(&mut session, Response::new("yes", ""))
            .expect("submit"),
        Transition::Redirect(Route::Question(1))
    );
    assert_eq!(session.responses, Some(vec![Response::new("yes", "")]));
    assert_eq!(engine.state(&session), SurveyState::InProgress(1));

    assert!(matches!(
        engine.view_question(&mut session, 1),
        Transition::Render(View::Question { index: 1, .. })
    ));

    assert_eq!(
        engine
            .submit_answer(&mut session, Response::new("no", "comment"))
            .expect("submit"),
        Transition::Redirect(Route::Complete)
    );
    assert_eq!(engine.state(&session), SurveyState::Complete);

    let Transition::Render(View::Completion { survey, responses }) =
        engine.complete(&mut session, &mut markers)
    else {
        unreachable!("complete must render");
    };
    assert_eq!(survey.id.as_str(), "satisfaction");
    assert_eq!(
        responses,
        vec![Response::new("yes", ""), Response::new("no", "comment")]
    );

    let id = SurveyId::new("satisfaction");
    assert!(markers.has_completed(&id));
    assert!(markers.remaining(&id).expect("alive") <= Duration::from_secs(60));
}

#[test]
fn skipping_ahead_is_corrected() {
    let catalog = satisfaction_catalog();
    let engine = Progression::new(&catalog);
    let mut session = SessionState::new();
    engine
        .select_survey(&mut session, &MemoryMarkers::new(), "satisfaction")
        .expect("select");
    engine.begin_survey(&mut session);
    engine
        .submit_answer(&mut session, Response::new("yes", ""))
        .expect("submit");

    assert_eq!(
        engine.view_question(&mut session, 2),
        Transition::Redirect(Route::Question(1))
    );
    let flashes = session.take_flashes();
    assert_eq!(flashes.len(), 1);
    assert!(flashes[0].contains("Invalid question id: 2"));
}

#[test]
fn completed_survey_cannot_be_reentered() {
    let catalog = satisfaction_catalog();
    let engine = Progression::new(&catalog);
    let mut session = SessionState::new();
    let mut markers = MemoryMarkers::new();

    engine
        .select_survey(&mut session, &markers, "satisfaction")
        .expect("select");
    engine.begin_survey(&mut session);
    for choice in ["yes", "no"] {
        engine
            .submit_answer(&mut session, Response::new(choice, ""))
            .expect("submit");
    }
    engine.complete(&mut session, &mut markers);

    let snapshot = session.clone();
    let again = engine
        .select_survey(&mut session, &markers, "satisfaction")
        .expect("select");

    assert_eq!(
        again,
        Transition::Render(View::AlreadyCompleted {
            survey_id: SurveyId::new("satisfaction"),
        })
    );
    assert_eq!(session, snapshot);
}

#[test]
fn repeated_complete_is_idempotent() {
    let catalog = satisfaction_catalog();
    let engine = Progression::new(&catalog);
    let mut session = SessionState::new();
    let mut markers = MemoryMarkers::new();

    engine
        .select_survey(&mut session, &markers, "satisfaction")
        .expect("select");
    engine.begin_survey(&mut session);
    for choice in ["yes", "yes"] {
        engine
            .submit_answer(&mut session, Response::new(choice, ""))
            .expect("submit");
    }

    let first = engine.complete(&mut session, &mut markers);
    let second = engine.complete(&mut session, &mut markers);
    assert_eq!(first, second);
    assert_eq!(session.answered(), 2);
}

#[test]
fn switching_surveys_keeps_responses_until_begin() {
    let catalog = Catalog::new(vec![
        SurveyDefinition::new(
            SurveyId::new("long"),
            "Long",
            "",
            vec![
                Question::new("One?", &["y", "n"]),
                Question::new("Two?", &["y", "n"]),
                Question::new("Three?", &["y", "n"]),
            ],
        ),
        SurveyDefinition::new(
            SurveyId::new("short"),
            "Short",
            "",
            vec![Question::new("Only?", &["y", "n"])],
        ),
    ])
    .expect("valid catalog");
    let engine = Progression::new(&catalog);
    let mut session = SessionState::new();
    let mut markers = MemoryMarkers::new();

    engine
        .select_survey(&mut session, &markers, "long")
        .expect("select long");
    engine.begin_survey(&mut session);
    for _ in 0..2 {
        engine
            .submit_answer(&mut session, Response::new("y", ""))
            .expect("submit");
    }

    // Selecting another survey leaves the responses alone
    engine
        .select_survey(&mut session, &markers, "short")
        .expect("select short");
    assert_eq!(session.answered(), 2);

    let Transition::Render(View::Completion { survey, responses }) =
        engine.complete(&mut session, &mut markers)
    else {
        unreachable!("carried responses cover the short survey");
    };
    assert_eq!(survey.id, SurveyId::new("short"));
    assert_eq!(responses.len(), 2);
    assert!(markers.has_completed(&SurveyId::new("short")));
    assert!(!markers.has_completed(&SurveyId::new("long")));

    // Beginning discards them
    engine.begin_survey(&mut session);
    assert_eq!(session.answered(), 0);
}
