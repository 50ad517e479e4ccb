//! # Property-Based Tests
//!
//! Progression invariants checked with proptest against generated catalogs.

use proptest::collection::vec;
use proptest::prelude::*;
use surveyor_core::{
    Catalog, MemoryMarkers, Progression, Question, Response, Route, SessionState,
    SurveyDefinition, SurveyId, SurveyState, Transition,
};

/// A single-survey catalog with `n` yes/no questions.
fn catalog_with(n: usize) -> Catalog {
    let questions = (0..n)
        .map(|i| Question::new(format!("Question {}?", i), &["yes", "no"]))
        .collect();
    Catalog::new(vec![SurveyDefinition::new(
        SurveyId::new("generated"),
        "Generated",
        "",
        questions,
    )])
    .expect("valid catalog")
}

fn begun(engine: &Progression<'_>) -> SessionState {
    let mut session = SessionState::new();
    engine
        .select_survey(&mut session, &MemoryMarkers::new(), "generated")
        .expect("select");
    engine.begin_survey(&mut session);
    session
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Select then begin always lands on question 0 with no responses.
    #[test]
    fn begin_starts_at_zero(n in 1usize..20, prior in 0usize..20) {
        let catalog = catalog_with(n);
        let engine = Progression::new(&catalog);
        let mut session = SessionState::new();
        session.responses = Some(vec![Response::new("stale", ""); prior]);

        engine
            .select_survey(&mut session, &MemoryMarkers::new(), "generated")
            .expect("select");
        let transition = engine.begin_survey(&mut session);

        prop_assert_eq!(transition, Transition::Redirect(Route::Question(0)));
        prop_assert!(session.responses.is_some());
        prop_assert_eq!(session.answered(), 0);
        prop_assert_eq!(engine.state(&session), SurveyState::InProgress(0));
    }

    /// After k answers the session holds k responses and points at k or Complete.
    #[test]
    fn submit_advances_one_question(n in 1usize..20, k_seed in 0usize..20) {
        let k = (k_seed % n) + 1;
        let catalog = catalog_with(n);
        let engine = Progression::new(&catalog);
        let mut session = begun(&engine);

        let mut last = Transition::Redirect(Route::Question(0));
        for _ in 0..k {
            last = engine
                .submit_answer(&mut session, Response::new("yes", ""))
                .expect("submit");
        }

        prop_assert_eq!(session.answered(), k);
        if k < n {
            prop_assert_eq!(last, Transition::Redirect(Route::Question(k)));
            prop_assert_eq!(engine.state(&session), SurveyState::InProgress(k));
        } else {
            prop_assert_eq!(last, Transition::Redirect(Route::Complete));
            prop_assert_eq!(engine.state(&session), SurveyState::Complete);
        }
    }

    /// Viewing the wrong index never mutates responses and redirects to the canonical one.
    #[test]
    fn out_of_order_view_is_corrected(
        n in 2usize..20,
        answered_seed in 0usize..20,
        requested in 0usize..50,
    ) {
        let answered = answered_seed % n;
        prop_assume!(requested != answered);

        let catalog = catalog_with(n);
        let engine = Progression::new(&catalog);
        let mut session = begun(&engine);
        for _ in 0..answered {
            engine
                .submit_answer(&mut session, Response::new("no", ""))
                .expect("submit");
        }
        let before = session.responses.clone();

        let transition = engine.view_question(&mut session, requested);

        prop_assert_eq!(transition, Transition::Redirect(Route::Question(answered)));
        prop_assert_eq!(&session.responses, &before);
        let expected = format!("Invalid question id: {}.", requested);
        prop_assert_eq!(session.take_flashes(), vec![expected]);
    }

    /// Responses never outnumber questions, however many answers arrive.
    #[test]
    fn responses_bounded_by_questions(n in 1usize..10, answers in vec("[a-z]{1,8}", 0..30)) {
        let catalog = catalog_with(n);
        let engine = Progression::new(&catalog);
        let mut session = begun(&engine);

        for choice in answers {
            engine
                .submit_answer(&mut session, Response::new(choice, ""))
                .expect("submit");
            prop_assert!(session.answered() <= n);
        }
    }
}
