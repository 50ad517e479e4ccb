//! # surveyor-core
//!
//! The survey progression engine for Surveyor - THE LOGIC.
//!
//! This crate decides which page a client sees next while it answers a
//! multi-question survey, one question at a time and strictly in order.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Owns no transport: session state and completion markers are passed in
//! - Returns transitions as data (`Redirect` or `Render`), never responses
//! - Reads from a catalog that is immutable after startup
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod markers;
pub mod primitives;
pub mod progression;
pub mod session;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Question, Response, SurveyDefinition, SurveyError, SurveyId};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::Catalog;
pub use markers::{CompletionMarkers, MemoryMarkers, marker_name};
pub use progression::{Progression, Route, SurveySummary, Transition, View};
pub use session::{SessionState, SurveyState};
