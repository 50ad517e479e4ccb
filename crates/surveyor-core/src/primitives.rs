//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Surveyor CORE.
//!
//! These values are compiled into the binary. The completion TTL can be
//! overridden by configuration; the input limits cannot.

/// Lifetime of a completion marker, in seconds.
///
/// While a marker is alive the survey cannot be selected again by the
/// same client.
pub const COMPLETION_MARKER_TTL_SECS: u64 = 60;

/// Prefix of the completion marker name. The full name is `completed_{id}`.
pub const COMPLETION_MARKER_PREFIX: &str = "completed_";

/// Value stored under a completion marker.
pub const COMPLETION_MARKER_VALUE: &str = "yes";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for survey ids.
pub const MAX_SURVEY_ID_LENGTH: usize = 64;

/// Maximum length for a submitted choice label.
pub const MAX_CHOICE_LENGTH: usize = 256;

/// Maximum length for submitted free text (4KB).
pub const MAX_TEXT_LENGTH: usize = 4096;

// =============================================================================
// CATALOG LIMITS
// =============================================================================

/// Maximum number of questions in a single survey.
pub const MAX_QUESTIONS_PER_SURVEY: usize = 200;

/// Maximum number of choices offered by a single question.
pub const MAX_CHOICES_PER_QUESTION: usize = 32;
