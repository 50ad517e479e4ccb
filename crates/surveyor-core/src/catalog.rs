//! # Survey Catalog
//!
//! The closed, read-only set of surveys a server offers.
//!
//! A catalog is built once at startup, either from the built-in surveys or
//! from a TOML file, validated, and never mutated afterwards. Lookups by id
//! either return the definition or `SurveyError::SurveyNotFound`.
//!
//! ## File Format
//!
//! ```toml
//! [[survey]]
//! id = "satisfaction"
//! title = "Customer Satisfaction Survey"
//! instructions = "Please fill out a survey about your experience with us."
//!
//! [[survey.questions]]
//! prompt = "Have you shopped here before?"
//! choices = ["Yes", "No"]
//! ```

use crate::primitives::{MAX_CHOICES_PER_QUESTION, MAX_QUESTIONS_PER_SURVEY};
use crate::{Question, SurveyDefinition, SurveyError, SurveyId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Maximum catalog file size (1 MB).
const MAX_CATALOG_FILE_SIZE: u64 = 1024 * 1024;

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "survey", default)]
    surveys: Vec<SurveyDefinition>,
}

/// Immutable mapping from survey id to definition.
///
/// Uses BTreeMap so listings come out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    surveys: BTreeMap<SurveyId, SurveyDefinition>,
}

impl Catalog {
    /// Build a catalog from definitions, validating each one.
    pub fn new(surveys: Vec<SurveyDefinition>) -> Result<Self, SurveyError> {
        let mut map = BTreeMap::new();
        for survey in surveys {
            validate_survey(&survey)?;
            if map.contains_key(&survey.id) {
                return Err(SurveyError::InvalidCatalog(format!(
                    "Duplicate survey id '{}'",
                    survey.id
                )));
            }
            map.insert(survey.id.clone(), survey);
        }
        Ok(Self { surveys: map })
    }

    /// The surveys shipped with Surveyor.
    #[must_use]
    pub fn builtin() -> Self {
        let yes_no = ["Yes", "No"];
        let satisfaction = SurveyDefinition::new(
            SurveyId::new("satisfaction"),
            "Customer Satisfaction Survey",
            "Please fill out a survey about your experience with us.",
            vec![
                Question::new("Have you shopped here before?", &yes_no),
                Question::new("Did someone else shop with you today?", &yes_no),
                Question::new(
                    "On average, how much do you spend a month on frisbees?",
                    &["Less than $10,000", "$10,000 or more"],
                ),
                Question::new("Are you likely to shop here again?", &yes_no),
            ],
        );
        let personality = SurveyDefinition::new(
            SurveyId::new("personality"),
            "Rithm Personality Test",
            "Learn more about yourself with our personality quiz!",
            vec![
                Question::new("Do you ever dream about code?", &yes_no),
                Question::new("Do you ever have nightmares about code?", &yes_no),
                Question::new(
                    "Do you prefer porcupines or hedgehogs?",
                    &["Porcupines", "Hedgehogs"],
                ),
                Question::new(
                    "Which is the worst function name, and why?",
                    &["ruby_is_better()", "do_stuff()", "run_me()"],
                )
                .with_text(),
            ],
        );

        let surveys = [satisfaction, personality]
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        Self { surveys }
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, SurveyError> {
        let file: CatalogFile = toml::from_str(input)
            .map_err(|e| SurveyError::InvalidCatalog(format!("Malformed catalog: {}", e)))?;
        if file.surveys.is_empty() {
            return Err(SurveyError::InvalidCatalog(
                "Catalog defines no surveys".to_string(),
            ));
        }
        Self::new(file.surveys)
    }

    /// Load and validate a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| {
            SurveyError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CATALOG_FILE_SIZE {
            return Err(SurveyError::InvalidCatalog(format!(
                "Catalog file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CATALOG_FILE_SIZE
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            SurveyError::IoError(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Look up a survey by id.
    pub fn get(&self, id: &str) -> Result<&SurveyDefinition, SurveyError> {
        self.surveys
            .get(&SurveyId::new(id))
            .ok_or_else(|| SurveyError::SurveyNotFound(id.to_string()))
    }

    /// Iterate over surveys in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SurveyDefinition> {
        self.surveys.values()
    }

    /// Number of surveys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surveys.len()
    }

    /// Check if the catalog has no surveys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surveys.is_empty()
    }
}

/// Structural checks for one survey definition.
fn validate_survey(survey: &SurveyDefinition) -> Result<(), SurveyError> {
    SurveyId::parse(survey.id.as_str())?;
    let id = &survey.id;

    if survey.title.trim().is_empty() {
        return Err(SurveyError::InvalidCatalog(format!(
            "Survey '{}' has an empty title",
            id
        )));
    }
    if survey.questions.is_empty() {
        return Err(SurveyError::InvalidCatalog(format!(
            "Survey '{}' has no questions",
            id
        )));
    }
    if survey.questions.len() > MAX_QUESTIONS_PER_SURVEY {
        return Err(SurveyError::InvalidCatalog(format!(
            "Survey '{}' has {} questions, maximum is {}",
            id,
            survey.questions.len(),
            MAX_QUESTIONS_PER_SURVEY
        )));
    }

    for (index, question) in survey.questions.iter().enumerate() {
        if question.prompt.trim().is_empty() {
            return Err(SurveyError::InvalidCatalog(format!(
                "Survey '{}' question {} has an empty prompt",
                id, index
            )));
        }
        if question.choices.is_empty() || question.choices.len() > MAX_CHOICES_PER_QUESTION {
            return Err(SurveyError::InvalidCatalog(format!(
                "Survey '{}' question {} must offer between 1 and {} choices",
                id, index, MAX_CHOICES_PER_QUESTION
            )));
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
