//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::Settings;
use surveyor_core::{Catalog, SurveyError};

/// Describe where the catalog comes from.
fn catalog_source(settings: &Settings) -> String {
    settings
        .catalog_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(settings: Settings, host: &str, port: u16) -> Result<(), SurveyError> {
    let catalog = settings.load_catalog()?;

    println!("Surveyor Survey Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:           {}", host);
    println!("  Port:           {}", port);
    println!("  Catalog:        {} ({} surveys)", catalog_source(&settings), catalog.len());
    println!("  Completion TTL: {}s", settings.completion_ttl.as_secs());
    println!("  Session TTL:    {}s", settings.session_ttl.as_secs());
    println!();
    println!("Endpoints:");
    println!("  GET  /                 - Select a survey");
    println!("  POST /                 - Choose a survey");
    println!("  POST /begin            - Start the survey");
    println!("  POST /answer           - Answer the current question");
    println!("  GET  /questions/{{n}}    - Show question n");
    println!("  GET  /complete         - Completion summary");
    println!("  GET  /health           - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, catalog, settings).await
}

// =============================================================================
// SURVEYS COMMAND
// =============================================================================

/// List surveys in the catalog.
pub fn cmd_surveys(settings: &Settings, json_mode: bool, verbose: bool) -> Result<(), SurveyError> {
    let catalog = settings.load_catalog()?;

    if json_mode {
        let surveys: Vec<serde_json::Value> = catalog
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id,
                    "title": s.title,
                    "instructions": s.instructions,
                    "questions": s.len(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&surveys).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Surveys ({})", catalog_source(settings));
    println!("==================");
    for survey in catalog.iter() {
        println!("{:<16} {} ({} questions)", survey.id, survey.title, survey.len());
        if verbose {
            for (index, question) in survey.questions.iter().enumerate() {
                let text = if question.allow_text { " +text" } else { "" };
                println!(
                    "  {:>3}. {} [{}]{}",
                    index,
                    question.prompt,
                    question.choices.join(" / "),
                    text
                );
            }
        }
    }

    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Validate the catalog and summarize it.
pub fn cmd_check(settings: &Settings, json_mode: bool) -> Result<(), SurveyError> {
    let catalog = settings.load_catalog()?;
    let questions = total_questions(&catalog);

    if json_mode {
        let output = serde_json::json!({
            "catalog": catalog_source(settings),
            "valid": true,
            "surveys": catalog.len(),
            "questions": questions,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!(
        "Catalog OK: {} surveys, {} questions ({})",
        catalog.len(),
        questions,
        catalog_source(settings)
    );
    Ok(())
}

fn total_questions(catalog: &Catalog) -> usize {
    catalog.iter().map(|s| s.len()).sum()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_question_total() {
        assert_eq!(total_questions(&Catalog::builtin()), 8);
    }

    #[test]
    fn check_reports_invalid_catalog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[[survey]]\nid = \"x\"\n").expect("write");

        let settings = Settings {
            catalog_path: Some(path),
            ..Settings::default()
        };
        assert!(matches!(
            cmd_check(&settings, true),
            Err(SurveyError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn surveys_lists_builtin() {
        assert!(cmd_surveys(&Settings::default(), true, false).is_ok());
    }
}
