pub mod config;
pub mod logging;
pub mod error;
pub mod validation;
pub mod planner;
pub mod export;

pub use config::*;
pub use logging::*;
pub use error::*;
pub use validation::*;
pub use planner::{day_sizes, generate_study_plan};
pub use export::{ExportedFiles, OutputWriter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.extraction.max_chunk_chars, 6000);
        assert_eq!(config.extraction.prompt_chars, 4000);
        assert_eq!(config.sources.len(), 4);
        assert_eq!(config.sources[3].name, "Sound");
        assert_eq!(config.sources[3].locator, "https://ncert.nic.in/textbook/pdf/hesc113.pdf");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert_eq!(config.validate().unwrap_err().error_code(), "CONFIGURATION_ERROR");

        config.gemini.api_key = "AIzaSyTestKey".to_string();
        assert!(config.validate().is_ok());

        config.planner.default_days = Some(45);
        assert_eq!(config.validate().unwrap_err(), StudyError::invalid_day_count(45));

        config.planner.default_days = Some(10);
        config.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.toml");
        std::fs::write(
            &path,
            r#"
[gemini]
api_key = "AIzaFromFile"
model = "gemini-1.5-pro"

[planner]
default_days = 12

[[sources]]
name = "Sound"
locator = "pdfs/hesc113.pdf"
"#,
        )
        .unwrap();

        let config = AppConfig::load_with_file(Some(&path)).unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.timeout_seconds, 120);
        assert_eq!(config.planner.default_days, Some(12));
        assert_eq!(config.sources, vec![ChapterSource {
            name: "Sound".to_string(),
            locator: "pdfs/hesc113.pdf".to_string(),
        }]);
    }

    #[test]
    fn test_error_codes() {
        let error = StudyError::validation("days", "not a number");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.exit_code(), 2);

        assert_eq!(StudyError::EmptyContent.error_code(), "EMPTY_CONTENT");
        assert_eq!(StudyError::invalid_day_count(31).to_string(), "Invalid day count: 31 (expected 5-30)");
    }
}
