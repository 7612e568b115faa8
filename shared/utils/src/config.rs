use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{StudyError, StudyResult};
use crate::validation::{validate_api_key, validate_day_count};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub extraction: ExtractionConfig,
    pub planner: PlannerConfig,
    pub output: OutputConfig,
    pub sources: Vec<ChapterSource>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Upper bound on characters per chunk sent for extraction.
    pub max_chunk_chars: usize,
    /// Characters of each chunk quoted in the prompt.
    pub prompt_chars: usize,
    pub download_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Used when `--days` is not given and stdin is not interactive.
    pub default_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

/// A textbook chapter to process: a display name and a URL or local path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChapterSource {
    pub name: String,
    pub locator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_file(None)
    }

    /// Layered load: config files, an optional explicit file, then
    /// `NCERT__*` environment variables.
    pub fn load_with_file(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(Environment::with_prefix("NCERT").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> StudyResult<()> {
        validate_api_key(&self.gemini.api_key)?;

        if let Some(days) = self.planner.default_days {
            validate_day_count(i64::from(days))?;
        }
        if self.extraction.max_chunk_chars == 0 || self.extraction.prompt_chars == 0 {
            return Err(StudyError::configuration(
                "extraction.max_chunk_chars and extraction.prompt_chars must be positive",
            ));
        }
        if self.sources.is_empty() {
            return Err(StudyError::configuration("no chapter sources configured"));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            extraction: ExtractionConfig::default(),
            planner: PlannerConfig::default(),
            output: OutputConfig::default(),
            sources: default_sources(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-1.5-flash".to_string(),
            max_output_tokens: 8192,
            temperature: 0.1,
            timeout_seconds: 120,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 6000,
            prompt_chars: 4000,
            download_timeout_seconds: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// NCERT Class 8 Science chapters processed when no sources are configured.
pub fn default_sources() -> Vec<ChapterSource> {
    [
        ("Crop Production and Management", "hesc106"),
        ("Microorganisms: Friend and Foe", "hesc107"),
        ("Synthetic Fibres and Plastics", "hesc108"),
        ("Sound", "hesc113"),
    ]
    .into_iter()
    .map(|(name, code)| ChapterSource {
        name: name.to_string(),
        locator: format!("https://ncert.nic.in/textbook/pdf/{}.pdf", code),
    })
    .collect()
}
