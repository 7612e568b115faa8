//! NCERT Content Extraction
//!
//! Downloads NCERT Class 8 Science chapters, extracts structured content with
//! Gemini, and writes the content and a day-wise study planner to JSON and
//! CSV.

use anyhow::{Context, Result};
use clap::Parser;
use ncert_utils::{
    generate_study_plan, init_logging, parse_day_count, validate_day_count, AppConfig,
    OutputWriter, StudyError,
};
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

mod extraction;
mod gemini_client;
mod pdf_processor;
mod pipeline;

use extraction::ModelExtractor;
use gemini_client::GeminiClient;
use pdf_processor::PdfProcessor;
use pipeline::ExtractionPipeline;

#[derive(Parser)]
#[command(name = "ncert-extract")]
#[command(about = "Extract NCERT Science chapters and build a study planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of study days (5-30); prompted for when omitted
    #[arg(short, long)]
    days: Option<i64>,

    /// Extra configuration file layered over config/
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the JSON and CSV outputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Run failed");
            eprintln!("[ERROR] {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StudyError>())
        .map(|e| e.exit_code().clamp(1, 255) as u8)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load_with_file(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    init_logging(&config.logging)?;
    config.validate()?;

    // Reject a bad --days before spending API calls on extraction.
    if let Some(days) = cli.days {
        validate_day_count(days)?;
    }

    let run_id = Uuid::new_v4();
    let span = info_span!("run", %run_id);

    async move {
        let source = PdfProcessor::new(Duration::from_secs(config.extraction.download_timeout_seconds))?;
        let client = GeminiClient::new(&config.gemini)?;
        info!(
            chapters = config.sources.len(),
            model = %client.model(),
            "Starting content extraction"
        );

        let extractor = ModelExtractor::new(client, config.extraction.prompt_chars);
        let pipeline = ExtractionPipeline::new(source, extractor, config.extraction.max_chunk_chars);

        let (content, report) = pipeline.process_all_chapters(&config.sources).await;
        info!(
            processed = report.chapters_processed,
            skipped = report.chapters_skipped,
            chunks_ok = report.chunks_succeeded,
            chunks_failed = report.chunks_failed,
            topics = content.topic_count(),
            "Extraction finished"
        );

        if content.is_empty() {
            return Err(anyhow::Error::new(StudyError::EmptyContent)
                .context("No data extracted. Check the API key and network connection"));
        }

        let days = match cli.days {
            Some(days) => validate_day_count(days)?,
            None => read_day_count(config.planner.default_days)?,
        };

        let plan = generate_study_plan(&content, days)?;
        info!(
            days = plan.total_days(),
            buffer_days = plan.buffer_days().count(),
            "Study plan generated"
        );

        let files = OutputWriter::new(&config.output.directory).export(&content, &plan)?;

        println!();
        println!("[COMPLETED] Task completed successfully!");
        println!("JSON output: {}", files.content_json.display());
        println!("Spreadsheet output: {}", files.content_spreadsheet.display());
        println!("Study planner: {}", files.plan_spreadsheet.display());
        println!("Study planner JSON: {}", files.plan_json.display());

        Ok(())
    }
    .instrument(span)
    .await
}

/// Asks for the day count on stdin. Without a terminal the configured
/// default is used when there is one.
fn read_day_count(default_days: Option<u32>) -> Result<u32> {
    let stdin = std::io::stdin();

    if !stdin.is_terminal() {
        if let Some(days) = default_days {
            info!(days, "Using configured day count");
            return Ok(validate_day_count(i64::from(days))?);
        }
    }

    print!("Enter number of study days (5-30): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    Ok(parse_day_count(&line)?)
}
