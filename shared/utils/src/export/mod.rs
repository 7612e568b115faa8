//! Output Writers
//!
//! Serializes the content model and the study plan to JSON and to CSV
//! spreadsheets. The writers are generic over `std::io::Write`;
//! `OutputWriter` names the files and places them in the output directory.

pub mod json;
pub mod spreadsheet;

pub use json::{write_content_json, write_plan_json};
pub use spreadsheet::{write_content_csv, write_plan_csv, BUFFER_DAY_NOTE};

use chrono::{DateTime, Local};
use ncert_models::{ContentModel, StudyPlan};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{StudyError, StudyResult};

/// Paths written for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub content_json: PathBuf,
    pub content_spreadsheet: PathBuf,
    pub plan_json: PathBuf,
    pub plan_spreadsheet: PathBuf,
}

/// Writes every output of a run into one directory under a shared timestamp.
pub struct OutputWriter {
    directory: PathBuf,
    timestamp: String,
}

impl OutputWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_timestamp(directory, Local::now())
    }

    pub fn with_timestamp(directory: impl Into<PathBuf>, at: DateTime<Local>) -> Self {
        Self {
            directory: directory.into(),
            timestamp: at.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    pub fn content_json_path(&self) -> PathBuf {
        self.directory.join(format!("chapter_extract_{}.json", self.timestamp))
    }

    pub fn content_spreadsheet_path(&self) -> PathBuf {
        self.directory.join(format!("science_content_{}.csv", self.timestamp))
    }

    pub fn plan_json_path(&self, days: u32) -> PathBuf {
        self.directory
            .join(format!("study_planner_{}days_{}.json", days, self.timestamp))
    }

    pub fn plan_spreadsheet_path(&self, days: u32) -> PathBuf {
        self.directory
            .join(format!("study_planner_{}days_{}.csv", days, self.timestamp))
    }

    pub fn export(&self, content: &ContentModel, plan: &StudyPlan) -> StudyResult<ExportedFiles> {
        std::fs::create_dir_all(&self.directory).map_err(|e| {
            StudyError::export(format!(
                "cannot create output directory {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let files = ExportedFiles {
            content_json: self.content_json_path(),
            content_spreadsheet: self.content_spreadsheet_path(),
            plan_json: self.plan_json_path(plan.total_days()),
            plan_spreadsheet: self.plan_spreadsheet_path(plan.total_days()),
        };

        write_file(&files.content_json, |w| write_content_json(w, content))?;
        info!(path = %files.content_json.display(), "JSON saved");

        write_file(&files.content_spreadsheet, |w| write_content_csv(w, content))?;
        info!(path = %files.content_spreadsheet.display(), "Content spreadsheet saved");

        write_file(&files.plan_json, |w| write_plan_json(w, plan))?;
        write_file(&files.plan_spreadsheet, |w| write_plan_csv(w, plan))?;
        info!(
            path = %files.plan_spreadsheet.display(),
            days = plan.total_days(),
            "Study planner saved"
        );

        Ok(files)
    }
}

fn write_file<F>(path: &Path, write: F) -> StudyResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> StudyResult<()>,
{
    let file = File::create(path)
        .map_err(|e| StudyError::export(format!("cannot create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}
