//! JSON output for extracted chapters and study plans.

use ncert_models::{ContentModel, StudyPlan};
use std::io::Write;

use crate::error::StudyResult;

/// Writes the chapters as a pretty-printed JSON array.
pub fn write_content_json<W: Write>(mut writer: W, content: &ContentModel) -> StudyResult<()> {
    serde_json::to_writer_pretty(&mut writer, &content.chapters)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_plan_json<W: Write>(mut writer: W, plan: &StudyPlan) -> StudyResult<()> {
    serde_json::to_writer_pretty(&mut writer, plan)?;
    writeln!(writer)?;
    Ok(())
}
