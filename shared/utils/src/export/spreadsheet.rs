//! CSV spreadsheets: one row per content block, and one row per
//! (day, topic) pair for the planner.

use ncert_models::{ContentModel, StudyPlan};
use std::io::Write;

use crate::error::StudyResult;

pub const CONTENT_HEADERS: [&str; 7] = [
    "Chapter_Number",
    "Chapter_Name",
    "Topic",
    "Sub_Topic",
    "Content_Type",
    "Title_Caption",
    "Content_Data",
];

pub const PLAN_HEADERS: [&str; 5] = ["Day", "Chapter", "Topic", "Estimated_Weight", "Notes"];

/// Note written on days with no assigned topics.
pub const BUFFER_DAY_NOTE: &str = "Review / buffer day";

pub fn write_content_csv<W: Write>(writer: W, content: &ContentModel) -> StudyResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CONTENT_HEADERS)?;

    for chapter in &content.chapters {
        let number = chapter.number.as_deref().unwrap_or("");
        for topic in &chapter.topics {
            for subtopic in &topic.subtopics {
                for block in &subtopic.content {
                    csv.write_record([
                        number,
                        chapter.name.as_str(),
                        topic.name.as_str(),
                        subtopic.name.as_str(),
                        block.kind.as_label(),
                        block.title_or_caption.as_str(),
                        block.text.as_str(),
                    ])?;
                }
            }
        }
    }

    csv.flush()?;
    Ok(())
}

pub fn write_plan_csv<W: Write>(writer: W, plan: &StudyPlan) -> StudyResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(PLAN_HEADERS)?;

    for day in plan.days() {
        let day_index = day.day_index().to_string();

        if day.is_buffer_day() {
            csv.write_record([day_index.as_str(), "", "", "0", BUFFER_DAY_NOTE])?;
            continue;
        }

        for topic in day.assigned_topics() {
            let weight = topic.estimated_weight.to_string();
            csv.write_record([
                day_index.as_str(),
                topic.chapter_name.as_str(),
                topic.topic_name.as_str(),
                weight.as_str(),
                "",
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}
