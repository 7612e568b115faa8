//! Study Planner
//!
//! Splits every topic of a content model across a number of study days.
//! Days receive contiguous runs of topics in chapter-then-topic order; the
//! first `total % days` days take one extra topic. When there are fewer
//! topics than days the trailing days are left empty as buffer days, so a
//! plan always has exactly `days` entries.

use ncert_models::{ContentModel, DayEntry, StudyPlan, TopicRef};
use tracing::debug;

use crate::error::{StudyError, StudyResult};
use crate::validation::validate_day_count;

/// Builds a plan for `days` days. Pure and deterministic.
pub fn generate_study_plan(content: &ContentModel, days: u32) -> StudyResult<StudyPlan> {
    let days = validate_day_count(i64::from(days))?;

    let topics: Vec<TopicRef> = content
        .flattened_topics()
        .map(|(chapter_index, topic_index, chapter, topic)| TopicRef {
            chapter_index,
            topic_index,
            chapter_name: chapter.name.clone(),
            topic_name: topic.name.clone(),
            estimated_weight: topic.estimated_weight,
        })
        .collect();

    if topics.is_empty() {
        return Err(StudyError::EmptyContent);
    }

    let counts = day_sizes(topics.len(), days as usize);
    debug!(topics = topics.len(), days, ?counts, "Distributing topics");

    let mut remaining = topics.into_iter();
    let entries = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let assigned: Vec<TopicRef> = remaining.by_ref().take(count).collect();
            DayEntry::new(i as u32 + 1, assigned)
        })
        .collect();

    Ok(StudyPlan::new(days, entries))
}

/// Topics per day: `total / days` each, plus one for the first
/// `total % days` days.
pub fn day_sizes(total: usize, days: usize) -> Vec<usize> {
    if days == 0 {
        return Vec::new();
    }

    let base = total / days;
    let remainder = total % days;

    (0..days)
        .map(|day| if day < remainder { base + 1 } else { base })
        .collect()
}
