//! Study plan models.
//!
//! A `StudyPlan` is a day-indexed partition of every topic in a
//! `ContentModel`. Plans are only built by the planner and never change
//! afterwards, so the fields are private.

use serde::{Deserialize, Serialize};

/// Smallest accepted number of study days.
pub const MIN_STUDY_DAYS: u32 = 5;
/// Largest accepted number of study days.
pub const MAX_STUDY_DAYS: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudyPlan {
    total_days: u32,
    days: Vec<DayEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayEntry {
    day_index: u32,
    assigned_topics: Vec<TopicRef>,
}

/// Points at a topic by its position in the content model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TopicRef {
    pub chapter_index: usize,
    pub topic_index: usize,
    pub chapter_name: String,
    pub topic_name: String,
    pub estimated_weight: usize,
}

impl StudyPlan {
    pub fn new(total_days: u32, days: Vec<DayEntry>) -> Self {
        Self { total_days, days }
    }

    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    pub fn days(&self) -> &[DayEntry] {
        &self.days
    }

    pub fn topic_count(&self) -> usize {
        self.days.iter().map(|d| d.assigned_topics.len()).sum()
    }

    /// Days with nothing assigned.
    pub fn buffer_days(&self) -> impl Iterator<Item = &DayEntry> + '_ {
        self.days.iter().filter(|d| d.is_buffer_day())
    }

    /// Every assigned topic in plan order.
    pub fn topics(&self) -> impl Iterator<Item = &TopicRef> + '_ {
        self.days.iter().flat_map(|d| d.assigned_topics.iter())
    }
}

impl DayEntry {
    pub fn new(day_index: u32, assigned_topics: Vec<TopicRef>) -> Self {
        Self {
            day_index,
            assigned_topics,
        }
    }

    pub fn day_index(&self) -> u32 {
        self.day_index
    }

    pub fn assigned_topics(&self) -> &[TopicRef] {
        &self.assigned_topics
    }

    pub fn is_buffer_day(&self) -> bool {
        self.assigned_topics.is_empty()
    }

    /// Sum of the assigned topics' estimated weights.
    pub fn workload(&self) -> usize {
        self.assigned_topics.iter().map(|t| t.estimated_weight).sum()
    }
}
