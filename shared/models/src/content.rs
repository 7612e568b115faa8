//! Content model for extracted textbook chapters.
//!
//! The tree is chapter -> topics -> subtopics -> content blocks. It is built
//! once per run from the extractor output and is read-only afterwards.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Every chapter extracted during a run, in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ContentModel {
    #[validate]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Chapter {
    /// Chapter number as detected in the text, e.g. "1" or "Chapter 7".
    pub number: Option<String>,
    #[validate(length(min = 1, message = "Chapter name must not be empty"))]
    pub name: String,
    #[validate]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Topic {
    #[validate(length(min = 1, message = "Topic name must not be empty"))]
    pub name: String,
    #[validate]
    pub subtopics: Vec<Subtopic>,
    /// Characters of content text under this topic.
    pub estimated_weight: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Subtopic {
    #[validate(length(min = 1, message = "Subtopic name must not be empty"))]
    pub name: String,
    pub content: Vec<ContentBlock>,
}

/// A single paragraph, activity, figure, table or question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentBlock {
    pub kind: ContentKind,
    pub title_or_caption: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Paragraph,
    Activity,
    Image,
    Table,
    Question,
    Other(String),
}

impl ContentKind {
    /// Maps the free-form `type` label returned by the extractor.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "" | "paragraph" | "text" => Self::Paragraph,
            "activity" => Self::Activity,
            "image" | "figure" | "diagram" => Self::Image,
            "table" => Self::Table,
            "question" | "questions" | "exercise" => Self::Question,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Activity => "activity",
            Self::Image => "image",
            Self::Table => "table",
            Self::Question => "question",
            Self::Other(label) => label,
        }
    }
}

impl ContentModel {
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self { chapters }
    }

    pub fn topic_count(&self) -> usize {
        self.chapters.iter().map(|c| c.topics.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topic_count() == 0
    }

    /// All topics in chapter-then-topic order, with their positions.
    pub fn flattened_topics(&self) -> impl Iterator<Item = (usize, usize, &Chapter, &Topic)> + '_ {
        self.chapters.iter().enumerate().flat_map(|(chapter_index, chapter)| {
            chapter
                .topics
                .iter()
                .enumerate()
                .map(move |(topic_index, topic)| (chapter_index, topic_index, chapter, topic))
        })
    }
}

impl Chapter {
    pub fn new(number: Option<String>, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            topics: Vec::new(),
        }
    }

    /// Appends a topic, folding it into the last one when it continues it.
    ///
    /// Text is extracted in chunks, so a heading cut by a chunk boundary comes
    /// back twice in a row under the same name.
    pub fn push_topic(&mut self, topic: Topic) {
        match self.topics.last_mut() {
            Some(last) if last.name == topic.name => {
                last.subtopics.extend(topic.subtopics);
                last.estimated_weight = last.computed_weight();
            }
            _ => self.topics.push(topic),
        }
    }
}

impl Topic {
    pub fn new(name: impl Into<String>, subtopics: Vec<Subtopic>) -> Self {
        let mut topic = Self {
            name: name.into(),
            subtopics,
            estimated_weight: 0,
        };
        topic.estimated_weight = topic.computed_weight();
        topic
    }

    fn computed_weight(&self) -> usize {
        self.subtopics
            .iter()
            .flat_map(|s| s.content.iter())
            .map(|block| block.text.chars().count())
            .sum()
    }
}

impl Subtopic {
    pub fn new(name: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// The subtopic's content as one string.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| block.text.as_str())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ContentBlock {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Paragraph,
            title_or_caption: String::new(),
            text: text.into(),
        }
    }
}
