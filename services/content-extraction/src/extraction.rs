//! Content Extraction
//!
//! Prompts the generative model with chunks of chapter text and turns its
//! loosely structured JSON replies into strict `Chapter` values. Replies that
//! do not fit the content model are rejected here instead of being passed on
//! to the planner.

use async_trait::async_trait;
use ncert_models::{Chapter, ContentBlock, ContentKind, Subtopic, Topic};
use ncert_utils::{validate_model, StudyError, StudyResult};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

use crate::gemini_client::GenerativeModel;

/// Produces a structured chapter from a piece of chapter text.
#[async_trait]
pub trait ContentExtractor {
    async fn extract_chapter(&self, text: &str, chapter_name: &str) -> StudyResult<Chapter>;
}

/// `ContentExtractor` backed by a generative model.
pub struct ModelExtractor<M> {
    model: M,
    prompt_chars: usize,
}

impl<M: GenerativeModel + Send + Sync> ModelExtractor<M> {
    pub fn new(model: M, prompt_chars: usize) -> Self {
        Self {
            model,
            prompt_chars,
        }
    }
}

#[async_trait]
impl<M: GenerativeModel + Send + Sync> ContentExtractor for ModelExtractor<M> {
    async fn extract_chapter(&self, text: &str, chapter_name: &str) -> StudyResult<Chapter> {
        let prompt = build_extraction_prompt(text, chapter_name, self.prompt_chars);
        let reply = self.model.generate(&prompt).await?;

        let value = clean_json_response(&reply)
            .ok_or_else(|| StudyError::extraction("Response contains no valid JSON"))?;

        chapter_from_value(value, chapter_name)
    }
}

/// Splits text on whitespace into chunks shorter than `max_chars`.
///
/// Words are never split, so a single word longer than the limit becomes a
/// chunk of its own.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if !current.is_empty() && current_chars + 1 + word_chars >= max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

pub fn build_extraction_prompt(chunk: &str, chapter_name: &str, prompt_chars: usize) -> String {
    let excerpt = truncate_chars(chunk, prompt_chars);
    let chapter_name_json = Value::String(chapter_name.to_string()).to_string();

    format!(
        r#"
Extract and structure content from this Class 8 NCERT Science chapter text. Return ONLY valid JSON, no explanations.

Text: {excerpt}...

Required JSON format:
{{
  "chapter_number": "detect from text",
  "chapter_name": {chapter_name_json},
  "topics": [
    {{
      "topic_name": "main heading from text",
      "sub_topics": [
        {{
          "sub_topic_name": "sub heading",
          "content": [
            {{
              "type": "paragraph",
              "title_or_caption": "",
              "data_or_text": "actual text content"
            }}
          ]
        }}
      ]
    }}
  ]
}}

Extract topics, sub-topics, paragraphs, activities, images, tables, and questions as they appear. Return only the JSON structure.
"#
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Pulls the JSON payload out of a model reply.
///
/// Code fences are stripped, then the outermost `{...}` span, the outermost
/// `[...]` span and finally the whole reply are tried in that order.
pub fn clean_json_response(reply: &str) -> Option<Value> {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    static ARRAY: OnceLock<Regex> = OnceLock::new();
    static FENCE: OnceLock<Regex> = OnceLock::new();

    if reply.trim().is_empty() {
        return None;
    }

    let fence = FENCE.get_or_init(|| Regex::new(r"```[A-Za-z]*").expect("valid fence regex"));
    let cleaned = fence.replace_all(reply, "");
    let cleaned = cleaned.trim();

    let object = OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid object regex"));
    let array = ARRAY.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("valid array regex"));

    [object, array]
        .into_iter()
        .filter_map(|pattern| pattern.find(cleaned))
        .find_map(|m| serde_json::from_str(m.as_str()).ok())
        .or_else(|| serde_json::from_str(cleaned).ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawChapter {
    chapter_number: Option<Value>,
    chapter_name: Option<Value>,
    topics: Vec<RawTopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTopic {
    topic_name: Option<Value>,
    sub_topics: Vec<RawSubtopic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSubtopic {
    sub_topic_name: Option<Value>,
    content: Vec<RawContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawContent {
    #[serde(rename = "type")]
    kind: Option<Value>,
    title_or_caption: Option<Value>,
    data_or_text: Option<Value>,
}

/// Converts a model reply into a validated chapter.
///
/// The reply must be an object, or an array whose first element is one. The
/// caller's chapter name wins over the one the model echoes back.
pub fn chapter_from_value(value: Value, chapter_name: &str) -> StudyResult<Chapter> {
    let object = match value {
        Value::Object(_) => value,
        Value::Array(items) => {
            if items.len() > 1 {
                warn!(
                    chapter = chapter_name,
                    discarded = items.len() - 1,
                    "Response array holds several chapters; keeping the first"
                );
            }
            items
                .into_iter()
                .next()
                .filter(Value::is_object)
                .ok_or_else(|| StudyError::extraction("Response array holds no chapter object"))?
        }
        other => {
            return Err(StudyError::extraction(format!(
                "Expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let raw: RawChapter = serde_json::from_value(object)
        .map_err(|e| StudyError::extraction(format!("Response does not match chapter schema: {}", e)))?;

    let name = Some(chapter_name.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .or_else(|| raw.chapter_name.as_ref().and_then(scalar_text))
        .ok_or_else(|| StudyError::validation("chapter_name", "Chapter has no name"))?;

    let mut chapter = Chapter::new(raw.chapter_number.as_ref().and_then(scalar_text), name);

    for (t, raw_topic) in raw.topics.into_iter().enumerate() {
        let topic_name = required_name(raw_topic.topic_name.as_ref(), || format!("topics[{}].topic_name", t))?;

        let mut subtopics = Vec::with_capacity(raw_topic.sub_topics.len());
        for (s, raw_subtopic) in raw_topic.sub_topics.into_iter().enumerate() {
            let subtopic_name = required_name(raw_subtopic.sub_topic_name.as_ref(), || {
                format!("topics[{}].sub_topics[{}].sub_topic_name", t, s)
            })?;
            let content = raw_subtopic.content.into_iter().map(content_block).collect();
            subtopics.push(Subtopic::new(subtopic_name, content));
        }

        chapter.push_topic(Topic::new(topic_name, subtopics));
    }

    validate_model(&chapter)?;
    Ok(chapter)
}

fn required_name(value: Option<&Value>, field: impl FnOnce() -> String) -> StudyResult<String> {
    value
        .and_then(scalar_text)
        .ok_or_else(|| StudyError::validation(field(), "missing or blank name"))
}

fn content_block(raw: RawContent) -> ContentBlock {
    ContentBlock {
        kind: ContentKind::from_label(
            raw.kind.as_ref().and_then(scalar_text).as_deref().unwrap_or(""),
        ),
        title_or_caption: raw.title_or_caption.as_ref().and_then(scalar_text).unwrap_or_default(),
        text: raw.data_or_text.as_ref().map(block_text).unwrap_or_default(),
    }
}

/// Trimmed, non-blank text of a string, number or bool.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

/// Block text may come back as a list of lines or a table of rows.
fn block_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(block_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => value.to_string(),
        Value::Null => String::new(),
        other => scalar_text(other).unwrap_or_default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
