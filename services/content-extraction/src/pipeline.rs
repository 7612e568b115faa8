//! Extraction Pipeline
//!
//! Runs every configured chapter through text fetching, chunking and model
//! extraction, one step at a time, and assembles the content model.
//! Failures are logged and skipped per chapter or per chunk; nothing is
//! retried.

use ncert_models::{Chapter, ContentModel};
use ncert_utils::{log_error, ChapterSource};
use tracing::{info, info_span, warn, Instrument};

use crate::extraction::{chunk_text, ContentExtractor};
use crate::pdf_processor::TextSource;

/// Outcome counters for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub chapters_processed: usize,
    pub chapters_skipped: usize,
    pub chunks_succeeded: usize,
    pub chunks_failed: usize,
}

pub struct ExtractionPipeline<S, E> {
    source: S,
    extractor: E,
    max_chunk_chars: usize,
}

impl<S: TextSource, E: ContentExtractor> ExtractionPipeline<S, E> {
    pub fn new(source: S, extractor: E, max_chunk_chars: usize) -> Self {
        Self {
            source,
            extractor,
            max_chunk_chars,
        }
    }

    pub async fn process_all_chapters(&self, sources: &[ChapterSource]) -> (ContentModel, PipelineReport) {
        let mut report = PipelineReport::default();
        let mut chapters = Vec::new();

        for (i, source) in sources.iter().enumerate() {
            let span = info_span!("chapter", index = i + 1, name = %source.name);
            match self.process_chapter(source, &mut report).instrument(span).await {
                Some(chapter) => {
                    report.chapters_processed += 1;
                    chapters.push(chapter);
                }
                None => report.chapters_skipped += 1,
            }
        }

        (ContentModel::new(chapters), report)
    }

    async fn process_chapter(&self, source: &ChapterSource, report: &mut PipelineReport) -> Option<Chapter> {
        info!(locator = %source.locator, "Processing chapter");

        let content = match self.source.fetch_text(&source.locator).await {
            Ok(content) => content,
            Err(e) => {
                log_error!(e, "No text extracted", locator = %source.locator);
                return None;
            }
        };

        let chunks = chunk_text(&content.text, self.max_chunk_chars);
        info!(pages = content.pages.len(), chunks = chunks.len(), "Created chunks");

        let mut merged: Option<Chapter> = None;
        for (j, chunk) in chunks.iter().enumerate() {
            match self.extractor.extract_chapter(chunk, &source.name).await {
                Ok(part) => {
                    report.chunks_succeeded += 1;
                    info!(chunk = j + 1, total = chunks.len(), topics = part.topics.len(), "Processed chunk");
                    merged = Some(match merged {
                        Some(chapter) => merge_chapter(chapter, part),
                        None => part,
                    });
                }
                Err(e) => {
                    report.chunks_failed += 1;
                    warn!(chunk = j + 1, total = chunks.len(), error = %e, "Failed to process chunk");
                }
            }
        }

        match merged {
            Some(chapter) if !chapter.topics.is_empty() => Some(chapter),
            _ => {
                warn!("No topics extracted for chapter");
                None
            }
        }
    }
}

/// Appends a later chunk's topics to the chapter built so far.
fn merge_chapter(mut chapter: Chapter, part: Chapter) -> Chapter {
    if chapter.number.is_none() {
        chapter.number = part.number;
    }
    for topic in part.topics {
        chapter.push_topic(topic);
    }
    chapter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf_processor::{sample_pdf, PdfContent, PdfProcessor};
    use async_trait::async_trait;
    use ncert_models::{Subtopic, Topic};
    use ncert_utils::{StudyError, StudyResult};
    use std::collections::HashMap;

    struct FakeSource(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl TextSource for FakeSource {
        async fn fetch_text(&self, locator: &str) -> StudyResult<PdfContent> {
            self.0
                .get(locator)
                .map(|text| PdfContent::from_pages(vec![text.to_string()]))
                .ok_or_else(|| StudyError::document_processing(format!("No text extracted from {}", locator)))
        }
    }

    /// Each chunk's first word is its topic; a chunk starting with "FAIL"
    /// is rejected.
    struct HeadingExtractor;

    #[async_trait]
    impl ContentExtractor for HeadingExtractor {
        async fn extract_chapter(&self, text: &str, chapter_name: &str) -> StudyResult<Chapter> {
            let heading = text.split_whitespace().next().unwrap_or_default();
            if heading == "FAIL" {
                return Err(StudyError::extraction("Response contains no valid JSON"));
            }
            let mut chapter = Chapter::new(None, chapter_name);
            chapter.push_topic(Topic::new(heading, vec![Subtopic::new("Body", Vec::new())]));
            Ok(chapter)
        }
    }

    fn sources(names: &[(&str, &str)]) -> Vec<ChapterSource> {
        names
            .iter()
            .map(|(name, locator)| ChapterSource {
                name: name.to_string(),
                locator: locator.to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_chapters_keep_source_order_and_skip_failures() {
        let source = FakeSource(HashMap::from([
            ("crops.pdf", "Crops aaaa Irrigation bbbb"),
            ("sound.pdf", "Vibration cccc FAIL ddddddd Pitch eeee"),
        ]));
        let pipeline = ExtractionPipeline::new(source, HeadingExtractor, 16);

        let (model, report) = pipeline
            .process_all_chapters(&sources(&[
                ("Crop Production and Management", "crops.pdf"),
                ("Synthetic Fibres and Plastics", "missing.pdf"),
                ("Sound", "sound.pdf"),
            ]))
            .await;

        let names: Vec<&str> = model.chapters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Crop Production and Management", "Sound"]);

        let sound: Vec<&str> = model.chapters[1].topics.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(sound, vec!["Vibration", "Pitch"]);

        assert_eq!(
            report,
            PipelineReport {
                chapters_processed: 2,
                chapters_skipped: 1,
                chunks_succeeded: 4,
                chunks_failed: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_repeated_heading_across_chunks_is_merged() {
        let source = FakeSource(HashMap::from([("crops.pdf", "Crops aaaa Crops bbbb Harvest cccc")]));
        let pipeline = ExtractionPipeline::new(source, HeadingExtractor, 13);

        let (model, _) = pipeline
            .process_all_chapters(&sources(&[("Crop Production and Management", "crops.pdf")]))
            .await;

        let topics = &model.chapters[0].topics;
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].name, "Crops");
        assert_eq!(topics[0].subtopics.len(), 2);
        assert_eq!(topics[1].name, "Harvest");
    }

    #[tokio::test]
    async fn test_all_chunks_failing_yields_empty_model() {
        let source = FakeSource(HashMap::from([("sound.pdf", "FAIL everything")]));
        let pipeline = ExtractionPipeline::new(source, HeadingExtractor, 6000);

        let (model, report) = pipeline.process_all_chapters(&sources(&[("Sound", "sound.pdf")])).await;

        assert!(model.is_empty());
        assert_eq!(report.chapters_skipped, 1);
        assert_eq!(report.chunks_failed, 1);
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_skipped_and_next_chapter_processed() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("hesc108.pdf");
        let sound = dir.path().join("hesc113.pdf");
        std::fs::write(&broken, sample_pdf(&["Plastics"], Some("FooEncoding"))).unwrap();
        std::fs::write(&sound, sample_pdf(&["Vibration", "Pitch"], None)).unwrap();

        let source = PdfProcessor::new(std::time::Duration::from_secs(5)).unwrap();
        let pipeline = ExtractionPipeline::new(source, HeadingExtractor, 6000);

        let (model, report) = pipeline
            .process_all_chapters(&[
                ChapterSource {
                    name: "Synthetic Fibres and Plastics".to_string(),
                    locator: broken.display().to_string(),
                },
                ChapterSource {
                    name: "Sound".to_string(),
                    locator: sound.display().to_string(),
                },
            ])
            .await;

        assert_eq!(report.chapters_skipped, 1);
        assert_eq!(report.chapters_processed, 1);
        assert_eq!(model.chapters.len(), 1);
        assert_eq!(model.chapters[0].name, "Sound");
        assert_eq!(model.chapters[0].topics[0].name, "Vibration");
    }

    #[test]
    fn test_merge_keeps_first_detected_number() {
        let first = Chapter::new(None, "Sound");
        let second = Chapter::new(Some("13".to_string()), "Sound");
        let third = Chapter::new(Some("14".to_string()), "Sound");

        let merged = merge_chapter(merge_chapter(first, second), third);
        assert_eq!(merged.number.as_deref(), Some("13"));
    }
}
