//! PDF Processor
//!
//! Fetches chapter PDFs from a URL or the local filesystem and extracts
//! their text.

use async_trait::async_trait;
use ncert_utils::{StudyError, StudyResult};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Extracted document text.
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub text: String,
    pub pages: Vec<PageContent>,
}

/// Single page content
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub text: String,
}

/// Supplies page-level text for a document locator.
#[async_trait]
pub trait TextSource {
    async fn fetch_text(&self, locator: &str) -> StudyResult<PdfContent>;
}

/// PDF processor
pub struct PdfProcessor {
    client: Client,
}

impl PdfProcessor {
    pub fn new(download_timeout: Duration) -> StudyResult<Self> {
        let client = Client::builder()
            .timeout(download_timeout)
            .build()
            .map_err(|e| StudyError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Extract page text from PDF bytes.
    ///
    /// The parser runs on the blocking pool; a panic on malformed input
    /// comes back as an error like any other extraction failure.
    pub async fn extract(&self, data: Vec<u8>) -> StudyResult<PdfContent> {
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&data)
        })
        .await
        .map_err(|e| StudyError::document_processing(format!("PDF parser aborted: {}", e)))?
        .map_err(|e| {
            StudyError::document_processing(format!("Failed to extract text from PDF: {}", e))
        })?;

        Ok(PdfContent::from_pages(pages))
    }

    async fn download(&self, url: &str) -> StudyResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudyError::external_service(
                "PDF download",
                format!("{} returned {}", url, status),
            ));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl TextSource for PdfProcessor {
    async fn fetch_text(&self, locator: &str) -> StudyResult<PdfContent> {
        let data = if is_remote(locator) {
            self.download(locator).await?
        } else {
            tokio::fs::read(locator).await.map_err(|e| {
                StudyError::document_processing(format!("Failed to read {}: {}", locator, e))
            })?
        };
        debug!(locator, bytes = data.len(), "Fetched PDF");

        let content = self.extract(data).await?;
        for page in content.pages.iter().filter(|p| p.text.trim().is_empty()) {
            debug!(locator, page = page.page_number, "Page has no extractable text");
        }
        debug!(locator, pages = content.pages.len(), "Extracted PDF text");

        if content.text.trim().is_empty() {
            return Err(StudyError::document_processing(format!(
                "No text extracted from {}",
                locator
            )));
        }

        Ok(content)
    }
}

fn is_remote(locator: &str) -> bool {
    let lower = locator.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl PdfContent {
    /// Numbers pages from 1. The joined text ends every page with a newline.
    pub fn from_pages(pages: Vec<String>) -> Self {
        let text = pages.iter().fold(String::new(), |mut acc, page| {
            acc.push_str(page);
            acc.push('\n');
            acc
        });

        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageContent {
                page_number: i + 1,
                text,
            })
            .collect();

        Self { text, pages }
    }
}

/// Builds a PDF with one line of Courier text per page, optionally with a
/// font encoding the parser does not know.
#[cfg(test)]
pub(crate) fn sample_pdf(pages: &[&str], font_encoding: Option<&str>) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut font = dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    };
    if let Some(encoding) = font_encoding {
        font.set("Encoding", Object::Name(encoding.as_bytes().to_vec()));
    }
    let font_id = doc.add_object(font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            Object::Reference(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }))
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn processor() -> PdfProcessor {
        PdfProcessor::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_from_pages_joins_with_newlines() {
        let content = PdfContent::from_pages(vec![
            "Crop Production".to_string(),
            "Sowing".to_string(),
            String::new(),
        ]);

        assert_eq!(content.pages.len(), 3);
        assert_eq!(content.pages[1].page_number, 2);
        assert_eq!(content.pages[1].text, "Sowing");
        assert_eq!(content.text, "Crop Production\nSowing\n\n");
    }

    #[tokio::test]
    async fn test_extract_keeps_page_boundaries() {
        let data = sample_pdf(&["Crops", "Irrigation", "Harvest"], None);

        let content = processor().extract(data).await.unwrap();

        let pages: Vec<&str> = content.pages.iter().map(|p| p.text.trim()).collect();
        assert_eq!(pages, vec!["Crops", "Irrigation", "Harvest"]);
        assert_eq!(content.pages[2].page_number, 3);
        let words: Vec<&str> = content.text.split_whitespace().collect();
        assert_eq!(words, vec!["Crops", "Irrigation", "Harvest"]);
    }

    #[tokio::test]
    async fn test_parser_panic_becomes_error() {
        let data = sample_pdf(&["Sound"], Some("FooEncoding"));

        let err = processor().extract(data).await.unwrap_err();
        assert_eq!(err.error_code(), "DOCUMENT_PROCESSING_ERROR");
    }

    #[test]
    fn test_remote_locator_detection() {
        assert!(is_remote("https://ncert.nic.in/textbook/pdf/hesc106.pdf"));
        assert!(is_remote("HTTP://example.org/a.pdf"));
        assert!(!is_remote("pdfs/hesc106.pdf"));
    }

    #[tokio::test]
    async fn test_extract_rejects_non_pdf_bytes() {
        let err = processor()
            .extract(b"definitely not a pdf".to_vec())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "DOCUMENT_PROCESSING_ERROR");
    }

    #[tokio::test]
    async fn test_missing_local_file() {
        let err = processor().fetch_text("does/not/exist.pdf").await.unwrap_err();
        assert_eq!(err.error_code(), "DOCUMENT_PROCESSING_ERROR");
    }

    #[tokio::test]
    async fn test_local_file_that_is_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hesc106.pdf");
        std::fs::write(&path, "plain text pretending to be a chapter").unwrap();

        let err = processor().fetch_text(path.to_str().unwrap()).await.unwrap_err();
        assert_eq!(err.error_code(), "DOCUMENT_PROCESSING_ERROR");
    }

    #[tokio::test]
    async fn test_download_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/textbook/pdf/hesc106.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/textbook/pdf/hesc106.pdf", server.uri());
        let err = processor().fetch_text(&url).await.unwrap_err();

        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
        assert!(err.to_string().contains("404"));
    }
}
