//! The operation surface: load-mutate-store cycles over a storage backend.
//!
//! Each call fetches the package, runs decode/mutate/encode on the blocking
//! pool so the async executor stays responsive, and stores the result. Any
//! error aborts before the store step, so a failed call never persists a
//! partial package.

use crate::docx::{Document, DocxCodec};
use crate::edit::{
    self, DocumentSnapshot, FormatRequest, Position, UpsertAction,
};
use crate::error::{Error, Result};
use crate::storage::Storage;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use std::sync::Arc;

/// Uniform result envelope for mutating operations.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub locator: String,
}

impl Outcome {
    fn success(locator: &str, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            error: None,
            locator: locator.to_string(),
        }
    }

    fn failure(locator: &str, error: Error) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.to_string()),
            locator: locator.to_string(),
        }
    }
}

/// Result envelope for reads, carrying the projected snapshot on success.
#[derive(Debug, Clone, Serialize)]
pub struct ReadOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub locator: String,
    pub content: Option<DocumentSnapshot>,
}

/// Image input for [`DocumentService::insert_or_edit_image`]: an inline
/// base64 payload, or a locator to fetch the bytes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Base64(String),
    Reference(String),
}

impl ImageSource {
    /// Classify raw caller input: anything that looks like a URL is a
    /// reference, everything else is treated as inline base64.
    pub fn from_request(data: &str) -> Self {
        if data.starts_with("http") {
            Self::Reference(data.to_string())
        } else {
            Self::Base64(data.to_string())
        }
    }
}

/// Document editing operations over a storage backend.
///
/// Holds no per-document state; every call is an independent
/// fetch-decode-mutate-encode-store cycle.
pub struct DocumentService<S> {
    storage: Arc<S>,
    codec: DocxCodec,
}

impl<S: Storage + 'static> DocumentService<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            codec: DocxCodec::new(),
        }
    }

    /// Create a fresh document at `locator`, with an optional titled heading
    /// and an optional first body paragraph.
    pub async fn create_document(
        &self,
        locator: &str,
        title: Option<&str>,
        initial_text: Option<&str>,
    ) -> Outcome {
        let title = title.map(str::to_string);
        let initial_text = initial_text.map(str::to_string);
        let codec = self.codec;
        let result: Result<()> = async {
            let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
                let mut doc = Document::new();
                if let Some(ref title) = title {
                    edit::insert_paragraph(&mut doc, title, Position::End, None, Some("Title"))?;
                }
                if let Some(ref text) = initial_text {
                    edit::insert_paragraph(&mut doc, text, Position::End, None, None)?;
                }
                codec.encode(&mut doc)
            })
            .await
            .map_err(|e| Error::Task(e.to_string()))??;
            self.storage.store(locator, bytes).await
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(locator, "document created");
                Outcome::success(locator, "Document created successfully".to_string())
            },
            Err(err) => {
                tracing::warn!(locator, error = %err, "create failed");
                Outcome::failure(locator, err)
            },
        }
    }

    /// Fetch, decode, and project the document at `locator`.
    pub async fn read_document(&self, locator: &str) -> ReadOutcome {
        let result: Result<DocumentSnapshot> = async {
            let bytes = self.storage.fetch(locator).await?;
            let codec = self.codec;
            tokio::task::spawn_blocking(move || {
                let doc = codec.decode(&bytes)?;
                Ok(edit::snapshot(&doc))
            })
            .await
            .map_err(|e| Error::Task(e.to_string()))?
        }
        .await;

        match result {
            Ok(content) => ReadOutcome {
                success: true,
                error: None,
                locator: locator.to_string(),
                content: Some(content),
            },
            Err(err) => {
                tracing::warn!(locator, error = %err, "read failed");
                ReadOutcome {
                    success: false,
                    error: Some(err.to_string()),
                    locator: locator.to_string(),
                    content: None,
                }
            },
        }
    }

    /// Insert a paragraph of text at the resolved position.
    pub async fn insert_text(
        &self,
        locator: &str,
        text: String,
        position: Position,
        index: Option<usize>,
        style: Option<String>,
    ) -> Outcome {
        self.apply(locator, move |doc| {
            edit::insert_paragraph(doc, &text, position, index, style.as_deref())?;
            Ok("Text inserted successfully".to_string())
        })
        .await
    }

    /// Replace the text of the paragraph at `paragraph_index`.
    pub async fn edit_text(
        &self,
        locator: &str,
        paragraph_index: usize,
        new_text: String,
        preserve_formatting: bool,
    ) -> Outcome {
        self.apply(locator, move |doc| {
            edit::edit_paragraph(doc, paragraph_index, &new_text, preserve_formatting)?;
            Ok(format!("Paragraph {paragraph_index} edited successfully"))
        })
        .await
    }

    /// Insert a new table, or overwrite an existing one by index. New tables
    /// default to the "Table Grid" style.
    pub async fn insert_or_edit_table(
        &self,
        locator: &str,
        grid: Vec<Vec<String>>,
        table_index: Option<usize>,
        position: Position,
        style: Option<String>,
    ) -> Outcome {
        let style = style.unwrap_or_else(|| "Table Grid".to_string());
        self.apply(locator, move |doc| {
            let action = edit::upsert_table(doc, &grid, table_index, position, Some(&style))?;
            Ok(match action {
                UpsertAction::Edited(i) => format!("Table {i} edited successfully"),
                UpsertAction::Inserted => "New table inserted successfully".to_string(),
            })
        })
        .await
    }

    /// Insert an image, or replace an existing one by index.
    ///
    /// A reference source costs a second storage fetch before the edit
    /// cycle starts.
    pub async fn insert_or_edit_image(
        &self,
        locator: &str,
        source: ImageSource,
        width_inches: f64,
        image_index: Option<usize>,
        position: Position,
        index: Option<usize>,
    ) -> Outcome {
        let data = match self.resolve_image_bytes(source).await {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(locator, error = %err, "image payload unresolvable");
                return Outcome::failure(locator, err);
            },
        };

        self.apply(locator, move |doc| {
            let action =
                edit::upsert_image(doc, data, width_inches, image_index, position, index)?;
            Ok(match action {
                UpsertAction::Edited(i) => format!("Image {i} replaced successfully"),
                UpsertAction::Inserted => "Image inserted successfully".to_string(),
            })
        })
        .await
    }

    /// Merge formatting attributes per the request's sparse fields.
    pub async fn format_document(&self, locator: &str, request: FormatRequest) -> Outcome {
        self.apply(locator, move |doc| {
            edit::apply_format(doc, &request);
            Ok("Formatting applied successfully".to_string())
        })
        .await
    }

    async fn resolve_image_bytes(&self, source: ImageSource) -> Result<Vec<u8>> {
        match source {
            ImageSource::Base64(encoded) => BASE64
                .decode(encoded.trim())
                .map_err(|e| Error::InvalidImageData(format!("invalid base64 payload: {e}"))),
            ImageSource::Reference(reference) => self.storage.fetch(&reference).await,
        }
    }

    /// One load-mutate-store cycle. The closure runs on the blocking pool
    /// between decode and encode; any error short-circuits before store.
    async fn apply<F>(&self, locator: &str, mutate: F) -> Outcome
    where
        F: FnOnce(&mut Document) -> Result<String> + Send + 'static,
    {
        match self.apply_inner(locator, mutate).await {
            Ok(message) => {
                tracing::info!(locator, %message, "document updated");
                Outcome::success(locator, message)
            },
            Err(err) => {
                tracing::warn!(locator, error = %err, "operation failed");
                Outcome::failure(locator, err)
            },
        }
    }

    async fn apply_inner<F>(&self, locator: &str, mutate: F) -> Result<String>
    where
        F: FnOnce(&mut Document) -> Result<String> + Send + 'static,
    {
        let bytes = self.storage.fetch(locator).await?;
        let codec = self.codec;
        let (message, encoded) = tokio::task::spawn_blocking(move || -> Result<(String, Vec<u8>)> {
            let mut doc = codec.decode(&bytes)?;
            let message = mutate(&mut doc)?;
            let encoded = codec.encode(&mut doc)?;
            Ok((message, encoded))
        })
        .await
        .map_err(|e| Error::Task(e.to_string()))??;

        self.storage.store(locator, encoded).await?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::test_png_header;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> DocumentService<MemoryStorage> {
        DocumentService::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn create_then_read() {
        let svc = service();
        let outcome = svc
            .create_document("doc.docx", Some("Report"), Some("First line"))
            .await;
        assert!(outcome.success, "{:?}", outcome.error);

        let read = svc.read_document("doc.docx").await;
        assert!(read.success);
        let content = read.content.unwrap();
        assert_eq!(content.paragraphs.len(), 2);
        assert_eq!(content.paragraphs[0].text, "Report");
        assert_eq!(content.paragraphs[0].style.as_deref(), Some("Title"));
        assert_eq!(content.paragraphs[1].text, "First line");
    }

    #[tokio::test]
    async fn insert_and_edit_text() {
        let svc = service();
        svc.create_document("doc.docx", None, None).await;

        let outcome = svc
            .insert_text(
                "doc.docx",
                "hello".to_string(),
                Position::End,
                None,
                Some("Heading 1".to_string()),
            )
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("Text inserted successfully"));

        let outcome = svc
            .edit_text("doc.docx", 0, "replaced".to_string(), true)
            .await;
        assert!(outcome.success);

        let content = svc.read_document("doc.docx").await.content.unwrap();
        assert_eq!(content.paragraphs[0].text, "replaced");
        assert_eq!(content.paragraphs[0].style.as_deref(), Some("Heading1"));
    }

    #[tokio::test]
    async fn edit_out_of_range_reports_error_and_keeps_document() {
        let svc = service();
        svc.create_document("doc.docx", None, Some("only")).await;

        let outcome = svc.edit_text("doc.docx", 7, "x".to_string(), true).await;
        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert!(error.contains("out of range"), "{error}");

        let content = svc.read_document("doc.docx").await.content.unwrap();
        assert_eq!(content.paragraphs[0].text, "only");
    }

    #[tokio::test]
    async fn table_upsert_round_trip() {
        let svc = service();
        svc.create_document("doc.docx", None, None).await;

        let grid = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        let outcome = svc
            .insert_or_edit_table("doc.docx", grid, None, Position::End, None)
            .await;
        assert_eq!(outcome.message.as_deref(), Some("New table inserted successfully"));

        let bigger = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
            vec!["e".to_string(), "f".to_string()],
        ];
        let outcome = svc
            .insert_or_edit_table("doc.docx", bigger, Some(0), Position::End, None)
            .await;
        assert_eq!(outcome.message.as_deref(), Some("Table 0 edited successfully"));

        let content = svc.read_document("doc.docx").await.content.unwrap();
        assert_eq!(content.tables.len(), 1);
        assert_eq!(content.tables[0].rows.len(), 3);
        assert_eq!(content.tables[0].rows[2], vec!["e", "f"]);
    }

    #[tokio::test]
    async fn inline_base64_image_inserts() {
        let svc = service();
        svc.create_document("doc.docx", None, None).await;

        let payload = BASE64.encode(test_png_header(10, 10));
        let outcome = svc
            .insert_or_edit_image(
                "doc.docx",
                ImageSource::Base64(payload),
                2.0,
                None,
                Position::End,
                None,
            )
            .await;
        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(outcome.message.as_deref(), Some("Image inserted successfully"));
    }

    #[tokio::test]
    async fn referenced_image_is_fetched_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .store("http://blobs/pic.png", test_png_header(10, 10))
            .await
            .unwrap();
        let svc = DocumentService::new(storage);
        svc.create_document("doc.docx", None, None).await;

        let source = ImageSource::from_request("http://blobs/pic.png");
        let outcome = svc
            .insert_or_edit_image("doc.docx", source, 3.0, None, Position::End, None)
            .await;
        assert!(outcome.success, "{:?}", outcome.error);
    }

    #[tokio::test]
    async fn garbage_base64_is_invalid_image_data() {
        let svc = service();
        svc.create_document("doc.docx", None, None).await;

        let outcome = svc
            .insert_or_edit_image(
                "doc.docx",
                ImageSource::Base64("!!not base64!!".to_string()),
                3.0,
                None,
                Position::End,
                None,
            )
            .await;
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn format_with_unknown_alignment_still_succeeds() {
        let svc = service();
        svc.create_document("doc.docx", None, Some("text")).await;

        let outcome = svc
            .format_document(
                "doc.docx",
                FormatRequest {
                    alignment: Some("diagonal".to_string()),
                    ..FormatRequest::default()
                },
            )
            .await;
        assert!(outcome.success);

        let content = svc.read_document("doc.docx").await.content.unwrap();
        assert!(content.paragraphs[0].alignment.is_none());
    }

    /// Storage that fails every fetch and counts store calls.
    struct UnreachableStorage {
        stores: AtomicUsize,
    }

    #[async_trait]
    impl Storage for UnreachableStorage {
        async fn fetch(&self, locator: &str) -> crate::error::Result<Vec<u8>> {
            Err(Error::Transport(format!("connection refused fetching {locator}")))
        }

        async fn store(&self, _locator: &str, _bytes: Vec<u8>) -> crate::error::Result<()> {
            self.stores.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn fetch_failure_never_reaches_store() {
        let storage = Arc::new(UnreachableStorage {
            stores: AtomicUsize::new(0),
        });
        let svc = DocumentService::new(Arc::clone(&storage));

        let outcome = svc
            .insert_text("doc.docx", "x".to_string(), Position::End, None, None)
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("connection refused"));
        assert_eq!(storage.stores.load(Ordering::SeqCst), 0);
    }
}
