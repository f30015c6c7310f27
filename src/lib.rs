//! Quince - a document editing engine for OOXML word-processing files
//!
//! This library edits .docx packages held in remote object storage through a
//! small set of addressable operations: insert/edit text, insert/edit tables,
//! insert/replace images, and sparse formatting merges. Each operation is a
//! full load-mutate-store cycle; no document state lives between calls.
//!
//! # Example - editing a stored document
//!
//! ```no_run
//! use std::sync::Arc;
//! use quince::edit::Position;
//! use quince::service::DocumentService;
//! use quince::storage::MemoryStorage;
//!
//! # async fn example() {
//! let service = DocumentService::new(Arc::new(MemoryStorage::new()));
//!
//! service.create_document("report.docx", Some("Quarterly Report"), None).await;
//! service
//!     .insert_text(
//!         "report.docx",
//!         "Revenue grew 12%.".to_string(),
//!         Position::End,
//!         None,
//!         None,
//!     )
//!     .await;
//!
//! let snapshot = service.read_document("report.docx").await;
//! println!("{}", serde_json::to_string_pretty(&snapshot.content).unwrap());
//! # }
//! ```
//!
//! # Example - working on the tree directly
//!
//! ```no_run
//! use quince::docx::{Block, Document, DocxCodec, Paragraph};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = DocxCodec::new();
//! let bytes = std::fs::read("document.docx")?;
//! let mut doc = codec.decode(&bytes)?;
//!
//! doc.blocks.push(Block::Paragraph(Paragraph::with_text("Appendix")));
//!
//! std::fs::write("document.docx", codec.encode(&mut doc)?)?;
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod edit;
pub mod error;
pub mod opc;
pub mod service;
pub mod storage;

pub use error::{Error, Result};
