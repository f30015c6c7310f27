//! Editing operations over a decoded document: addressing, structural
//! mutation, formatting merge, and read-only projection.

mod address;
mod format;
mod mutate;
mod project;

pub use address::Position;
pub use format::{FormatRequest, apply_format};
pub use mutate::{UpsertAction, edit_paragraph, insert_paragraph, upsert_image, upsert_table};
pub use project::{
    DocumentSnapshot, ParagraphSnapshot, RunSnapshot, SectionSnapshot, TableSnapshot, snapshot,
};
