//! `tabkit_io_docx` v1:
//! Word-processor export strategy.
//!
//! - `spec`   : document model and options
//! - `writer` : strategy and `docx-rs` rendering
pub mod spec;
pub mod writer;

pub use spec::{EnumParagraphRole, SpecDocxDocument, SpecDocxParagraph, SpecDocxWriteOptions};
pub use writer::DocxExportStrategy;
