//! `tabkit_io_csv` v1:
//! Delimited-text export strategy.
//!
//! - `spec`   : options
//! - `writer` : strategy
pub mod spec;
pub mod writer;

pub use spec::{C_DELIMITER_DEFAULT, SpecCsvWriteOptions};
pub use writer::CsvExportStrategy;
