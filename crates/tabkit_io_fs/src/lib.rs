//! `tabkit_io_fs` v1:
//! Filesystem persistence for exported byte buffers.
//!
//! - `write`  : conflict-aware byte writer
//! - `spec`   : enums/options
//! - `report` : write report model

pub mod report;
pub mod spec;
pub mod write;

pub use report::ReportWrite;
pub use spec::{EnumWriteConflictStrategy, SpecWriteOptions};
pub use write::write_bytes;
