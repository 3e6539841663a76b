//! Output-format strategy contract.

use crate::error::Result;
use crate::record::{RecordTypeDeclaration, RecordTypeDescriptor};
use crate::spec::ExportParameters;

/// Pluggable output format driven by [`crate::Exporter`].
///
/// Per export call the orchestrator runs `header`, `detail`, `footer` and
/// `get_bytes` in that order, each exactly once, and stops at the first error.
/// Every phase receives the descriptor validated at orchestrator construction.
///
/// `header` starts a fresh document. `get_bytes` takes the finished document out
/// of the strategy so the same instance can serve the next call.
pub trait ExportStrategy<R> {
    /// Record type declaration this strategy exports; `None` means unset.
    fn record_type(&self) -> Option<&RecordTypeDeclaration<R>>;

    /// Short human-readable format name for diagnostics.
    fn format_name(&self) -> &'static str;

    /// File extension, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Start a new document and render the title region.
    fn header(
        &mut self,
        descriptor: &RecordTypeDescriptor<R>,
        parameters: &ExportParameters,
    ) -> Result<()>;

    /// Render the column header row and one row per record.
    fn detail(&mut self, descriptor: &RecordTypeDescriptor<R>, records: &[R]) -> Result<()>;

    /// Render the closing region. Formats without one keep the default no-op.
    fn footer(
        &mut self,
        _descriptor: &RecordTypeDescriptor<R>,
        _parameters: &ExportParameters,
    ) -> Result<()> {
        Ok(())
    }

    /// Finish the document and return its serialized bytes.
    fn get_bytes(&mut self, descriptor: &RecordTypeDescriptor<R>) -> Result<Vec<u8>>;
}
