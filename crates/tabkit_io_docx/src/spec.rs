//! Word-processor export options and document model.

use tabkit_export::{SpecExportLocale, derive_default_export_locale};

/// Paragraph text role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumParagraphRole {
    /// Document title: bold, large, underlined.
    Title,
    /// Subtitle line below the title.
    Subtitle,
    /// Plain body text.
    Body,
}

/// One paragraph placed before or after the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocxParagraph {
    /// Paragraph text.
    pub text: String,
    /// Text role.
    pub role: EnumParagraphRole,
}

/// In-memory document for one export call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecDocxDocument {
    /// Paragraphs before the table.
    pub paragraphs_head: Vec<SpecDocxParagraph>,
    /// Column display names; `None` until the detail phase runs.
    pub header: Option<Vec<String>>,
    /// Table body rows.
    pub rows: Vec<Vec<String>>,
    /// Paragraphs after the table.
    pub paragraphs_tail: Vec<SpecDocxParagraph>,
}

/// Word-processor strategy options. Sizes are in half-points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocxWriteOptions {
    /// Title font size.
    pub size_title: usize,
    /// Subtitle font size.
    pub size_subtitle: usize,
    /// Table and body font size.
    pub size_body: usize,
    /// Locale used by the cell value formatter and for number text.
    pub locale: SpecExportLocale,
}

impl Default for SpecDocxWriteOptions {
    fn default() -> Self {
        Self {
            size_title: 40,
            size_subtitle: 24,
            size_body: 20,
            locale: derive_default_export_locale(),
        }
    }
}
