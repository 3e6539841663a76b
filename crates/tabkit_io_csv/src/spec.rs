//! Flat-text export options.

use tabkit_export::{SpecExportLocale, derive_default_export_locale};

/// Field delimiter used when none is configured.
pub const C_DELIMITER_DEFAULT: u8 = b';';

/// Delimited-text strategy options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCsvWriteOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Emit the document title as a leading one-field record.
    pub if_write_title: bool,
    /// Locale used by the cell value formatter and for number text.
    pub locale: SpecExportLocale,
}

impl Default for SpecCsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: C_DELIMITER_DEFAULT,
            if_write_title: true,
            locale: derive_default_export_locale(),
        }
    }
}
