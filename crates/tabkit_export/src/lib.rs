//! `tabkit_export` v1:
//! Metadata-driven tabular export core.
//!
//! Module layout:
//! - `conf`     : constants and default presets
//! - `spec`     : value/format models and options
//! - `error`    : export error taxonomy
//! - `record`   : record declarations, column model and descriptor
//! - `util`     : pure formatting helpers (cell values, dates, numbers)
//! - `strategy` : output-format strategy contract
//! - `exporter` : export orchestrator
pub mod conf;
pub mod error;
pub mod exporter;
pub mod record;
pub mod spec;
pub mod strategy;
pub mod util;

pub use conf::{
    C_DATE_PATTERN_DATE_ONLY, C_DATE_PATTERN_DATE_TIME, C_DATE_PATTERN_TIME_ONLY,
    C_PARAM_FOOTER, C_PARAM_SUBTITLE, N_PERCENTAGE_PRECISION_DEFAULT,
    derive_default_export_locale,
};
pub use error::{BoxError, ExportError, Result};
pub use exporter::Exporter;
pub use record::{
    Exportable, FieldAccessor, RecordTypeDeclaration, RecordTypeDescriptor, SpecDeclaredField,
    SpecExportColumn, derive_field_export_specs,
};
pub use spec::{
    EnumCellValue, EnumDatePattern, EnumFieldValue, EnumFormatKind, ExportParameters,
    SpecExportLocale, SpecExportable, SpecFieldExport,
};
pub use strategy::ExportStrategy;
pub use util::{
    convert_field_value, convert_record_cells, derive_param_text, format_date,
    to_currency_string, to_percentage_string,
};
pub use tabkit_io_fs::{EnumWriteConflictStrategy, ReportWrite, SpecWriteOptions};
