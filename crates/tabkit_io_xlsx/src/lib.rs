//! `tabkit_io_xlsx` v1:
//! Spreadsheet export strategy.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : sheet document, formats and options
//! - `util`   : pure layout/autofit helpers
//! - `writer` : strategy and workbook rendering
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_ROW_DETAIL_START,
    N_ROW_SUBHEADER, N_ROW_TITLE, TUP_EXCEL_ILLEGAL, derive_default_header_format,
    derive_default_title_format, derive_default_xlsx_write_options,
};
pub use spec::{
    EnumAutofitColumnsRule, EnumCellStyle, SpecAutofitCellsPolicy, SpecCellFormat,
    SpecSheetCell, SpecSheetDocument, SpecSheetMergeRange, SpecXlsxReport, SpecXlsxWriteOptions,
};
pub use util::{estimate_width_len, plan_column_widths, plan_title_merge, sanitize_sheet_name};
pub use writer::XlsxExportStrategy;
