//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecXlsxWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Upper bound accepted by Excel for a column width.
pub const N_WIDTH_EXCEL_COLUMN_MAX: usize = 255;

/// Row holding the document title.
pub const N_ROW_TITLE: usize = 0;
/// Row holding the column display names.
pub const N_ROW_SUBHEADER: usize = 1;
/// First detail row.
pub const N_ROW_DETAIL_START: usize = 2;

/// Sheet name used when none is configured.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";

/// Title style: bold, 20pt, single underline.
pub fn derive_default_title_format() -> SpecCellFormat {
    SpecCellFormat {
        font_size: Some(20),
        bold: true,
        underline: true,
    }
}

/// Column header style: bold, 10pt.
pub fn derive_default_header_format() -> SpecCellFormat {
    SpecCellFormat {
        font_size: Some(10),
        bold: true,
        underline: false,
    }
}

/// Build default write options.
pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}
