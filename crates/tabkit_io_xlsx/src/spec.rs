//! Shared XLSX specification models.

use std::collections::BTreeMap;

use tabkit_export::{EnumCellValue, SpecExportLocale};

use crate::conf::{
    C_SHEET_NAME_DEFAULT, N_WIDTH_EXCEL_COLUMN_MAX, derive_default_header_format,
    derive_default_title_format,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format for the title and column header styles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font size in points; workbook default when `None`.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: bool,
    /// Single underline.
    pub underline: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetDocument

/// Style slot of one sheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumCellStyle {
    /// Workbook default style.
    #[default]
    None,
    /// Document title style.
    Title,
    /// Column header style.
    Header,
}

/// One cell of the in-memory sheet document.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecSheetCell {
    /// Cell content.
    pub value: EnumCellValue,
    /// Style slot.
    pub style: EnumCellStyle,
}

impl SpecSheetCell {
    /// Unstyled cell.
    pub fn plain(value: EnumCellValue) -> Self {
        Self {
            value,
            style: EnumCellStyle::None,
        }
    }

    /// Cell with an explicit style slot.
    pub fn styled(value: EnumCellValue, style: EnumCellStyle) -> Self {
        Self { value, style }
    }
}

/// Merged region, all bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecSheetMergeRange {
    /// First row.
    pub row_start: usize,
    /// Last row.
    pub row_end: usize,
    /// First column.
    pub col_start: usize,
    /// Last column.
    pub col_end: usize,
}

impl SpecSheetMergeRange {
    /// Whether `(row_idx, col_idx)` lies inside the region.
    pub fn contains(&self, row_idx: usize, col_idx: usize) -> bool {
        (self.row_start..=self.row_end).contains(&row_idx)
            && (self.col_start..=self.col_end).contains(&col_idx)
    }

    /// Whether `(row_idx, col_idx)` is the region's anchor cell.
    pub fn is_anchor(&self, row_idx: usize, col_idx: usize) -> bool {
        self.row_start == row_idx && self.col_start == col_idx
    }
}

/// In-memory sheet owned by the spreadsheet strategy for one export call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheetDocument {
    /// Cells by row index; each row starts at column 0.
    pub rows: BTreeMap<usize, Vec<SpecSheetCell>>,
    /// Merged regions in insertion order.
    pub merges: Vec<SpecSheetMergeRange>,
}

impl SpecSheetDocument {
    /// Replace row `row_idx`.
    pub fn set_row(&mut self, row_idx: usize, cells: Vec<SpecSheetCell>) {
        self.rows.insert(row_idx, cells);
    }

    /// Cells of row `row_idx`.
    pub fn row(&self, row_idx: usize) -> Option<&[SpecSheetCell]> {
        self.rows.get(&row_idx).map(Vec::as_slice)
    }

    /// Cell at `(row_idx, col_idx)`.
    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&SpecSheetCell> {
        self.rows.get(&row_idx).and_then(|row| row.get(col_idx))
    }

    /// One past the last populated row index.
    pub fn height(&self) -> usize {
        self.rows.keys().next_back().map_or(0, |row_idx| row_idx + 1)
    }

    /// Merge region covering `(row_idx, col_idx)`, if any.
    pub fn merge_at(&self, row_idx: usize, col_idx: usize) -> Option<&SpecSheetMergeRange> {
        self.merges
            .iter()
            .find(|merge| merge.contains(row_idx, col_idx))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Autofit rule for column width inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumAutofitColumnsRule {
    /// Disable autofit.
    None,
    /// Infer width from styled (title/header) cells only.
    Header,
    /// Infer width from detail cells only.
    Body,
    /// Infer width from every unmerged cell (default).
    #[default]
    All,
}

/// Autofit policy applied on serialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Autofit width inference rule.
    pub rule_columns: EnumAutofitColumnsRule,
    /// Max detail rows inspected when body-based inference is active.
    pub height_body_inferred_max: Option<usize>,
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            rule_columns: EnumAutofitColumnsRule::All,
            height_body_inferred_max: Some(20_000),
            width_cell_min: 8,
            width_cell_max: N_WIDTH_EXCEL_COLUMN_MAX,
            width_cell_padding: 2,
        }
    }
}

/// Spreadsheet strategy options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Worksheet name; sanitized before use.
    pub sheet_name: String,
    /// Title cell format.
    pub fmt_title: SpecCellFormat,
    /// Column header cell format.
    pub fmt_header: SpecCellFormat,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
    /// Locale used by the cell value formatter.
    pub locale: SpecExportLocale,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            fmt_title: derive_default_title_format(),
            fmt_header: derive_default_header_format(),
            policy_autofit: SpecAutofitCellsPolicy::default(),
            locale: SpecExportLocale::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-document render report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual worksheet name.
    pub sheet_name: String,
    /// Populated rows, title and header included.
    pub n_rows: usize,
    /// Exported columns.
    pub n_cols: usize,
    /// Merged regions written.
    pub n_merges: usize,
    /// Cell formats materialised for the document.
    pub n_formats_created: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
