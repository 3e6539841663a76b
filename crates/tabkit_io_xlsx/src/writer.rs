//! Spreadsheet export strategy: builds an in-memory sheet document per export
//! call and renders it into an XLSX workbook buffer.

use rust_xlsxwriter::{Format, FormatUnderline, Workbook, Worksheet, XlsxError};
use tabkit_export::{
    EnumCellValue, ExportError, ExportParameters, ExportStrategy, Exportable,
    RecordTypeDeclaration, RecordTypeDescriptor, Result, convert_record_cells,
};
use tracing::{debug, warn};

use crate::conf::{N_ROW_DETAIL_START, N_ROW_SUBHEADER, N_ROW_TITLE};
use crate::spec::{
    EnumCellStyle, SpecCellFormat, SpecSheetCell, SpecSheetDocument, SpecXlsxReport,
    SpecXlsxWriteOptions,
};
use crate::util::{
    cast_col_num, cast_row_num, plan_column_widths, plan_title_merge, sanitize_sheet_name,
    validate_policy_autofit, validate_sheet_extent,
};

////////////////////////////////////////////////////////////////////////////////
// #region Strategy

/// Spreadsheet export strategy.
///
/// Layout: title at row 0 (merged across all columns when there are at least
/// two), column display names at row 1, one row per record from row 2.
pub struct XlsxExportStrategy<R> {
    declaration: Option<RecordTypeDeclaration<R>>,
    write_options: SpecXlsxWriteOptions,
    document: SpecSheetDocument,
    report: SpecXlsxReport,
}

impl<R> XlsxExportStrategy<R> {
    /// Strategy exporting records declared by `declaration`.
    pub fn new(declaration: RecordTypeDeclaration<R>) -> Self {
        Self::from_declaration(Some(declaration))
    }

    /// Strategy with no record type; rejected by the orchestrator.
    pub fn unset() -> Self {
        Self::from_declaration(None)
    }

    fn from_declaration(declaration: Option<RecordTypeDeclaration<R>>) -> Self {
        Self {
            declaration,
            write_options: SpecXlsxWriteOptions::default(),
            document: SpecSheetDocument::default(),
            report: SpecXlsxReport::default(),
        }
    }

    /// Replace the write options.
    pub fn with_options(mut self, write_options: SpecXlsxWriteOptions) -> Self {
        self.write_options = write_options;
        self
    }

    /// Current write options.
    pub fn write_options(&self) -> &SpecXlsxWriteOptions {
        &self.write_options
    }

    /// Document under construction; empty once serialized.
    pub fn document(&self) -> &SpecSheetDocument {
        &self.document
    }

    /// Report of the last serialized document.
    pub fn report(&self) -> &SpecXlsxReport {
        &self.report
    }
}

impl<R: Exportable> XlsxExportStrategy<R> {
    /// Strategy for a type carrying its own declaration.
    pub fn exportable() -> Self {
        Self::new(R::record_type())
    }
}

impl<R> ExportStrategy<R> for XlsxExportStrategy<R> {
    fn record_type(&self) -> Option<&RecordTypeDeclaration<R>> {
        self.declaration.as_ref()
    }

    fn format_name(&self) -> &'static str {
        "xlsx"
    }

    fn file_extension(&self) -> &'static str {
        "xlsx"
    }

    fn header(
        &mut self,
        descriptor: &RecordTypeDescriptor<R>,
        _parameters: &ExportParameters,
    ) -> Result<()> {
        self.document = SpecSheetDocument::default();

        let c_title = descriptor.title();
        if c_title.is_empty() {
            return Ok(());
        }
        self.document.set_row(
            N_ROW_TITLE,
            vec![SpecSheetCell::styled(
                EnumCellValue::String(c_title.to_string()),
                EnumCellStyle::Title,
            )],
        );
        if let Some(merge) = plan_title_merge(descriptor.width()) {
            self.document.merges.push(merge);
        }
        Ok(())
    }

    fn detail(&mut self, descriptor: &RecordTypeDescriptor<R>, records: &[R]) -> Result<()> {
        validate_sheet_extent(records.len(), descriptor.width()).map_err(|err| {
            ExportError::failure(
                format!(
                    "{} records x {} columns exceed the worksheet limits",
                    records.len(),
                    descriptor.width()
                ),
                err,
            )
        })?;

        let l_header_cells = descriptor
            .display_names()
            .into_iter()
            .map(|c_name| {
                let value = if c_name.is_empty() {
                    EnumCellValue::Blank
                } else {
                    EnumCellValue::String(c_name.to_string())
                };
                SpecSheetCell::styled(value, EnumCellStyle::Header)
            })
            .collect();
        self.document.set_row(N_ROW_SUBHEADER, l_header_cells);

        let locale = &self.write_options.locale;
        for (idx_record, record) in records.iter().enumerate() {
            let l_cells = convert_record_cells(descriptor, record, idx_record, locale)?;
            self.document.set_row(
                N_ROW_DETAIL_START + idx_record,
                l_cells.into_iter().map(SpecSheetCell::plain).collect(),
            );
        }
        Ok(())
    }

    fn get_bytes(&mut self, descriptor: &RecordTypeDescriptor<R>) -> Result<Vec<u8>> {
        let document = std::mem::take(&mut self.document);
        let (v_bytes, report) =
            render_workbook(&document, descriptor.width(), &self.write_options)
                .map_err(derive_xlsx_error)?;
        debug!(
            sheet_name = report.sheet_name.as_str(),
            n_rows = report.n_rows,
            n_merges = report.n_merges,
            n_formats_created = report.n_formats_created,
            "xlsx document rendered"
        );
        self.report = report;
        Ok(v_bytes)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Rendering

/// Per-document formats, materialised on first use.
struct XlsxStyleCache<'a> {
    fmt_title_spec: &'a SpecCellFormat,
    fmt_header_spec: &'a SpecCellFormat,
    fmt_title: Option<Format>,
    fmt_header: Option<Format>,
    n_created: usize,
}

impl<'a> XlsxStyleCache<'a> {
    fn new(write_options: &'a SpecXlsxWriteOptions) -> Self {
        Self {
            fmt_title_spec: &write_options.fmt_title,
            fmt_header_spec: &write_options.fmt_header,
            fmt_title: None,
            fmt_header: None,
            n_created: 0,
        }
    }

    fn get(&mut self, style: EnumCellStyle) -> Option<&Format> {
        let (slot, spec) = match style {
            EnumCellStyle::None => return None,
            EnumCellStyle::Title => (&mut self.fmt_title, self.fmt_title_spec),
            EnumCellStyle::Header => (&mut self.fmt_header, self.fmt_header_spec),
        };
        if slot.is_none() {
            self.n_created += 1;
        }
        Some(slot.get_or_insert_with(|| derive_rust_xlsx_format(spec)))
    }
}

fn render_workbook(
    document: &SpecSheetDocument,
    width: usize,
    write_options: &SpecXlsxWriteOptions,
) -> std::result::Result<(Vec<u8>, SpecXlsxReport), XlsxError> {
    validate_policy_autofit(&write_options.policy_autofit)?;

    let mut report = SpecXlsxReport {
        sheet_name: sanitize_sheet_name(&write_options.sheet_name, "_"),
        n_rows: document.rows.len(),
        n_cols: width,
        n_merges: document.merges.len(),
        ..Default::default()
    };
    if report.sheet_name != write_options.sheet_name {
        warn!(
            sheet_name = write_options.sheet_name.as_str(),
            sheet_name_used = report.sheet_name.as_str(),
            "sheet name sanitized"
        );
        report.warn(format!(
            "Sheet name sanitized: {:?} -> {:?}",
            write_options.sheet_name, report.sheet_name
        ));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&report.sheet_name)?;

    let mut style_cache = XlsxStyleCache::new(write_options);
    for (row_idx, row) in &document.rows {
        for (col_idx, cell) in row.iter().enumerate() {
            match document.merge_at(*row_idx, col_idx) {
                Some(merge) if merge.is_anchor(*row_idx, col_idx) => {
                    let c_text = match &cell.value {
                        EnumCellValue::Blank => String::new(),
                        EnumCellValue::String(val) => val.clone(),
                        EnumCellValue::Number(val) => val.to_string(),
                    };
                    let fmt_default = Format::new();
                    let format = style_cache.get(cell.style).unwrap_or(&fmt_default);
                    worksheet.merge_range(
                        cast_row_num(merge.row_start)?,
                        cast_col_num(merge.col_start)?,
                        cast_row_num(merge.row_end)?,
                        cast_col_num(merge.col_end)?,
                        &c_text,
                        format,
                    )?;
                }
                Some(_) => {}
                None => write_cell(
                    worksheet,
                    *row_idx,
                    col_idx,
                    &cell.value,
                    style_cache.get(cell.style),
                )?,
            }
        }
    }
    report.n_formats_created = style_cache.n_created;

    let l_widths = plan_column_widths(document, width, &write_options.policy_autofit);
    for (n_idx_col, n_width) in l_widths.into_iter().enumerate() {
        worksheet.set_column_width(cast_col_num(n_idx_col)?, n_width as f64)?;
    }

    let v_bytes = workbook.save_to_buffer()?;
    Ok((v_bytes, report))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: Option<&Format>,
) -> std::result::Result<(), XlsxError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match (value, format) {
        (EnumCellValue::Blank, Some(format)) => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        (EnumCellValue::Blank, None) => {}
        (EnumCellValue::String(val), Some(format)) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        (EnumCellValue::String(val), None) => {
            worksheet.write_string(n_row, n_col, val)?;
        }
        (EnumCellValue::Number(val), Some(format)) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        (EnumCellValue::Number(val), None) => {
            worksheet.write_number(n_row, n_col, *val)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold {
        format = format.set_bold();
    }
    if spec.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    format
}

fn derive_xlsx_error(err: XlsxError) -> ExportError {
    ExportError::failure(format!("xlsx write error: {err}"), err)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
