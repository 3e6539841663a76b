//! Pure helpers for sheet layout, naming and autofit.

use rust_xlsxwriter::XlsxError;
use tabkit_export::EnumCellValue;

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_ROW_DETAIL_START,
    N_ROW_TITLE, N_WIDTH_EXCEL_COLUMN_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    EnumAutofitColumnsRule, EnumCellStyle, SpecAutofitCellsPolicy, SpecSheetDocument,
    SpecSheetMergeRange,
};

////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Title merge over columns `[0, width - 1]`; `None` below two columns.
pub fn plan_title_merge(width: usize) -> Option<SpecSheetMergeRange> {
    if width < 2 {
        return None;
    }
    Some(SpecSheetMergeRange {
        row_start: N_ROW_TITLE,
        row_end: N_ROW_TITLE,
        col_start: 0,
        col_end: width - 1,
    })
}

/// Check that `n_records` detail rows over `width` columns fit one worksheet.
pub fn validate_sheet_extent(n_records: usize, width: usize) -> Result<(), XlsxError> {
    let n_rows_total = N_ROW_DETAIL_START.saturating_add(n_records);
    if n_rows_total > N_NROWS_EXCEL_MAX || width > N_NCOLS_EXCEL_MAX {
        return Err(XlsxError::RowColumnLimitError);
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Autofit

/// Estimate displayed width units for one cell value.
pub fn estimate_width_len(value: &EnumCellValue) -> usize {
    match value {
        EnumCellValue::Blank => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Number(n) => n.to_string().len(),
    }
}

fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

/// Validate autofit bounds.
pub fn validate_policy_autofit(policy_autofit: &SpecAutofitCellsPolicy) -> Result<(), XlsxError> {
    if policy_autofit.width_cell_min == 0 {
        return Err(XlsxError::ParameterError(
            "policy_autofit.width_cell_min must be >= 1.".to_string(),
        ));
    }
    if policy_autofit.width_cell_max < policy_autofit.width_cell_min {
        return Err(XlsxError::ParameterError(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        ));
    }
    Ok(())
}

/// Final column widths for columns `0..width`; empty when autofit is disabled.
///
/// Cells inside merged regions never contribute. Styled cells count as header
/// cells, unstyled cells as body cells.
pub fn plan_column_widths(
    document: &SpecSheetDocument,
    width: usize,
    policy_autofit: &SpecAutofitCellsPolicy,
) -> Vec<usize> {
    if policy_autofit.rule_columns == EnumAutofitColumnsRule::None || width == 0 {
        return vec![];
    }

    let mut l_width_by_col_header = vec![0usize; width];
    let mut l_width_by_col_body = vec![0usize; width];
    let mut n_rows_seen_body = 0usize;

    for (row_idx, row) in &document.rows {
        let if_is_body_row = *row_idx >= N_ROW_DETAIL_START
            && row.iter().all(|cell| cell.style == EnumCellStyle::None);
        if if_is_body_row {
            if policy_autofit
                .height_body_inferred_max
                .is_some_and(|n_max| n_rows_seen_body >= n_max)
            {
                continue;
            }
            n_rows_seen_body += 1;
        }

        for (col_idx, cell) in row.iter().enumerate().take(width) {
            if document.merge_at(*row_idx, col_idx).is_some() {
                continue;
            }
            let n_len = estimate_width_len(&cell.value);
            let l_target = if cell.style == EnumCellStyle::None {
                &mut l_width_by_col_body
            } else {
                &mut l_width_by_col_header
            };
            l_target[col_idx] = usize::max(l_target[col_idx], n_len);
        }
    }

    let n_min = usize::max(1, policy_autofit.width_cell_min);
    let n_max = usize::min(
        N_WIDTH_EXCEL_COLUMN_MAX,
        usize::max(n_min, policy_autofit.width_cell_max),
    );
    let n_pad = policy_autofit.width_cell_padding;

    (0..width)
        .map(|n_idx_col| {
            let n_width_recorded = match policy_autofit.rule_columns {
                EnumAutofitColumnsRule::Header => l_width_by_col_header[n_idx_col],
                EnumAutofitColumnsRule::Body => l_width_by_col_body[n_idx_col],
                EnumAutofitColumnsRule::All | EnumAutofitColumnsRule::None => usize::max(
                    l_width_by_col_header[n_idx_col],
                    l_width_by_col_body[n_idx_col],
                ),
            };
            usize::min(n_max, usize::max(n_min, n_width_recorded + n_pad))
        })
        .collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region IndexCasting

/// Worksheet row index.
pub fn cast_row_num(value: usize) -> Result<u32, XlsxError> {
    u32::try_from(value).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Worksheet column index.
pub fn cast_col_num(value: usize) -> Result<u16, XlsxError> {
    u16::try_from(value).map_err(|_| XlsxError::RowColumnLimitError)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
