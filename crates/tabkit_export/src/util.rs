//! Stateless formatting helpers shared by every export strategy.

use std::fmt::Write as _;

use chrono::{NaiveDateTime, NaiveTime};

use crate::conf::N_CURRENCY_PRECISION;
use crate::error::{ExportError, Result};
use crate::record::RecordTypeDescriptor;
use crate::spec::{
    EnumCellValue, EnumDatePattern, EnumFieldValue, EnumFormatKind, ExportParameters,
    SpecExportLocale,
};

////////////////////////////////////////////////////////////////////////////////
// #region DateFormatting

/// Format a date with a named pattern; `None` yields an empty string.
pub fn format_date(
    date: Option<&NaiveDateTime>,
    pattern: EnumDatePattern,
    locale: &SpecExportLocale,
) -> String {
    let Some(date) = date else {
        return String::new();
    };

    let mut c_out = String::new();
    if write!(c_out, "{}", date.format(locale.pattern(pattern))).is_err() {
        // Malformed custom pattern.
        return date.to_string();
    }
    c_out
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region NumberFormatting

/// Format `value` as a currency amount, e.g. `R$ 6.500,50`.
pub fn to_currency_string(value: f64, locale: &SpecExportLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let c_amount = derive_grouped_decimal(value.abs(), N_CURRENCY_PRECISION, locale);
    let c_sign = derive_sign(value, &c_amount);
    format!("{c_sign}{} {c_amount}", locale.currency_symbol)
}

/// Format a ratio as a percentage with `precision` fraction digits, e.g. `0.557` -> `55,70%`.
pub fn to_percentage_string(value: f64, precision: usize, locale: &SpecExportLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let n_percent = value * 100.0;
    let c_amount = derive_grouped_decimal(n_percent.abs(), precision, locale);
    let c_sign = derive_sign(n_percent, &c_amount);
    format!("{c_sign}{c_amount}%")
}

/// Fixed-point text with locale grouping and decimal separators.
///
/// `value` must be non-negative. Ties round half-to-even.
fn derive_grouped_decimal(value: f64, precision: usize, locale: &SpecExportLocale) -> String {
    let c_fixed = format!("{value:.precision$}");
    let (c_int, c_frac) = c_fixed.split_once('.').unwrap_or((c_fixed.as_str(), ""));

    let n_len_int = c_int.len();
    let mut c_out = String::with_capacity(c_fixed.len() + n_len_int / 3 + 1);
    for (n_idx, chr) in c_int.chars().enumerate() {
        if n_idx > 0 && (n_len_int - n_idx) % 3 == 0 {
            c_out.push(locale.group_separator);
        }
        c_out.push(chr);
    }
    if !c_frac.is_empty() {
        c_out.push(locale.decimal_separator);
        c_out.push_str(c_frac);
    }
    c_out
}

fn derive_sign(value: f64, c_amount: &str) -> &'static str {
    let if_is_zero = c_amount.chars().all(|chr| !chr.is_ascii_digit() || chr == '0');
    if value < 0.0 && !if_is_zero { "-" } else { "" }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Convert one field value into a cell according to its format directive.
///
/// Dispatch is by the runtime kind of `value`:
/// - boolean: locale yes/no label, whatever the directive,
/// - date/date-time: date pattern chosen by the directive, or the default text form,
/// - decimal/integer: currency/percentage text, otherwise a native number,
/// - string: verbatim, whatever the directive,
/// - null and unsupported kinds: blank cell.
///
/// A currency or percentage directive on a boolean, string or date value is an
/// [`ExportError::UnsupportedFormat`].
pub fn convert_field_value(
    field_name: &str,
    format_kind: EnumFormatKind,
    value: &EnumFieldValue,
    locale: &SpecExportLocale,
) -> Result<EnumCellValue> {
    let cell = match (value, format_kind) {
        (EnumFieldValue::Null, _) => EnumCellValue::Blank,
        (EnumFieldValue::Unsupported(type_name), _) => {
            tracing::warn!(
                field = field_name,
                type_name = type_name.as_str(),
                "unsupported field value kind written as blank cell"
            );
            EnumCellValue::Blank
        }
        (EnumFieldValue::Boolean(val), kind) if !kind.is_numeric() => {
            EnumCellValue::String(locale.label(*val).to_string())
        }
        (EnumFieldValue::String(val), kind) if !kind.is_numeric() => {
            EnumCellValue::String(val.clone())
        }
        (EnumFieldValue::DateTime(val), kind) if !kind.is_numeric() => {
            EnumCellValue::String(convert_date_time(val, kind, locale))
        }
        (EnumFieldValue::Date(val), EnumFormatKind::None) => EnumCellValue::String(val.to_string()),
        (EnumFieldValue::Date(val), kind) if !kind.is_numeric() => {
            EnumCellValue::String(convert_date_time(&val.and_time(NaiveTime::MIN), kind, locale))
        }
        (EnumFieldValue::Decimal(val), kind) if kind.is_numeric() => {
            EnumCellValue::String(convert_number(*val, kind, locale))
        }
        (EnumFieldValue::Integer(val), kind) if kind.is_numeric() => {
            EnumCellValue::String(convert_number(*val as f64, kind, locale))
        }
        (EnumFieldValue::Decimal(val), _) => EnumCellValue::Number(*val),
        (EnumFieldValue::Integer(val), _) => EnumCellValue::Number(*val as f64),
        (val, kind) => {
            return Err(ExportError::UnsupportedFormat {
                column: field_name.to_string(),
                format_kind: kind,
                value_kind: val.kind_name(),
            });
        }
    };
    Ok(cell)
}

fn convert_date_time(
    value: &NaiveDateTime,
    format_kind: EnumFormatKind,
    locale: &SpecExportLocale,
) -> String {
    match format_kind.date_pattern() {
        Some(pattern) => format_date(Some(value), pattern, locale),
        None => value.to_string(),
    }
}

fn convert_number(value: f64, format_kind: EnumFormatKind, locale: &SpecExportLocale) -> String {
    if format_kind == EnumFormatKind::Percentage {
        to_percentage_string(value, locale.percentage_precision, locale)
    } else {
        to_currency_string(value, locale)
    }
}

/// Read and convert every exported column of one record, in column order.
///
/// Accessor failures become [`ExportError::ExportFailure`] naming the field and
/// the zero-based record index; conversion stops at the first failure.
pub fn convert_record_cells<R>(
    descriptor: &RecordTypeDescriptor<R>,
    record: &R,
    idx_record: usize,
    locale: &SpecExportLocale,
) -> Result<Vec<EnumCellValue>> {
    let mut l_cells = Vec::with_capacity(descriptor.width());
    for column in descriptor.columns() {
        let value = column.read(record).map_err(|err| {
            ExportError::failure(
                format!(
                    "Failed to read field {:?} of {} record #{idx_record}: {err}",
                    column.field_name,
                    descriptor.type_name()
                ),
                err,
            )
        })?;
        l_cells.push(convert_field_value(
            &column.field_name,
            column.spec.format_kind,
            &value,
            locale,
        )?);
    }
    Ok(l_cells)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Parameters

/// Text of parameter `key`; `None` when absent, null or empty.
///
/// Strings are taken verbatim, other JSON values use their compact JSON text.
pub fn derive_param_text(parameters: &ExportParameters, key: &str) -> Option<String> {
    let c_text = match parameters.get(key)? {
        serde_json::Value::Null => return None,
        serde_json::Value::String(val) => val.clone(),
        val => val.to_string(),
    };
    (!c_text.is_empty()).then_some(c_text)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TypeNames

/// Last path segment of `R`'s type name, without generic arguments.
pub fn derive_short_type_name<R>() -> String {
    let c_full = std::any::type_name::<R>();
    let c_base = c_full.split('<').next().unwrap_or(c_full);
    c_base.rsplit("::").next().unwrap_or(c_base).to_string()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
