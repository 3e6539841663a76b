//! Shared export specification models.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::conf::{
    C_CURRENCY_SYMBOL, C_DATE_PATTERN_DATE_ONLY, C_DATE_PATTERN_DATE_TIME,
    C_DATE_PATTERN_TIME_ONLY, C_LABEL_FALSE, C_LABEL_TRUE, N_PERCENTAGE_PRECISION_DEFAULT,
};

/// Open key/value mapping handed to the header and footer phases.
///
/// The core never reads it; concrete strategies pick the keys they support.
pub type ExportParameters = BTreeMap<String, serde_json::Value>;

////////////////////////////////////////////////////////////////////////////////
// #region FieldMetadata

/// Per-field formatting directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnumFormatKind {
    /// No directive; values keep their natural cell kind.
    #[default]
    None,
    /// Date-only string (`dd/MM/yyyy`).
    Date,
    /// Date plus short time string (`dd/MM/yyyy HH:mm`).
    Time,
    /// Time-only string (`HH:mm`).
    Timestamp,
    /// Currency string (`R$ 1.234,56`).
    Currency,
    /// Percentage string with two fraction digits (`55,70%`).
    Percentage,
}

impl EnumFormatKind {
    /// Date pattern selected by a temporal directive.
    pub fn date_pattern(self) -> Option<EnumDatePattern> {
        match self {
            Self::Date => Some(EnumDatePattern::DateOnly),
            Self::Time => Some(EnumDatePattern::DateTime),
            Self::Timestamp => Some(EnumDatePattern::TimeOnly),
            Self::None | Self::Currency | Self::Percentage => None,
        }
    }

    /// Whether the directive only applies to numeric values.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Currency | Self::Percentage)
    }
}

/// Export annotation attached to one declared field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecFieldExport {
    /// Column header text. Empty renders an empty header cell.
    pub display_name: String,
    /// Exclude the field from the exported columns.
    pub ignore: bool,
    /// Formatting directive.
    pub format_kind: EnumFormatKind,
}

impl SpecFieldExport {
    /// Annotation with a display name and no directive.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// Return a copy with `format_kind` set.
    pub fn with_format(mut self, format_kind: EnumFormatKind) -> Self {
        self.format_kind = format_kind;
        self
    }

    /// Annotation marking the field as ignored.
    pub fn ignored() -> Self {
        Self {
            ignore: true,
            ..Default::default()
        }
    }
}

/// Type-level exportable marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecExportable {
    /// Document title; empty means no title row.
    pub title: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Values

/// Runtime value read from one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumFieldValue {
    /// Missing value.
    Null,
    /// Logical value.
    Boolean(bool),
    /// Calendar date with time of day.
    DateTime(NaiveDateTime),
    /// Calendar date.
    Date(NaiveDate),
    /// Decimal/floating value.
    Decimal(f64),
    /// Integral value.
    Integer(i64),
    /// Text value.
    String(String),
    /// Any value outside the supported kinds, described by its type name.
    Unsupported(String),
}

impl EnumFieldValue {
    /// Short kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "date-time",
            Self::Date(_) => "date",
            Self::Decimal(_) => "decimal",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl From<bool> for EnumFieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for EnumFieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for EnumFieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<f64> for EnumFieldValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<f32> for EnumFieldValue {
    fn from(value: f32) -> Self {
        Self::Decimal(value as f64)
    }
}

impl From<i64> for EnumFieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for EnumFieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<u32> for EnumFieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<String> for EnumFieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for EnumFieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<EnumFieldValue>> From<Option<T>> for EnumFieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Cell value produced by the formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Empty cell.
    Blank,
    /// Text cell.
    String(String),
    /// Native numeric cell.
    Number(f64),
}

impl EnumCellValue {
    /// Text shown for this cell in text-only formats.
    pub fn to_text(&self, locale: &SpecExportLocale) -> String {
        match self {
            Self::Blank => String::new(),
            Self::String(val) => val.clone(),
            Self::Number(val) => {
                let c_num = val.to_string();
                if locale.decimal_separator == '.' {
                    c_num
                } else {
                    c_num.replace('.', &locale.decimal_separator.to_string())
                }
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Locale

/// Named date pattern understood by the date formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumDatePattern {
    /// `dd/MM/yyyy`
    DateOnly,
    /// `dd/MM/yyyy HH:mm`
    DateTime,
    /// `HH:mm`
    TimeOnly,
}

/// Locale preset shared by the date and number formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecExportLocale {
    /// Label for `true`.
    pub label_true: String,
    /// Label for `false`.
    pub label_false: String,
    /// Currency symbol.
    pub currency_symbol: String,
    /// Decimal separator.
    pub decimal_separator: char,
    /// Thousands grouping separator.
    pub group_separator: char,
    /// `strftime` pattern for [`EnumDatePattern::DateOnly`].
    pub pattern_date_only: String,
    /// `strftime` pattern for [`EnumDatePattern::DateTime`].
    pub pattern_date_time: String,
    /// `strftime` pattern for [`EnumDatePattern::TimeOnly`].
    pub pattern_time_only: String,
    /// Fraction digits for percentage strings.
    pub percentage_precision: usize,
}

impl Default for SpecExportLocale {
    fn default() -> Self {
        Self {
            label_true: C_LABEL_TRUE.to_string(),
            label_false: C_LABEL_FALSE.to_string(),
            currency_symbol: C_CURRENCY_SYMBOL.to_string(),
            decimal_separator: ',',
            group_separator: '.',
            pattern_date_only: C_DATE_PATTERN_DATE_ONLY.to_string(),
            pattern_date_time: C_DATE_PATTERN_DATE_TIME.to_string(),
            pattern_time_only: C_DATE_PATTERN_TIME_ONLY.to_string(),
            percentage_precision: N_PERCENTAGE_PRECISION_DEFAULT,
        }
    }
}

impl SpecExportLocale {
    /// Resolve the `strftime` pattern for a named pattern.
    pub fn pattern(&self, pattern: EnumDatePattern) -> &str {
        match pattern {
            EnumDatePattern::DateOnly => &self.pattern_date_only,
            EnumDatePattern::DateTime => &self.pattern_date_time,
            EnumDatePattern::TimeOnly => &self.pattern_time_only,
        }
    }

    /// Label for a logical value.
    pub fn label(&self, value: bool) -> &str {
        if value {
            &self.label_true
        } else {
            &self.label_false
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_kind_selects_date_patterns() {
        assert_eq!(
            EnumFormatKind::Date.date_pattern(),
            Some(EnumDatePattern::DateOnly)
        );
        assert_eq!(
            EnumFormatKind::Time.date_pattern(),
            Some(EnumDatePattern::DateTime)
        );
        assert_eq!(
            EnumFormatKind::Timestamp.date_pattern(),
            Some(EnumDatePattern::TimeOnly)
        );
        assert_eq!(EnumFormatKind::Currency.date_pattern(), None);
        assert!(EnumFormatKind::Percentage.is_numeric());
        assert!(!EnumFormatKind::None.is_numeric());
    }

    #[test]
    fn test_option_converts_to_null() {
        let value: EnumFieldValue = Option::<i64>::None.into();
        assert_eq!(value, EnumFieldValue::Null);

        let value: EnumFieldValue = Some("abc").into();
        assert_eq!(value, EnumFieldValue::String("abc".to_string()));
    }

    #[test]
    fn test_number_cell_text_uses_locale_separator() {
        let locale = SpecExportLocale::default();
        assert_eq!(EnumCellValue::Number(6500.5).to_text(&locale), "6500,5");
        assert_eq!(EnumCellValue::Number(42.0).to_text(&locale), "42");
        assert_eq!(EnumCellValue::Blank.to_text(&locale), "");
    }
}
