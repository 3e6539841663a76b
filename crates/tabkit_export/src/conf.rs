//! Export constants and default preset factories.

use crate::spec::SpecExportLocale;

/// Date-only pattern, `dd/MM/yyyy`.
pub const C_DATE_PATTERN_DATE_ONLY: &str = "%d/%m/%Y";
/// Date plus short time pattern, `dd/MM/yyyy HH:mm`.
pub const C_DATE_PATTERN_DATE_TIME: &str = "%d/%m/%Y %H:%M";
/// Time-only pattern, `HH:mm`.
pub const C_DATE_PATTERN_TIME_ONLY: &str = "%H:%M";

/// Fraction digits used for percentage strings when none is given.
pub const N_PERCENTAGE_PRECISION_DEFAULT: usize = 2;
/// Fraction digits used for currency strings.
pub const N_CURRENCY_PRECISION: usize = 2;

/// Label rendered for `true` values.
pub const C_LABEL_TRUE: &str = "Sim";
/// Label rendered for `false` values.
pub const C_LABEL_FALSE: &str = "Não";
/// Currency symbol placed before currency amounts.
pub const C_CURRENCY_SYMBOL: &str = "R$";

/// Parameter key read by strategies that render a footer line.
pub const C_PARAM_FOOTER: &str = "footer";
/// Parameter key read by strategies that render a subtitle line.
pub const C_PARAM_SUBTITLE: &str = "subtitle";

/// Build the default (pt-BR) locale preset used by every strategy.
pub fn derive_default_export_locale() -> SpecExportLocale {
    SpecExportLocale::default()
}
