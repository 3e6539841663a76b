//! Delimited-text export strategy.

use tabkit_export::{
    C_PARAM_FOOTER, ExportError, ExportParameters, ExportStrategy, Exportable,
    RecordTypeDeclaration, RecordTypeDescriptor, Result, convert_record_cells, derive_param_text,
};
use tracing::debug;

use crate::spec::SpecCsvWriteOptions;

/// Flat-text export strategy.
///
/// Records, in order: optional title, column display names, one record per row,
/// optional `"footer"` parameter text.
pub struct CsvExportStrategy<R> {
    declaration: Option<RecordTypeDeclaration<R>>,
    write_options: SpecCsvWriteOptions,
    l_records: Vec<Vec<String>>,
}

impl<R> CsvExportStrategy<R> {
    /// Strategy exporting records declared by `declaration`.
    pub fn new(declaration: RecordTypeDeclaration<R>) -> Self {
        Self {
            declaration: Some(declaration),
            write_options: SpecCsvWriteOptions::default(),
            l_records: Vec::new(),
        }
    }

    /// Replace the write options.
    pub fn with_options(mut self, write_options: SpecCsvWriteOptions) -> Self {
        self.write_options = write_options;
        self
    }

    /// Records buffered for the current document.
    pub fn records(&self) -> &[Vec<String>] {
        &self.l_records
    }
}

impl<R: Exportable> CsvExportStrategy<R> {
    /// Strategy for a type carrying its own declaration.
    pub fn exportable() -> Self {
        Self::new(R::record_type())
    }
}

impl<R> ExportStrategy<R> for CsvExportStrategy<R> {
    fn record_type(&self) -> Option<&RecordTypeDeclaration<R>> {
        self.declaration.as_ref()
    }

    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn header(
        &mut self,
        descriptor: &RecordTypeDescriptor<R>,
        _parameters: &ExportParameters,
    ) -> Result<()> {
        self.l_records.clear();
        if self.write_options.if_write_title && !descriptor.title().is_empty() {
            self.l_records.push(vec![descriptor.title().to_string()]);
        }
        Ok(())
    }

    fn detail(&mut self, descriptor: &RecordTypeDescriptor<R>, records: &[R]) -> Result<()> {
        self.l_records.push(
            descriptor
                .display_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );

        let locale = &self.write_options.locale;
        for (idx_record, record) in records.iter().enumerate() {
            let l_cells = convert_record_cells(descriptor, record, idx_record, locale)?;
            self.l_records
                .push(l_cells.iter().map(|cell| cell.to_text(locale)).collect());
        }
        Ok(())
    }

    fn footer(
        &mut self,
        _descriptor: &RecordTypeDescriptor<R>,
        parameters: &ExportParameters,
    ) -> Result<()> {
        if let Some(c_footer) = derive_param_text(parameters, C_PARAM_FOOTER) {
            self.l_records.push(vec![c_footer]);
        }
        Ok(())
    }

    fn get_bytes(&mut self, _descriptor: &RecordTypeDescriptor<R>) -> Result<Vec<u8>> {
        let l_records = std::mem::take(&mut self.l_records);
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.write_options.delimiter)
            .flexible(true)
            .from_writer(Vec::new());

        for record in &l_records {
            writer.write_record(record).map_err(|err| {
                ExportError::failure(format!("Failed to write CSV record: {err}"), err)
            })?;
        }
        let v_bytes = writer.into_inner().map_err(|err| {
            let err = err.into_error();
            ExportError::failure(format!("Failed to flush CSV writer: {err}"), err)
        })?;

        debug!(
            n_records = l_records.len(),
            n_bytes = v_bytes.len(),
            "csv document rendered"
        );
        Ok(v_bytes)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tabkit_export::{EnumFormatKind, Exporter, SpecFieldExport};

    use super::*;

    struct Product {
        name: &'static str,
        price: f64,
        weight: f64,
        since: NaiveDate,
        if_active: bool,
    }

    impl Exportable for Product {
        fn record_type() -> RecordTypeDeclaration<Self> {
            RecordTypeDeclaration::new("Product")
                .exportable("Products")
                .column("name", SpecFieldExport::new("Name"), |p: &Product| p.name)
                .column(
                    "price",
                    SpecFieldExport::new("Price").with_format(EnumFormatKind::Currency),
                    |p: &Product| p.price,
                )
                .column("weight", SpecFieldExport::new("Weight"), |p: &Product| {
                    p.weight
                })
                .column(
                    "since",
                    SpecFieldExport::new("Since").with_format(EnumFormatKind::Date),
                    |p: &Product| p.since,
                )
                .column("if_active", SpecFieldExport::new("Active"), |p: &Product| {
                    p.if_active
                })
        }
    }

    fn derive_products() -> Vec<Product> {
        vec![
            Product {
                name: "Chair; oak",
                price: 6500.5,
                weight: 1.5,
                since: NaiveDate::from_ymd_opt(1981, 1, 18).expect("valid date"),
                if_active: true,
            },
            Product {
                name: "Desk",
                price: 37.5,
                weight: 5.0,
                since: NaiveDate::from_ymd_opt(2020, 12, 1).expect("valid date"),
                if_active: false,
            },
        ]
    }

    #[test]
    fn test_export_writes_title_header_rows_and_footer() {
        let mut exporter = Exporter::new(CsvExportStrategy::<Product>::exportable()).expect("new");
        let mut parameters = ExportParameters::new();
        parameters.insert(C_PARAM_FOOTER.to_string(), serde_json::json!("2 products"));

        let v_bytes = exporter
            .export(&derive_products(), &parameters)
            .expect("export");
        let c_text = String::from_utf8(v_bytes).expect("utf8");
        let l_lines: Vec<&str> = c_text.lines().collect();

        assert_eq!(
            l_lines,
            vec![
                "Products",
                "Name;Price;Weight;Since;Active",
                "\"Chair; oak\";R$ 6.500,50;1,5;18/01/1981;Sim",
                "Desk;R$ 37,50;5;01/12/2020;Não",
                "2 products",
            ]
        );
        assert!(exporter.strategy().records().is_empty());
    }

    #[test]
    fn test_empty_records_and_comma_delimiter() {
        let options = SpecCsvWriteOptions {
            delimiter: b',',
            if_write_title: false,
            ..Default::default()
        };
        let mut exporter =
            Exporter::new(CsvExportStrategy::<Product>::exportable().with_options(options))
                .expect("new");

        let v_bytes = exporter
            .export(&[], &ExportParameters::new())
            .expect("export");

        assert_eq!(
            String::from_utf8(v_bytes).expect("utf8"),
            "Name,Price,Weight,Since,Active\n"
        );
    }

    #[test]
    fn test_strategy_metadata() {
        let strategy = CsvExportStrategy::<Product>::exportable();
        assert_eq!(strategy.format_name(), "csv");
        assert_eq!(strategy.file_extension(), "csv");
        assert!(strategy.record_type().is_some());
    }
}
