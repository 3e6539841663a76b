//! Export orchestrator: validates the record type once, then drives a strategy
//! through its phases for each export call.

use std::path::Path;
use std::sync::Arc;

use tabkit_io_fs::{ReportWrite, SpecWriteOptions, write_bytes};
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::record::RecordTypeDescriptor;
use crate::spec::ExportParameters;
use crate::strategy::ExportStrategy;

/// Generic export orchestrator bound to one strategy instance.
pub struct Exporter<R, S> {
    descriptor: Arc<RecordTypeDescriptor<R>>,
    strategy: S,
}

impl<R, S> Exporter<R, S>
where
    S: ExportStrategy<R>,
{
    /// Bind a strategy and validate its record type.
    ///
    /// Fails with [`crate::ExportError::InvalidRecordType`] when the strategy's
    /// record type is unset or not marked exportable. No later call re-validates.
    pub fn new(strategy: S) -> Result<Self> {
        let descriptor = RecordTypeDescriptor::describe(strategy.record_type())?;
        debug!(
            type_name = descriptor.type_name(),
            format = strategy.format_name(),
            n_cols = descriptor.width(),
            "export record type validated"
        );
        Ok(Self {
            descriptor: Arc::new(descriptor),
            strategy,
        })
    }

    /// Run header, detail, footer and serialize, returning the document bytes.
    ///
    /// The first failing phase aborts the call; no partial buffer is returned.
    pub fn export(&mut self, records: &[R], parameters: &ExportParameters) -> Result<Vec<u8>> {
        let descriptor = Arc::clone(&self.descriptor);
        let span = info_span!(
            "export",
            type_name = descriptor.type_name(),
            format = self.strategy.format_name(),
        );
        let _guard = span.enter();

        debug!(n_params = parameters.len(), "header phase");
        self.strategy.header(&descriptor, parameters)?;

        debug!(n_records = records.len(), "detail phase");
        self.strategy.detail(&descriptor, records)?;

        debug!("footer phase");
        self.strategy.footer(&descriptor, parameters)?;

        debug!("serialize phase");
        let v_bytes = self.strategy.get_bytes(&descriptor)?;

        info!(
            n_records = records.len(),
            n_bytes = v_bytes.len(),
            "export finished"
        );
        Ok(v_bytes)
    }

    /// Export and persist the buffer at `path`, replacing any existing file.
    pub fn export_to_file(
        &mut self,
        path: impl AsRef<Path>,
        records: &[R],
        parameters: &ExportParameters,
    ) -> Result<ReportWrite> {
        self.export_to_file_with(path, records, parameters, &SpecWriteOptions::default())
    }

    /// Export and persist the buffer at `path` using an explicit write policy.
    ///
    /// Filesystem failures surface as [`crate::ExportError::Io`] with the
    /// original error kind.
    pub fn export_to_file_with(
        &mut self,
        path: impl AsRef<Path>,
        records: &[R],
        parameters: &ExportParameters,
        options: &SpecWriteOptions,
    ) -> Result<ReportWrite> {
        let v_bytes = self.export(records, parameters)?;
        let report = write_bytes(path.as_ref(), &v_bytes, options)?;
        info!("{report}");
        Ok(report)
    }

    /// Shared descriptor of the bound record type.
    pub fn descriptor(&self) -> Arc<RecordTypeDescriptor<R>> {
        Arc::clone(&self.descriptor)
    }

    /// Bound strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Release the bound strategy.
    pub fn into_strategy(self) -> S {
        self.strategy
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;
    use crate::error::ExportError;
    use crate::record::RecordTypeDeclaration;
    use crate::spec::{EnumFieldValue, SpecExportLocale, SpecFieldExport};
    use crate::util::convert_record_cells;
    use tabkit_io_fs::EnumWriteConflictStrategy;

    struct Item {
        label: &'static str,
        if_broken: bool,
    }

    /// Strategy that records the phases it ran and renders cells as text lines.
    struct RecordingStrategy {
        declaration: Option<RecordTypeDeclaration<Item>>,
        l_phases: Vec<&'static str>,
        l_lines: Vec<String>,
    }

    impl RecordingStrategy {
        fn new(declaration: Option<RecordTypeDeclaration<Item>>) -> Self {
            Self {
                declaration,
                l_phases: Vec::new(),
                l_lines: Vec::new(),
            }
        }
    }

    impl ExportStrategy<Item> for RecordingStrategy {
        fn record_type(&self) -> Option<&RecordTypeDeclaration<Item>> {
            self.declaration.as_ref()
        }

        fn format_name(&self) -> &'static str {
            "recording"
        }

        fn file_extension(&self) -> &'static str {
            "txt"
        }

        fn header(
            &mut self,
            descriptor: &RecordTypeDescriptor<Item>,
            _parameters: &ExportParameters,
        ) -> Result<()> {
            self.l_phases.push("header");
            self.l_lines = vec![descriptor.title().to_string()];
            Ok(())
        }

        fn detail(&mut self, descriptor: &RecordTypeDescriptor<Item>, records: &[Item]) -> Result<()> {
            self.l_phases.push("detail");
            let locale = SpecExportLocale::default();
            for (idx_record, record) in records.iter().enumerate() {
                let l_cells = convert_record_cells(descriptor, record, idx_record, &locale)?;
                let l_text: Vec<String> = l_cells.iter().map(|c| c.to_text(&locale)).collect();
                self.l_lines.push(l_text.join("|"));
            }
            Ok(())
        }

        fn footer(
            &mut self,
            _descriptor: &RecordTypeDescriptor<Item>,
            _parameters: &ExportParameters,
        ) -> Result<()> {
            self.l_phases.push("footer");
            Ok(())
        }

        fn get_bytes(&mut self, _descriptor: &RecordTypeDescriptor<Item>) -> Result<Vec<u8>> {
            self.l_phases.push("get_bytes");
            Ok(std::mem::take(&mut self.l_lines).join("\n").into_bytes())
        }
    }

    fn derive_item_declaration() -> RecordTypeDeclaration<Item> {
        RecordTypeDeclaration::new("Item")
            .exportable("Items")
            .column("label", SpecFieldExport::new("Label"), |i: &Item| i.label)
            .try_column("flag", SpecFieldExport::new("Flag"), |i: &Item| {
                if i.if_broken {
                    Err("flag unreadable".into())
                } else {
                    Ok(EnumFieldValue::Boolean(true))
                }
            })
    }

    fn derive_items() -> Vec<Item> {
        vec![
            Item {
                label: "a",
                if_broken: false,
            },
            Item {
                label: "b",
                if_broken: false,
            },
        ]
    }

    #[test]
    fn test_export_runs_phases_in_order() {
        let mut exporter =
            Exporter::new(RecordingStrategy::new(Some(derive_item_declaration()))).expect("new");

        let v_bytes = exporter
            .export(&derive_items(), &ExportParameters::new())
            .expect("export");

        assert_eq!(String::from_utf8(v_bytes).expect("utf8"), "Items\na|Sim\nb|Sim");
        assert_eq!(
            exporter.strategy().l_phases,
            vec!["header", "detail", "footer", "get_bytes"]
        );
    }

    #[test]
    fn test_strategy_is_reusable_across_calls() {
        let mut exporter =
            Exporter::new(RecordingStrategy::new(Some(derive_item_declaration()))).expect("new");

        let v_first = exporter
            .export(&derive_items(), &ExportParameters::new())
            .expect("first");
        let v_second = exporter.export(&[], &ExportParameters::new()).expect("second");

        assert_eq!(String::from_utf8(v_first).expect("utf8"), "Items\na|Sim\nb|Sim");
        assert_eq!(String::from_utf8(v_second).expect("utf8"), "Items");
        assert_eq!(exporter.into_strategy().l_phases.len(), 8);
    }

    #[test]
    fn test_failure_aborts_remaining_phases() {
        let mut exporter =
            Exporter::new(RecordingStrategy::new(Some(derive_item_declaration()))).expect("new");
        let l_items = vec![
            Item {
                label: "a",
                if_broken: false,
            },
            Item {
                label: "b",
                if_broken: true,
            },
        ];

        let err = exporter
            .export(&l_items, &ExportParameters::new())
            .expect_err("must fail");

        assert!(matches!(err, ExportError::ExportFailure { .. }));
        assert_eq!(exporter.strategy().l_phases, vec!["header", "detail"]);
    }

    #[test]
    fn test_new_rejects_unset_and_unmarked_types() {
        let err = Exporter::new(RecordingStrategy::new(None))
            .err()
            .expect("unset must fail");
        assert!(matches!(err, ExportError::InvalidRecordType { ref type_name, .. } if type_name == "Item"));

        let unmarked = RecordTypeDeclaration::<Item>::new("Item").column(
            "label",
            SpecFieldExport::new("Label"),
            |i: &Item| i.label,
        );
        let err = Exporter::new(RecordingStrategy::new(Some(unmarked)))
            .err()
            .expect("unmarked must fail");
        assert!(err.to_string().contains("exportable marker"));
    }

    #[test]
    fn test_descriptor_is_shared() {
        let exporter =
            Exporter::new(RecordingStrategy::new(Some(derive_item_declaration()))).expect("new");
        let descriptor = exporter.descriptor();

        assert_eq!(descriptor.display_names(), vec!["Label", "Flag"]);
        assert_eq!(Arc::strong_count(&descriptor), 2);
    }

    #[test]
    fn test_export_to_file_writes_and_reports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("items.txt");
        let mut exporter =
            Exporter::new(RecordingStrategy::new(Some(derive_item_declaration()))).expect("new");

        let report = exporter
            .export_to_file(&path, &derive_items(), &ExportParameters::new())
            .expect("write");

        assert_eq!(report.n_bytes_written, 17);
        assert!(!report.if_appended);
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "Items\na|Sim\nb|Sim");
    }

    #[test]
    fn test_export_to_file_surfaces_io_errors_distinctly() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("items.txt");
        let mut exporter =
            Exporter::new(RecordingStrategy::new(Some(derive_item_declaration()))).expect("new");

        let err = exporter
            .export_to_file(&path, &derive_items(), &ExportParameters::new())
            .expect_err("must fail");
        assert!(matches!(err, ExportError::Io(ref e) if e.kind() == ErrorKind::NotFound));

        let path_existing = dir.path().join("existing.txt");
        std::fs::write(&path_existing, b"keep").expect("seed");
        let options = SpecWriteOptions {
            rule_conflict: EnumWriteConflictStrategy::Error,
            ..Default::default()
        };
        let err = exporter
            .export_to_file_with(&path_existing, &derive_items(), &ExportParameters::new(), &options)
            .expect_err("must fail");
        assert!(matches!(err, ExportError::Io(ref e) if e.kind() == ErrorKind::AlreadyExists));
        assert_eq!(std::fs::read(&path_existing).expect("read"), b"keep");
    }
}
