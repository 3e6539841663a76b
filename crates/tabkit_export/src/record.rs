//! Record type declarations, column metadata model and record type descriptor.

use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, ExportError, Result};
use crate::spec::{EnumFieldValue, SpecExportable, SpecFieldExport};
use crate::util::derive_short_type_name;

/// Typed getter reading one field value from a record.
pub type FieldAccessor<R> = Arc<dyn Fn(&R) -> std::result::Result<EnumFieldValue, BoxError> + Send + Sync>;

/// Record types that carry their own export declaration.
pub trait Exportable: Sized {
    /// Declare the record's fields, in declaration order.
    fn record_type() -> RecordTypeDeclaration<Self>;
}

////////////////////////////////////////////////////////////////////////////////
// #region Declaration

/// One declared field of a record type.
pub struct SpecDeclaredField<R> {
    /// Field name as declared on the record.
    pub name: String,
    /// Export annotation; `None` means the field never participates.
    pub export: Option<SpecFieldExport>,
    accessor: Option<FieldAccessor<R>>,
}

impl<R> Clone for SpecDeclaredField<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            export: self.export.clone(),
            accessor: self.accessor.clone(),
        }
    }
}

impl<R> fmt::Debug for SpecDeclaredField<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecDeclaredField")
            .field("name", &self.name)
            .field("export", &self.export)
            .finish_non_exhaustive()
    }
}

/// Declarative description of a record type: marker plus ordered fields.
pub struct RecordTypeDeclaration<R> {
    type_name: String,
    marker: Option<SpecExportable>,
    fields: Vec<SpecDeclaredField<R>>,
}

impl<R> Clone for RecordTypeDeclaration<R> {
    fn clone(&self) -> Self {
        Self {
            type_name: self.type_name.clone(),
            marker: self.marker.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for RecordTypeDeclaration<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTypeDeclaration")
            .field("type_name", &self.type_name)
            .field("marker", &self.marker)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<R> RecordTypeDeclaration<R> {
    /// Start an unmarked declaration named `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            marker: None,
            fields: Vec::new(),
        }
    }

    /// Start an unmarked declaration named after `R`.
    pub fn for_type() -> Self {
        Self::new(derive_short_type_name::<R>())
    }

    /// Attach the exportable marker with a document title (may be empty).
    pub fn exportable(mut self, title: impl Into<String>) -> Self {
        self.marker = Some(SpecExportable {
            title: title.into(),
        });
        self
    }

    /// Declare an annotated field read by an infallible getter.
    pub fn column<V, F>(self, name: impl Into<String>, export: SpecFieldExport, getter: F) -> Self
    where
        V: Into<EnumFieldValue>,
        F: Fn(&R) -> V + Send + Sync + 'static,
    {
        self.try_column(name, export, move |record| Ok(getter(record).into()))
    }

    /// Declare an annotated field read by a fallible getter.
    pub fn try_column<F>(mut self, name: impl Into<String>, export: SpecFieldExport, getter: F) -> Self
    where
        F: Fn(&R) -> std::result::Result<EnumFieldValue, BoxError> + Send + Sync + 'static,
    {
        self.fields.push(SpecDeclaredField {
            name: name.into(),
            export: Some(export),
            accessor: Some(Arc::new(getter)),
        });
        self
    }

    /// Declare a field annotated with `ignore = true`.
    pub fn ignored(mut self, name: impl Into<String>) -> Self {
        self.fields.push(SpecDeclaredField {
            name: name.into(),
            export: Some(SpecFieldExport::ignored()),
            accessor: None,
        });
        self
    }

    /// Declare a field without export metadata.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(SpecDeclaredField {
            name: name.into(),
            export: None,
            accessor: None,
        });
        self
    }

    /// Declared type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Exportable marker, if declared.
    pub fn marker(&self) -> Option<&SpecExportable> {
        self.marker.as_ref()
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[SpecDeclaredField<R>] {
        &self.fields
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnModel

/// Ordered export specs of a declaration: annotated, non-ignored fields only.
pub fn derive_field_export_specs<R>(declaration: &RecordTypeDeclaration<R>) -> Vec<SpecFieldExport> {
    derive_export_columns(declaration)
        .into_iter()
        .map(|column| column.spec)
        .collect()
}

fn derive_export_columns<R>(declaration: &RecordTypeDeclaration<R>) -> Vec<SpecExportColumn<R>> {
    declaration
        .fields
        .iter()
        .filter_map(|field| {
            let spec = field.export.as_ref()?;
            if spec.ignore {
                return None;
            }
            let accessor = field.accessor.as_ref()?;
            Some(SpecExportColumn {
                field_name: field.name.clone(),
                spec: spec.clone(),
                accessor: Arc::clone(accessor),
            })
        })
        .collect()
}

/// One exported column: field name, annotation and bound getter.
pub struct SpecExportColumn<R> {
    /// Declared field name.
    pub field_name: String,
    /// Export annotation.
    pub spec: SpecFieldExport,
    accessor: FieldAccessor<R>,
}

impl<R> SpecExportColumn<R> {
    /// Read this column's value from `record`.
    pub fn read(&self, record: &R) -> std::result::Result<EnumFieldValue, BoxError> {
        (self.accessor)(record)
    }
}

impl<R> fmt::Debug for SpecExportColumn<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecExportColumn")
            .field("field_name", &self.field_name)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Descriptor

/// Validated, immutable view of an exportable record type.
///
/// Built once per orchestrator and shared read-only by every export call.
pub struct RecordTypeDescriptor<R> {
    type_name: String,
    title: String,
    columns: Vec<SpecExportColumn<R>>,
}

impl<R> fmt::Debug for RecordTypeDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTypeDescriptor")
            .field("type_name", &self.type_name)
            .field("title", &self.title)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<R> RecordTypeDescriptor<R> {
    /// Validate a declaration and extract its columns.
    ///
    /// Fails with [`ExportError::InvalidRecordType`] when the declaration is unset
    /// or lacks the exportable marker.
    pub fn describe(declaration: Option<&RecordTypeDeclaration<R>>) -> Result<Self> {
        let Some(declaration) = declaration else {
            return Err(ExportError::InvalidRecordType {
                type_name: derive_short_type_name::<R>(),
                reason: "the export strategy declares no record type.".to_string(),
            });
        };
        let Some(marker) = declaration.marker() else {
            return Err(ExportError::InvalidRecordType {
                type_name: declaration.type_name.clone(),
                reason: "the exportable marker was not found on this type.".to_string(),
            });
        };

        Ok(Self {
            type_name: declaration.type_name.clone(),
            title: marker.title.clone(),
            columns: derive_export_columns(declaration),
        })
    }

    /// Record type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Document title; empty when no title row is rendered.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Exported columns in output order.
    pub fn columns(&self) -> &[SpecExportColumn<R>] {
        &self.columns
    }

    /// Number of exported columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column display names in output order.
    pub fn display_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.spec.display_name.as_str())
            .collect()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
