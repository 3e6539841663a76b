//! Word-processor export strategy.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use tabkit_export::{
    C_PARAM_FOOTER, C_PARAM_SUBTITLE, ExportError, ExportParameters, ExportStrategy, Exportable,
    RecordTypeDeclaration, RecordTypeDescriptor, Result, convert_record_cells, derive_param_text,
};
use tracing::debug;

use crate::spec::{EnumParagraphRole, SpecDocxDocument, SpecDocxParagraph, SpecDocxWriteOptions};

/// Word-processor export strategy.
///
/// Layout: title paragraph, optional `"subtitle"` paragraph, a table with a bold
/// header row and one row per record, optional `"footer"` paragraph.
pub struct DocxExportStrategy<R> {
    declaration: Option<RecordTypeDeclaration<R>>,
    write_options: SpecDocxWriteOptions,
    document: SpecDocxDocument,
}

impl<R> DocxExportStrategy<R> {
    /// Strategy exporting records declared by `declaration`.
    pub fn new(declaration: RecordTypeDeclaration<R>) -> Self {
        Self {
            declaration: Some(declaration),
            write_options: SpecDocxWriteOptions::default(),
            document: SpecDocxDocument::default(),
        }
    }

    /// Replace the write options.
    pub fn with_options(mut self, write_options: SpecDocxWriteOptions) -> Self {
        self.write_options = write_options;
        self
    }

    /// Document under construction; empty once serialized.
    pub fn document(&self) -> &SpecDocxDocument {
        &self.document
    }
}

impl<R: Exportable> DocxExportStrategy<R> {
    /// Strategy for a type carrying its own declaration.
    pub fn exportable() -> Self {
        Self::new(R::record_type())
    }
}

impl<R> ExportStrategy<R> for DocxExportStrategy<R> {
    fn record_type(&self) -> Option<&RecordTypeDeclaration<R>> {
        self.declaration.as_ref()
    }

    fn format_name(&self) -> &'static str {
        "docx"
    }

    fn file_extension(&self) -> &'static str {
        "docx"
    }

    fn header(
        &mut self,
        descriptor: &RecordTypeDescriptor<R>,
        parameters: &ExportParameters,
    ) -> Result<()> {
        self.document = SpecDocxDocument::default();
        if !descriptor.title().is_empty() {
            self.document.paragraphs_head.push(SpecDocxParagraph {
                text: descriptor.title().to_string(),
                role: EnumParagraphRole::Title,
            });
        }
        if let Some(c_subtitle) = derive_param_text(parameters, C_PARAM_SUBTITLE) {
            self.document.paragraphs_head.push(SpecDocxParagraph {
                text: c_subtitle,
                role: EnumParagraphRole::Subtitle,
            });
        }
        Ok(())
    }

    fn detail(&mut self, descriptor: &RecordTypeDescriptor<R>, records: &[R]) -> Result<()> {
        self.document.header = Some(
            descriptor
                .display_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        );

        let locale = &self.write_options.locale;
        for (idx_record, record) in records.iter().enumerate() {
            let l_cells = convert_record_cells(descriptor, record, idx_record, locale)?;
            self.document
                .rows
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
            self.document.paragraphs_tail.push(SpecDocxParagraph {
                text: c_footer,
                role: EnumParagraphRole::Body,
            });
        }
        Ok(())
    }

    fn get_bytes(&mut self, _descriptor: &RecordTypeDescriptor<R>) -> Result<Vec<u8>> {
        let document = std::mem::take(&mut self.document);
        let docx = render_docx(&document, &self.write_options);

        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).map_err(|err| {
            ExportError::failure(format!("Failed to pack DOCX: {err}"), err)
        })?;
        let v_bytes = buf.into_inner();

        debug!(
            n_rows = document.rows.len(),
            n_bytes = v_bytes.len(),
            "docx document rendered"
        );
        Ok(v_bytes)
    }
}

fn render_docx(document: &SpecDocxDocument, write_options: &SpecDocxWriteOptions) -> Docx {
    let mut docx = Docx::new();
    for paragraph in &document.paragraphs_head {
        docx = docx.add_paragraph(derive_paragraph(paragraph, write_options));
    }

    if let Some(l_header) = &document.header
        && !l_header.is_empty()
    {
        let mut l_table_rows = Vec::with_capacity(document.rows.len() + 1);
        l_table_rows.push(TableRow::new(
            l_header
                .iter()
                .map(|c_name| derive_table_cell(c_name, true, write_options.size_body))
                .collect(),
        ));
        for row in &document.rows {
            l_table_rows.push(TableRow::new(
                row.iter()
                    .map(|c_text| derive_table_cell(c_text, false, write_options.size_body))
                    .collect(),
            ));
        }
        docx = docx.add_table(Table::new(l_table_rows));
    }

    for paragraph in &document.paragraphs_tail {
        docx = docx.add_paragraph(derive_paragraph(paragraph, write_options));
    }
    docx
}

fn derive_paragraph(paragraph: &SpecDocxParagraph, write_options: &SpecDocxWriteOptions) -> Paragraph {
    let run = Run::new().add_text(paragraph.text.as_str());
    let run = match paragraph.role {
        EnumParagraphRole::Title => run
            .bold()
            .underline("single")
            .size(write_options.size_title),
        EnumParagraphRole::Subtitle => run.size(write_options.size_subtitle),
        EnumParagraphRole::Body => run.size(write_options.size_body),
    };
    Paragraph::new().add_run(run)
}

fn derive_table_cell(c_text: &str, if_bold: bool, size: usize) -> TableCell {
    let mut run = Run::new().add_text(c_text).size(size);
    if if_bold {
        run = run.bold();
    }
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
