//! Spreadsheet package builder.

use officegen_core::{cell_reference, Error, Result};
use officegen_opc::{
    content_type, relationship_type, validate_text, Compression, Package, PackageOptions,
    XmlWriter,
};

/// Archive path of the workbook part.
pub const WORKBOOK_PATH: &str = "xl/workbook.xml";

/// Archive path of the only worksheet.
pub const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

/// Name of the only worksheet.
pub const SHEET_NAME: &str = "Sheet1";

const SHEET_ID: &str = "1";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Builder for single-sheet spreadsheet packages.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetBuilder {
    options: PackageOptions,
}

impl SpreadsheetBuilder {
    /// Create a builder with default package options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given package options.
    pub fn with_options(mut self, options: PackageOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the archive compression.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.options = self.options.with_compression(compression);
        self
    }

    /// Build a package whose worksheet holds `rows` in order, starting at row 1.
    ///
    /// Rows may have different lengths. Every value is written as a string cell.
    pub fn build<R, S>(&self, rows: &[R]) -> Result<Vec<u8>>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.as_ref().iter().enumerate() {
                validate_text(cell.as_ref()).map_err(|e| cell_context(c, r + 1, e))?;
            }
        }

        let mut package = Package::with_options(self.options.clone());
        package.add_relationship("", WORKBOOK_PATH, relationship_type::OFFICE_DOCUMENT);
        let sheet_r_id =
            package.add_relationship(WORKBOOK_PATH, SHEET_PATH, relationship_type::WORKSHEET);

        package.add_part(
            WORKBOOK_PATH,
            workbook_xml(&sheet_r_id)?,
            content_type::SML_SHEET_MAIN,
        )?;
        package.add_part(SHEET_PATH, worksheet_xml(rows)?, content_type::SML_WORKSHEET)?;

        log::debug!("Building spreadsheet with {} rows", rows.len());
        package.finalize()
    }
}

/// Build a spreadsheet with default options.
pub fn build_spreadsheet<R, S>(rows: &[R]) -> Result<Vec<u8>>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    SpreadsheetBuilder::new().build(rows)
}

fn cell_context(column: usize, row_number: usize, error: Error) -> Error {
    match error {
        Error::EncodingError(msg) => Error::EncodingError(format!(
            "cell {}: {}",
            cell_reference(column, row_number),
            msg
        )),
        other => other,
    }
}

fn workbook_xml(sheet_r_id: &str) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_R)])?;
    w.start("sheets", &[])?;
    w.empty(
        "sheet",
        &[("name", SHEET_NAME), ("sheetId", SHEET_ID), ("r:id", sheet_r_id)],
    )?;
    w.end()?;
    w.end()?;
    w.finish()
}

fn worksheet_xml<R, S>(rows: &[R]) -> Result<Vec<u8>>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut w = XmlWriter::new()?;
    w.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_R)])?;
    w.start("sheetData", &[])?;

    for (r, row) in rows.iter().enumerate() {
        let row_number = r + 1;
        let row_ref = row_number.to_string();
        w.start("row", &[("r", row_ref.as_str())])?;
        for (c, value) in row.as_ref().iter().enumerate() {
            let cell_ref = cell_reference(c, row_number);
            w.start("c", &[("r", cell_ref.as_str()), ("t", "str")])?;
            w.text_element("v", &[], value.as_ref())?;
            w.end()?;
        }
        w.end()?;
    }

    w.end()?; // sheetData
    w.end()?; // worksheet
    w.finish()
}
