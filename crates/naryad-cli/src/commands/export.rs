use naryad_core::error::NaryadError;
use naryad_core::model::WorksheetDocument;
use std::path::PathBuf;

use crate::output;

pub fn run(document_file: PathBuf, output_format: &str) -> Result<(), NaryadError> {
    let json = std::fs::read_to_string(&document_file)?;
    let document = WorksheetDocument::from_json(&json)?;
    let tables = naryad_core::export_table(&document.worksheets);

    match output_format {
        "json" => output::json::print(&tables)?,
        _ => print!("{}", output::table::format_tables(&tables)),
    }
    Ok(())
}
