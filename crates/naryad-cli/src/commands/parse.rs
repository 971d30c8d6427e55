use naryad_core::error::NaryadError;
use naryad_core::extraction::workbook::WorkbookRowSource;
use std::path::PathBuf;

use crate::output;

pub fn run(
    workbook: PathBuf,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), NaryadError> {
    let bytes = std::fs::read(&workbook)?;
    let source = WorkbookRowSource::new();
    let parsed = naryad_core::parse_workbook(&bytes, &source)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&path, &parsed)?;
            eprintln!(
                "Parsed {} request(s), written to {}",
                parsed.records.len(),
                path.display()
            );
            if !parsed.pattern_misses.is_empty() {
                eprintln!(
                    "  {} optional field(s) not recognised",
                    parsed.pattern_misses.len()
                );
            }
            if !parsed.skipped_rows.is_empty() {
                eprintln!("  {} row(s) skipped", parsed.skipped_rows.len());
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => println!("{}", output::table::format_parsed(&parsed)),
        },
    }

    Ok(())
}
