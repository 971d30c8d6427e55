use naryad_core::export::Table;
use naryad_core::parsing::ParsedRequests;

/// Requests one per block, followed by skipped rows and pattern misses.
pub fn format_parsed(parsed: &ParsedRequests) -> String {
    let mut out = String::new();

    for (i, r) in parsed.records.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {}  {}  {}\n",
            i + 1,
            r.padded_account_id(),
            r.name,
            r.address
        ));
        out.push_str(&format!("     {} ({})\n", r.work_type.short, r.reason));
        out.push_str(&format!("     {}\n", r.counter_text()));
        let info = r.full_additional_info();
        if !info.is_empty() {
            out.push_str(&format!("     {}\n", info));
        }
    }

    out.push_str(&format!("\n{} request(s)\n", parsed.records.len()));

    if !parsed.skipped_rows.is_empty() {
        out.push_str(&format!("\nSkipped rows ({}):\n", parsed.skipped_rows.len()));
        for s in &parsed.skipped_rows {
            out.push_str(&format!("  row {}: {}\n", s.row, s.text));
        }
    }

    if !parsed.pattern_misses.is_empty() {
        out.push_str(&format!(
            "\nUnrecognised fields ({}):\n",
            parsed.pattern_misses.len()
        ));
        for m in &parsed.pattern_misses {
            out.push_str(&format!("  row {}: {}\n", m.row, m.field));
        }
    }

    out
}

/// Tables with columns padded to their widest cell.
pub fn format_tables(tables: &[Table]) -> String {
    let mut out = String::new();

    for table in tables {
        out.push_str(&format!("=== {} ===\n\n", table.name));

        let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in table.rows.iter().filter(|r| r.len() > 1) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        for row in &table.rows {
            let line = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if row.len() == 1 {
                        cell.clone()
                    } else {
                        format!("{:<width$}", cell, width = widths[i])
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out.push('\n');
    }

    out
}
