use clap::Args;
use naryad_core::canvas::pdf::PdfCanvas;
use naryad_core::canvas::recording::RecordingCanvas;
use naryad_core::compose::order::ORDER_TEMPLATE_PAGES;
use naryad_core::error::NaryadError;
use naryad_core::model::WorksheetDocument;
use naryad_core::profile::builtin::{self, DEFAULT_PRESET};
use naryad_core::profile::schema::LayoutProfile;
use naryad_core::{compose, ComposeOptions, ComposeReport};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::output;

#[derive(Args)]
pub struct ComposeArgs {
    /// Path to the worksheet document (JSON)
    input_file: PathBuf,

    /// Work order template PDF (two pages)
    #[arg(long, value_name = "FILE", required_unless_present = "dump")]
    order_template: Option<PathBuf>,

    /// Request list template PDF
    #[arg(long, value_name = "FILE", required_unless_present = "dump")]
    list_template: Option<PathBuf>,

    /// TrueType font used for all text
    #[arg(long, value_name = "FILE", required_unless_present = "dump")]
    font: Option<PathBuf>,

    /// Output PDF
    #[arg(long, value_name = "FILE", required_unless_present = "dump")]
    out: Option<PathBuf>,

    /// Built-in layout profile: standard (default) or compact
    #[arg(long, value_name = "NAME", conflicts_with = "profile")]
    preset: Option<String>,

    /// Custom layout profile (JSON)
    #[arg(long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// Only render the work orders
    #[arg(long)]
    no_lists: bool,

    /// Print the text placements as JSON instead of writing a PDF
    #[arg(long)]
    dump: bool,
}

pub fn run(args: ComposeArgs) -> Result<(), NaryadError> {
    let json = std::fs::read_to_string(&args.input_file)?;
    let document = WorksheetDocument::from_json(&json)?;
    let profile = resolve_profile(&args)?;
    let options = ComposeOptions {
        include_lists: !args.no_lists,
    };
    tracing::debug!(profile = %profile.name, worksheets = document.worksheets.len(), "composing");

    if args.dump {
        let mut canvas =
            RecordingCanvas::new(ORDER_TEMPLATE_PAGES, profile.list.variant.page_count());
        let report = compose(&document.worksheets, &mut canvas, &profile, &options)?;
        output::json::print(&canvas.into_pages())?;
        print_report(&report);
        return Ok(());
    }

    let (Some(order), Some(list), Some(font), Some(out)) = (
        args.order_template.as_ref(),
        args.list_template.as_ref(),
        args.font.as_ref(),
        args.out.as_ref(),
    ) else {
        return Err(NaryadError::Layout(
            "--order-template, --list-template, --font and --out are required".into(),
        ));
    };

    let mut canvas = PdfCanvas::new(&std::fs::read(order)?, &std::fs::read(list)?, std::fs::read(font)?)?;
    let report = compose(&document.worksheets, &mut canvas, &profile, &options)?;

    let mut writer = BufWriter::new(std::fs::File::create(out)?);
    canvas.save_to(&mut writer)?;
    writer.flush()?;

    eprintln!(
        "Composed {} page(s) for {} worksheet(s), written to {}",
        report.pages,
        document.worksheets.len(),
        out.display()
    );
    print_report(&report);
    Ok(())
}

fn resolve_profile(args: &ComposeArgs) -> Result<LayoutProfile, NaryadError> {
    match (&args.profile, &args.preset) {
        (Some(path), _) => naryad_core::profile::load_profile(path),
        (None, Some(name)) => builtin::load_preset(name),
        (None, None) => builtin::load_preset(DEFAULT_PRESET),
    }
}

fn print_report(report: &ComposeReport) {
    for t in &report.truncated {
        eprintln!(
            "  warning: {} record(s) of '{}' did not fit the {} form",
            t.dropped, t.worksheet, t.form
        );
    }
}
