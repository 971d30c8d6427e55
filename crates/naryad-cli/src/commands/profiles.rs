use naryad_core::error::NaryadError;
use naryad_core::profile::builtin;
use naryad_core::profile::schema::{LayoutProfile, ListVariant};
use std::path::Path;

pub fn list() -> Result<(), NaryadError> {
    println!("Available layout profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        let default = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<10} v{}{}", name, profile.version, default);
        if let Some(ref desc) = profile.description {
            println!("             {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), NaryadError> {
    let profile = builtin::load_preset(preset)?;

    println!("{} (version {})\n", profile.name, profile.version);
    if let Some(ref desc) = profile.description {
        println!("{}\n", desc);
    }
    print_details(&profile);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), NaryadError> {
    let profile = naryad_core::profile::load_profile(file)?;
    println!("Profile '{}' (v{}) is valid.\n", profile.name, profile.version);
    print_details(&profile);
    Ok(())
}

fn print_details(profile: &LayoutProfile) {
    let order = &profile.order;
    let list = &profile.list;

    println!("Work order (2 template pages):");
    println!(
        "  records: {} on page 1, {} on page 2, {} in total",
        order.first_page_capacity,
        order.second_page_capacity,
        order.capacity()
    );
    println!(
        "  line budgets: work types {}, address {}, safety text {}",
        order.work_types_line_budget, order.address_line_budget, order.safety_text_line_budget
    );
    println!();

    let layout = match list.variant {
        ListVariant::Split => "heading page + table page",
        ListVariant::Combined => "single page",
    };
    println!("Request list ({layout}):");
    println!("  records: {}", list.capacity);
    println!(
        "  truncation: name {}, meter {}, details {} characters",
        list.name_max_chars, list.counter_max_chars, list.additional_max_chars
    );
    if list.variant == ListVariant::Split {
        println!("  crew lines: {}", list.crew_slots);
    }
    println!();

    let hours = profile.utc_offset_minutes / 60;
    let minutes = (profile.utc_offset_minutes % 60).abs();
    println!("Issue date printed at UTC{hours:+03}:{minutes:02}");
}
