pub mod builtin;
pub mod schema;

use crate::compose::list::{geometry, MAX_CREW_SLOTS};
use crate::compose::order::{FIRST_PAGE_MAX_ROWS, SECOND_PAGE_MAX_ROWS};
use crate::error::NaryadError;
use schema::LayoutProfile;
use std::path::Path;

/// Largest UTC offset accepted for the issue date, in minutes.
const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

/// Load a layout profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<LayoutProfile, NaryadError> {
    let content = std::fs::read_to_string(path).map_err(|e| NaryadError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a layout profile, reporting failures against `source`.
pub fn parse_profile(json: &str, source: &Path) -> Result<LayoutProfile, NaryadError> {
    let profile: LayoutProfile =
        serde_json::from_str(json).map_err(|e| NaryadError::ProfileLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Parse a layout profile from a JSON string (no file path context).
pub fn parse_profile_str(json: &str) -> Result<LayoutProfile, NaryadError> {
    let profile: LayoutProfile = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}

/// Check that a profile fits the templates it describes.
pub fn validate_profile(profile: &LayoutProfile) -> Result<(), NaryadError> {
    if profile.name.trim().is_empty() {
        return Err(NaryadError::ProfileInvalid("name must not be empty".into()));
    }

    let order = &profile.order;
    let list = &profile.list;
    let positive = [
        ("order.first_page_capacity", order.first_page_capacity),
        ("order.second_page_capacity", order.second_page_capacity),
        ("order.work_types_line_budget", order.work_types_line_budget),
        ("order.address_line_budget", order.address_line_budget),
        ("order.safety_text_line_budget", order.safety_text_line_budget),
        ("list.capacity", list.capacity),
        ("list.name_max_chars", list.name_max_chars),
        ("list.counter_max_chars", list.counter_max_chars),
        ("list.additional_max_chars", list.additional_max_chars),
    ];
    for (field, value) in positive {
        if value == 0 {
            return Err(NaryadError::ProfileInvalid(format!(
                "{field} must be greater than zero"
            )));
        }
    }

    let page_limits = [
        ("order.first_page_capacity", order.first_page_capacity, FIRST_PAGE_MAX_ROWS),
        ("order.second_page_capacity", order.second_page_capacity, SECOND_PAGE_MAX_ROWS),
    ];
    for (field, value, max_rows) in page_limits {
        if value > max_rows {
            return Err(NaryadError::ProfileInvalid(format!(
                "{field} {value} exceeds the {max_rows} rows the order page holds"
            )));
        }
    }

    let max_rows = geometry(list.variant).max_rows;
    if list.capacity > max_rows {
        return Err(NaryadError::ProfileInvalid(format!(
            "list.capacity {} exceeds the {} rows a {:?} list page holds",
            list.capacity,
            max_rows,
            list.variant
        )));
    }

    if list.crew_slots > MAX_CREW_SLOTS {
        return Err(NaryadError::ProfileInvalid(format!(
            "list.crew_slots {} exceeds the {} slots on the heading page",
            list.crew_slots, MAX_CREW_SLOTS
        )));
    }

    if profile.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(NaryadError::ProfileInvalid(format!(
            "utc_offset_minutes {} is outside ±{}",
            profile.utc_offset_minutes, MAX_UTC_OFFSET_MINUTES
        )));
    }

    Ok(())
}
