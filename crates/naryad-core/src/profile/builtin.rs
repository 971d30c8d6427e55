use crate::error::NaryadError;
use crate::profile::schema::LayoutProfile;
use crate::profile::validate_profile;

const STANDARD_JSON: &str = include_str!("../../../../profiles/standard.json");
const COMPACT_JSON: &str = include_str!("../../../../profiles/compact.json");

/// Available built-in layout profiles.
pub const PRESETS: &[&str] = &["standard", "compact"];

/// Profile used when none is named.
pub const DEFAULT_PRESET: &str = "standard";

/// Load a built-in layout profile by name.
pub fn load_preset(name: &str) -> Result<LayoutProfile, NaryadError> {
    let json = match name {
        "standard" => STANDARD_JSON,
        "compact" => COMPACT_JSON,
        _ => {
            return Err(NaryadError::ProfileInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let profile: LayoutProfile = serde_json::from_str(json)?;
    validate_profile(&profile)?;
    Ok(profile)
}
