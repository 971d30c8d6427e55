use naryad_core::error::NaryadError;
use serde::Serialize;
use std::path::Path;

pub fn print<T: Serialize>(value: &T) -> Result<(), NaryadError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), NaryadError> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
