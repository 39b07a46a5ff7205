use std::path::{Path, PathBuf};

use crate::{error::Error, model::ConditionCode};

/// Resolve the banner image for a reported condition.
///
/// Recognised abbreviations (case-insensitive) always map to their own
/// image; anything else uses `fallback`. The composed path is never
/// built from a missing filename: an unknown code without a usable
/// fallback is a [`Error::Configuration`] failure.
pub fn banner_asset(
    assets_dir: &Path,
    abbr: &str,
    fallback: Option<&str>,
) -> crate::Result<PathBuf> {
    match ConditionCode::parse(abbr) {
        Some(code) => Ok(assets_dir.join(code.image_file())),
        None => {
            let file = fallback.filter(|f| !f.is_empty()).ok_or_else(|| {
                Error::Configuration(format!(
                    "no banner image for condition '{abbr}' and no fallback configured"
                ))
            })?;
            Ok(assets_dir.join(file))
        }
    }
}
