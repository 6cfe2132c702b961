//! Version string substitution in project files

use crate::domain::Version;
use crate::error::{BrauError, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Quoted forms the current version is looked for in
fn quoted(version: &str) -> [String; 2] {
    [format!("'{}'", version), format!("\"{}\"", version)]
}

fn replace_version(text: &str, current: &str, new: &str) -> Option<String> {
    let [single, double] = quoted(current);

    if !text.contains(&single) && !text.contains(&double) {
        return None;
    }

    Some(
        text.replace(&single, &format!("'{}'", new))
            .replace(&double, &format!("\"{}\"", new)),
    )
}

/// Replace the quoted current version (`'1.0.0'` or `"1.0.0"`) with the new one.
///
/// Every file is read and checked before any is written, so a missing version
/// string leaves all files untouched.
///
/// # Returns
/// * `Ok(())` - All files updated
/// * `Err(VersionStringNotFound)` - If a file does not contain the current version
/// * `Err(Io)` - If a file cannot be read or written
pub fn update_files<P: AsRef<Path>>(paths: &[P], current: &Version, new: &Version) -> Result<()> {
    let mut updates: Vec<(PathBuf, String)> = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let updated = replace_version(&text, current.as_str(), new.as_str())
            .ok_or_else(|| BrauError::VersionStringNotFound(path.display().to_string()))?;

        debug!("{} contains {}", path.display(), current);
        updates.push((path.to_path_buf(), updated));
    }

    for (path, text) in updates {
        fs::write(&path, text)?;
        info!("Updated {} to {}", path.display(), new);
    }

    Ok(())
}
