use anyhow::{Context, Result};
use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tracing::{debug, info, instrument};

use super::Conference;

/// Load the persisted conference list.
///
/// A missing file, an empty document or a bare `null` all mean "no prior
/// data". Anything else that does not parse is an error; the caller must not
/// go on to overwrite a file it could not read.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn load_conferences(path: &Path) -> Result<Vec<Conference>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("{} not found; starting from an empty list", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading {}", path.display()));
        }
    };

    if text.trim().is_empty() {
        debug!("empty conference file");
        return Ok(Vec::new());
    }

    let conferences: Option<Vec<Conference>> = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing conference list {}", path.display()))?;
    let conferences = conferences.unwrap_or_default();
    debug!(count = conferences.len(), "loaded conferences");
    Ok(conferences)
}

/// Rewrite the whole list at `path`.
///
/// Written to a sibling `.tmp` file first, then renamed into place.
#[instrument(level = "debug", skip(conferences), fields(path = %path.display(), count = conferences.len()))]
pub fn save_conferences(path: &Path, conferences: &[Conference]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }

    let yaml = serde_yaml::to_string(conferences).context("serializing conference list")?;

    let tmp_path = path.with_extension("yml.tmp");
    {
        let mut file = fs::File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} → {}", tmp_path.display(), path.display()))?;

    info!("wrote {} conferences to {}", conferences.len(), path.display());
    Ok(())
}
