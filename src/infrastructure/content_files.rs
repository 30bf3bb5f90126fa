//! Content files on disk

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::services::ContentSource;

/// Read every `*.xml` file under `dir`, recursively, in path order.
pub fn read_content_dir(dir: &Path) -> Result<Vec<ContentSource>> {
    let mut paths = Vec::new();
    collect_xml(dir, &mut paths)?;
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read content file {}", path.display()))?;
            debug!(path = %path.display(), "Read content file");
            Ok(ContentSource::new(path.display().to_string(), text))
        })
        .collect()
}

fn collect_xml(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read content directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_xml(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("xml")) {
            paths.push(path);
        }
    }
    Ok(())
}
