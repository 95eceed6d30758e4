use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::warn;

use crate::error::RenderError;

/// Base and peak image paths for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub base: PathBuf,
    pub peak: PathBuf,
}

impl ArtifactPaths {
    /// `{YYYYMMDDHHMMSS}_{prefix}_{basename}.png` and `..._peak.png`.
    ///
    /// When either file already exists (two renders within the same second)
    /// the stem gets a `-2`, `-3`, … suffix.
    pub fn allocate(dir: &Path, prefix: &str, basename: &str, timestamp: NaiveDateTime) -> Self {
        let stem = format!("{}_{prefix}_{basename}", timestamp.format("%Y%m%d%H%M%S"));
        let mut candidate = Self::for_stem(dir, &stem);
        let mut n = 2;
        while candidate.base.exists() || candidate.peak.exists() {
            candidate = Self::for_stem(dir, &format!("{stem}-{n}"));
            n += 1;
        }
        candidate
    }

    fn for_stem(dir: &Path, stem: &str) -> Self {
        Self {
            base: dir.join(format!("{stem}.png")),
            peak: dir.join(format!("{stem}_peak.png")),
        }
    }
}

/// Write `bytes` to `path` so that readers only ever see a complete file.
///
/// The data goes to a hidden sibling first and is renamed into place; the
/// sibling is removed again on failure.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.part"));

    let result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = result {
        if tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                warn!("Could not remove {}: {e}", tmp.display());
            }
        }
        return Err(RenderError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
