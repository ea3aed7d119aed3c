//! Host-side locations of the project and the CI harness.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};

/// Manifest that marks the project root.
pub const PROJECT_MANIFEST: &str = "Cargo.toml";

/// Absolute host paths used as bind-mount sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessPaths {
    /// Project root, one directory above the harness.
    pub project_root: PathBuf,

    /// The harness directory itself (`<project>/ci`).
    pub ci_dir: PathBuf,
}

impl HarnessPaths {
    /// Resolve paths from the harness directory.
    ///
    /// The directory is canonicalized, so it must exist, and its parent must
    /// hold the project's `Cargo.toml`. Pointing at the project root itself
    /// fails here rather than mounting the wrong tree.
    pub fn resolve(ci_dir: &Path) -> HarnessResult<Self> {
        let ci_dir = ci_dir
            .canonicalize()
            .map_err(|e| HarnessError::InvalidPath {
                path: ci_dir.to_path_buf(),
                reason: e.to_string(),
            })?;
        let paths = Self::from_absolute(ci_dir)?;

        if !paths.project_root.join(PROJECT_MANIFEST).is_file() {
            return Err(HarnessError::InvalidPath {
                path: paths.ci_dir,
                reason: format!(
                    "parent directory has no {PROJECT_MANIFEST}; expected <project>/ci"
                ),
            });
        }
        Ok(paths)
    }

    /// Build paths from an already-absolute harness directory without
    /// touching the filesystem.
    pub fn from_absolute(ci_dir: PathBuf) -> HarnessResult<Self> {
        if !ci_dir.is_absolute() {
            return Err(HarnessError::InvalidPath {
                path: ci_dir,
                reason: "path is not absolute".to_string(),
            });
        }
        let project_root = ci_dir
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| HarnessError::InvalidPath {
                path: ci_dir.clone(),
                reason: "harness directory has no parent".to_string(),
            })?;

        Ok(Self {
            project_root,
            ci_dir,
        })
    }
}
