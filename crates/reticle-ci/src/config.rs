//! Harness configuration assembled once per run.
//!
//! Identity, paths and profiles are resolved up front and passed by
//! reference into command building and step execution; nothing is read from
//! ambient state after startup.

use std::path::Path;
use tracing::debug;

use crate::command::{CommandBuilder, DEFAULT_RUNTIME};
use crate::error::HarnessResult;
use crate::identity::HostIdentity;
use crate::paths::HarnessPaths;
use crate::profile::{ExecutionProfile, ProfileKind};

/// Process-lifetime constants for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    identity: HostIdentity,
    paths: HarnessPaths,
    toolchain: ExecutionProfile,
    eda: ExecutionProfile,
    runtime: String,
    containerized: bool,
}

impl HarnessConfig {
    /// Build a configuration from already-resolved inputs.
    pub fn new(
        identity: HostIdentity,
        paths: HarnessPaths,
        runtime: impl Into<String>,
        containerized: bool,
    ) -> HarnessResult<Self> {
        let toolchain = ExecutionProfile::toolchain(&paths)?;
        let eda = ExecutionProfile::eda(&paths)?;
        Ok(Self {
            identity,
            paths,
            toolchain,
            eda,
            runtime: runtime.into(),
            containerized,
        })
    }

    /// Resolve identity and paths from the host.
    ///
    /// Any failure here is an environment problem and aborts the run before
    /// a step is attempted.
    pub fn resolve(
        ci_dir: &Path,
        runtime: Option<&str>,
        containerized: bool,
    ) -> HarnessResult<Self> {
        let identity = HostIdentity::resolve()?;
        let paths = HarnessPaths::resolve(ci_dir)?;
        let config = Self::new(
            identity,
            paths,
            runtime.unwrap_or(DEFAULT_RUNTIME),
            containerized,
        )?;
        debug!(
            user = %config.identity,
            project_root = %config.paths.project_root.display(),
            ci_dir = %config.paths.ci_dir.display(),
            containerized,
            "Resolved harness configuration"
        );
        Ok(config)
    }

    pub fn identity(&self) -> HostIdentity {
        self.identity
    }

    pub fn paths(&self) -> &HarnessPaths {
        &self.paths
    }

    pub fn profile(&self, kind: ProfileKind) -> &ExecutionProfile {
        match kind {
            ProfileKind::Toolchain => &self.toolchain,
            ProfileKind::Eda => &self.eda,
        }
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    pub fn containerized(&self) -> bool {
        self.containerized
    }

    pub fn command_builder(&self) -> CommandBuilder {
        CommandBuilder::new(self.identity, self.runtime.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_new_builds_both_profiles() {
        let paths = HarnessPaths::from_absolute(PathBuf::from("/proj/ci")).unwrap();
        let config = HarnessConfig::new(HostIdentity::new(1, 2), paths, "podman", true).unwrap();

        assert_eq!(config.profile(ProfileKind::Toolchain).image(), "reticle-rust");
        assert_eq!(config.profile(ProfileKind::Eda).image(), "vivado");
        assert_eq!(config.runtime(), "podman");
        assert!(config.containerized());
        assert_eq!(config.command_builder().runtime(), "podman");
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_from_host() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").unwrap();
        let ci = dir.path().join("ci");
        std::fs::create_dir(&ci).unwrap();

        let config = HarnessConfig::resolve(&ci, None, false).unwrap();
        assert_eq!(config.runtime(), "docker");
        assert_eq!(config.paths().project_root, dir.path().canonicalize().unwrap());
        assert_eq!(config.identity(), HostIdentity::resolve().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_project_root_as_ci_dir() {
        let dir = tempdir().unwrap();
        let proj = dir.path().join("proj");
        std::fs::create_dir_all(proj.join("ci")).unwrap();
        std::fs::write(proj.join("Cargo.toml"), "[workspace]\n").unwrap();

        // Handing over the project root would mount its parent at the
        // toolchain workdir; it must fail before any command is built.
        let err = HarnessConfig::resolve(&proj, None, true).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidPath { .. }));

        let config = HarnessConfig::resolve(&proj.join("ci"), None, true).unwrap();
        assert_eq!(config.paths().project_root, proj.canonicalize().unwrap());
    }

    #[test]
    fn test_resolve_missing_ci_dir_fails() {
        let dir = tempdir().unwrap();
        assert!(HarnessConfig::resolve(&dir.path().join("nope"), None, false).is_err());
    }
}
