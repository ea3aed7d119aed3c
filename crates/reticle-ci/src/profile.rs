//! Container execution profiles.
//!
//! Two contexts exist: the Rust toolchain image that builds the compiler,
//! and the Vivado image that simulates the generated Verilog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, HarnessResult};
use crate::paths::HarnessPaths;

pub const TOOLCHAIN_IMAGE: &str = "reticle-rust";
pub const TOOLCHAIN_WORKDIR: &str = "/usr/src/myapp";

pub const EDA_IMAGE: &str = "vivado";
pub const EDA_WORKDIR: &str = "/home/vivado/workspace";
pub const EDA_OUTDIR: &str = "/home/vivado/output";
pub const EDA_LOGIN_SHELL: [&str; 2] = ["bash", "--login"];

/// Selects one of the two fixed profiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Rust toolchain: fmt, clippy, test, build, example compilation.
    Toolchain,

    /// Vivado: simulation scenarios.
    Eda,
}

impl ProfileKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Toolchain => "toolchain",
            ProfileKind::Eda => "eda",
        }
    }
}

/// A bind mount from a host path into the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountSpec {
    pub host: PathBuf,
    pub container: String,
}

impl MountSpec {
    pub fn new(host: impl Into<PathBuf>, container: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            container: container.into(),
        }
    }

    /// Value for the container runtime's `-v` flag.
    pub fn volume_opt(&self) -> String {
        format!("{}:{}", self.host.display(), self.container)
    }
}

impl fmt::Display for MountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.volume_opt())
    }
}

/// Immutable parameters of one containerized execution context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionProfile {
    kind: ProfileKind,
    image: String,
    workdir: String,
    output_dir: Option<String>,
    mount: MountSpec,
    login_shell: Option<[String; 2]>,
}

impl ExecutionProfile {
    /// Create a validated profile.
    ///
    /// Container paths and the mount source must be absolute and the image
    /// name non-empty.
    pub fn new(
        kind: ProfileKind,
        image: impl Into<String>,
        workdir: impl Into<String>,
        output_dir: Option<String>,
        mount: MountSpec,
        login_shell: Option<[String; 2]>,
    ) -> HarnessResult<Self> {
        let profile = Self {
            kind,
            image: image.into(),
            workdir: workdir.into(),
            output_dir,
            mount,
            login_shell,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// The profile used for every `cargo` step and for example compilation.
    pub fn toolchain(paths: &HarnessPaths) -> HarnessResult<Self> {
        Self::new(
            ProfileKind::Toolchain,
            TOOLCHAIN_IMAGE,
            TOOLCHAIN_WORKDIR,
            None,
            MountSpec::new(&paths.project_root, TOOLCHAIN_WORKDIR),
            None,
        )
    }

    /// The profile used for Vivado simulation scenarios.
    pub fn eda(paths: &HarnessPaths) -> HarnessResult<Self> {
        Self::new(
            ProfileKind::Eda,
            EDA_IMAGE,
            EDA_WORKDIR,
            Some(EDA_OUTDIR.to_string()),
            MountSpec::new(&paths.ci_dir, EDA_WORKDIR),
            Some(EDA_LOGIN_SHELL.map(String::from)),
        )
    }

    fn validate(&self) -> HarnessResult<()> {
        let invalid = |reason: &str| HarnessError::InvalidProfile {
            profile: self.kind.name().to_string(),
            reason: reason.to_string(),
        };

        if self.image.trim().is_empty() {
            return Err(invalid("image name is empty"));
        }
        if !self.workdir.starts_with('/') {
            return Err(invalid("container working directory must be absolute"));
        }
        if !self.mount.container.starts_with('/') {
            return Err(invalid("mount target must be absolute"));
        }
        if !self.mount.host.is_absolute() {
            return Err(invalid("mount source must be an absolute host path"));
        }
        if let Some(out) = &self.output_dir {
            if !out.starts_with('/') {
                return Err(invalid("container output directory must be absolute"));
            }
        }
        if let Some(shell) = &self.login_shell {
            if shell.iter().any(|t| t.is_empty()) {
                return Err(invalid("login shell tokens must be non-empty"));
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn workdir(&self) -> &str {
        &self.workdir
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref()
    }

    pub fn mount(&self) -> &MountSpec {
        &self.mount
    }

    pub fn mount_source(&self) -> &Path {
        &self.mount.host
    }

    pub fn login_shell(&self) -> Option<&[String; 2]> {
        self.login_shell.as_ref()
    }
}
