//! Command construction, bare or wrapped in a container invocation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::HostIdentity;
use crate::profile::ExecutionProfile;

pub const DEFAULT_RUNTIME: &str = "docker";

/// An ordered argument list; the first token is the executable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandSpec(Vec<String>);

impl CommandSpec {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl From<Vec<String>> for CommandSpec {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

/// Builds step commands, optionally prefixed with a container invocation.
///
/// Holds only process-lifetime constants, so `build` is a pure function of
/// its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    identity: HostIdentity,
    runtime: String,
}

impl CommandBuilder {
    pub fn new(identity: HostIdentity, runtime: impl Into<String>) -> Self {
        Self {
            identity,
            runtime: runtime.into(),
        }
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// The fixed-shape container prefix for a profile:
    ///
    /// `<runtime> run --rm --pid=host --user <uid>:<gid> -v <host>:<ctr>
    /// -w <workdir> <image> [login shell]`
    pub fn container_prefix(&self, profile: &ExecutionProfile) -> Vec<String> {
        let mut prefix = vec![
            self.runtime.clone(),
            "run".to_string(),
            "--rm".to_string(),
            "--pid=host".to_string(),
            "--user".to_string(),
            self.identity.user_opt(),
            "-v".to_string(),
            profile.mount().volume_opt(),
            "-w".to_string(),
            profile.workdir().to_string(),
            profile.image().to_string(),
        ];
        if let Some(shell) = profile.login_shell() {
            prefix.extend(shell.iter().cloned());
        }
        prefix
    }

    /// Returns `bare` unchanged, or `container_prefix(profile)` followed by
    /// every token of `bare` in order.
    pub fn build(
        &self,
        bare: &CommandSpec,
        profile: &ExecutionProfile,
        containerized: bool,
    ) -> CommandSpec {
        if !containerized {
            return bare.clone();
        }
        let mut tokens = self.container_prefix(profile);
        tokens.extend(bare.tokens().iter().cloned());
        CommandSpec(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::HarnessPaths;
    use std::path::PathBuf;

    fn builder() -> CommandBuilder {
        CommandBuilder::new(HostIdentity::new(1000, 1000), DEFAULT_RUNTIME)
    }

    fn paths() -> HarnessPaths {
        HarnessPaths::from_absolute(PathBuf::from("/proj/ci")).unwrap()
    }

    fn fmt_cmd() -> CommandSpec {
        CommandSpec::new(["cargo", "fmt", "--", "--check"])
    }

    #[test]
    fn test_bare_command_unchanged() {
        let profile = ExecutionProfile::toolchain(&paths()).unwrap();
        let cmd = builder().build(&fmt_cmd(), &profile, false);
        assert_eq!(cmd, fmt_cmd());
    }

    #[test]
    fn test_toolchain_container_command() {
        let profile = ExecutionProfile::toolchain(&paths()).unwrap();
        let cmd = builder().build(&fmt_cmd(), &profile, true);
        assert_eq!(
            cmd.tokens(),
            [
                "docker",
                "run",
                "--rm",
                "--pid=host",
                "--user",
                "1000:1000",
                "-v",
                "/proj:/usr/src/myapp",
                "-w",
                "/usr/src/myapp",
                "reticle-rust",
                "cargo",
                "fmt",
                "--",
                "--check",
            ]
        );
    }

    #[test]
    fn test_eda_container_command_has_login_shell() {
        let profile = ExecutionProfile::eda(&paths()).unwrap();
        let bare = CommandSpec::new([
            "vivado_sim.sh",
            "fsm",
            "/home/vivado/workspace",
            "/home/vivado/output",
        ]);
        let cmd = builder().build(&bare, &profile, true);
        assert_eq!(
            cmd.tokens(),
            [
                "docker",
                "run",
                "--rm",
                "--pid=host",
                "--user",
                "1000:1000",
                "-v",
                "/proj/ci:/home/vivado/workspace",
                "-w",
                "/home/vivado/workspace",
                "vivado",
                "bash",
                "--login",
                "vivado_sim.sh",
                "fsm",
                "/home/vivado/workspace",
                "/home/vivado/output",
            ]
        );
    }

    #[test]
    fn test_container_command_is_prefix_plus_bare() {
        let b = builder();
        let p = paths();
        let bare = CommandSpec::new(["cargo", "build", "--release"]);
        for profile in [
            ExecutionProfile::toolchain(&p).unwrap(),
            ExecutionProfile::eda(&p).unwrap(),
        ] {
            let prefix = b.container_prefix(&profile);
            let cmd = b.build(&bare, &profile, true);
            assert_eq!(&cmd.tokens()[..prefix.len()], prefix.as_slice());
            assert_eq!(&cmd.tokens()[prefix.len()..], bare.tokens());
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let profile = ExecutionProfile::eda(&paths()).unwrap();
        let b = builder();
        assert_eq!(
            b.build(&fmt_cmd(), &profile, true),
            b.build(&fmt_cmd(), &profile, true)
        );
    }

    #[test]
    fn test_alternate_runtime_leads_prefix() {
        let profile = ExecutionProfile::toolchain(&paths()).unwrap();
        let b = CommandBuilder::new(HostIdentity::new(501, 20), "podman");
        let cmd = b.build(&fmt_cmd(), &profile, true);
        assert_eq!(cmd.program(), Some("podman"));
        assert!(cmd.tokens().contains(&"501:20".to_string()));
    }

    #[test]
    fn test_command_spec_accessors() {
        let cmd = fmt_cmd();
        assert_eq!(cmd.program(), Some("cargo"));
        assert_eq!(cmd.args().len(), 3);
        assert_eq!(cmd.to_string(), "cargo fmt -- --check");
        assert!(CommandSpec::new(Vec::<String>::new()).args().is_empty());
    }
}
