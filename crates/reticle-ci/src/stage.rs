//! CI step definitions and the ordered step catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::command::CommandSpec;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::profile::ProfileKind;
use crate::scenario::Scenario;

/// Every CI step the harness knows how to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "kind", content = "scenario")]
pub enum BuiltinStep {
    /// cargo fmt -- --check
    Fmt,

    /// cargo clippy --all-targets --all-features -- -D warnings
    Clippy,

    /// cargo test
    Test,

    /// cargo build --release
    Build,

    /// Compile one example to Verilog with the release compiler.
    Compile(Scenario),

    /// Run one Vivado simulation scenario.
    Simulate(Scenario),
}

impl BuiltinStep {
    /// Every step, in run order.
    pub fn all() -> Vec<BuiltinStep> {
        let mut steps = vec![
            BuiltinStep::Fmt,
            BuiltinStep::Clippy,
            BuiltinStep::Test,
            BuiltinStep::Build,
        ];
        steps.extend(Scenario::ALL.into_iter().map(BuiltinStep::Compile));
        steps.extend(Scenario::ALL.into_iter().map(BuiltinStep::Simulate));
        steps
    }

    pub fn name(&self) -> String {
        match self {
            BuiltinStep::Fmt => "fmt".to_string(),
            BuiltinStep::Clippy => "clippy".to_string(),
            BuiltinStep::Test => "test".to_string(),
            BuiltinStep::Build => "build".to_string(),
            BuiltinStep::Compile(s) => format!("compile:{}", s.name()),
            BuiltinStep::Simulate(s) => format!("sim:{}", s.name()),
        }
    }

    pub fn profile(&self) -> ProfileKind {
        match self {
            BuiltinStep::Simulate(_) => ProfileKind::Eda,
            _ => ProfileKind::Toolchain,
        }
    }

    /// Only simulation output is inspected for the failure marker.
    pub fn classifies_output(&self) -> bool {
        matches!(self, BuiltinStep::Simulate(_))
    }

    /// The bare command, before any container wrapping.
    pub fn command(&self, config: &HarnessConfig) -> CommandSpec {
        match self {
            BuiltinStep::Fmt => CommandSpec::new(["cargo", "fmt", "--", "--check"]),
            BuiltinStep::Clippy => CommandSpec::new([
                "cargo",
                "clippy",
                "--all-targets",
                "--all-features",
                "--",
                "-D",
                "warnings",
            ]),
            BuiltinStep::Test => CommandSpec::new(["cargo", "test"]),
            BuiltinStep::Build => CommandSpec::new(["cargo", "build", "--release"]),
            BuiltinStep::Compile(s) => s.compile_command(),
            BuiltinStep::Simulate(s) => s.sim_command(config.profile(ProfileKind::Eda)),
        }
    }
}

impl fmt::Display for BuiltinStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for BuiltinStep {
    type Err = HarnessError;

    /// Accepts `fmt`, `clippy`, `test`, `build`, `compile:<scenario>` and
    /// `sim:<scenario>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || HarnessError::UnknownStep(s.to_string());
        match s.trim() {
            "fmt" => Ok(BuiltinStep::Fmt),
            "clippy" => Ok(BuiltinStep::Clippy),
            "test" => Ok(BuiltinStep::Test),
            "build" => Ok(BuiltinStep::Build),
            other => match other.split_once(':') {
                Some(("compile", name)) => name
                    .parse()
                    .map(BuiltinStep::Compile)
                    .map_err(|_| unknown()),
                Some(("sim", name)) => name
                    .parse()
                    .map(BuiltinStep::Simulate)
                    .map_err(|_| unknown()),
                _ => Err(unknown()),
            },
        }
    }
}

/// A fully resolved step: what to run, where, and how to judge it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepConfig {
    pub name: String,
    pub step: BuiltinStep,

    /// Command as executed, already container-wrapped when requested.
    pub command: CommandSpec,

    /// Host directory the command is started from.
    pub dir: PathBuf,

    /// Buffer stdout instead of passing it through.
    pub capture: bool,
}

impl StepConfig {
    /// Resolve a builtin step against the harness configuration.
    pub fn from_builtin(step: BuiltinStep, config: &HarnessConfig) -> Self {
        let profile = config.profile(step.profile());
        let bare = step.command(config);
        let dir = match step.profile() {
            ProfileKind::Toolchain => config.paths().project_root.clone(),
            ProfileKind::Eda => config.paths().ci_dir.clone(),
        };

        Self {
            name: step.name(),
            step,
            command: config
                .command_builder()
                .build(&bare, profile, config.containerized()),
            dir,
            capture: step.classifies_output(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Resolve step names into configs, in catalogue order.
///
/// An empty selection means every step.
pub fn select_steps(names: &[String], config: &HarnessConfig) -> HarnessResult<Vec<StepConfig>> {
    let selected: Vec<BuiltinStep> = if names.is_empty() {
        BuiltinStep::all()
    } else {
        let wanted = names
            .iter()
            .map(|n| n.parse::<BuiltinStep>())
            .collect::<HarnessResult<Vec<_>>>()?;
        BuiltinStep::all()
            .into_iter()
            .filter(|s| wanted.contains(s))
            .collect()
    };

    Ok(selected
        .into_iter()
        .map(|s| StepConfig::from_builtin(s, config))
        .collect())
}
