//! The fixed set of example programs compiled to Verilog and simulated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::command::CommandSpec;
use crate::error::HarnessError;
use crate::profile::ExecutionProfile;

pub const COMPILER_BINARY: &str = "./target/release/reticle";
pub const SIM_SCRIPT: &str = "vivado_sim.sh";

/// A named simulation scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Register,
    Fsm,
    VaddConst,
}

impl Scenario {
    /// Every scenario, in run order.
    pub const ALL: [Scenario; 3] = [Scenario::Register, Scenario::Fsm, Scenario::VaddConst];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Register => "register",
            Scenario::Fsm => "fsm",
            Scenario::VaddConst => "vadd_const",
        }
    }

    /// Example source, relative to the project root.
    pub fn source(&self) -> &'static str {
        match self {
            Scenario::Register => "examples/isa/scalar/register.ret",
            Scenario::Fsm => "examples/basic/fsm.ret",
            Scenario::VaddConst => "examples/basic/vadd_const.ret",
        }
    }

    /// Generated Verilog, relative to the project root.
    pub fn verilog_output(&self) -> String {
        format!("ci/{}.v", self.name())
    }

    /// `reticle <source> -b verilog -o ci/<name>.v`
    pub fn compile_command(&self) -> CommandSpec {
        CommandSpec::new([
            COMPILER_BINARY.to_string(),
            self.source().to_string(),
            "-b".to_string(),
            "verilog".to_string(),
            "-o".to_string(),
            self.verilog_output(),
        ])
    }

    /// `vivado_sim.sh <name> <workdir> <outdir>`, with directories taken
    /// from the EDA profile.
    pub fn sim_command(&self, eda: &ExecutionProfile) -> CommandSpec {
        let mut tokens = vec![
            SIM_SCRIPT.to_string(),
            self.name().to_string(),
            eda.workdir().to_string(),
        ];
        if let Some(out) = eda.output_dir() {
            tokens.push(out.to_string());
        }
        CommandSpec::new(tokens)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name() == s)
            .ok_or_else(|| HarnessError::UnknownStep(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::HarnessPaths;
    use std::path::PathBuf;

    fn eda() -> ExecutionProfile {
        let paths = HarnessPaths::from_absolute(PathBuf::from("/proj/ci")).unwrap();
        ExecutionProfile::eda(&paths).unwrap()
    }

    #[test]
    fn test_scenario_names() {
        let names: Vec<_> = Scenario::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["register", "fsm", "vadd_const"]);
    }

    #[test]
    fn test_scenario_from_str() {
        assert_eq!("vadd_const".parse::<Scenario>().unwrap(), Scenario::VaddConst);
        assert!("alu".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_compile_command() {
        let cmd = Scenario::Register.compile_command();
        assert_eq!(
            cmd.tokens(),
            [
                "./target/release/reticle",
                "examples/isa/scalar/register.ret",
                "-b",
                "verilog",
                "-o",
                "ci/register.v",
            ]
        );
    }

    #[test]
    fn test_sim_commands_differ_only_by_name() {
        let profile = eda();
        for scenario in Scenario::ALL {
            let cmd = scenario.sim_command(&profile);
            assert_eq!(
                cmd.tokens(),
                [
                    "vivado_sim.sh",
                    scenario.name(),
                    "/home/vivado/workspace",
                    "/home/vivado/output",
                ]
            );
        }
    }
}
