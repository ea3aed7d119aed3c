//! Reticle CI - orchestration harness for the Reticle compiler
//!
//! Runs the project's CI steps in order:
//! - Cargo checks (fmt, clippy, test) and the release build
//! - Compilation of the example programs to Verilog
//! - Vivado simulation of each example, judged by a failure marker
//!
//! Every step can run on the host or inside a container that mounts the
//! project and runs as the invoking user.

pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod identity;
pub mod paths;
pub mod pipeline;
pub mod profile;
pub mod runner;
pub mod scenario;
pub mod stage;
pub mod telemetry;

// Re-export key types
pub use classify::{classify, Verdict, FAILURE_MARKER};
pub use command::{CommandBuilder, CommandSpec};
pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use identity::HostIdentity;
pub use paths::HarnessPaths;
pub use pipeline::{run_step, CiPipeline, PipelineResult, StepReport, StepStatus};
pub use profile::{ExecutionProfile, MountSpec, ProfileKind};
pub use runner::{ProcessLauncher, ProcessOutput, StepOutcome, StepRunner, SystemLauncher};
pub use scenario::Scenario;
pub use stage::{select_steps, BuiltinStep, StepConfig};
pub use telemetry::init_tracing;
