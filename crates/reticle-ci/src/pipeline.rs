//! CI pipeline orchestration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info};
use uuid::Uuid;

use crate::classify::{classify, Verdict};
use crate::command::CommandSpec;
use crate::error::{HarnessError, HarnessResult};
use crate::runner::{StepOutcome, StepRunner};
use crate::stage::StepConfig;

/// How a single step ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum StepStatus {
    Passed,

    /// The child exited non-zero.
    ProcessFailed { exit_code: i32 },

    /// The child exited 0 but printed the failure marker.
    ContentFailed,

    /// No child was started: empty command or spawn error.
    StartFailed { error: String },

    /// Any other harness error raised while running the step.
    Errored { error: String },
}

/// Report for one executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    pub command: CommandSpec,
    #[serde(flatten)]
    pub status: StepStatus,
    pub duration_ms: u64,
}

impl StepReport {
    pub fn passed(&self) -> bool {
        self.status == StepStatus::Passed
    }
}

/// Result of a complete CI pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    /// Whether all steps passed.
    pub success: bool,

    pub steps: Vec<StepReport>,
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn passed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.passed()).count()
    }
}

/// Run one step: execute it, then classify captured output when the step
/// asks for it.
///
/// On a content failure the full captured output is printed before the
/// error is returned, since the exit status says nothing useful.
pub async fn run_step(runner: &StepRunner, step: &StepConfig) -> HarnessResult<StepOutcome> {
    let mut outcome = runner
        .run(&step.name, &step.command, step.dir(), step.capture)
        .await?;

    if step.step.classifies_output() {
        let output = outcome.stdout.clone().unwrap_or_default();
        let verdict = classify(&output);
        outcome.verdict = Some(verdict);

        if verdict == Verdict::Fail {
            println!("{output}");
            error!(step = %step.name, "Simulation reported failure marker");
            return Err(HarnessError::ContentFailed {
                step: step.name.clone(),
                output,
            });
        }
    }

    Ok(outcome)
}

/// Sequential CI pipeline.
pub struct CiPipeline;

impl CiPipeline {
    /// Execute steps one after another.
    ///
    /// A failing step is recorded and the next step still runs; the result
    /// is successful only if every step passed.
    pub async fn run(runner: &StepRunner, steps: &[StepConfig]) -> PipelineResult {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        info!(run_id = %run_id, steps = steps.len(), "Starting CI pipeline");

        let mut reports = Vec::with_capacity(steps.len());
        for step in steps {
            info!(step = %step.name, command = %step.command, "Executing step");
            let step_start = Instant::now();

            let status = match run_step(runner, step).await {
                Ok(_) => StepStatus::Passed,
                Err(HarnessError::ProcessFailed { exit_code, .. }) => {
                    StepStatus::ProcessFailed { exit_code }
                }
                Err(HarnessError::ContentFailed { .. }) => StepStatus::ContentFailed,
                Err(e @ (HarnessError::Spawn { .. } | HarnessError::EmptyCommand { .. })) => {
                    StepStatus::StartFailed {
                        error: e.to_string(),
                    }
                }
                Err(e) => StepStatus::Errored {
                    error: e.to_string(),
                },
            };

            let duration_ms = step_start.elapsed().as_millis() as u64;
            if status == StepStatus::Passed {
                info!(step = %step.name, duration_ms, "Step passed");
            } else {
                error!(step = %step.name, duration_ms, status = ?status, "Step failed");
            }

            reports.push(StepReport {
                name: step.name.clone(),
                command: step.command.clone(),
                status,
                duration_ms,
            });
        }

        let success = reports.iter().all(StepReport::passed);
        let duration_ms = start.elapsed().as_millis() as u64;

        if success {
            info!(run_id = %run_id, duration_ms, "CI pipeline completed successfully");
        } else {
            info!(run_id = %run_id, duration_ms, "CI pipeline failed");
        }

        PipelineResult {
            run_id,
            started_at,
            success,
            steps: reports,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, status: StepStatus) -> StepReport {
        StepReport {
            name: name.to_string(),
            command: CommandSpec::new(["true"]),
            status,
            duration_ms: 10,
        }
    }

    #[test]
    fn test_pipeline_result_counts() {
        let result = PipelineResult {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            success: false,
            steps: vec![
                report("fmt", StepStatus::Passed),
                report("clippy", StepStatus::ProcessFailed { exit_code: 101 }),
                report("sim:fsm", StepStatus::ContentFailed),
            ],
            duration_ms: 30,
        };

        assert_eq!(result.passed_count(), 1);
        assert_eq!(result.failed_count(), 2);
    }

    fn custom_step(name: &str, command: CommandSpec) -> StepConfig {
        StepConfig {
            name: name.to_string(),
            step: crate::stage::BuiltinStep::Fmt,
            command,
            dir: std::env::current_dir().unwrap(),
            capture: false,
        }
    }

    #[tokio::test]
    async fn test_unstartable_steps_report_start_failed() {
        let runner = StepRunner::system();
        let steps = vec![
            custom_step("empty", CommandSpec::new(Vec::<String>::new())),
            custom_step("missing", CommandSpec::new(["reticle-ci-no-such-binary"])),
            custom_step("true", CommandSpec::new(["true"])),
        ];

        let result = CiPipeline::run(&runner, &steps).await;

        assert!(!result.success);
        match &result.steps[0].status {
            StepStatus::StartFailed { error } => assert!(error.contains("empty command")),
            other => panic!("unexpected status: {other:?}"),
        }
        assert!(matches!(
            result.steps[1].status,
            StepStatus::StartFailed { .. }
        ));
        assert_eq!(result.steps[2].status, StepStatus::Passed);
    }

    #[test]
    fn test_step_report_json_shape() {
        let json = serde_json::to_value(report(
            "clippy",
            StepStatus::ProcessFailed { exit_code: 1 },
        ))
        .unwrap();
        assert_eq!(json["status"], "process_failed");
        assert_eq!(json["exit_code"], 1);
        assert_eq!(json["command"][0], "true");
    }
}
