//! Reticle CI - command-line driver
//!
//! ## Commands
//!
//! - `run`: run every CI step (or a subset) and summarise the results
//! - `step`: run a single step, stopping on its failure
//! - `list`: list step names in run order
//! - `show`: print the exact command a step would run

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reticle_ci::{
    init_tracing, run_step, select_steps, BuiltinStep, CiPipeline, HarnessConfig, StepConfig,
    StepRunner,
};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "reticle-ci")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CI harness for the Reticle compiler", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Run every step inside its container image
    #[arg(
        long,
        global = true,
        env = "RETICLE_CI_DOCKER",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    docker: bool,

    /// CI harness directory; its parent must be the project root
    #[arg(long, global = true, env = "RETICLE_CI_DIR", default_value = "ci")]
    ci_dir: PathBuf,

    /// Container runtime executable
    #[arg(long, global = true, env = "RETICLE_CI_RUNTIME")]
    runtime: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI steps in order, continuing past failures
    Run {
        /// Steps to run (default: all). Repeatable.
        #[arg(long = "only", value_name = "STEP")]
        only: Vec<String>,

        /// Print the run result as JSON
        #[arg(long)]
        report: bool,
    },

    /// Run a single step
    Step {
        /// Step name, e.g. `clippy` or `sim:fsm`
        name: String,
    },

    /// List step names in run order
    List,

    /// Print the command a step would run, without running it
    Show {
        /// Step name, e.g. `compile:register`
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    if let Commands::List = cli.command {
        for step in BuiltinStep::all() {
            println!("{step}");
        }
        return Ok(());
    }

    let config = HarnessConfig::resolve(&cli.ci_dir, cli.runtime.as_deref(), cli.docker)
        .context("Failed to resolve CI environment")?;

    match cli.command {
        Commands::Run { only, report } => cmd_run(&config, &only, report).await,
        Commands::Step { name } => cmd_step(&config, &name).await,
        Commands::Show { name } => cmd_show(&config, &name),
        Commands::List => Ok(()),
    }
}

fn resolve_step(config: &HarnessConfig, name: &str) -> Result<StepConfig> {
    let step: BuiltinStep = name.parse()?;
    Ok(StepConfig::from_builtin(step, config))
}

async fn cmd_run(config: &HarnessConfig, only: &[String], report: bool) -> Result<()> {
    let steps = select_steps(only, config)?;
    let runner = StepRunner::system();

    let result = CiPipeline::run(&runner, &steps).await;

    if report {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("Run ID: {}", result.run_id);
        println!("Status: {}", if result.success { "✓ PASSED" } else { "✗ FAILED" });
        println!("Duration: {}ms", result.duration_ms);
        println!();
        for step in &result.steps {
            let mark = if step.passed() { "✓" } else { "✗" };
            println!("  {} {} ({}ms)", mark, step.name, step.duration_ms);
        }
        println!();
        println!(
            "Summary: {}/{} steps passed",
            result.passed_count(),
            result.steps.len()
        );
    }

    if !result.success {
        anyhow::bail!("{} step(s) failed", result.failed_count());
    }
    Ok(())
}

async fn cmd_step(config: &HarnessConfig, name: &str) -> Result<()> {
    let step = resolve_step(config, name)?;
    let runner = StepRunner::system();

    info!(step = %step.name, command = %step.command, "Executing step");
    run_step(&runner, &step)
        .await
        .with_context(|| format!("Step '{}' failed", step.name))?;
    info!(step = %step.name, "Step passed");
    Ok(())
}

fn cmd_show(config: &HarnessConfig, name: &str) -> Result<()> {
    let step = resolve_step(config, name)?;
    println!("{}", step.command);
    Ok(())
}
