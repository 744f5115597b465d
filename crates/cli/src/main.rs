//! `calcctl` – headless front end for the calculator engine.
//!
//! Forwards key presses to the same engine a graphical keypad would use and
//! prints the display and history strings it renders.

mod config;
mod logging;
mod repl;
mod serve;

use calc_engine::types::*;
use calc_engine::{Calculator, CommandRegistry, CommandResult, EngineConfig, Operator};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "calcctl",
    version,
    about = "Keypad scientific calculator, driven from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Press a key sequence on a fresh calculator, e.g. "3 + 4 × 2 =".
    Eval {
        /// Whitespace-separated keys.
        keys: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Invoke an engine command by name with JSON args.
    Call {
        /// Command name (e.g. "press", "digit", "operator", "state").
        cmd: String,
        /// JSON args to pass to the command.
        #[arg(long, default_value = "{}")]
        args: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every operator with its symbol, aliases and kind.
    Operators {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Run a scripted scenario from a YAML file.
    RunScenario {
        /// Path to the scenario YAML file.
        file: PathBuf,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },

    /// Interactive keypad prompt.
    Repl,
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::get_config()?;
    logging::init_logging(&app_config.logging);

    let cli = Cli::parse();
    let engine_config = app_config.engine.clone();
    let registry = CommandRegistry::new();

    match cli.command {
        Commands::Eval { keys, json } => {
            let mut calc = Calculator::with_config(engine_config);
            let result = registry.execute("press", serde_json::json!({ "keys": keys }), &mut calc);
            output_result(&result, json);
        }
        Commands::Call { cmd, args, json } => {
            cmd_call(&cmd, &args, json, engine_config, &registry)
        }
        Commands::Operators { json } => cmd_operators(json, &registry),
        Commands::RunScenario {
            file,
            artifacts,
            json,
        } => cmd_run_scenario(&file, json, artifacts, engine_config, &registry),
        Commands::Serve { socket } => serve::run_daemon(socket, engine_config, registry).await?,
        Commands::Repl => repl::run_repl(engine_config)?,
    }
    Ok(())
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_call(
    cmd: &str,
    args_str: &str,
    json: bool,
    engine_config: EngineConfig,
    registry: &CommandRegistry,
) {
    let args: serde_json::Value = match serde_json::from_str(args_str) {
        Ok(v) => v,
        Err(e) => {
            let r = result_err(
                "call",
                cmd,
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                format!("invalid JSON args: {}", e),
            );
            output_result(&r, json);
            return;
        }
    };

    let mut calc = Calculator::with_config(engine_config);
    let result = registry.execute(cmd, args, &mut calc);
    output_result(&result, json);
}

fn cmd_operators(json: bool, registry: &CommandRegistry) {
    if json {
        let result = registry.execute("operators", serde_json::Value::Null, &mut Calculator::new());
        output_result(&result, true);
        return;
    }
    for op in Operator::all() {
        let kind = format!("{:?}", op.kind()).to_lowercase();
        println!("{:<5} {:<9} {}", op.symbol(), kind, op.def().aliases.join(", "));
    }
}

fn cmd_run_scenario(
    file: &Path,
    json: bool,
    artifacts: Option<PathBuf>,
    engine_config: EngineConfig,
    registry: &CommandRegistry,
) {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::IoError,
                format!("cannot read scenario file: {}", e),
            );
            output_result(&r, json);
            return;
        }
    };

    let scenario = match calc_engine::scenario::load_scenario(&yaml) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                e,
            );
            output_result(&r, json);
            return;
        }
    };

    let mut calc = Calculator::with_config(engine_config);
    let scenario_result = calc_engine::scenario::run_scenario(&scenario, &mut calc, registry);

    if json {
        let j = serde_json::to_string_pretty(&scenario_result).unwrap_or_default();
        println!("{}", j);
    } else {
        println!(
            "Scenario: {}",
            scenario_result.name.as_deref().unwrap_or("<unnamed>")
        );
        println!("Overall: {}", scenario_result.overall_status);
        for (i, sr) in scenario_result.step_results.iter().enumerate() {
            let display = sr
                .data
                .as_ref()
                .and_then(|d| d.get("display"))
                .and_then(|v| v.as_str())
                .unwrap_or("-");
            println!("  Step {}: {} -> {} [{}]", i, sr.target, sr.status, display);
        }
    }

    if let Some(ref dir) = artifacts {
        let art_dir = dir.join(new_run_id());
        if let Err(e) = std::fs::create_dir_all(&art_dir) {
            tracing::warn!(dir = %art_dir.display(), error = %e, "failed to create artifacts dir");
        } else {
            let j = serde_json::to_string_pretty(&scenario_result).unwrap_or_default();
            write_artifact(&art_dir.join("result.json"), j);

            // Per-step results as events.jsonl
            let mut lines = String::new();
            for sr in &scenario_result.step_results {
                if let Ok(line) = serde_json::to_string(sr) {
                    lines.push_str(&line);
                    lines.push('\n');
                }
            }
            write_artifact(&art_dir.join("events.jsonl"), lines);
        }
    }

    exit_for(scenario_result.overall_status);
}

/// Write one artifact file, logging instead of failing the run.
fn write_artifact(path: &Path, contents: String) -> bool {
    match std::fs::write(path, contents) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to write artifact");
            false
        }
    }
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn output_result(result: &CommandResult, json: bool) {
    if json {
        let j = serde_json::to_string_pretty(result).unwrap_or_default();
        println!("{}", j);
    } else {
        print_human(result);
    }
    exit_for(result.status);
}

/// Exit with non-zero status on error/fail.
fn exit_for(status: Status) {
    match status {
        Status::Pass => {}
        Status::Fail => std::process::exit(1),
        Status::Error => std::process::exit(2),
    }
}

fn print_human(r: &CommandResult) {
    if let Some(ref err) = r.error {
        println!("[{}] {} {}", r.status, r.command, r.target);
        println!("  error: {} – {}", err.code, err.message);
        return;
    }

    let Some(ref data) = r.data else {
        return;
    };

    // Snapshots print the way a keypad shows them: history over display.
    match (data.get("history"), data.get("display")) {
        (Some(history), Some(display)) => {
            println!("{}", history.as_str().unwrap_or_default());
            println!("{}", display.as_str().unwrap_or_default());
        }
        _ => {
            if let Ok(s) = serde_json::to_string_pretty(data) {
                println!("{}", s);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_artifact_reports_failure() {
        let dir = std::env::temp_dir().join(format!("calcctl-artifacts-{}", new_run_id()));
        std::fs::create_dir_all(&dir).unwrap();

        let ok = dir.join("result.json");
        assert!(write_artifact(&ok, "{}".to_string()));
        assert_eq!(std::fs::read_to_string(&ok).unwrap(), "{}");

        let missing = dir.join("no-such-dir").join("events.jsonl");
        assert!(!write_artifact(&missing, String::new()));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
