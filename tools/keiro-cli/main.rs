use clap::{Parser, Subcommand};
use keiro::prelude::*;
use serde::Deserialize;
use std::fs;
use std::process;

/// One scripted step of a simulated walk.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScriptStep {
    #[serde(default)]
    answers: Vec<(String, Value)>,
}

/// A questionnaire flow validation and simulation CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run structural validation over a flow JSON file
    Validate {
        /// Path to the flow JSON file
        flow_path: String,
    },
    /// Walk a flow forward with scripted answers, printing each landing
    Walk {
        /// Path to the flow JSON file
        flow_path: String,
        /// Optional path to a JSON array of steps with answers
        #[arg(short, long)]
        script: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Command::Validate { flow_path } => run_validate(&flow_path),
        Command::Walk { flow_path, script } => run_walk(&flow_path, script.as_deref()),
    }
}

fn load_flow(flow_path: &str) -> Flow {
    let json = fs::read_to_string(flow_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", flow_path, e)));
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse flow JSON: {}", e)))
}

fn run_validate(flow_path: &str) {
    let flow = load_flow(flow_path);
    let node_count = flow.len();
    let report = FlowEngine::new(flow).validate();

    println!("Validated {} nodes.", node_count);
    for warning in report.warnings() {
        println!("  warning: {}", warning);
    }
    for error in report.errors() {
        println!("  error: {}", error);
    }

    if report.is_valid() {
        println!("Flow is structurally valid.");
    } else {
        println!("Flow is INVALID ({} errors).", report.errors().len());
        process::exit(1);
    }
}

fn run_walk(flow_path: &str, script_path: Option<&str>) {
    let flow = load_flow(flow_path);

    let steps: Vec<ScriptStep> = match script_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));
            serde_json::from_str(&json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse script JSON: {}", e)))
        }
        None => Vec::new(),
    };

    let mut session = FlowSession::start(flow, "keiro-cli");
    println!("Starting at '{}'", session.current_node_id());

    // A visible-node cycle would otherwise walk forever.
    let max_steps = session.engine().flow().len() + 1;
    let mut script = steps.into_iter();
    for _ in 0..max_steps {
        if let Some(step) = script.next() {
            for (field, value) in step.answers {
                println!("  answering {} = {}", field, value);
                session.answer_question(&field, value);
            }
        }

        match session.next() {
            Ok(outcome) => {
                if let Some(skipped) = &outcome.questions_skipped {
                    println!("  skipped: {}", skipped.join(", "));
                }
                match outcome.target() {
                    Some(target) => {
                        let via = if outcome.branch_taken {
                            format!(" (via branch '{}')", outcome.branch_id.as_deref().unwrap_or("?"))
                        } else {
                            String::new()
                        };
                        println!("-> {}{}", target, via);
                    }
                    None => {
                        println!("Reached a terminal node. Flow complete.");
                        break;
                    }
                }
            }
            Err(e) => {
                println!("Walk stopped: {}", e);
                break;
            }
        }
    }

    let metrics = session.progress();
    println!(
        "Visited {} nodes; {} of {} visible questions answered.",
        session.history().len(),
        metrics.answered,
        metrics.total
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
