//! obc - owner-builder permitting assistant CLI

mod config;

use std::sync::Arc;

use clap::Parser;
use obc_providers::{GroqProvider, TavilyProvider};
use obc_workflow::{FileCheckpointStore, Workflow, WorkflowEvent};

/// obc - conversational assistant for construction permitting research
#[derive(Parser, Debug)]
#[command(name = "obc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chat model id for the Groq backend
    #[arg(short, long)]
    model: Option<String>,

    /// Run in non-interactive mode with a single message
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Resume a previous conversation by id
    #[arg(long)]
    resume: Option<String>,

    /// Verbose output (prints pipeline trace events)
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("obc=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Load config file
    let cfg = config::Config::load();

    let groq_key = match cfg.get_api_key("groq") {
        Some(key) => key,
        None => {
            eprintln!("Error: No Groq API key found");
            eprintln!("Set your API key with: export GROQ_API_KEY=your-key");
            eprintln!("Or add it to config file: obc --init-config");
            std::process::exit(1);
        }
    };
    let tavily_key = match cfg.get_api_key("tavily") {
        Some(key) => key,
        None => {
            eprintln!("Error: No Tavily API key found");
            eprintln!("Set your API key with: export TAVILY_API_KEY=your-key");
            eprintln!("Or add it to config file: obc --init-config");
            std::process::exit(1);
        }
    };

    // Merge config with CLI args (CLI takes precedence)
    let mut groq = GroqProvider::new(groq_key);
    if let Some(model) = args.model.or(cfg.model.clone()) {
        groq = groq.with_model(model);
    }
    let groq = Arc::new(groq);

    let workflow = Workflow::new(
        groq.clone(),
        groq,
        Arc::new(TavilyProvider::new(tavily_key)),
        Arc::new(FileCheckpointStore::new(cfg.checkpoint_dir())),
    );

    // The trace printer runs for the lifetime of the process
    if args.verbose {
        spawn_trace_printer(&workflow);
    }

    let conversation_id = args
        .resume
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    // Non-interactive mode
    if let Some(message) = args.command {
        return run_command(&workflow, &conversation_id, &message).await;
    }

    run_interactive(&workflow, conversation_id, args.resume.is_some()).await
}

/// Print trace events as they arrive until the sender is dropped
fn spawn_trace_printer(workflow: &Workflow) {
    let mut receiver = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = receiver.recv().await {
            match event {
                WorkflowEvent::StepStart { node } => {
                    eprintln!("[step {:?}...]", node);
                }
                WorkflowEvent::QueryClassified { query_type } => {
                    eprintln!("[classified: {}]", query_type);
                }
                WorkflowEvent::DetailsExtracted {
                    project_type,
                    city,
                    geo_state,
                } => {
                    eprintln!("[details: {} / {} / {}]", project_type, city, geo_state);
                }
                WorkflowEvent::SearchSkipped => {
                    eprintln!("[search skipped: project details unresolved]");
                }
                WorkflowEvent::SearchQuery { query } => {
                    eprintln!("[searching: {}]", query);
                }
                WorkflowEvent::ResultDropped { query } => {
                    eprintln!("[dropped malformed hit for: {}]", query);
                }
                WorkflowEvent::SearchCompleted {
                    valid_results,
                    legal_info_found,
                } => {
                    eprintln!(
                        "[search done: {} valid results, legal info found: {}]",
                        valid_results, legal_info_found
                    );
                }
                WorkflowEvent::SummaryReady { route_decision } => {
                    eprintln!("[summary ready, route: {}]", route_decision);
                }
                WorkflowEvent::Error { message } => {
                    eprintln!("[turn error: {}]", message);
                }
                _ => {}
            }
        }
    });
}

async fn run_command(
    workflow: &Workflow,
    conversation_id: &str,
    message: &str,
) -> anyhow::Result<()> {
    println!("obc> {}", message);
    println!();

    let state = workflow.run_turn(conversation_id, message).await;
    println!("{}", state.project_roadmap);
    Ok(())
}

/// Combine prior user messages with the latest one into the single input
/// the pipeline classifies and extracts from.
fn build_user_input(previous: &[String], latest: &str) -> String {
    let formatted = previous
        .iter()
        .map(|msg| format!("- {msg}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Previous Messages:\n{formatted}\n\nLatest Message:\n{latest}")
}

async fn run_interactive(
    workflow: &Workflow,
    mut conversation_id: String,
    resumed: bool,
) -> anyhow::Result<()> {
    use std::io::{self, Write};

    println!("obc - construction permitting assistant");
    println!("Conversation: {}", conversation_id);
    if resumed {
        match workflow.latest_state(&conversation_id) {
            Ok(Some(state)) if !state.project_roadmap.is_empty() => {
                println!("\nLast response:\n{}", state.project_roadmap);
            }
            Ok(_) => {
                println!("(no prior turns found for this conversation)");
            }
            Err(e) => {
                eprintln!("Warning: could not read checkpoints: {}", e);
            }
        }
    }
    println!("Type /quit to exit, /new for a fresh conversation, /state for the last snapshot.");
    println!();

    // Prior user messages carried into each turn's combined input
    let mut history: Vec<String> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        // Handle slash commands
        if let Some(command) = input.strip_prefix('/') {
            match command {
                "quit" | "exit" => break,
                "new" => {
                    conversation_id = uuid::Uuid::new_v4().to_string();
                    history.clear();
                    println!("Started conversation: {}", conversation_id);
                }
                "state" => match workflow.latest_state(&conversation_id) {
                    Ok(Some(state)) => {
                        println!("{}", serde_json::to_string_pretty(&state)?);
                    }
                    Ok(None) => {
                        println!("No checkpoints yet for this conversation.");
                    }
                    Err(e) => {
                        eprintln!("Error reading checkpoints: {}", e);
                    }
                },
                other => {
                    println!("Unknown command: /{}", other);
                    println!("Available: /new, /state, /quit");
                }
            }
            println!();
            continue;
        }

        println!();

        let combined = build_user_input(&history, input);
        let state = workflow.run_turn(&conversation_id, combined).await;
        println!("{}", state.project_roadmap);

        history.push(input.to_string());
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_input_with_history() {
        let history = vec![
            "I want to build a deck".to_string(),
            "It's in Austin".to_string(),
        ];
        let combined = build_user_input(&history, "The state is Texas");
        assert_eq!(
            combined,
            "Previous Messages:\n- I want to build a deck\n- It's in Austin\n\n\
             Latest Message:\nThe state is Texas"
        );
    }

    #[test]
    fn test_build_user_input_first_turn() {
        let combined = build_user_input(&[], "hello");
        assert_eq!(combined, "Previous Messages:\n\n\nLatest Message:\nhello");
    }
}
