//! CCV Research CLI
//!
//! Interactive console front end over the research workflow: topic in,
//! candidate codes out, then a structured analysis with per-section chat,
//! accuracy ratings, and report export.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ccv_research::controller::{ResearchWorkflow, WorkflowStep};
use ccv_research::models::AccuracyRating;
use ccv_research::research::prompts::SECTION_TITLES;
use ccv_research::storage::Database;
use ccv_research_llm::{ModelGateway, SUPPORTED_MODELS};

const DEFAULT_MODEL: &str = "gpt-4.1-mini";

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_model() -> Result<String> {
    println!("Available models: {}", SUPPORTED_MODELS.join(", "));
    let model = prompt(&format!("Model [{}]: ", DEFAULT_MODEL))?;
    Ok(if model.is_empty() {
        DEFAULT_MODEL.to_string()
    } else {
        model
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let db = Database::new()?;
    let mut workflow = ResearchWorkflow::new(ModelGateway::default(), db);
    info!("Started session {}", workflow.session_id());

    println!("CCV Research: APC Target Code Research");
    println!("Type 'quit' at any prompt to exit.\n");

    loop {
        match workflow.step() {
            WorkflowStep::TopicInput => {
                let topic = prompt("Research topic: ")?;
                if topic == "quit" {
                    break;
                }
                if topic.is_empty() {
                    continue;
                }
                let model = prompt_model()?;
                let outcome = workflow.submit_topic(&topic, &model).await?;
                if outcome.codes.is_empty() {
                    println!("No candidate codes could be parsed. Raw output:\n{}\n", outcome.raw);
                }
            }
            WorkflowStep::CodeSelection => {
                println!("\nCandidate CPT codes:");
                for (i, candidate) in workflow.candidates().iter().enumerate() {
                    println!("  {}. {} - {}", i + 1, candidate.code, candidate.description);
                }
                let choice = prompt("Pick a code number (or 'back'): ")?;
                if choice == "quit" {
                    break;
                }
                if choice == "back" {
                    workflow.back_to_topic()?;
                    continue;
                }
                match choice.parse::<usize>() {
                    Ok(n) if n >= 1 => match workflow.select_code(n - 1) {
                        Ok(candidate) => println!("Selected {}\n", candidate.code),
                        Err(e) => println!("{}", e),
                    },
                    _ => println!("Enter a number from the list."),
                }
            }
            WorkflowStep::ResearchParams => {
                println!("Context [{}]", workflow.context());
                let entered = prompt("Context (enter to keep): ")?;
                if entered == "quit" {
                    break;
                }
                if entered == "back" {
                    workflow.back_to_code_selection()?;
                    continue;
                }
                let context = if entered.is_empty() {
                    workflow.context().to_string()
                } else {
                    entered
                };
                let model = prompt_model()?;
                println!("Running research, this may take a while...");
                match workflow.submit_research(&context, &model).await {
                    Ok(result) => println!("Research complete for {}.\n", result.cpt_code),
                    Err(e) => println!("Research failed: {}\n", e),
                }
            }
            WorkflowStep::Results => {
                print_results();
                let action = prompt("Action [view N | chat N | rate N | xlsx | pdf | reset | quit]: ")?;
                match action.as_str() {
                    "quit" => break,
                    "reset" => workflow.reset(),
                    "xlsx" => save_export(workflow.export_spreadsheet()),
                    "pdf" => save_export(workflow.export_document()),
                    other => handle_section_action(&mut workflow, other).await?,
                }
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_results() {
    println!("\nResearch sections:");
    for (i, title) in SECTION_TITLES.iter().enumerate() {
        println!("  {}. {}", i + 1, title);
    }
    println!("  7. Final assessment");
}

fn save_export(result: ccv_research::AppResult<(Vec<u8>, String)>) {
    match result {
        Ok((bytes, filename)) => match std::fs::write(&filename, bytes) {
            Ok(()) => println!("Saved {}\n", filename),
            Err(e) => println!("Could not write file: {}\n", e),
        },
        Err(e) => println!("Export failed: {}\n", e),
    }
}

async fn handle_section_action<G: ccv_research_llm::TextCompletion>(
    workflow: &mut ResearchWorkflow<G>,
    action: &str,
) -> Result<()> {
    let (verb, rest) = action.split_once(' ').unwrap_or((action, ""));

    match verb {
        "view" => match rest.parse::<u8>() {
            Ok(7) => {
                if let Some(structured) = workflow.structured() {
                    println!("\nFINAL ASSESSMENT\n{}\n", structured.final_assessment);
                }
            }
            Ok(n) => match workflow.section(n) {
                Ok(section) => println!("\nSECTION {} - {}\n{}\n", section.number, section.title, section.content),
                Err(e) => println!("{}", e),
            },
            Err(_) => println!("Usage: view N"),
        },
        "chat" => match rest.parse::<u8>() {
            Ok(n) => {
                let question = prompt("Question: ")?;
                if question.is_empty() {
                    return Ok(());
                }
                let model = prompt_model()?;
                match workflow.ask_section(n, &question, &model).await {
                    Ok(answer) => println!("\n{}\n", answer),
                    Err(e) => println!("{}", e),
                }
            }
            Err(_) => println!("Usage: chat N"),
        },
        "rate" => match rest.parse::<u8>() {
            Ok(n) => {
                let rating = prompt("Rating [good/medium/bad]: ")?;
                match rating.parse::<AccuracyRating>() {
                    Ok(rating) => {
                        let reason = prompt("Reason (optional): ")?;
                        let reason = if reason.is_empty() { None } else { Some(reason.as_str()) };
                        match workflow.rate_section(n, rating, reason) {
                            Ok(()) => println!("Rating saved.\n"),
                            Err(e) => println!("{}", e),
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            Err(_) => println!("Usage: rate N"),
        },
        _ => println!("Unknown action: {}", action),
    }
    Ok(())
}
