//! Sales Assistant CLI
//!
//! Usage:
//!   sales-assistant ask "ship between 123 Main St Montreal and 456 Oak Ave Laval"
//!   sales-assistant ask "top 5 deals closed last quarter"
//!   sales-assistant requests
//!   sales-assistant resolve <message-id>
//!   sales-assistant review
//!
//! Logging is controlled with `RUST_LOG` (default `sales_assistant=info`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use sales_assistant::models::RoutingOutcome;
use sales_assistant::services::intake::ReviewState;
use sales_assistant::services::sql::{fetch_transcript, run_generated_sql, QueryResult};
use sales_assistant::{AppState, ChatSession, ConfigService, Request, ReviewSession};
use sales_assistant_core::{Coordinate, NoticeLog};

/// Sales assistant: maps, analytics and request review
#[derive(Parser, Debug)]
#[command(name = "sales-assistant", version)]
struct Cli {
    /// Path to config.json (default: ~/.sales-assistant/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Route one question and print the answer
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List pending container requests
    Requests,
    /// Mark a request as resolved
    Resolve {
        /// Message id of the request
        id: String,
    },
    /// Walk the pending requests and approve or reject each one
    Review,
}

/// One answer at the review prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewAction {
    Approve,
    Reject,
    Skip,
    Quit,
}

fn parse_review_action(input: &str) -> Option<ReviewAction> {
    match input.trim().to_ascii_lowercase().as_str() {
        "a" | "approve" => Some(ReviewAction::Approve),
        "r" | "reject" => Some(ReviewAction::Reject),
        "s" | "skip" | "" => Some(ReviewAction::Skip),
        "q" | "quit" => Some(ReviewAction::Quit),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sales_assistant=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_service = match cli.config {
        Some(path) => ConfigService::open(path),
        None => ConfigService::new(),
    }
    .context("failed to load configuration")?;
    let config = config_service.effective_config();

    let notices = Arc::new(NoticeLog::new());
    let state = AppState::from_config(&config, notices.clone())
        .context("failed to initialize services")?;

    match cli.command {
        Command::Ask { query } => {
            let query = query.join(" ");
            let mut session = ChatSession::new();
            let outcome = state.router().handle(&mut session, &query).await;
            print_outcome(&state, &outcome).await;
        }
        Command::Requests => {
            let requests = state
                .requests()
                .fetch_pending_requests()
                .await
                .context("failed to fetch pending requests")?;
            if requests.is_empty() {
                println!("No pending requests.");
            }
            for request in &requests {
                print_request(request);
            }
        }
        Command::Resolve { id } => {
            state
                .requests()
                .mark_resolved(&id)
                .await
                .with_context(|| format!("failed to resolve request {}", id))?;
            println!("Resolved {}", id);
        }
        Command::Review => {
            let session = ReviewSession::load(state.requests())
                .await
                .context("failed to fetch pending requests")?;
            review(session).await?;
        }
    }

    for notice in notices.drain() {
        eprintln!("! {}", notice);
    }
    Ok(())
}

async fn review(mut session: ReviewSession) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let ReviewState::Reviewing { index, total } = session.state() {
        let Some(request) = session.current() else {
            break;
        };
        println!("\nRequest {} of {}", index + 1, total);
        print_request(request);
        println!("[a]pprove, [r]eject, [s]kip, [q]uit?");

        let Some(line) = lines.next_line().await.context("failed to read answer")? else {
            break;
        };
        let Some(action) = parse_review_action(&line) else {
            println!("Unrecognized answer: {}", line.trim());
            continue;
        };
        let result = match action {
            ReviewAction::Approve => session.approve().await,
            ReviewAction::Reject => session.reject().await,
            ReviewAction::Skip => Ok(session.advance()),
            ReviewAction::Quit => break,
        };
        if let Err(e) = result {
            eprintln!("! {}", e);
        }
    }

    match session.state() {
        ReviewState::Empty => println!("No pending requests."),
        _ => println!("Reviewed {} request(s).", session.decisions().len()),
    }
    Ok(())
}

fn print_request(request: &Request) {
    let f = &request.extracted;
    println!("{}", request.id);
    println!("  format:    {}", f.container_format);
    println!("  quantity:  {}", f.quantity);
    println!("  needed by: {}", f.date_needed);
    println!("  requester: {}", f.requester);
}

async fn print_outcome(state: &AppState, outcome: &RoutingOutcome) {
    match outcome {
        RoutingOutcome::MapSingle { coordinate } => println!("Location: {}", coordinate),
        RoutingOutcome::MapRoute { coordinates } => print_route(coordinates),
        RoutingOutcome::AnalystAnswer { response } => {
            if !response.text.is_empty() {
                println!("{}", response.text);
            }
            for citation in &response.citations {
                let label = if citation.source_id.is_empty() {
                    "source"
                } else {
                    citation.source_id.as_str()
                };
                let transcript = fetch_transcript(state.sql(), state.notices(), citation).await;
                println!("\n[{}]\n{}", label, transcript);
            }
            if !response.sql.is_empty() {
                println!("\nGenerated SQL:\n{}", response.sql);
                if let Some(result) =
                    run_generated_sql(state.sql(), state.notices(), &response.sql).await
                {
                    print_table(&result);
                }
            }
        }
        RoutingOutcome::PlainText { text } => println!("{}", text),
        RoutingOutcome::NoAction => {}
    }
}

fn print_route(coordinates: &[Coordinate]) {
    match (coordinates.first(), coordinates.last()) {
        (Some(first), Some(last)) => {
            println!("Route: {} points", coordinates.len());
            println!("  from {}", first);
            println!("  to   {}", last);
        }
        _ => println!("No route between these addresses."),
    }
}

fn print_table(result: &QueryResult) {
    println!("\n{}", result.columns.join("\t"));
    for row in &result.rows {
        let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("NULL")).collect();
        println!("{}", cells.join("\t"));
    }
}
