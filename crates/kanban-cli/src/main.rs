mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use kanban_core::KanbanError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("KANBAN_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "kanban", &mut std::io::stdout());
        return Ok(());
    }

    let mut ctx = match CliContext::connect(&cli) {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&e.to_string(), None),
    };

    let result = match cli.command {
        Commands::Board(board_cmd) => handlers::board::handle(&mut ctx, board_cmd.action).await,
        Commands::Column(column_cmd) => {
            handlers::column::handle(&mut ctx, column_cmd.action).await
        }
        Commands::Task(task_cmd) => handlers::task::handle(&mut ctx, task_cmd.action).await,
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        output::output_error(&describe(&e), ctx.notice());
    }
    Ok(())
}

/// Error text for the JSON envelope, with the server's message appended
/// when it sent one.
fn describe(err: &anyhow::Error) -> String {
    let server_message = err
        .downcast_ref::<KanbanError>()
        .and_then(KanbanError::server_payload)
        .and_then(|payload| payload.get("message"))
        .and_then(|message| message.as_str());

    match server_message {
        Some(message) => format!("{}: {}", err, message),
        None => err.to_string(),
    }
}
