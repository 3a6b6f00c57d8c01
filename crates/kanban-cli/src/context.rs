use kanban_client::BoardSession;
use kanban_core::{ClientConfig, KanbanResult};
use kanban_domain::{Board, Column};
use kanban_gateway::HttpGateway;
use serde::Serialize;
use std::sync::Arc;

use crate::cli::Cli;
use crate::output;

/// A board together with its columns, as printed by `board get`.
#[derive(Debug, Serialize)]
pub struct BoardView<'a> {
    pub board: &'a Board,
    pub columns: &'a [Column],
}

pub struct CliContext {
    pub session: BoardSession,
}

impl CliContext {
    /// Build a session from the config file, with command-line flags and
    /// environment variables taking precedence.
    pub fn connect(cli: &Cli) -> KanbanResult<Self> {
        let config = resolve_config(cli)?;
        let gateway = HttpGateway::from_config(&config)?;
        tracing::debug!("Using board service at {}", gateway.base_url());

        Ok(Self {
            session: BoardSession::new(Arc::new(gateway), &config),
        })
    }

    /// Load a board and its columns into the session and make it current.
    pub async fn open_board(&mut self, board_id: &str) -> KanbanResult<()> {
        self.session.fetch_board(board_id).await
    }

    /// Message key of the banner the last action left visible.
    pub fn notice(&self) -> Option<&'static str> {
        self.session.notifier().visible().map(|n| n.message_key)
    }

    pub fn respond<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        output::output_success(data, self.notice())
    }

    pub fn respond_list<T: Serialize>(&self, items: Vec<T>) -> anyhow::Result<()> {
        output::output_list(items, self.notice())
    }
}

fn resolve_config(cli: &Cli) -> KanbanResult<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load(),
    };

    if let Some(api_url) = &cli.api_url {
        config.api_url = Some(api_url.clone());
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(user_id) = &cli.user_id {
        config.user_id = Some(user_id.clone());
    }
    Ok(config)
}
