use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Command-line client for a remote kanban board service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base URL of the board service (or set KANBAN_API_URL)
    #[arg(long, global = true, env = "KANBAN_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent with every request (or set KANBAN_TOKEN)
    #[arg(long, global = true, env = "KANBAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Id of the acting user, recorded as creator of new tasks
    #[arg(long, global = true, env = "KANBAN_USER_ID")]
    pub user_id: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE", env = "KANBAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Column operations
    Column(ColumnCommand),
    /// Task operations
    Task(TaskCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// List all boards
    List,
    /// Get a board with its columns and tasks
    Get {
        #[arg(long)]
        id: String,
    },
    /// Create a new board
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        owner: String,
    },
    /// Change a board's title or owner
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Delete a board
    Delete {
        #[arg(long)]
        id: String,
    },
}

// Column commands
#[derive(Args)]
pub struct ColumnCommand {
    #[command(subcommand)]
    pub action: ColumnAction,
}

#[derive(Subcommand)]
pub enum ColumnAction {
    /// List the columns of a board in display order
    List {
        #[arg(long)]
        board_id: String,
    },
    /// Append a column to a board
    Add {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        title: String,
    },
    /// Rename a column
    Rename {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
    },
    /// Move the column at one position to another
    Move {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },
    /// Delete a column
    Delete {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        id: String,
    },
}

// Task commands
#[derive(Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// List every task of a board
    List {
        #[arg(long)]
        board_id: String,
    },
    /// Append a task to a column
    Add {
        #[arg(long)]
        board_id: String,
        #[arg(long)]
        column_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edit a task's title or description
    Edit(TaskEditArgs),
    /// Move a task to a position in the same or another column
    Move(TaskMoveArgs),
    /// Mark a task as done
    Done(TaskRef),
    /// Mark a task as not done
    Undone(TaskRef),
    /// Delete a task
    Delete(TaskRef),
}

#[derive(Args)]
pub struct TaskRef {
    #[arg(long)]
    pub board_id: String,
    #[arg(long)]
    pub column_id: String,
    #[arg(long)]
    pub id: String,
}

#[derive(Args)]
pub struct TaskEditArgs {
    #[command(flatten)]
    pub task: TaskRef,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct TaskMoveArgs {
    #[arg(long)]
    pub board_id: String,
    #[arg(long)]
    pub from_column: String,
    #[arg(long)]
    pub from_index: usize,
    #[arg(long)]
    pub to_column: String,
    #[arg(long)]
    pub to_index: usize,
}
