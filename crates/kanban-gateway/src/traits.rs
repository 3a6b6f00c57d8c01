use async_trait::async_trait;
use kanban_core::KanbanResult;
use kanban_domain::{
    Board, BoardDraft, Column, ColumnDraft, ColumnsSet, Task, TaskDraft, TasksSet,
};

/// Remote CRUD and bulk-reorder endpoints for boards, columns and tasks.
///
/// Every call is a request/response over the network. Failures come back as
/// `KanbanError::Rejected` when the server answered with an error status, or
/// `KanbanError::Transport` when no response arrived at all.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    // Boards
    async fn get_boards(&self) -> KanbanResult<Vec<Board>>;
    async fn get_board(&self, board_id: &str) -> KanbanResult<Board>;
    async fn add_board(&self, board: &BoardDraft) -> KanbanResult<Board>;
    async fn edit_board(&self, board_id: &str, board: &BoardDraft) -> KanbanResult<Board>;
    async fn delete_board(&self, board_id: &str) -> KanbanResult<Board>;

    // Columns
    async fn get_columns_by_board(&self, board_id: &str) -> KanbanResult<Vec<Column>>;
    async fn add_column(&self, board_id: &str, column: &ColumnDraft) -> KanbanResult<Column>;
    async fn delete_column(&self, board_id: &str, column_id: &str) -> KanbanResult<Column>;
    async fn edit_column(
        &self,
        board_id: &str,
        column_id: &str,
        column: &ColumnDraft,
    ) -> KanbanResult<Column>;
    /// Persist new column positions in one call.
    async fn update_columns_order(&self, set: &[ColumnsSet]) -> KanbanResult<Vec<Column>>;

    // Tasks
    async fn get_tasks_by_board(&self, board_id: &str) -> KanbanResult<Vec<Task>>;
    async fn add_task(
        &self,
        board_id: &str,
        column_id: &str,
        task: &TaskDraft,
    ) -> KanbanResult<Task>;
    async fn delete_task(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
    ) -> KanbanResult<Task>;
    async fn edit_task(
        &self,
        board_id: &str,
        column_id: &str,
        task_id: &str,
        task: &TaskDraft,
    ) -> KanbanResult<Task>;
    /// Persist new task positions (and column membership) in one call.
    async fn update_tasks_order(&self, set: &[TasksSet]) -> KanbanResult<Vec<Column>>;
}
