#![allow(dead_code)]

use async_trait::async_trait;
use kanban_client::BoardSession;
use kanban_core::{ClientConfig, KanbanError, KanbanResult, ReorderFailurePolicy};
use kanban_domain::{
    Board, BoardDraft, Column, ColumnDraft, ColumnsSet, Task, TaskDraft, TasksSet,
};
use kanban_gateway::PersistenceGateway;
use mockall::mock;
use serde_json::json;
use std::sync::Arc;

mock! {
    pub Gateway {}

    #[async_trait]
    impl PersistenceGateway for Gateway {
        async fn get_boards(&self) -> KanbanResult<Vec<Board>>;
        async fn get_board(&self, board_id: &str) -> KanbanResult<Board>;
        async fn add_board(&self, board: &BoardDraft) -> KanbanResult<Board>;
        async fn edit_board(&self, board_id: &str, board: &BoardDraft) -> KanbanResult<Board>;
        async fn delete_board(&self, board_id: &str) -> KanbanResult<Board>;
        async fn get_columns_by_board(&self, board_id: &str) -> KanbanResult<Vec<Column>>;
        async fn add_column(&self, board_id: &str, column: &ColumnDraft) -> KanbanResult<Column>;
        async fn delete_column(&self, board_id: &str, column_id: &str) -> KanbanResult<Column>;
        async fn edit_column(
            &self,
            board_id: &str,
            column_id: &str,
            column: &ColumnDraft,
        ) -> KanbanResult<Column>;
        async fn update_columns_order(&self, set: &[ColumnsSet]) -> KanbanResult<Vec<Column>>;
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
        async fn update_tasks_order(&self, set: &[TasksSet]) -> KanbanResult<Vec<Column>>;
    }
}

pub const BOARD_ID: &str = "b1";
pub const USER_ID: &str = "u1";

pub fn board() -> Board {
    Board {
        id: BOARD_ID.into(),
        title: "Sprint".into(),
        owner: "Ann".into(),
        users: [USER_ID.to_string(), "u2".to_string()].into_iter().collect(),
    }
}

pub fn task(id: &str, column_id: &str, order: i32) -> Task {
    Task {
        id: id.into(),
        column_id: column_id.into(),
        board_id: BOARD_ID.into(),
        title: id.to_uppercase(),
        description: String::new(),
        order,
        user_id: USER_ID.into(),
        ..Task::default()
    }
}

pub fn column(id: &str, order: i32, tasks: &[&str]) -> Column {
    Column {
        id: id.into(),
        board_id: BOARD_ID.into(),
        title: id.to_uppercase(),
        order,
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(i, t)| task(t, id, i as i32))
            .collect(),
    }
}

/// Two columns: `c1` holding `t1`, and `c2` holding `t2`, `t3`.
pub fn board_columns() -> Vec<Column> {
    vec![column("c1", 0, &["t1"]), column("c2", 1, &["t2", "t3"])]
}

pub fn rejection(status: u16) -> KanbanError {
    KanbanError::Rejected {
        status,
        payload: Some(json!({"message": "rejected"})),
    }
}

pub fn config(policy: ReorderFailurePolicy) -> ClientConfig {
    ClientConfig {
        user_id: Some(USER_ID.into()),
        reorder_failure_policy: policy,
        ..ClientConfig::default()
    }
}

/// Expect the two calls `fetch_board` makes.
pub fn expect_board_load(gateway: &mut MockGateway, columns: Vec<Column>) {
    gateway
        .expect_get_columns_by_board()
        .withf(|board_id| board_id == BOARD_ID)
        .times(1)
        .returning(move |_| Ok(columns.clone()));
    gateway
        .expect_get_board()
        .withf(|board_id| board_id == BOARD_ID)
        .times(1)
        .returning(|_| Ok(board()));
}

/// A session with `board_columns()` loaded.
pub async fn loaded_session(mut gateway: MockGateway, policy: ReorderFailurePolicy) -> BoardSession {
    expect_board_load(&mut gateway, board_columns());
    let mut session = BoardSession::new(Arc::new(gateway), &config(policy));
    session.fetch_board(BOARD_ID).await.unwrap();
    session
}

pub fn task_ids(column: &Column) -> Vec<&str> {
    column.tasks.iter().map(|t| t.id.as_str()).collect()
}

pub fn column_ids(columns: &[Column]) -> Vec<&str> {
    columns.iter().map(|c| c.id.as_str()).collect()
}
