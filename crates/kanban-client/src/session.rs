use futures::future::BoxFuture;
use kanban_core::{ClientConfig, KanbanError, KanbanResult, ReorderFailurePolicy};
use kanban_domain::{
    new_set_columns_order, new_set_tasks_order, Board, BoardDraft, Column, ColumnDraft, Task,
    TaskDraft, TaskUpdate, UserId,
};
use kanban_gateway::PersistenceGateway;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::actions::{Action, EntityKind, OperationKind, Outcome};
use crate::drag::{
    DragDropController, DragKind, DragLocation, DropOutcome, DropResult, ReorderRequest,
    ReorderResponse,
};
use crate::notification::Notifier;
use crate::store::{BoardStore, PendingKey, Ticket};

/// One open client: the board store plus everything that is allowed to
/// write to it.
///
/// Every action follows the same shape: mark it pending, await the gateway,
/// reconcile the store with the confirmed entity, then raise the
/// notification for the outcome. Actions work on the current selection the
/// way the board forms do, so select the board, column or task first.
pub struct BoardSession {
    store: BoardStore,
    gateway: Arc<dyn PersistenceGateway>,
    notifier: Notifier,
    drag: DragDropController,
    user_id: Option<UserId>,
    policy: ReorderFailurePolicy,
}

impl BoardSession {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, config: &ClientConfig) -> Self {
        Self {
            store: BoardStore::new(),
            gateway,
            notifier: Notifier::new(config.notification_timeout()),
            drag: DragDropController::new(),
            user_id: config.user_id.clone(),
            policy: config.reorder_failure_policy,
        }
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn drag(&self) -> &DragDropController {
        &self.drag
    }

    // Selection

    pub fn select_board(&mut self, board_id: &str) -> KanbanResult<()> {
        let board = self
            .store
            .boards()
            .iter()
            .find(|b| b.id == board_id)
            .cloned()
            .ok_or_else(|| KanbanError::NotFound(format!("board {}", board_id)))?;
        self.store.set_current_board(board);
        Ok(())
    }

    pub fn select_column(&mut self, column_id: &str) -> KanbanResult<()> {
        let column = self
            .store
            .column(column_id)
            .cloned()
            .ok_or_else(|| KanbanError::NotFound(format!("column {}", column_id)))?;
        self.store.set_current_column(column);
        Ok(())
    }

    /// Select a task together with the column that owns it.
    pub fn select_task(&mut self, column_id: &str, task_id: &str) -> KanbanResult<()> {
        self.select_column(column_id)?;
        let task = self
            .store
            .current_column()
            .task(task_id)
            .cloned()
            .ok_or_else(|| KanbanError::NotFound(format!("task {}", task_id)))?;
        self.store.set_current_task(task);
        Ok(())
    }

    // Drag and drop

    pub fn drag_start(&mut self, kind: DragKind, source: DragLocation) {
        self.drag.on_drag_start(kind, source);
    }

    /// Apply a released gesture to the store. A dispatched request still has
    /// to be sent and its response handed to [`Self::finish_reorder`].
    pub fn begin_drop(&mut self, drop: DropResult) -> DropOutcome {
        let outcome = self.drag.on_drag_end(&mut self.store, drop);
        match &outcome {
            DropOutcome::Dispatched(request) => {
                self.notifier.record(request.action(), Outcome::Pending)
            }
            DropOutcome::Unresolved => self.notifier.info("reorder.unresolved"),
            DropOutcome::Cancelled => {}
        }
        outcome
    }

    pub fn dispatch(&self, request: ReorderRequest) -> BoxFuture<'static, ReorderResponse> {
        request.send(Arc::clone(&self.gateway))
    }

    /// Reconcile the store with a resolved reorder.
    ///
    /// Success keeps the optimistic state. Failure raises the reorder error
    /// and, under the rollback policy, reverts the request's change unless a
    /// newer reorder or a refetch touched the same columns since.
    pub fn finish_reorder(&mut self, response: ReorderResponse) -> KanbanResult<Vec<Column>> {
        let ReorderResponse { request, result } = response;
        let action = request.action();
        let latest = self.store.settle_reorder(request.ticket(), request.keys());

        match result {
            Ok(columns) => {
                tracing::info!("{} persisted ({} columns returned)", action, columns.len());
                self.notifier.record(action, Outcome::Fulfilled);
                Ok(columns)
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", action, e);
                self.notifier.record(action, Outcome::Rejected);
                match self.policy {
                    ReorderFailurePolicy::Rollback if latest => request.compensate(&mut self.store),
                    ReorderFailurePolicy::Rollback => {
                        tracing::debug!("{} superseded, keeping newer state", action)
                    }
                    ReorderFailurePolicy::KeepOptimistic => {}
                }
                Err(e)
            }
        }
    }

    /// Apply a gesture and wait for it to be persisted. Returns `None` when
    /// the gesture changed nothing.
    pub async fn drop_and_sync(&mut self, drop: DropResult) -> KanbanResult<Option<Vec<Column>>> {
        match self.begin_drop(drop) {
            DropOutcome::Dispatched(request) => {
                let response = self.dispatch(request).await;
                self.finish_reorder(response).map(Some)
            }
            DropOutcome::Cancelled | DropOutcome::Unresolved => Ok(None),
        }
    }

    // Boards

    pub async fn fetch_boards(&mut self) -> KanbanResult<()> {
        let action = self.begin(EntityKind::Board, OperationKind::Fetch);
        let result = self.gateway.get_boards().await;
        let boards = self.settle(action, result)?;
        self.store.set_boards(boards);
        Ok(())
    }

    /// Load a board and its columns (with tasks) and make it current.
    pub async fn fetch_board(&mut self, board_id: &str) -> KanbanResult<()> {
        let action = self.begin(EntityKind::Column, OperationKind::Fetch);
        let result = async {
            let columns = self.gateway.get_columns_by_board(board_id).await?;
            let board = self.gateway.get_board(board_id).await?;
            Ok::<_, KanbanError>((board, columns))
        }
        .await;
        let (board, columns) = self.settle(action, result)?;

        self.store.set_current_board(board);
        self.store.clear_current_column();
        self.store.clear_current_task();
        self.store.columns_loaded(columns);
        Ok(())
    }

    pub async fn add_board(&mut self, draft: BoardDraft) -> KanbanResult<Board> {
        let draft = BoardDraft {
            users: self.user_id.iter().cloned().collect(),
            ..draft
        };

        let action = self.begin(EntityKind::Board, OperationKind::Add);
        let result = self.gateway.add_board(&draft).await;
        let board = self.settle(action, result)?;
        self.store.board_added(board.clone());
        Ok(board)
    }

    pub async fn edit_board(&mut self, draft: BoardDraft) -> KanbanResult<Board> {
        let current = self.require_board()?.clone();
        let draft = BoardDraft {
            users: current.users.clone(),
            ..draft
        };

        let action = self.begin(EntityKind::Board, OperationKind::Edit);
        let result = self.gateway.edit_board(&current.id, &draft).await;
        let board = self.settle(action, result)?;
        self.store.board_edited(&board);
        Ok(board)
    }

    pub async fn delete_board(&mut self) -> KanbanResult<Board> {
        let board_id = self.require_board()?.id.clone();

        let action = self.begin(EntityKind::Board, OperationKind::Delete);
        let result = self.gateway.delete_board(&board_id).await;
        let board = self.settle(action, result)?;
        self.store.board_deleted(&board_id);
        Ok(board)
    }

    // Columns

    pub async fn add_column(&mut self, draft: ColumnDraft) -> KanbanResult<Column> {
        let board_id = self.require_board()?.id.clone();
        let draft = ColumnDraft {
            order: self.store.columns().len() as i32,
            ..draft
        };

        let action = self.begin(EntityKind::Column, OperationKind::Add);
        let result = self.gateway.add_column(&board_id, &draft).await;
        let column = self.settle(action, result)?;
        self.store.column_added(column.clone());
        Ok(column)
    }

    /// Rename the current column. Its position is kept.
    pub async fn edit_column(&mut self, draft: ColumnDraft) -> KanbanResult<Column> {
        let current = self.require_column()?;
        let (board_id, column_id) = (current.board_id.clone(), current.id.clone());
        let draft = ColumnDraft {
            order: current.order,
            ..draft
        };

        let action = self.begin(EntityKind::Column, OperationKind::Edit);
        let result = self
            .gateway
            .edit_column(&board_id, &column_id, &draft)
            .await;
        let column = self.settle(action, result)?;
        self.store.column_edited(&column);
        Ok(column)
    }

    /// Delete the current column and close the gap it leaves.
    pub async fn delete_column(&mut self) -> KanbanResult<Column> {
        let current = self.require_column()?;
        let (board_id, column_id) = (current.board_id.clone(), current.id.clone());

        let action = self.begin(EntityKind::Column, OperationKind::Delete);
        let result = self.gateway.delete_column(&board_id, &column_id).await;
        let column = self.settle(action, result)?;

        if self.store.column_deleted(&column_id) {
            let set = new_set_columns_order(self.store.columns());
            let keys = [PendingKey::ColumnOrder(board_id)];
            let ticket = self.store.begin_reorder(&keys);
            let result = self.gateway.update_columns_order(&set).await;
            self.settle_follow_up(EntityKind::Column, ticket, &keys, result);
        }
        Ok(column)
    }

    // Tasks

    pub async fn add_task(&mut self, draft: TaskDraft) -> KanbanResult<Task> {
        let current = self.require_column()?;
        let (board_id, column_id) = (current.board_id.clone(), current.id.clone());
        let order = self
            .store
            .column(&column_id)
            .unwrap_or(current)
            .next_task_order();
        let draft = TaskDraft {
            order,
            user_id: self.user_id.clone().unwrap_or_default(),
            users: BTreeSet::new(),
            is_done: false,
            ..draft
        };

        let action = self.begin(EntityKind::Task, OperationKind::Add);
        let result = self.gateway.add_task(&board_id, &column_id, &draft).await;
        let task = self.settle(action, result)?;
        self.store.task_added(task.clone());
        Ok(task)
    }

    /// Delete the current task and close the gap it leaves in its column.
    pub async fn delete_task(&mut self) -> KanbanResult<Task> {
        let current = self.require_task()?.clone();

        let action = self.begin(EntityKind::Task, OperationKind::Delete);
        let result = self
            .gateway
            .delete_task(&current.board_id, &current.column_id, &current.id)
            .await;
        let task = self.settle(action, result)?;

        if let Some(column) = self.store.task_deleted(&current) {
            let set = new_set_tasks_order(&column.tasks);
            let keys = [PendingKey::TaskLayout(column.id)];
            let ticket = self.store.begin_reorder(&keys);
            let result = self.gateway.update_tasks_order(&set).await;
            self.settle_follow_up(EntityKind::Task, ticket, &keys, result);
        }
        Ok(task)
    }

    pub async fn edit_task(&mut self, update: TaskUpdate) -> KanbanResult<Task> {
        let draft = update.merge_into(self.require_task()?.draft());
        self.save_task(OperationKind::Edit, draft).await
    }

    pub async fn set_task_done(&mut self) -> KanbanResult<Task> {
        let draft = TaskDraft {
            is_done: true,
            ..self.require_task()?.draft()
        };
        self.save_task(OperationKind::Done, draft).await
    }

    pub async fn set_task_not_done(&mut self) -> KanbanResult<Task> {
        let draft = TaskDraft {
            is_done: false,
            ..self.require_task()?.draft()
        };
        self.save_task(OperationKind::NotDone, draft).await
    }

    /// Every task of the current board, flat.
    pub async fn fetch_tasks_by_board(&mut self) -> KanbanResult<Vec<Task>> {
        let board_id = self.require_board()?.id.clone();

        let action = self.begin(EntityKind::Task, OperationKind::Fetch);
        let result = self.gateway.get_tasks_by_board(&board_id).await;
        self.settle(action, result)
    }

    async fn save_task(&mut self, operation: OperationKind, draft: TaskDraft) -> KanbanResult<Task> {
        let current = self.require_task()?.clone();

        let action = self.begin(EntityKind::Task, operation);
        let result = self
            .gateway
            .edit_task(&current.board_id, &current.column_id, &current.id, &draft)
            .await;
        let task = self.settle(action, result)?;
        self.store.task_replaced(task.clone());
        Ok(task)
    }

    // Helpers

    fn require_board(&self) -> KanbanResult<&Board> {
        let board = self.store.current_board();
        if board.is_selected() {
            Ok(board)
        } else {
            Err(KanbanError::Validation("no board selected".into()))
        }
    }

    fn require_column(&self) -> KanbanResult<&Column> {
        let column = self.store.current_column();
        if column.is_selected() {
            Ok(column)
        } else {
            Err(KanbanError::Validation("no column selected".into()))
        }
    }

    fn require_task(&self) -> KanbanResult<&Task> {
        let task = self.store.current_task();
        if task.is_selected() {
            Ok(task)
        } else {
            Err(KanbanError::Validation("no task selected".into()))
        }
    }

    fn begin(&mut self, entity: EntityKind, operation: OperationKind) -> Action {
        let action = Action::new(entity, operation);
        tracing::debug!("{} dispatched", action);
        self.notifier.record(action, Outcome::Pending);
        action
    }

    fn settle<T>(&mut self, action: Action, result: KanbanResult<T>) -> KanbanResult<T> {
        match &result {
            Ok(_) => {
                tracing::info!("{} succeeded", action);
                self.notifier.record(action, Outcome::Fulfilled);
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", action, e);
                self.notifier.record(action, Outcome::Rejected);
            }
        }
        result
    }

    /// Renumbering after a delete. It takes a ticket like any reorder, so an
    /// older gesture failing later cannot roll back over it. The delete
    /// already succeeded, so a failure here is only reported.
    fn settle_follow_up(
        &mut self,
        entity: EntityKind,
        ticket: Ticket,
        keys: &[PendingKey],
        result: KanbanResult<Vec<Column>>,
    ) {
        self.store.settle_reorder(ticket, keys);
        if let Err(e) = result {
            let action = Action::new(entity, OperationKind::Reorder);
            tracing::warn!("{} after delete failed: {}", action, e);
            self.notifier.record(action, Outcome::Rejected);
        }
    }
}
