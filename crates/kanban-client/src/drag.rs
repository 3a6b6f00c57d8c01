//! Drag-and-drop reordering.
//!
//! A completed gesture is turned into an optimistic store update plus a
//! [`ReorderRequest`] carrying the bulk `{id, order}` payload. The request
//! owns everything it needs, so several can be in flight at once and
//! resolve in any order; each [`ReorderResponse`] goes back to the session
//! for reconciliation.

use futures::future::{BoxFuture, FutureExt};
use kanban_core::KanbanResult;
use kanban_domain::{
    combine_columns, new_set_columns_order, new_set_tasks_order, renumber, reorder_column,
    reorder_task, Column, ColumnId, ColumnsSet, Task, TasksSet,
};
use kanban_gateway::PersistenceGateway;
use std::sync::Arc;

use crate::actions::{Action, EntityKind, OperationKind};
use crate::store::{BoardStore, PendingKey, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Column,
    Task,
}

/// A slot in a droppable list. For task drags `droppable_id` is the owning
/// column's id; for column drags it names the board strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragLocation {
    pub droppable_id: String,
    pub index: usize,
}

impl DragLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }
}

/// Where a released gesture started and ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub kind: DragKind,
    pub source: DragLocation,
    /// `None` when released outside any valid target.
    pub destination: Option<DragLocation>,
}

/// Where the controller is within a gesture.
///
/// `Reordering` is held only while `on_drag_end` rewrites the store, so
/// callers see `Idle` again once it returns. Whether the request it built has
/// been persisted is tracked by the store's pending log, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging { kind: DragKind, source: DragLocation },
    Reordering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderPayload {
    Columns(Vec<ColumnsSet>),
    Tasks(Vec<TasksSet>),
}

/// State needed to compensate a failed reorder.
#[derive(Debug, Clone)]
enum ReorderUndo {
    ColumnOrder(Vec<ColumnId>),
    TaskLayout(Vec<Column>),
}

/// A reorder already applied to the store and waiting to be persisted.
#[derive(Debug)]
pub struct ReorderRequest {
    ticket: Ticket,
    keys: Vec<PendingKey>,
    payload: ReorderPayload,
    undo: ReorderUndo,
}

impl ReorderRequest {
    pub fn payload(&self) -> &ReorderPayload {
        &self.payload
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn action(&self) -> Action {
        match self.payload {
            ReorderPayload::Columns(_) => Action::new(EntityKind::Column, OperationKind::Reorder),
            ReorderPayload::Tasks(_) => Action::new(EntityKind::Task, OperationKind::Reorder),
        }
    }

    /// Issue the bulk call. The returned future borrows nothing from the
    /// store, so it can be awaited or spawned while other gestures proceed.
    pub fn send(self, gateway: Arc<dyn PersistenceGateway>) -> BoxFuture<'static, ReorderResponse> {
        async move {
            let result = match &self.payload {
                ReorderPayload::Columns(set) => gateway.update_columns_order(set).await,
                ReorderPayload::Tasks(set) => gateway.update_tasks_order(set).await,
            };
            ReorderResponse {
                request: self,
                result,
            }
        }
        .boxed()
    }

    pub(crate) fn keys(&self) -> &[PendingKey] {
        &self.keys
    }

    /// Revert the optimistic change this request made.
    pub(crate) fn compensate(&self, store: &mut BoardStore) {
        match &self.undo {
            ReorderUndo::ColumnOrder(previous) => store.restore_column_order(previous),
            ReorderUndo::TaskLayout(snapshot) => store.restore_task_layout(snapshot),
        }
    }
}

#[derive(Debug)]
pub struct ReorderResponse {
    pub request: ReorderRequest,
    pub result: KanbanResult<Vec<Column>>,
}

#[derive(Debug)]
pub enum DropOutcome {
    /// No destination, or dropped back where it started.
    Cancelled,
    /// Source or destination could not be found in the store.
    Unresolved,
    /// The store was updated; the request still has to be sent.
    Dispatched(ReorderRequest),
}

/// Turns drag gestures into store updates and reorder requests.
#[derive(Debug)]
pub struct DragDropController {
    state: GestureState,
}

impl Default for DragDropController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragDropController {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn on_drag_start(&mut self, kind: DragKind, source: DragLocation) {
        self.state = GestureState::Dragging { kind, source };
    }

    /// Finish a gesture. Always returns the controller to `Idle`.
    ///
    /// When a drag was started, the drop must report the same kind and
    /// source; a mismatched drop is left unresolved.
    pub fn on_drag_end(&mut self, store: &mut BoardStore, drop: DropResult) -> DropOutcome {
        let started = std::mem::replace(&mut self.state, GestureState::Idle);
        if let GestureState::Dragging { kind, source } = started {
            if kind != drop.kind || source != drop.source {
                tracing::warn!(
                    "Ignoring drop from {}[{}]: gesture started at {}[{}]",
                    drop.source.droppable_id,
                    drop.source.index,
                    source.droppable_id,
                    source.index
                );
                return DropOutcome::Unresolved;
            }
        }

        let destination = match &drop.destination {
            Some(destination) if *destination != drop.source => destination.clone(),
            _ => return DropOutcome::Cancelled,
        };

        self.state = GestureState::Reordering;
        let outcome = match drop.kind {
            DragKind::Column => self.move_column(store, &drop.source, &destination),
            DragKind::Task => self.move_task(store, &drop.source, &destination),
        };
        self.state = GestureState::Idle;
        outcome
    }

    fn move_column(
        &self,
        store: &mut BoardStore,
        source: &DragLocation,
        destination: &DragLocation,
    ) -> DropOutcome {
        if source.index == destination.index {
            return DropOutcome::Cancelled;
        }

        let previous: Vec<ColumnId> = store.columns().iter().map(|c| c.id.clone()).collect();
        let mut columns = match reorder_column(store.columns(), source.index, destination.index) {
            Ok(columns) => columns,
            Err(e) => {
                tracing::warn!("Ignoring column drop: {}", e);
                return DropOutcome::Unresolved;
            }
        };

        renumber(&mut columns);
        let payload = new_set_columns_order(&columns);
        store.set_columns(columns);

        let keys = vec![PendingKey::ColumnOrder(store.current_board().id.clone())];
        let ticket = store.begin_reorder(&keys);
        tracing::debug!(
            "Column moved {} -> {}, dispatching {} positions",
            source.index,
            destination.index,
            payload.len()
        );

        DropOutcome::Dispatched(ReorderRequest {
            ticket,
            keys,
            payload: ReorderPayload::Columns(payload),
            undo: ReorderUndo::ColumnOrder(previous),
        })
    }

    fn move_task(
        &self,
        store: &mut BoardStore,
        source: &DragLocation,
        destination: &DragLocation,
    ) -> DropOutcome {
        let (Some(from), Some(to)) = (
            store.column(&source.droppable_id).cloned(),
            store.column(&destination.droppable_id).cloned(),
        ) else {
            tracing::warn!(
                "Ignoring task drop: column {} or {} not found",
                source.droppable_id,
                destination.droppable_id
            );
            return DropOutcome::Unresolved;
        };

        let (mut new_from, mut new_to) =
            match reorder_task(&from, &to, source.index, destination.index) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!("Ignoring task drop: {}", e);
                    return DropOutcome::Unresolved;
                }
            };
        renumber(&mut new_from.tasks);
        renumber(&mut new_to.tasks);

        let same_column = from.id == to.id;
        let tasks: Vec<Task> = if same_column {
            new_from.tasks.clone()
        } else {
            new_from.tasks.iter().chain(&new_to.tasks).cloned().collect()
        };
        let payload = new_set_tasks_order(&tasks);

        let columns = combine_columns(store.columns(), &new_to, &new_from);
        store.set_columns(columns);

        let (keys, snapshot) = if same_column {
            (vec![PendingKey::TaskLayout(from.id.clone())], vec![from])
        } else {
            (
                vec![
                    PendingKey::TaskLayout(from.id.clone()),
                    PendingKey::TaskLayout(to.id.clone()),
                ],
                vec![from, to],
            )
        };
        let ticket = store.begin_reorder(&keys);
        tracing::debug!(
            "Task moved {}[{}] -> {}[{}], dispatching {} positions",
            source.droppable_id,
            source.index,
            destination.droppable_id,
            destination.index,
            payload.len()
        );

        DropOutcome::Dispatched(ReorderRequest {
            ticket,
            keys,
            payload: ReorderPayload::Tasks(payload),
            undo: ReorderUndo::TaskLayout(snapshot),
        })
    }
}
