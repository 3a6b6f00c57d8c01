//! Ordering rules for columns and tasks.
//!
//! Pure functions that compute new sequences after a drag-and-drop move and
//! the minimal `{id, order}` payloads sent to the remote service. Nothing in
//! here performs I/O, so every rule can be tested directly.

use kanban_core::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::column::{Column, ColumnId};
use crate::task::{Task, TaskId};

/// New position of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsSet {
    #[serde(rename = "_id")]
    pub id: ColumnId,
    pub order: i32,
}

/// New position of one task, relative to the column that now owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksSet {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub order: i32,
    pub column_id: ColumnId,
}

/// Anything with an id and a position among its siblings.
pub trait Ordered {
    fn id(&self) -> &str;
    fn order(&self) -> i32;
    fn set_order(&mut self, order: i32);
}

impl Ordered for Column {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

impl Ordered for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

fn check_index(index: usize, len: usize, what: &str) -> KanbanResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(KanbanError::Validation(format!(
            "{} index {} out of range for length {}",
            what, index, len
        )))
    }
}

/// Move one element of a list, with the usual remove-then-insert semantics.
fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> KanbanResult<Vec<T>> {
    check_index(from, items.len(), "source")?;
    check_index(to, items.len(), "destination")?;

    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(moved)
}

/// Move the column at `from` to `to`. `from == to` returns the input as is.
pub fn reorder_column(columns: &[Column], from: usize, to: usize) -> KanbanResult<Vec<Column>> {
    move_item(columns, from, to)
}

/// Move the task at `from` in `source` to `to` in `destination`.
///
/// When both columns share an id the move happens inside one task list and
/// both returned columns are that same updated column. Otherwise the task is
/// reassigned to the destination column; `to` may equal the destination's
/// length to append.
pub fn reorder_task(
    source: &Column,
    destination: &Column,
    from: usize,
    to: usize,
) -> KanbanResult<(Column, Column)> {
    if source.id == destination.id {
        let mut column = source.clone();
        column.tasks = move_item(&source.tasks, from, to)?;
        return Ok((column.clone(), column));
    }

    check_index(from, source.tasks.len(), "source")?;
    check_index(to, destination.tasks.len() + 1, "destination")?;

    let mut new_source = source.clone();
    let mut new_destination = destination.clone();

    let mut task = new_source.tasks.remove(from);
    task.move_to_column(new_destination.id.clone());
    new_destination.tasks.insert(to, task);

    Ok((new_source, new_destination))
}

/// Column positions as they should be persisted: each column's index.
pub fn new_set_columns_order(columns: &[Column]) -> Vec<ColumnsSet> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| ColumnsSet {
            id: column.id.clone(),
            order: index as i32,
        })
        .collect()
}

/// Task positions as they should be persisted.
///
/// Positions are counted per owning column, so the tasks of two columns
/// passed together still each start at 0. Within a column the input order
/// is kept.
pub fn new_set_tasks_order(tasks: &[Task]) -> Vec<TasksSet> {
    let mut next_order: HashMap<&str, i32> = HashMap::new();

    tasks
        .iter()
        .map(|task| {
            let slot = next_order.entry(task.column_id.as_str()).or_insert(0);
            let order = *slot;
            *slot += 1;
            TasksSet {
                id: task.id.clone(),
                order,
                column_id: task.column_id.clone(),
            }
        })
        .collect()
}

/// Replace the two given columns (matched by id) inside the full list.
pub fn combine_columns(all: &[Column], updated_a: &Column, updated_b: &Column) -> Vec<Column> {
    all.iter()
        .map(|column| {
            if column.id == updated_a.id {
                updated_a.clone()
            } else if column.id == updated_b.id {
                updated_b.clone()
            } else {
                column.clone()
            }
        })
        .collect()
}

/// Rewrite `order` fields to match the sequence position (0, 1, 2, ...).
/// Returns true if any value changed.
pub fn renumber<T: Ordered>(items: &mut [T]) -> bool {
    let mut changed = false;
    for (index, item) in items.iter_mut().enumerate() {
        let order = index as i32;
        if item.order() != order {
            item.set_order(order);
            changed = true;
        }
    }
    changed
}
