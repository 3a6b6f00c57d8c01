use serde::{Deserialize, Serialize};

use crate::board::BoardId;
use crate::task::{Task, TaskId};

pub type ColumnId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(rename = "_id")]
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    pub order: i32,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Body sent when creating or editing a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDraft {
    pub title: String,
    pub order: i32,
}

impl Column {
    /// Placeholder used while no column is selected.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_selected(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn task_index(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Position the next appended task receives.
    pub fn next_task_order(&self) -> i32 {
        self.tasks.len() as i32
    }

    /// Sort nested tasks by their stored order. The server does not
    /// guarantee the nesting order of the tasks it returns.
    pub fn sort_tasks(&mut self) {
        self.tasks.sort_by_key(|t| t.order);
    }

    pub fn replace_task(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, task_id: &TaskId) -> Option<Task> {
        let index = self.task_index(task_id)?;
        Some(self.tasks.remove(index))
    }

    pub fn draft(&self) -> ColumnDraft {
        ColumnDraft {
            title: self.title.clone(),
            order: self.order,
        }
    }
}
