use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::board::{BoardId, UserId};
use crate::column::ColumnId;

pub type TaskId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub column_id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: i32,
    /// Creator of the task.
    #[serde(default)]
    pub user_id: UserId,
    /// Assignees.
    #[serde(default)]
    pub users: BTreeSet<UserId>,
    #[serde(default)]
    pub is_done: bool,
}

/// Body sent when creating or editing a task. Identity and placement
/// (`_id`, `boardId`, `columnId`) travel in the request path instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: i32,
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default)]
    pub users: BTreeSet<UserId>,
    #[serde(default)]
    pub is_done: bool,
}

/// Edit submitted from the task form. Empty text fields mean "keep the
/// existing value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub is_done: bool,
}

impl Task {
    /// Placeholder used while no task is selected.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_selected(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            order: self.order,
            user_id: self.user_id.clone(),
            users: self.users.clone(),
            is_done: self.is_done,
        }
    }

    pub fn move_to_column(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
    }
}

impl TaskUpdate {
    /// Merge this edit into the draft of an existing task.
    ///
    /// `is_done` can only be raised here; clearing it goes through the
    /// dedicated not-done toggle.
    pub fn merge_into(self, mut draft: TaskDraft) -> TaskDraft {
        if !self.title.is_empty() {
            draft.title = self.title;
        }
        if !self.description.is_empty() {
            draft.description = self.description;
        }
        draft.is_done = self.is_done || draft.is_done;
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_task() -> Task {
        Task {
            id: "t1".into(),
            column_id: "c1".into(),
            board_id: "b1".into(),
            title: "Write docs".into(),
            description: "README".into(),
            order: 3,
            user_id: "u1".into(),
            users: BTreeSet::new(),
            is_done: false,
        }
    }

    #[test]
    fn test_task_wire_format() {
        let task: Task = serde_json::from_value(json!({
            "_id": "t1",
            "columnId": "c1",
            "boardId": "b1",
            "title": "Write docs",
            "order": 0,
            "userId": "u1",
            "isDone": true
        }))
        .unwrap();

        assert_eq!(task.column_id, "c1");
        assert!(task.is_done);
        assert!(task.description.is_empty());

        let draft = serde_json::to_value(task.draft()).unwrap();
        assert_eq!(draft["isDone"], true);
        assert!(draft.get("_id").is_none());
        assert!(draft.get("columnId").is_none());
    }

    #[test]
    fn test_update_keeps_existing_text_when_empty() {
        let draft = TaskUpdate {
            title: String::new(),
            description: "New description".into(),
            is_done: false,
        }
        .merge_into(sample_task().draft());

        assert_eq!(draft.title, "Write docs");
        assert_eq!(draft.description, "New description");
        assert_eq!(draft.order, 3);
        assert!(!draft.is_done);
    }

    #[test]
    fn test_update_cannot_clear_done() {
        let mut task = sample_task();
        task.is_done = true;

        let draft = TaskUpdate::default().merge_into(task.draft());
        assert!(draft.is_done);

        let draft = TaskUpdate {
            is_done: true,
            ..TaskUpdate::default()
        }
        .merge_into(sample_task().draft());
        assert!(draft.is_done);
    }
}
