use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type BoardId = String;
pub type UserId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(rename = "_id")]
    pub id: BoardId,
    pub title: String,
    pub owner: String,
    #[serde(default)]
    pub users: BTreeSet<UserId>,
}

/// Body sent when creating or editing a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDraft {
    pub title: String,
    pub owner: String,
    #[serde(default)]
    pub users: BTreeSet<UserId>,
}

impl Board {
    /// Placeholder used while no board is selected.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_selected(&self) -> bool {
        !self.id.is_empty()
    }

    /// Copy the editable fields confirmed by the server. Membership is owned
    /// by a separate flow and stays untouched.
    pub fn apply_edit(&mut self, confirmed: &Board) {
        self.title = confirmed.title.clone();
        self.owner = confirmed.owner.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_board_wire_format() {
        let board: Board = serde_json::from_value(json!({
            "_id": "b1",
            "title": "Release",
            "owner": "u1",
            "users": ["u2", "u1", "u2"]
        }))
        .unwrap();

        assert_eq!(board.id, "b1");
        assert_eq!(board.users.len(), 2);
        assert!(board.is_selected());

        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(value["_id"], "b1");
        assert_eq!(value["users"], json!(["u1", "u2"]));
    }

    #[test]
    fn test_apply_edit_keeps_users() {
        let mut board = Board {
            id: "b1".into(),
            title: "Old".into(),
            owner: "u1".into(),
            users: ["u1".to_string()].into_iter().collect(),
        };
        let confirmed = Board {
            id: "b1".into(),
            title: "New".into(),
            owner: "u2".into(),
            users: BTreeSet::new(),
        };

        board.apply_edit(&confirmed);
        assert_eq!(board.title, "New");
        assert_eq!(board.owner, "u2");
        assert_eq!(board.users.len(), 1);
    }

    #[test]
    fn test_empty_board_is_not_selected() {
        assert!(!Board::empty().is_selected());
    }
}
