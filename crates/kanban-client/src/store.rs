use kanban_domain::{renumber, Board, BoardId, Column, ColumnId, Task};
use std::collections::HashMap;

/// Identifies one dispatched reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What a reorder touched: the column order of a board, or the task layout
/// of one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingKey {
    ColumnOrder(BoardId),
    TaskLayout(ColumnId),
}

/// Latest in-flight reorder per key.
#[derive(Debug, Default)]
struct PendingLog {
    next_ticket: u64,
    latest: HashMap<PendingKey, Ticket>,
}

impl PendingLog {
    fn begin(&mut self, keys: &[PendingKey]) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        for key in keys {
            self.latest.insert(key.clone(), ticket);
        }
        ticket
    }

    fn settle(&mut self, ticket: Ticket, keys: &[PendingKey]) -> bool {
        let mut still_latest = true;
        for key in keys {
            if self.latest.get(key) == Some(&ticket) {
                self.latest.remove(key);
            } else {
                still_latest = false;
            }
        }
        still_latest
    }
}

/// In-memory copy of the boards, the open board's columns (with nested
/// tasks) and the current selection used by forms.
///
/// Readers go through `&self` selectors; only the session and the drag
/// controller hold `&mut` access.
#[derive(Debug, Default)]
pub struct BoardStore {
    boards: Vec<Board>,
    current_board: Board,
    columns: Vec<Column>,
    current_column: Column,
    current_task: Task,
    pending: PendingLog,
}

impl BoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Selectors

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn current_board(&self) -> &Board {
        &self.current_board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn current_column(&self) -> &Column {
        &self.current_column
    }

    pub fn current_task(&self) -> &Task {
        &self.current_task
    }

    pub fn is_pending(&self, key: &PendingKey) -> bool {
        self.pending.latest.contains_key(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.latest.len()
    }

    // Plain mutators

    pub fn set_boards(&mut self, boards: Vec<Board>) {
        self.boards = boards;
    }

    pub fn set_current_board(&mut self, board: Board) {
        self.current_board = board;
    }

    /// Replace the column list. The current column and task are refreshed
    /// from the new list so forms never edit a stale copy.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.sync_selection();
    }

    pub fn set_current_column(&mut self, column: Column) {
        self.current_column = column;
    }

    pub fn set_current_task(&mut self, task: Task) {
        self.current_task = task;
    }

    pub fn clear_current_column(&mut self) {
        self.current_column = Column::empty();
    }

    pub fn clear_current_task(&mut self) {
        self.current_task = Task::empty();
    }

    fn sync_selection(&mut self) {
        if let Some(column) = self.columns.iter().find(|c| c.id == self.current_column.id) {
            self.current_column = column.clone();
        }
        if let Some(task) = self
            .columns
            .iter()
            .flat_map(|c| c.tasks.iter())
            .find(|t| t.id == self.current_task.id)
        {
            self.current_task = task.clone();
        }
    }

    // Reconciliation after confirmed server responses

    pub fn board_added(&mut self, board: Board) {
        self.boards.push(board);
    }

    pub fn board_edited(&mut self, confirmed: &Board) {
        if let Some(board) = self.boards.iter_mut().find(|b| b.id == confirmed.id) {
            board.apply_edit(confirmed);
        }
        if self.current_board.id == confirmed.id {
            self.current_board.apply_edit(confirmed);
        }
    }

    pub fn board_deleted(&mut self, board_id: &str) {
        self.boards.retain(|b| b.id != board_id);
        self.current_board = Board::empty();
    }

    /// Replace everything with a fresh server copy. In-flight reorders are
    /// forgotten: their responses no longer describe the state on screen.
    pub fn columns_loaded(&mut self, mut columns: Vec<Column>) {
        columns.sort_by_key(|c| c.order);
        for column in &mut columns {
            column.sort_tasks();
        }
        self.pending.latest.clear();
        self.set_columns(columns);
    }

    pub fn column_added(&mut self, column: Column) {
        self.current_column = column.clone();
        self.columns.push(column);
    }

    pub fn column_edited(&mut self, confirmed: &Column) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.id == confirmed.id) {
            column.title = confirmed.title.clone();
            column.order = confirmed.order;
        }
        self.sync_selection();
    }

    /// Remove a column and renumber the rest densely. Returns true if any
    /// remaining column changed position.
    pub fn column_deleted(&mut self, column_id: &str) -> bool {
        self.columns.retain(|c| c.id != column_id);
        let changed = renumber(&mut self.columns);
        self.current_column = Column::empty();
        changed
    }

    pub fn task_added(&mut self, task: Task) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.id == task.column_id) {
            column.tasks.push(task.clone());
        }
        if self.current_column.id == task.column_id {
            self.current_column.tasks.push(task);
        }
    }

    pub fn task_replaced(&mut self, task: Task) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.id == task.column_id) {
            column.replace_task(task);
        }
        self.sync_selection();
    }

    /// Remove a task and renumber its siblings densely. Returns the owning
    /// column when any sibling changed position.
    pub fn task_deleted(&mut self, task: &Task) -> Option<Column> {
        let column = self.columns.iter_mut().find(|c| c.id == task.column_id)?;
        column.remove_task(&task.id);
        let changed = renumber(&mut column.tasks);
        let column = column.clone();

        if self.current_task.id == task.id {
            self.current_task = Task::empty();
        }
        self.sync_selection();

        changed.then_some(column)
    }

    // Pending reorders

    /// Record a dispatched reorder touching `keys`.
    pub fn begin_reorder(&mut self, keys: &[PendingKey]) -> Ticket {
        self.pending.begin(keys)
    }

    /// Mark a reorder as resolved. Returns true when no newer reorder (and
    /// no refetch) has touched any of its keys in the meantime.
    pub fn settle_reorder(&mut self, ticket: Ticket, keys: &[PendingKey]) -> bool {
        self.pending.settle(ticket, keys)
    }

    // Compensation for failed reorders

    /// Put columns back in the given id order. Columns not listed keep their
    /// relative order at the end.
    pub fn restore_column_order(&mut self, previous: &[ColumnId]) {
        let rank = |column: &Column| {
            previous
                .iter()
                .position(|id| *id == column.id)
                .unwrap_or(previous.len())
        };
        self.columns.sort_by_key(rank);
        renumber(&mut self.columns);
        self.sync_selection();
    }

    /// Put tasks of the snapshot's columns back where the snapshot had them.
    ///
    /// Current task bodies are kept. Tasks deleted since the snapshot stay
    /// deleted; tasks added since are appended to the column they are in now.
    pub fn restore_task_layout(&mut self, snapshot: &[Column]) {
        let current: Vec<Task> = self
            .columns
            .iter()
            .filter(|c| snapshot.iter().any(|s| s.id == c.id))
            .flat_map(|c| c.tasks.iter().cloned())
            .collect();
        let mut pool: HashMap<&str, &Task> =
            current.iter().map(|t| (t.id.as_str(), t)).collect();

        let mut layouts: HashMap<&str, Vec<Task>> = HashMap::new();
        for column in snapshot {
            let tasks = column
                .tasks
                .iter()
                .filter_map(|t| pool.remove(t.id.as_str()))
                .map(|t| {
                    let mut task = t.clone();
                    task.move_to_column(column.id.clone());
                    task
                })
                .collect();
            layouts.insert(column.id.as_str(), tasks);
        }

        for task in &current {
            if pool.remove(task.id.as_str()).is_some() {
                if let Some(tasks) = layouts.get_mut(task.column_id.as_str()) {
                    tasks.push(task.clone());
                }
            }
        }

        for column in &mut self.columns {
            if let Some(tasks) = layouts.remove(column.id.as_str()) {
                column.tasks = tasks;
                renumber(&mut column.tasks);
            }
        }
        self.sync_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, column_id: &str, order: i32) -> Task {
        Task {
            id: id.into(),
            column_id: column_id.into(),
            board_id: "b1".into(),
            title: id.into(),
            order,
            ..Task::default()
        }
    }

    fn column(id: &str, order: i32, tasks: &[&str]) -> Column {
        Column {
            id: id.into(),
            board_id: "b1".into(),
            title: id.into(),
            order,
            tasks: tasks
                .iter()
                .enumerate()
                .map(|(i, t)| task(t, id, i as i32))
                .collect(),
        }
    }

    fn task_ids(column: &Column) -> Vec<&str> {
        column.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn store() -> BoardStore {
        let mut store = BoardStore::new();
        store.set_columns(vec![
            column("c1", 0, &["t1", "t2"]),
            column("c2", 1, &["t3"]),
            column("c3", 2, &[]),
        ]);
        store
    }

    #[test]
    fn test_columns_loaded_sorts_columns_and_tasks() {
        let mut store = BoardStore::new();
        let mut second = column("c2", 1, &[]);
        second.tasks = vec![task("b", "c2", 1), task("a", "c2", 0)];
        store.columns_loaded(vec![second, column("c1", 0, &[])]);

        assert_eq!(store.columns()[0].id, "c1");
        assert_eq!(task_ids(&store.columns()[1]), vec!["a", "b"]);
    }

    #[test]
    fn test_set_columns_refreshes_selection() {
        let mut store = store();
        store.set_current_column(store.columns()[0].clone());
        store.set_current_task(store.columns()[0].tasks[1].clone());

        let mut columns = store.columns().to_vec();
        let mut moved = columns[0].tasks.remove(1);
        moved.column_id = "c2".into();
        columns[1].tasks.insert(0, moved);
        store.set_columns(columns);

        assert_eq!(task_ids(store.current_column()), vec!["t1"]);
        assert_eq!(store.current_task().column_id, "c2");
    }

    #[test]
    fn test_column_added_becomes_current() {
        let mut store = store();
        store.column_added(column("c4", 3, &[]));

        assert_eq!(store.columns().len(), 4);
        assert_eq!(store.current_column().id, "c4");
    }

    #[test]
    fn test_column_deleted_renumbers() {
        let mut store = store();
        store.set_current_column(store.columns()[0].clone());

        assert!(store.column_deleted("c1"));
        let orders: Vec<_> = store.columns().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert!(!store.current_column().is_selected());

        assert!(!store.column_deleted("c3"));
    }

    #[test]
    fn test_task_added_updates_column_and_current() {
        let mut store = store();
        store.set_current_column(store.columns()[1].clone());
        store.task_added(task("t4", "c2", 1));

        assert_eq!(task_ids(&store.columns()[1]), vec!["t3", "t4"]);
        assert_eq!(task_ids(store.current_column()), vec!["t3", "t4"]);
    }

    #[test]
    fn test_task_deleted_renumbers_siblings() {
        let mut store = store();
        store.set_current_task(store.columns()[0].tasks[0].clone());

        let first = store.columns()[0].tasks[0].clone();
        let column = store.task_deleted(&first).unwrap();
        assert_eq!(task_ids(&column), vec!["t2"]);
        assert_eq!(column.tasks[0].order, 0);
        assert!(!store.current_task().is_selected());

        let last = store.columns()[1].tasks[0].clone();
        assert!(store.task_deleted(&last).is_none());
        assert!(store.columns()[1].tasks.is_empty());
    }

    #[test]
    fn test_task_replaced() {
        let mut store = store();
        let mut edited = store.columns()[1].tasks[0].clone();
        edited.is_done = true;
        store.task_replaced(edited);

        assert!(store.columns()[1].tasks[0].is_done);
    }

    #[test]
    fn test_board_reconciliation() {
        let mut store = BoardStore::new();
        let board = Board {
            id: "b1".into(),
            title: "Old".into(),
            owner: "u1".into(),
            ..Board::default()
        };
        store.board_added(board.clone());
        store.set_current_board(board.clone());

        let confirmed = Board {
            title: "New".into(),
            ..board
        };
        store.board_edited(&confirmed);
        assert_eq!(store.boards()[0].title, "New");
        assert_eq!(store.current_board().title, "New");

        store.board_deleted("b1");
        assert!(store.boards().is_empty());
        assert!(!store.current_board().is_selected());
    }

    #[test]
    fn test_pending_log_tracks_latest_ticket() {
        let mut store = store();
        let key = PendingKey::TaskLayout("c1".into());

        let first = store.begin_reorder(&[key.clone()]);
        let second = store.begin_reorder(&[key.clone()]);
        assert!(store.is_pending(&key));

        assert!(!store.settle_reorder(first, &[key.clone()]));
        assert!(store.is_pending(&key));
        assert!(store.settle_reorder(second, &[key.clone()]));
        assert!(!store.is_pending(&key));
    }

    #[test]
    fn test_refetch_forgets_pending() {
        let mut store = store();
        let key = PendingKey::ColumnOrder("b1".into());
        let ticket = store.begin_reorder(&[key.clone()]);

        store.columns_loaded(vec![column("c1", 0, &[])]);
        assert_eq!(store.pending_count(), 0);
        assert!(!store.settle_reorder(ticket, &[key]));
    }

    #[test]
    fn test_restore_column_order() {
        let mut store = store();
        let previous: Vec<ColumnId> = store.columns().iter().map(|c| c.id.clone()).collect();

        let mut columns = store.columns().to_vec();
        columns.rotate_left(1);
        store.set_columns(columns);
        store.column_added(column("c4", 3, &[]));

        store.restore_column_order(&previous);
        let ids: Vec<_> = store.columns().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3", "c4"]);
        let orders: Vec<_> = store.columns().iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restore_task_layout_keeps_later_changes() {
        let mut store = store();
        let snapshot = vec![store.columns()[0].clone(), store.columns()[1].clone()];

        // t1 moved to c2, then t2 edited, t3 deleted and t5 added in c1
        let mut columns = store.columns().to_vec();
        let mut moved = columns[0].tasks.remove(0);
        moved.column_id = "c2".into();
        columns[1].tasks.insert(0, moved);
        columns[0].tasks[0].title = "edited".into();
        columns[1].tasks.retain(|t| t.id != "t3");
        columns[0].tasks.push(task("t5", "c1", 9));
        store.set_columns(columns);

        store.restore_task_layout(&snapshot);

        let c1 = store.column("c1").unwrap();
        assert_eq!(task_ids(c1), vec!["t1", "t2", "t5"]);
        assert!(c1.tasks.iter().all(|t| t.column_id == "c1"));
        assert_eq!(c1.tasks[1].title, "edited");
        let orders: Vec<_> = c1.tasks.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(store.column("c2").unwrap().tasks.is_empty());
    }
}
