pub mod board;
pub mod column;
pub mod order;
pub mod task;

pub use board::{Board, BoardDraft, BoardId, UserId};
pub use column::{Column, ColumnDraft, ColumnId};
pub use order::{
    combine_columns, new_set_columns_order, new_set_tasks_order, renumber, reorder_column,
    reorder_task, ColumnsSet, Ordered, TasksSet,
};
pub use task::{Task, TaskDraft, TaskId, TaskUpdate};
