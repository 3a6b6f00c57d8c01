use std::fmt;

/// What an action operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Board,
    Column,
    Task,
}

/// What an action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fetch,
    Add,
    Edit,
    Delete,
    Done,
    NotDone,
    Reorder,
}

/// Lifecycle stage of an asynchronous action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action {
    pub entity: EntityKind,
    pub operation: OperationKind,
}

impl Action {
    pub const fn new(entity: EntityKind, operation: OperationKind) -> Self {
        Self { entity, operation }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Board => "board",
            EntityKind::Column => "column",
            EntityKind::Task => "task",
        };
        f.write_str(name)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Fetch => "fetch",
            OperationKind::Add => "add",
            OperationKind::Edit => "edit",
            OperationKind::Delete => "delete",
            OperationKind::Done => "done",
            OperationKind::NotDone => "not-done",
            OperationKind::Reorder => "reorder",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.operation)
    }
}
