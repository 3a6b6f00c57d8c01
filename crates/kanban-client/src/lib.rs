pub mod actions;
pub mod drag;
pub mod notification;
pub mod session;
pub mod store;

pub use actions::{Action, EntityKind, OperationKind, Outcome};
pub use drag::{
    DragDropController, DragKind, DragLocation, DropOutcome, DropResult, GestureState,
    ReorderPayload, ReorderRequest, ReorderResponse,
};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use session::BoardSession;
pub use store::{BoardStore, PendingKey, Ticket};
