use crate::cli::ColumnAction;
use crate::context::CliContext;
use kanban_client::{DragKind, DragLocation, DropResult};
use kanban_domain::ColumnDraft;

pub async fn handle(ctx: &mut CliContext, action: ColumnAction) -> anyhow::Result<()> {
    match action {
        ColumnAction::List { board_id } => {
            ctx.open_board(&board_id).await?;
            ctx.respond_list(ctx.session.store().columns().to_vec())?;
        }
        ColumnAction::Add { board_id, title } => {
            ctx.open_board(&board_id).await?;
            let column = ctx
                .session
                .add_column(ColumnDraft { title, order: 0 })
                .await?;
            ctx.respond(&column)?;
        }
        ColumnAction::Rename {
            board_id,
            id,
            title,
        } => {
            ctx.open_board(&board_id).await?;
            ctx.session.select_column(&id)?;
            let column = ctx
                .session
                .edit_column(ColumnDraft { title, order: 0 })
                .await?;
            ctx.respond(&column)?;
        }
        ColumnAction::Move { board_id, from, to } => {
            ctx.open_board(&board_id).await?;
            let count = ctx.session.store().columns().len();
            if from >= count || to >= count {
                anyhow::bail!(
                    "Column position out of range: board has {} columns",
                    count
                );
            }

            ctx.session
                .drag_start(DragKind::Column, DragLocation::new(board_id.as_str(), from));
            ctx.session
                .drop_and_sync(DropResult {
                    kind: DragKind::Column,
                    source: DragLocation::new(board_id.as_str(), from),
                    destination: Some(DragLocation::new(board_id.as_str(), to)),
                })
                .await?;
            ctx.respond_list(ctx.session.store().columns().to_vec())?;
        }
        ColumnAction::Delete { board_id, id } => {
            ctx.open_board(&board_id).await?;
            ctx.session.select_column(&id)?;
            ctx.session.delete_column().await?;
            ctx.respond(serde_json::json!({"deleted": id}))?;
        }
    }
    Ok(())
}
