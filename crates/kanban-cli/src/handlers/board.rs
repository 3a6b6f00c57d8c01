use crate::cli::BoardAction;
use crate::context::{BoardView, CliContext};
use kanban_domain::BoardDraft;

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::List => {
            ctx.session.fetch_boards().await?;
            ctx.respond_list(ctx.session.store().boards().to_vec())?;
        }
        BoardAction::Get { id } => {
            ctx.open_board(&id).await?;
            let store = ctx.session.store();
            ctx.respond(BoardView {
                board: store.current_board(),
                columns: store.columns(),
            })?;
        }
        BoardAction::Create { title, owner } => {
            let board = ctx
                .session
                .add_board(BoardDraft {
                    title,
                    owner,
                    ..BoardDraft::default()
                })
                .await?;
            ctx.respond(&board)?;
        }
        BoardAction::Update { id, title, owner } => {
            select(ctx, &id).await?;
            let current = ctx.session.store().current_board();
            let draft = BoardDraft {
                title: title.unwrap_or_else(|| current.title.clone()),
                owner: owner.unwrap_or_else(|| current.owner.clone()),
                ..BoardDraft::default()
            };
            let board = ctx.session.edit_board(draft).await?;
            ctx.respond(&board)?;
        }
        BoardAction::Delete { id } => {
            select(ctx, &id).await?;
            ctx.session.delete_board().await?;
            ctx.respond(serde_json::json!({"deleted": id}))?;
        }
    }
    Ok(())
}

async fn select(ctx: &mut CliContext, board_id: &str) -> anyhow::Result<()> {
    ctx.session.fetch_boards().await?;
    ctx.session.select_board(board_id)?;
    Ok(())
}
