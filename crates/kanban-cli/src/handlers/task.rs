use crate::cli::{TaskAction, TaskEditArgs, TaskMoveArgs, TaskRef};
use crate::context::CliContext;
use kanban_client::{DragKind, DragLocation, DropResult};
use kanban_domain::{TaskDraft, TaskUpdate};

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::List { board_id } => {
            ctx.open_board(&board_id).await?;
            let tasks = ctx.session.fetch_tasks_by_board().await?;
            ctx.respond_list(tasks)?;
        }
        TaskAction::Add {
            board_id,
            column_id,
            title,
            description,
        } => {
            ctx.open_board(&board_id).await?;
            ctx.session.select_column(&column_id)?;
            let draft = TaskDraft {
                title,
                description: description.unwrap_or_default(),
                ..TaskDraft::default()
            };
            let task = ctx.session.add_task(draft).await?;
            ctx.respond(&task)?;
        }
        TaskAction::Edit(args) => handle_edit(ctx, args).await?,
        TaskAction::Move(args) => handle_move(ctx, args).await?,
        TaskAction::Done(task) => {
            select(ctx, &task).await?;
            let task = ctx.session.set_task_done().await?;
            ctx.respond(&task)?;
        }
        TaskAction::Undone(task) => {
            select(ctx, &task).await?;
            let task = ctx.session.set_task_not_done().await?;
            ctx.respond(&task)?;
        }
        TaskAction::Delete(task) => {
            select(ctx, &task).await?;
            ctx.session.delete_task().await?;
            ctx.respond(serde_json::json!({"deleted": task.id}))?;
        }
    }
    Ok(())
}

async fn select(ctx: &mut CliContext, task: &TaskRef) -> anyhow::Result<()> {
    ctx.open_board(&task.board_id).await?;
    ctx.session.select_task(&task.column_id, &task.id)?;
    Ok(())
}

async fn handle_edit(ctx: &mut CliContext, args: TaskEditArgs) -> anyhow::Result<()> {
    select(ctx, &args.task).await?;
    let update = TaskUpdate {
        title: args.title.unwrap_or_default(),
        description: args.description.unwrap_or_default(),
        is_done: false,
    };
    let task = ctx.session.edit_task(update).await?;
    ctx.respond(&task)
}

async fn handle_move(ctx: &mut CliContext, args: TaskMoveArgs) -> anyhow::Result<()> {
    ctx.open_board(&args.board_id).await?;

    let store = ctx.session.store();
    let source_len = store
        .column(&args.from_column)
        .map(|c| c.tasks.len())
        .ok_or_else(|| anyhow::anyhow!("Column not found: {}", args.from_column))?;
    let destination_len = store
        .column(&args.to_column)
        .map(|c| c.tasks.len())
        .ok_or_else(|| anyhow::anyhow!("Column not found: {}", args.to_column))?;

    // Moving into another column may append past its last task.
    let slots = if args.from_column == args.to_column {
        destination_len
    } else {
        destination_len + 1
    };
    if args.from_index >= source_len || args.to_index >= slots {
        anyhow::bail!("Task position out of range");
    }

    let source = DragLocation::new(args.from_column.as_str(), args.from_index);
    ctx.session.drag_start(DragKind::Task, source.clone());
    ctx.session
        .drop_and_sync(DropResult {
            kind: DragKind::Task,
            source,
            destination: Some(DragLocation::new(args.to_column.as_str(), args.to_index)),
        })
        .await?;

    let store = ctx.session.store();
    let columns: Vec<_> = store
        .columns()
        .iter()
        .filter(|c| c.id == args.from_column || c.id == args.to_column)
        .cloned()
        .collect();
    ctx.respond_list(columns)
}
