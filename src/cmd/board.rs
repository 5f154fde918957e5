use std::io;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::ui::{BoardState, Ui};
use crate::workflow::load::load_board;

/// Opens the interactive board. The fetch starts immediately and the screen shows a loading
/// placeholder until it lands.
pub async fn run(ctx: &AppContext) -> AppResult<()> {
    let (sender, receiver) = oneshot::channel();
    let source = Arc::clone(&ctx.ticket_source);
    tokio::spawn(async move {
        let snapshot = load_board(source.as_ref()).await;
        let _ = sender.send(snapshot);
    });

    let state = BoardState::new(ctx.config.grouping, ctx.config.ordering);
    tracing::info!(
        grouping = ctx.config.grouping.as_str(),
        ordering = ctx.config.ordering.as_str(),
        "opening board"
    );

    tokio::task::spawn_blocking(move || -> io::Result<()> {
        let mut ui = Ui::init()?;
        ui.run(state, receiver)
    })
    .await
    .map_err(|err| AppError::Terminal(format!("board task failed: {err}")))?
    .map_err(|err| AppError::Terminal(err.to_string()))
}
