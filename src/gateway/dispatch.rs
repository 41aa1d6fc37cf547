//! Runs effects against a gateway.
//!
//! Each fetch effect becomes exactly one completion action carrying the
//! effect's ticket, so the reducer can tell whether the result is still
//! wanted. Failures are flattened to their display message here; no
//! `GatewayError` crosses into the core.

use std::sync::Arc;
use std::sync::mpsc;

use log::{debug, warn};

use crate::core::action::{Action, Effect};
use crate::gateway::ResourceGateway;

/// Performs one effect and returns the action that reports its outcome.
/// `Effect::Quit` has no outcome.
pub async fn perform(effect: Effect, gateway: &dyn ResourceGateway) -> Option<Action> {
    match effect {
        Effect::FetchBooks(ticket) => {
            let result = gateway.list_books().await.map_err(|e| e.to_string());
            Some(Action::BooksFetched { ticket, result })
        }
        Effect::FetchPages(ticket) => {
            let result = gateway
                .list_pages(&ticket.key)
                .await
                .map_err(|e| e.to_string());
            Some(Action::PagesFetched { ticket, result })
        }
        Effect::FetchContent(ticket) => {
            let result = gateway
                .get_page_content(&ticket.key.book_id, &ticket.key.page_number)
                .await
                .map_err(|e| e.to_string());
            Some(Action::ContentFetched { ticket, result })
        }
        Effect::LoadImage(path) => {
            let result = gateway
                .load_asset(&path)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string());
            Some(Action::ImageSettled { path, result })
        }
        Effect::Quit => None,
    }
}

/// Spawns an effect on the tokio runtime; its outcome is sent to `tx`.
pub fn spawn_effect(
    effect: Effect,
    gateway: Arc<dyn ResourceGateway>,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    debug!("Spawning effect on {}: {:?}", gateway.name(), effect);
    let handle = tokio::spawn(async move {
        if let Some(action) = perform(effect, gateway.as_ref()).await
            && tx.send(action).is_err()
        {
            warn!("Failed to deliver fetch result: receiver dropped");
        }
    });
    handle.abort_handle()
}
