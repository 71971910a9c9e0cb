use axum::{routing::get, Router};

use super::ws_handler;
use crate::app_state::AppState;

pub fn websocket_routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}
