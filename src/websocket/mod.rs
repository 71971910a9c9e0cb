mod routes;
mod ws_handler;

pub use routes::websocket_routes;
pub use ws_handler::ws_handler;

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Best-effort event publication. Dropped when nobody is listening; never
/// blocks and never fails the caller's request.
pub fn publish_event(tx: &Arc<Mutex<broadcast::Sender<String>>>, event: serde_json::Value) {
    let tx = tx.lock().unwrap().clone();
    let _ = tx.send(event.to_string());
}
