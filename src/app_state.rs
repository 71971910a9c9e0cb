use sqlx::PgPool;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

use crate::clock::Clock;
use crate::config;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub events: Arc<Mutex<broadcast::Sender<String>>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        db: PgPool,
        env: config::Config,
        events: Arc<Mutex<broadcast::Sender<String>>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            env,
            events,
            clock,
        }
    }
}
