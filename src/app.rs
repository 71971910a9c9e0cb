use axum::{middleware, routing::get, Json, Router};
use serde_json::json;

use crate::{
    app_state::AppState,
    middleware::tracing::observability_middleware,
    modules::{
        admissions::admission_routes, catalog::catalog_routes, institutes::institute_routes,
        students::student_routes,
    },
    websocket::websocket_routes,
};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(student_routes())
        .merge(institute_routes())
        .merge(catalog_routes())
        .merge(admission_routes());

    let uploads_dir = state.env.app.uploads_dir.to_string();

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .merge(websocket_routes())
        .nest("/api", api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(uploads_dir),
        )
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Admissions Backend says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
