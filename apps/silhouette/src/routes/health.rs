use actix_web::{web, HttpResponse};
use migration::count_applied_migrations;
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    migrations: Option<usize>,
    time: String,
}

/// Unauthenticated liveness probe; 503 when the database does not answer.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let db = &app_state.db;
    let ping = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT 1 AS health_check".to_string(),
        ))
        .await;

    match ping {
        Ok(_) => {
            let migrations = count_applied_migrations(db).await.ok();
            Ok(HttpResponse::Ok().json(HealthResponse {
                status: "ok",
                app_version: env!("CARGO_PKG_VERSION"),
                db: "ok",
                migrations,
                time,
            }))
        }
        Err(e) => {
            warn!(error = %e, "Health check database ping failed");
            Ok(HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: "degraded",
                app_version: env!("CARGO_PKG_VERSION"),
                db: "error",
                migrations: None,
                time,
            }))
        }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
