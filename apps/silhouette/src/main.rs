use actix_web::{web, App, HttpServer};
use silhouette::config::db::DbSettings;
use silhouette::config::server::ServerConfig;
use silhouette::infra::state::build_state;
use silhouette::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use silhouette::routes;
use silhouette::state::security_config::SecurityConfig;
use silhouette::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Everything comes from the process environment; nothing is read from disk.
    let server = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("❌ {e}");
        std::process::exit(1);
    });

    let security = match SecurityConfig::from_env() {
        Ok(security) => security,
        Err(e) => {
            eprintln!("❌ Failed to load key material: {e}");
            std::process::exit(1);
        }
    };

    let db_settings = match DbSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state(security).with_db(db_settings).build().await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %server.host, port = server.port, "silhouette listening");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(server.bind_addr())?
    .run()
    .await
}
