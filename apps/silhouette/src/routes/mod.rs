use actix_web::web;

use crate::middleware::AuthGate;

pub mod addresses;
pub mod health;
pub mod phones;
pub mod profiles;

/// Registers `/health` plus one gated scope per rpc service. The scope
/// path and route together form the full method name.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes);

    cfg.service(
        web::scope("/silhouette.v1.Profiles")
            .wrap(AuthGate)
            .configure(profiles::configure_routes),
    );
    cfg.service(
        web::scope("/silhouette.v1.Addresses")
            .wrap(AuthGate)
            .configure(addresses::configure_routes),
    );
    cfg.service(
        web::scope("/silhouette.v1.Phones")
            .wrap(AuthGate)
            .configure(phones::configure_routes),
    );
}
