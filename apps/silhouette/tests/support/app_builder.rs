use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use silhouette::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use silhouette::routes;
use silhouette::state::app_state::AppState;

/// The production app: same middleware order and the same gated scopes.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let data = web::Data::new(state);
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data)
            .configure(routes::configure),
    )
    .await
}
