use actix_web::{web, HttpResponse};

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::extractors::{CallCancel, ValidatedJson};
use crate::protocol::messages::{AddressLookupRequest, CreateAddressRequest, UpdateAddressRequest};
use crate::services::addresses;
use crate::state::app_state::AppState;

async fn create_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<CreateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    let address =
        addresses::create_address(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(address))
}

async fn get_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<AddressLookupRequest>,
) -> Result<HttpResponse, AppError> {
    let address =
        addresses::get_address(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(address))
}

async fn update_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<UpdateAddressRequest>,
) -> Result<HttpResponse, AppError> {
    let address =
        addresses::update_address(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(address))
}

async fn delete_address(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<AddressLookupRequest>,
) -> Result<HttpResponse, AppError> {
    addresses::delete_address(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/CreateAddress", web::post().to(create_address))
        .route("/GetAddress", web::post().to(get_address))
        .route("/UpdateAddress", web::post().to(update_address))
        .route("/DeleteAddress", web::post().to(delete_address));
}
