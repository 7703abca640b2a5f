use actix_web::{web, HttpResponse};

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::extractors::{CallCancel, ValidatedJson};
use crate::protocol::messages::{CreatePhoneRequest, PhoneLookupRequest, UpdatePhoneRequest};
use crate::services::phones;
use crate::state::app_state::AppState;

async fn create_phone(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<CreatePhoneRequest>,
) -> Result<HttpResponse, AppError> {
    let phone =
        phones::create_phone(&state.db, &state.crypto, &cancel, &auth, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(phone))
}

async fn get_phone(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<PhoneLookupRequest>,
) -> Result<HttpResponse, AppError> {
    let phone =
        phones::get_phone(&state.db, &state.crypto, &cancel, &auth, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(phone))
}

async fn update_phone(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<UpdatePhoneRequest>,
) -> Result<HttpResponse, AppError> {
    let phone =
        phones::update_phone(&state.db, &state.crypto, &cancel, &auth, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(phone))
}

async fn delete_phone(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<PhoneLookupRequest>,
) -> Result<HttpResponse, AppError> {
    phones::delete_phone(&state.db, &state.crypto, &cancel, &auth, body.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/CreatePhone", web::post().to(create_phone))
        .route("/GetPhone", web::post().to(get_phone))
        .route("/UpdatePhone", web::post().to(update_phone))
        .route("/DeletePhone", web::post().to(delete_phone));
}
