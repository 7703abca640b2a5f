use actix_web::{web, HttpResponse};

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::extractors::{CallCancel, ValidatedJson};
use crate::protocol::messages::{CreateProfileRequest, GetProfileRequest, UpdateProfileRequest};
use crate::services::profiles;
use crate::state::app_state::AppState;

async fn create_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<CreateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile =
        profiles::create_profile(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(profile))
}

async fn get_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<GetProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile =
        profiles::get_profile(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(profile))
}

async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthContext,
    cancel: CallCancel,
    body: ValidatedJson<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile =
        profiles::update_profile(&state.db, &state.crypto, &cancel, &auth, body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/CreateProfile", web::post().to(create_profile))
        .route("/GetProfile", web::post().to(get_profile))
        .route("/UpdateProfile", web::post().to(update_profile));
}
