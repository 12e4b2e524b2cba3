// Mounted only when ENABLE_TESTING_ROUTES is set
use actix_web::{http::StatusCode, web, HttpResponse};

use super::reply::{failure, reply};
use crate::models::{ChangeClaimRequest, UserIdRequest};
use crate::services::testing_service;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/testing")
            .route("/usertoken/{id}", web::get().to(user_token))
            .route("/changeuserclaim", web::post().to(change_user_claim))
            .route("/testingclientemail", web::post().to(testing_client_email)),
    );
}

#[utoipa::path(
    get,
    path = "/testing/usertoken/{id}",
    tag = "Testing",
    params(("id" = String, Path, description = "User uid")),
    responses((status = 200, description = "Custom token in the body", body = String))
)]
pub async fn user_token(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("🧪 GET /testing/usertoken/{}", uid);

    match testing_service::user_token(&state, &uid).await {
        Ok(token) => reply(StatusCode::OK, "User token retrieved successfully").body(token),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/testing/changeuserclaim",
    tag = "Testing",
    request_body = ChangeClaimRequest,
    responses((status = 200, description = "User claim changed successfully"))
)]
pub async fn change_user_claim(state: web::Data<AppState>, body: web::Json<ChangeClaimRequest>) -> HttpResponse {
    log::info!("🧪 POST /testing/changeuserclaim - {} -> {}", body.id, body.user_type);

    match testing_service::change_user_claim(&state, &body.id, &body.user_type).await {
        Ok(()) => reply(StatusCode::OK, "User claim changed successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/testing/testingclientemail",
    tag = "Testing",
    request_body = UserIdRequest,
    responses(
        (status = 200, description = "Email sent"),
        (status = 500, description = "User does not have an email")
    )
)]
pub async fn testing_client_email(state: web::Data<AppState>, body: web::Json<UserIdRequest>) -> HttpResponse {
    log::info!("🧪 POST /testing/testingclientemail - {}", body.id);

    match testing_service::send_reset_email(&state, &body.id).await {
        Ok(()) => reply(StatusCode::OK, "Email sent").finish(),
        Err(e) => failure(&e),
    }
}
