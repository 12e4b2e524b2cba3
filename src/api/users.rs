use actix_web::{http::StatusCode, web, HttpResponse};

use super::reply::{failure, reply};
use crate::middleware::AuthMiddleware;
use crate::models::{
    parse_limit, AdminUserItem, ContactRequest, EngineerCardDto, FavouriteRequest, FavouritesQuery, ListParams, MonthlyFeedback,
    PasswordResetRequest, SignupAdminRequest, SignupUserRequest, SubmitUserFeedbackRequest, UserProfileDto,
};
use crate::services::{user_service, FirebaseClaims};
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(
                web::resource("/user-feedback")
                    .wrap(AuthMiddleware::admin())
                    .route(web::get().to(all_user_feedback)),
            )
            .route("/forget-password", web::post().to(forget_password))
            .route("/signup", web::post().to(signup))
            .service(
                web::resource("/signup/admin")
                    .wrap(AuthMiddleware::admin())
                    .route(web::post().to(signup_admin)),
            )
            .service(
                web::resource("/admin/get-all-users")
                    .wrap(AuthMiddleware::admin())
                    .route(web::get().to(admin_get_all_users)),
            )
            .route("/submit-user-feedback", web::post().to(submit_user_feedback))
            .service(
                web::resource("/contact")
                    .wrap(AuthMiddleware::authenticated())
                    .route(web::post().to(contact)),
            )
            .service(
                web::resource("/addFavourite")
                    .wrap(AuthMiddleware::authenticated())
                    .route(web::post().to(add_favourite)),
            )
            .service(
                web::resource("/deleteFavourite")
                    .wrap(AuthMiddleware::authenticated())
                    .route(web::post().to(delete_favourite)),
            )
            .service(
                web::resource("/favourites/{id}")
                    .wrap(AuthMiddleware::authenticated())
                    .route(web::get().to(favourites)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(user_details))
                    .route(web::delete().to(delete_user).wrap(AuthMiddleware::admin())),
            ),
    );
}

#[utoipa::path(
    get,
    path = "/users/user-feedback",
    tag = "Users",
    responses((status = 200, description = "Site feedback grouped by month", body = [MonthlyFeedback])),
    security(("bearer_auth" = []))
)]
pub async fn all_user_feedback(state: web::Data<AppState>) -> HttpResponse {
    log::info!("💬 GET /users/user-feedback");

    match user_service::all_user_feedback(&state).await {
        Ok(feedback) => reply(StatusCode::OK, "Successful retrieval of user feedback").json(feedback),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/forget-password",
    tag = "Users",
    request_body = PasswordResetRequest,
    responses(
        (status = 201, description = "Reset link in the body", body = String),
        (status = 404, description = "User not found")
    )
)]
pub async fn forget_password(state: web::Data<AppState>, body: web::Json<PasswordResetRequest>) -> HttpResponse {
    log::info!("🔑 POST /users/forget-password");

    match user_service::password_reset_link(&state, &body.email).await {
        Ok(link) => reply(StatusCode::CREATED, "Password reset link generated successfully").body(link),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Users",
    request_body = SignupUserRequest,
    responses(
        (status = 201, description = "User added successfully"),
        (status = 500, description = "Not a Role")
    )
)]
pub async fn signup(state: web::Data<AppState>, body: web::Json<SignupUserRequest>) -> HttpResponse {
    log::info!("📝 POST /users/signup - uid: {}", body.uid);

    match user_service::signup(&state, body.into_inner()).await {
        Ok(()) => reply(StatusCode::CREATED, "User added successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/signup/admin",
    tag = "Users",
    request_body = SignupAdminRequest,
    responses((status = 201, description = "Admin added successfully")),
    security(("bearer_auth" = []))
)]
pub async fn signup_admin(state: web::Data<AppState>, body: web::Json<SignupAdminRequest>) -> HttpResponse {
    log::info!("🛡️  POST /users/signup/admin");

    match user_service::signup_admin(&state, body.into_inner()).await {
        Ok(_) => reply(StatusCode::CREATED, "Admin added successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/users/admin/get-all-users",
    tag = "Users",
    params(ListParams),
    responses(
        (status = 200, description = "Users, total in the count header", body = [AdminUserItem]),
        (status = 400, description = "Invalid orderBy or startAfter parameter")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_get_all_users(state: web::Data<AppState>, query: web::Query<ListParams>) -> HttpResponse {
    log::info!("📋 GET /users/admin/get-all-users - {:?}", query.0);

    match user_service::admin_list(&state, &query).await {
        Ok((users, count)) => reply(StatusCode::OK, "Success")
            .insert_header(("count", count.to_string()))
            .json(users),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/submit-user-feedback",
    tag = "Users",
    request_body = SubmitUserFeedbackRequest,
    responses(
        (status = 201, description = "User feedback added successfully"),
        (status = 400, description = "Required fields missing")
    )
)]
pub async fn submit_user_feedback(
    state: web::Data<AppState>,
    body: web::Json<SubmitUserFeedbackRequest>,
) -> HttpResponse {
    log::info!("💬 POST /users/submit-user-feedback");

    match user_service::create_user_feedback(&state, body.into_inner()).await {
        Ok(()) => reply(StatusCode::CREATED, "User feedback added successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/contact",
    tag = "Users",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Email sent successfully."),
        (status = 400, description = "Required fields missing"),
        (status = 500, description = "Email not successful")
    ),
    security(("bearer_auth" = []))
)]
pub async fn contact(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    body: web::Json<ContactRequest>,
) -> HttpResponse {
    log::info!("✉️  POST /users/contact - {} -> {}", claims.uid(), body.email);

    match user_service::contact_engineer(&state, body.into_inner()).await {
        Ok(()) => reply(StatusCode::OK, "Email sent successfully.").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/addFavourite",
    tag = "Users",
    request_body = FavouriteRequest,
    responses(
        (status = 201, description = "Engineer added to favourites successfully"),
        (status = 404, description = "Engineer or favourites not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favourite(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    body: web::Json<FavouriteRequest>,
) -> HttpResponse {
    log::info!("⭐ POST /users/addFavourite - {} -> {}", claims.uid(), body.engineer_id);

    match user_service::add_favourite(&state, claims.uid(), &body.engineer_id).await {
        Ok(()) => reply(StatusCode::CREATED, "Engineer added to favourites successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/users/deleteFavourite",
    tag = "Users",
    request_body = FavouriteRequest,
    responses(
        (status = 201, description = "Engineer deleted from favourites successfully"),
        (status = 404, description = "Engineer or favourites not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_favourite(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    body: web::Json<FavouriteRequest>,
) -> HttpResponse {
    log::info!("⭐ POST /users/deleteFavourite - {} -> {}", claims.uid(), body.engineer_id);

    match user_service::delete_favourite(&state, claims.uid(), &body.engineer_id).await {
        Ok(()) => reply(StatusCode::CREATED, "Engineer deleted from favourites successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/users/favourites/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User uid, must be the caller"),
        FavouritesQuery
    ),
    responses(
        (status = 200, description = "Favourite engineers, total in the count header", body = [EngineerCardDto]),
        (status = 403, description = "Not the caller's favourites")
    ),
    security(("bearer_auth" = []))
)]
pub async fn favourites(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    path: web::Path<String>,
    query: web::Query<FavouritesQuery>,
) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("⭐ GET /users/favourites/{}", uid);

    if uid != claims.uid() {
        return reply(StatusCode::FORBIDDEN, "Provided UID does not match the token").finish();
    }

    let limit = query.limit.as_deref().and_then(parse_limit);
    match user_service::favourites(&state, &uid, query.start_after.as_deref(), limit).await {
        Ok((engineers, total)) => reply(StatusCode::OK, "Successful retrieval of favourite engineers")
            .insert_header(("count", total.to_string()))
            .json(engineers),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User uid")),
    responses(
        (status = 200, description = "User profile", body = UserProfileDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn user_details(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("🔍 GET /users/{}", uid);

    match user_service::details(&state, &uid).await {
        Ok(user) => reply(StatusCode::OK, "Successful retrieval of user details").json(user),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User uid")),
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User does not exist")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("🗑️  DELETE /users/{}", uid);

    match user_service::delete(&state, &uid).await {
        Ok(()) => reply(StatusCode::OK, "User deleted successfully").finish(),
        Err(e) => failure(&e),
    }
}
