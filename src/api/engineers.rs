use actix_web::{http::StatusCode, web, HttpResponse};

use super::reply::{failure, reply};
use crate::middleware::AuthMiddleware;
use crate::models::{
    AdminEngineerItem, EngineerDto, EngineerProfileUpdate, FeedbackQuery, ListParams, ReviewFeedback,
    ReviewRequest, SignupEngineerRequest,
};
use crate::services::{engineer_service, FirebaseClaims};
use crate::state::AppState;

const UID_MISMATCH: &str = "Provided UID does not match the token";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/engineers")
            .service(
                web::resource("/review")
                    .wrap(AuthMiddleware::admin())
                    .route(web::get().to(engineers_to_review)),
            )
            .service(
                web::resource("/review-engineer-feedback")
                    .wrap(AuthMiddleware::admin())
                    .route(web::post().to(review_engineer)),
            )
            .route("/signup", web::post().to(signup))
            .service(
                web::resource("/feedback")
                    .wrap(AuthMiddleware::engineer())
                    .route(web::get().to(get_feedback)),
            )
            .service(
                web::resource("/admin/get-all-engineers")
                    .wrap(AuthMiddleware::admin())
                    .route(web::get().to(admin_get_all_engineers)),
            )
            .service(
                web::resource("/edit/{id}")
                    .wrap(AuthMiddleware::engineer())
                    .route(web::put().to(update_engineer)),
            )
            .service(
                web::resource("/resubmit/{id}")
                    .wrap(AuthMiddleware::engineer())
                    .route(web::put().to(resubmit_engineer)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_engineer))
                    .route(web::delete().to(delete_engineer).wrap(AuthMiddleware::admin())),
            ),
    );
}

#[utoipa::path(
    get,
    path = "/engineers/review",
    tag = "Engineers",
    responses(
        (status = 200, description = "Profiles waiting for review", body = [EngineerDto]),
        (status = 401, description = "Not an admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn engineers_to_review(state: web::Data<AppState>) -> HttpResponse {
    log::info!("📋 GET /engineers/review");

    match engineer_service::engineers_to_review(&state).await {
        Ok(engineers) => reply(StatusCode::OK, "Success").json(engineers),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/engineers/review-engineer-feedback",
    tag = "Engineers",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Feedback posted successfully"),
        (status = 404, description = "Engineer with the requested UID does not exist")
    ),
    security(("bearer_auth" = []))
)]
pub async fn review_engineer(state: web::Data<AppState>, body: web::Json<ReviewRequest>) -> HttpResponse {
    log::info!("📝 POST /engineers/review-engineer-feedback - uid: {}", body.uid);

    match engineer_service::review(&state, body.into_inner()).await {
        Ok(()) => reply(StatusCode::CREATED, "Feedback posted successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    post,
    path = "/engineers/signup",
    tag = "Engineers",
    request_body = SignupEngineerRequest,
    responses(
        (status = 201, description = "Engineer signed up successfully"),
        (status = 500, description = "Invalid event or unknown topic")
    )
)]
pub async fn signup(state: web::Data<AppState>, body: web::Json<SignupEngineerRequest>) -> HttpResponse {
    log::info!("📝 POST /engineers/signup - uid: {}", body.uid);

    match engineer_service::signup(&state, body.into_inner()).await {
        Ok(()) => reply(StatusCode::CREATED, "Engineer signed up successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/engineers/feedback",
    tag = "Engineers",
    params(FeedbackQuery),
    responses(
        (status = 200, description = "Review feedback", body = ReviewFeedback),
        (status = 404, description = "No such document!")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_feedback(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    query: web::Query<FeedbackQuery>,
) -> HttpResponse {
    let uid = query.uid.clone().unwrap_or_else(|| claims.uid().to_string());
    log::info!("📋 GET /engineers/feedback - uid: {}", uid);

    if uid != claims.uid() {
        log::warn!("🔒 {} asked for feedback of {}", claims.uid(), uid);
        return reply(StatusCode::FORBIDDEN, UID_MISMATCH).finish();
    }

    match engineer_service::get_feedback(&state, &uid).await {
        Ok(feedback) => reply(StatusCode::OK, "Success").json(feedback),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/engineers/admin/get-all-engineers",
    tag = "Engineers",
    params(ListParams),
    responses(
        (status = 200, description = "Engineers, total in the count header", body = [AdminEngineerItem]),
        (status = 400, description = "Invalid orderBy or startAfter parameter")
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_get_all_engineers(state: web::Data<AppState>, query: web::Query<ListParams>) -> HttpResponse {
    log::info!("📋 GET /engineers/admin/get-all-engineers - {:?}", query.0);

    match engineer_service::admin_list(&state, &query).await {
        Ok((engineers, count)) => reply(StatusCode::OK, "Success")
            .insert_header(("count", count.to_string()))
            .json(engineers),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/engineers/{id}",
    tag = "Engineers",
    params(("id" = String, Path, description = "Engineer uid")),
    responses(
        (status = 200, description = "Engineer profile", body = EngineerDto),
        (status = 404, description = "No such document!")
    )
)]
pub async fn get_engineer(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("🔍 GET /engineers/{}", uid);

    match engineer_service::get_engineer(&state, &uid).await {
        Ok(engineer) => reply(StatusCode::OK, "Success").json(engineer),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/engineers/{id}",
    tag = "Engineers",
    params(("id" = String, Path, description = "Engineer uid")),
    responses(
        (status = 200, description = "Engineer deleted successfully"),
        (status = 404, description = "Engineer does not exist!")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_engineer(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("🗑️  DELETE /engineers/{}", uid);

    match engineer_service::delete(&state, &uid).await {
        Ok(()) => reply(StatusCode::OK, "Engineer deleted successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    put,
    path = "/engineers/edit/{id}",
    tag = "Engineers",
    params(("id" = String, Path, description = "Engineer uid, must be the caller")),
    request_body = EngineerProfileUpdate,
    responses(
        (status = 200, description = "Engineer updated successfully"),
        (status = 403, description = "UID does not match the caller"),
        (status = 404, description = "Engineer does not exist")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_engineer(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    path: web::Path<String>,
    body: web::Json<EngineerProfileUpdate>,
) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("✏️  PUT /engineers/edit/{}", uid);

    if uid != claims.uid() {
        return reply(StatusCode::FORBIDDEN, UID_MISMATCH).finish();
    }

    match engineer_service::update(&state, &uid, body.into_inner()).await {
        Ok(()) => reply(StatusCode::OK, "Engineer updated successfully").finish(),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    put,
    path = "/engineers/resubmit/{id}",
    tag = "Engineers",
    params(("id" = String, Path, description = "Engineer uid, must be the caller")),
    request_body = EngineerProfileUpdate,
    responses(
        (status = 200, description = "Profile has been resubmitted for review"),
        (status = 403, description = "UID does not match the caller"),
        (status = 404, description = "Engineer does not exist")
    ),
    security(("bearer_auth" = []))
)]
pub async fn resubmit_engineer(
    state: web::Data<AppState>,
    claims: web::ReqData<FirebaseClaims>,
    path: web::Path<String>,
    body: web::Json<EngineerProfileUpdate>,
) -> HttpResponse {
    let uid = path.into_inner();
    log::info!("🔁 PUT /engineers/resubmit/{}", uid);

    if uid != claims.uid() {
        return reply(StatusCode::FORBIDDEN, UID_MISMATCH).finish();
    }

    match engineer_service::resubmit(&state, &uid, body.into_inner()).await {
        Ok(()) => reply(StatusCode::OK, "Profile has been resubmitted for review").finish(),
        Err(e) => failure(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{bearer, test_app};
    use crate::database::Repository;
    use crate::models::{ProfileState, Topic};
    use crate::services::fakes::TestContext;
    use actix_web::test;
    use serde_json::json;

    fn signup_body(uid: &str) -> serde_json::Value {
        json!({
            "uid": uid,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": format!("{}@example.com", uid),
            "biography": "bio",
            "linkedin": "",
            "personalWebsite": "",
            "organisation": "Engines",
            "topics": ["robotics"],
            "newTopicsDisplayName": ["Cyber Security"],
            "events": ["Outreach"],
            "position": "Engineer",
            "city": "Auckland",
            "suburb": "Parnell",
            "profilePictureURL": "pic.png"
        })
    }

    #[actix_web::test]
    async fn test_signup_then_fetch_profile() {
        let ctx = TestContext::new();
        ctx.repo.insert_topic(Topic::new("robotics", "Robotics", "e0"));
        let app = test::init_service(test_app(&ctx)).await;

        let req = test::TestRequest::post()
            .uri("/engineers/signup")
            .set_json(signup_body("e1"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers().get("msg").unwrap(), "Engineer signed up successfully");

        let req = test::TestRequest::get().uri("/engineers/e1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["topics"], json!(["Robotics", "Cyber Security"]));
        assert_eq!(body["verified"], "to-be-reviewed");
        assert_eq!(body["userId"], "e1");

        let req = test::TestRequest::get().uri("/engineers/ghost").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers().get("msg").unwrap(), "No such document!");
    }

    #[actix_web::test]
    async fn test_review_flow_requires_admin() {
        let ctx = TestContext::new();
        ctx.repo.insert_topic(Topic::new("robotics", "Robotics", "e0"));
        engineer_service::signup(&ctx.state, serde_json::from_value(signup_body("e1")).unwrap())
            .await
            .unwrap();
        let app = test::init_service(test_app(&ctx)).await;

        let req = test::TestRequest::get()
            .uri("/engineers/review")
            .insert_header(bearer("admin"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let req = test::TestRequest::post()
            .uri("/engineers/review-engineer-feedback")
            .insert_header(bearer("admin"))
            .set_json(json!({ "uid": "e1", "feedback": "Great", "sections": [false], "verified": "verified" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(ctx.index.record("e1").unwrap().name, "Ada Lovelace");

        let req = test::TestRequest::get()
            .uri("/engineers/feedback")
            .insert_header(bearer("e1"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "feedback": "Great", "sectionsToChange": [false] }));

        let req = test::TestRequest::get()
            .uri("/engineers/feedback?uid=e2")
            .insert_header(bearer("e1"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_listing_sets_count() {
        let ctx = TestContext::new();
        ctx.repo.insert_topic(Topic::new("robotics", "Robotics", "e0"));
        for uid in ["e1", "e2"] {
            engineer_service::signup(&ctx.state, serde_json::from_value(signup_body(uid)).unwrap())
                .await
                .unwrap();
        }
        let app = test::init_service(test_app(&ctx)).await;

        let req = test::TestRequest::get()
            .uri("/engineers/admin/get-all-engineers?orderBy=firstName&limit=1")
            .insert_header(bearer("admin"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("count").unwrap(), "2");
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body[0]["uid"], "e1");

        let req = test::TestRequest::get()
            .uri("/engineers/admin/get-all-engineers?orderBy=password")
            .insert_header(bearer("admin"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers().get("msg").unwrap(), "Invalid orderBy parameter");
    }

    #[actix_web::test]
    async fn test_edit_checks_caller() {
        let ctx = TestContext::new();
        ctx.repo.insert_topic(Topic::new("robotics", "Robotics", "e0"));
        ctx.identity.add_user("e1", "e1@example.com");
        engineer_service::signup(&ctx.state, serde_json::from_value(signup_body("e1")).unwrap())
            .await
            .unwrap();
        let app = test::init_service(test_app(&ctx)).await;

        let update = json!({
            "firstName": "Ada",
            "lastName": "Byron",
            "topics": ["Robotics"],
            "events": ["Mentoring"],
            "profilePictureURL": "pic.png"
        });

        let req = test::TestRequest::put()
            .uri("/engineers/edit/e1")
            .insert_header(bearer("e2"))
            .set_json(&update)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri("/engineers/resubmit/e1")
            .insert_header(bearer("e1"))
            .set_json(&update)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get("msg").unwrap(), "Profile has been resubmitted for review");

        let engineer = ctx.repo.get_engineer("e1").await.unwrap().unwrap();
        assert_eq!(engineer.last_name, "Byron");
        assert_eq!(engineer.verified, ProfileState::ToBeReviewed);
        assert!(ctx.repo.topic("cyberSecurity").is_none());
    }

    #[actix_web::test]
    async fn test_delete_is_admin_only() {
        let ctx = TestContext::new();
        ctx.repo.insert_topic(Topic::new("robotics", "Robotics", "e0"));
        engineer_service::signup(&ctx.state, serde_json::from_value(signup_body("e1")).unwrap())
            .await
            .unwrap();
        let app = test::init_service(test_app(&ctx)).await;

        let req = test::TestRequest::delete()
            .uri("/engineers/e1")
            .insert_header(bearer("e1"))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(res) => res.status(),
            Err(e) => e.as_response_error().status_code(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::delete()
            .uri("/engineers/e1")
            .insert_header(bearer("admin"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(ctx.repo.get_engineer("e1").await.unwrap().is_none());
    }
}
