use actix_cors::Cors;
use actix_web::http::header;

/// Response headers the frontend reads besides the body.
pub const EXPOSED_HEADERS: [&str; 3] = ["msg", "count", "totalPages"];

/// CORS policy for the frontend origin. The exposed headers are added to error
/// responses from inner middleware as well.
pub fn cors(frontend_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(frontend_url)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(EXPOSED_HEADERS)
        .supports_credentials()
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthMiddleware;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    const FRONTEND: &str = "http://localhost:5173";

    fn exposed<B>(res: &actix_web::dev::ServiceResponse<B>) -> String {
        res.headers()
            .get(header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase()
    }

    #[actix_web::test]
    async fn test_headers_exposed_on_success_and_auth_failure() {
        let app = test::init_service(
            App::new()
                .wrap(cors(FRONTEND))
                .route(
                    "/open",
                    web::get().to(|| async { HttpResponse::Ok().insert_header(("msg", "ok")).finish() }),
                )
                .service(
                    web::resource("/closed")
                        .wrap(AuthMiddleware::authenticated())
                        .route(web::get().to(|| async { HttpResponse::Ok().finish() })),
                ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/open")
            .insert_header((header::ORIGIN, FRONTEND))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        for name in EXPOSED_HEADERS {
            assert!(exposed(&res).contains(&name.to_lowercase()), "{} not exposed", name);
        }

        let req = test::TestRequest::get()
            .uri("/closed")
            .insert_header((header::ORIGIN, FRONTEND))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(exposed(&res).contains("msg"));
    }
}
