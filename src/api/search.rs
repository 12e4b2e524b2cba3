use actix_web::{http::StatusCode, web, HttpResponse};

use super::reply::{failure, reply};
use crate::models::{EngineerCardDto, SearchRequest, TopicDto};
use crate::services::search_service;
use crate::state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/search")
            .route("", web::post().to(search))
            .route("/topics", web::get().to(all_topics)),
    );
}

#[utoipa::path(
    post,
    path = "/search",
    tag = "Search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching engineers, page count in the totalPages header", body = [EngineerCardDto]),
        (status = 500, description = "Page number and limit are not defined")
    )
)]
pub async fn search(state: web::Data<AppState>, body: web::Json<SearchRequest>) -> HttpResponse {
    log::info!("🔎 POST /search - \"{}\"", body.general_search);

    match search_service::search(&state, &body).await {
        Ok(results) => reply(StatusCode::OK, "Successful search")
            .insert_header(("totalPages", results.total_pages.to_string()))
            .json(results.engineers),
        Err(e) => failure(&e),
    }
}

#[utoipa::path(
    get,
    path = "/search/topics",
    tag = "Search",
    responses(
        (status = 200, description = "Every topic", body = [TopicDto]),
        (status = 404, description = "No topics found in the database collection")
    )
)]
pub async fn all_topics(state: web::Data<AppState>) -> HttpResponse {
    log::info!("🏷️  GET /search/topics");

    match search_service::all_topics(&state).await {
        Ok(topics) => reply(StatusCode::OK, "Successful get all topics").json(topics),
        Err(e) => failure(&e),
    }
}
