use crate::models::{json_int, IndexQuery, SearchRequest, SearchResults, TopicDto};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

fn facet(attribute: &str, value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        format!("{}:\"{}\"", attribute, value)
    } else {
        format!("{}:{}", attribute, value)
    }
}

/// Index filter: topics OR-ed together, events OR-ed together, the two groups AND-ed.
pub fn generate_filter_string(specialisations: &[String], interests: &[String]) -> String {
    let topics = specialisations
        .iter()
        .map(|s| facet("topics", s))
        .collect::<Vec<_>>()
        .join(" OR ");
    let events = interests
        .iter()
        .map(|i| facet("events", i))
        .collect::<Vec<_>>()
        .join(" OR ");

    match (topics.is_empty(), events.is_empty()) {
        (false, false) => format!("{} AND {}", topics, events),
        (false, true) => topics,
        _ => events,
    }
}

pub async fn search(state: &AppState, request: &SearchRequest) -> AppResult<SearchResults> {
    let page = json_int(request.page_number.as_ref()).and_then(|p| u32::try_from(p).ok());
    let limit = json_int(request.limit.as_ref()).and_then(|l| u32::try_from(l).ok());
    let (Some(page), Some(hits_per_page)) = (page, limit) else {
        return Err(AppError::Internal("Page number and limit are not defined".to_string()));
    };

    let filters = if request.specialisations.is_empty() && request.interests.is_empty() {
        None
    } else {
        Some(generate_filter_string(&request.specialisations, &request.interests))
    };

    let query = IndexQuery {
        text: request.general_search.clone(),
        filters,
        page,
        hits_per_page,
    };
    log::debug!("🔎 Searching engineers: {:?}", query);

    let results = state.index.search(&query).await?;
    Ok(SearchResults {
        total_pages: results.nb_pages,
        engineers: results.hits.into_iter().map(Into::into).collect(),
    })
}

pub async fn all_topics(state: &AppState) -> AppResult<Vec<TopicDto>> {
    let topics = state.repo.all_topics().await?;
    if topics.is_empty() {
        return Err(AppError::NotFound("No topics found in the database collection".to_string()));
    }
    Ok(topics.into_iter().map(TopicDto::from).collect())
}
