use serde_json::json;

use super::pagination::resolve_page;
use super::topic_service::{self, parse_events};
use crate::database::RefCollection;
use crate::models::{
    AdminEngineerItem, Engineer, EngineerDto, Event, EngineerIndexRecord, EngineerProfileUpdate, ListParams,
    ProfileState, ReviewFeedback, ReviewRequest, SignupEngineerRequest, ENGINEER_SORT_FIELDS,
};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Profile with topic keys resolved to display names and events to the enum.
async fn to_dto(state: &AppState, engineer: Engineer) -> AppResult<EngineerDto> {
    let topics = topic_service::topic_display_names(state.repo.as_ref(), &engineer.topics).await?;
    let events = engineer.parsed_events().map_err(|e| {
        log::error!("❌ Engineer {} has an invalid stored event: {}", engineer.uid, e);
        AppError::Internal(topic_service::INVALID_EVENT.to_string())
    })?;
    Ok(EngineerDto::new(engineer, topics, events))
}

async fn index_record(state: &AppState, engineer: &Engineer) -> AppResult<EngineerIndexRecord> {
    let topics = topic_service::topic_display_names(state.repo.as_ref(), &engineer.topics).await?;
    Ok(EngineerIndexRecord::from_engineer(engineer, topics))
}

pub async fn signup(state: &AppState, request: SignupEngineerRequest) -> AppResult<()> {
    let repo = state.repo.as_ref();
    let uid = request.uid.clone();

    let events = parse_events(&request.events)?;
    let new_topics = topic_service::configure_new_topics(&request.new_topics_display_name);

    let mut topics: Vec<String> = Vec::new();
    for key in request.topics.iter().chain(new_topics.iter().map(|(_, key)| key)) {
        if !topics.contains(key) {
            topics.push(key.clone());
        }
    }

    let engineer = Engineer {
        uid: uid.clone(),
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        biography: request.biography,
        linkedin: request.linkedin.unwrap_or_default(),
        personal_website: request.personal_website.unwrap_or_default(),
        organisation: request.organisation,
        topics,
        events: events.iter().map(|e| e.as_str().to_string()).collect(),
        position: request.position,
        city: request.city,
        suburb: request.suburb,
        verified: ProfileState::ToBeReviewed,
        profile_picture_url: request.profile_picture_url,
        introduction_video_url: non_blank(request.introduction_video_url),
    };

    repo.put_engineer(&engineer).await?;
    state.identity.set_custom_claims(&uid, json!({ "engineer": true })).await?;

    for (display_name, key) in &new_topics {
        topic_service::attach_topic(repo, key, display_name, &uid).await?;
    }
    for key in &request.topics {
        if !new_topics.iter().any(|(_, new_key)| new_key == key) {
            topic_service::attach_existing_topic(repo, key, &uid).await?;
        }
    }
    for event in events {
        topic_service::attach_event(repo, event, &uid).await?;
    }

    log::info!("✅ Engineer {} signed up, awaiting review", uid);
    Ok(())
}

pub async fn get_engineer(state: &AppState, uid: &str) -> AppResult<EngineerDto> {
    let engineer = state
        .repo
        .get_engineer(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("No such document!".to_string()))?;
    to_dto(state, engineer).await
}

pub async fn engineers_to_review(state: &AppState) -> AppResult<Vec<EngineerDto>> {
    let pending = state.repo.engineers_in_state(ProfileState::ToBeReviewed).await?;
    let mut engineers = Vec::with_capacity(pending.len());
    for engineer in pending {
        engineers.push(to_dto(state, engineer).await?);
    }
    Ok(engineers)
}

pub async fn review(state: &AppState, request: ReviewRequest) -> AppResult<()> {
    let engineer = state
        .repo
        .get_engineer(&request.uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Engineer with the requested UID does not exist".to_string()))?;

    let feedback = ReviewFeedback {
        feedback: request.feedback,
        sections_to_change: request.sections,
    };
    state.repo.put_review_feedback(&request.uid, &feedback).await?;
    state.repo.set_engineer_state(&request.uid, request.verified).await?;

    if request.verified == ProfileState::Verified {
        let record = index_record(state, &engineer).await?;
        state.index.save_engineer(&record).await?;
    } else {
        // Only verified profiles are searchable
        state.index.delete_engineer(&request.uid).await?;
    }

    log::info!("📝 Engineer {} reviewed: {}", request.uid, request.verified);
    Ok(())
}

pub async fn delete(state: &AppState, uid: &str) -> AppResult<()> {
    let repo = state.repo.as_ref();
    let engineer = repo
        .get_engineer(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Engineer does not exist!".to_string()))?;

    topic_service::release_all(repo, &engineer).await?;
    state.storage.delete_prefix(&format!("{}/", uid)).await?;
    repo.delete_engineer(uid).await?;
    repo.delete_review_feedback(uid).await?;
    let shortlists = repo.remove_reference_everywhere(RefCollection::Shortlist, uid).await?;
    state.index.delete_engineer(uid).await?;

    match state.identity.delete_user(uid).await {
        Ok(()) => {}
        Err(AppError::NotFound(_)) => log::warn!("⚠️  Engineer {} had no auth account", uid),
        Err(e) => return Err(e),
    }

    log::info!("🗑️  Engineer {} deleted (removed from {} favourite lists)", uid, shortlists);
    Ok(())
}

pub async fn admin_list(state: &AppState, params: &ListParams) -> AppResult<(Vec<AdminEngineerItem>, u64)> {
    let repo = state.repo.as_ref();
    let page = resolve_page(
        params,
        ENGINEER_SORT_FIELDS,
        |id| async move { repo.get_engineer(&id).await },
        |engineer: &Engineer, field| engineer.sort_value(field),
    )
    .await?;

    let engineers = repo.list_engineers(&page).await?;
    let count = repo.count_engineers().await?;

    Ok((engineers.into_iter().map(AdminEngineerItem::from).collect(), count))
}

pub async fn get_feedback(state: &AppState, uid: &str) -> AppResult<ReviewFeedback> {
    state
        .repo
        .get_review_feedback(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("No such document!".to_string()))
}

/// Applies a profile edit and brings topic and event membership in line with it.
async fn apply_update(state: &AppState, uid: &str, data: EngineerProfileUpdate) -> AppResult<Engineer> {
    let repo = state.repo.as_ref();
    let mut engineer = repo
        .get_engineer(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Engineer does not exist".to_string()))?;

    let account = state.identity.get_user(uid).await?;
    if account.and_then(|a| a.email).as_deref() != Some(engineer.email.as_str()) {
        return Err(AppError::Forbidden("Provided UID does not match the email".to_string()));
    }

    let wanted_events = parse_events(&data.events)?;
    let current_events: Vec<Event> = engineer.events.iter().filter_map(|e| e.parse().ok()).collect();
    let wanted_topics = topic_service::configure_new_topics(&data.topics);

    let current_topics = std::mem::take(&mut engineer.topics);
    engineer.first_name = data.first_name;
    engineer.last_name = data.last_name;
    engineer.city = data.city;
    engineer.suburb = data.suburb;
    engineer.biography = data.biography;
    engineer.topics = wanted_topics.iter().map(|(_, key)| key.clone()).collect();
    engineer.events = wanted_events.iter().map(|e| e.as_str().to_string()).collect();
    engineer.profile_picture_url = data.profile_picture_url;
    engineer.position = data.position;
    engineer.organisation = data.organisation;
    if let Some(linkedin) = non_blank(data.linkedin) {
        engineer.linkedin = linkedin;
    }
    if let Some(website) = non_blank(data.personal_website) {
        engineer.personal_website = website;
    }
    if let Some(video) = non_blank(data.introduction_video_url) {
        engineer.introduction_video_url = Some(video);
    }

    repo.put_engineer(&engineer).await?;
    topic_service::reconcile_topics(repo, uid, &current_topics, &wanted_topics).await?;
    topic_service::reconcile_events(repo, uid, &current_events, &wanted_events).await?;

    Ok(engineer)
}

pub async fn update(state: &AppState, uid: &str, data: EngineerProfileUpdate) -> AppResult<()> {
    let engineer = apply_update(state, uid, data).await?;

    if engineer.verified == ProfileState::Verified {
        let record = index_record(state, &engineer).await?;
        state.index.delete_engineer(uid).await?;
        state.index.save_engineer(&record).await?;
    }

    log::info!("✏️  Engineer {} updated", uid);
    Ok(())
}

pub async fn resubmit(state: &AppState, uid: &str, data: EngineerProfileUpdate) -> AppResult<()> {
    apply_update(state, uid, data).await?;
    state.repo.set_engineer_state(uid, ProfileState::ToBeReviewed).await?;
    state.index.delete_engineer(uid).await?;

    log::info!("🔁 Engineer {} resubmitted for review", uid);
    Ok(())
}
