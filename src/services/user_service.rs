use chrono::Utc;
use serde_json::json;

use super::mail_service::{render_email, EmailContent};
use super::pagination::{resolve_page, INVALID_START_AFTER};
use super::topic_service;
use crate::database::RefCollection;
use crate::models::{
    AdminUserItem, ContactRequest, EngineerCardDto, ListParams, MonthlyFeedback, Role, Shortlist, SignupAdminRequest,
    SignupUserRequest, SubmitUserFeedbackRequest, User, UserFeedback, UserFeedbackDto, UserProfileDto,
    USER_SORT_FIELDS,
};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

const ADMIN_SCHOOL: &str = "WIE Admin";
const ENGINEER_NOT_FOUND: &str = "Engineer not found";
const FAVOURITES_NOT_FOUND: &str = "User favourites not found";
const CONTACT_SUBJECT: &str = "Contact Engineer";
const EMAIL_NOT_SENT: &str = "Email not successful";

pub async fn signup(state: &AppState, request: SignupUserRequest) -> AppResult<()> {
    let role = Role::from_input(&request.role).ok_or_else(|| {
        log::warn!("⚠️  Signup for {} with unknown role {}", request.uid, request.role);
        AppError::Internal("Not a Role".to_string())
    })?;

    let user = User {
        uid: request.uid,
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        role,
        school: request.school,
    };

    state.repo.put_user(&user).await?;
    state
        .identity
        .set_custom_claims(&user.uid, json!({ role.claim(): true }))
        .await?;
    state.repo.put_shortlist(&Shortlist::empty(&user.uid)).await?;

    log::info!("✅ User {} signed up as {}", user.uid, role);
    Ok(())
}

/// Creates the auth account for a new admin and mails them a link to set a password.
pub async fn signup_admin(state: &AppState, request: SignupAdminRequest) -> AppResult<String> {
    let display_name = format!("{} {}", request.first_name, request.last_name);
    let uid = state.identity.create_user(&request.email, &display_name).await?;

    state.identity.set_custom_claims(&uid, json!({ "admin": true })).await?;
    state.identity.send_password_reset_email(&request.email).await?;

    let user = User {
        uid: uid.clone(),
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        role: Role::Admin,
        school: ADMIN_SCHOOL.to_string(),
    };
    state.repo.put_user(&user).await?;

    log::info!("🛡️  Admin {} created", uid);
    Ok(uid)
}

pub async fn admin_list(state: &AppState, params: &ListParams) -> AppResult<(Vec<AdminUserItem>, u64)> {
    let repo = state.repo.as_ref();
    let page = resolve_page(
        params,
        USER_SORT_FIELDS,
        |id| async move { repo.get_user(&id).await },
        |user: &User, field| user.sort_value(field),
    )
    .await?;

    let users = repo.list_users(&page).await?;
    let count = repo.count_users().await?;

    Ok((users.into_iter().map(AdminUserItem::from).collect(), count))
}

pub async fn details(state: &AppState, uid: &str) -> AppResult<UserProfileDto> {
    state
        .repo
        .get_user(uid)
        .await?
        .map(UserProfileDto::from)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn delete(state: &AppState, uid: &str) -> AppResult<()> {
    if state.repo.get_user(uid).await?.is_none() {
        return Err(AppError::NotFound("User does not exist".to_string()));
    }

    state.repo.delete_user(uid).await?;
    state.repo.delete_shortlist(uid).await?;

    match state.identity.delete_user(uid).await {
        Ok(()) => {}
        Err(AppError::NotFound(_)) => log::warn!("⚠️  User {} had no auth account", uid),
        Err(e) => return Err(e),
    }

    log::info!("🗑️  User {} deleted", uid);
    Ok(())
}

pub async fn create_user_feedback(state: &AppState, request: SubmitUserFeedbackRequest) -> AppResult<()> {
    let missing: Vec<&str> = [
        (request.email.trim().is_empty(), "Email is required"),
        (request.name.trim().is_empty(), "Name is required"),
        (request.feedback_type.trim().is_empty(), "Feedback type is required"),
        (request.feedback.trim().is_empty(), "Feedback message is required"),
    ]
    .into_iter()
    .filter_map(|(is_missing, message)| is_missing.then_some(message))
    .collect();

    if !missing.is_empty() {
        return Err(AppError::InvalidRequest(missing.join(", ")));
    }

    let feedback = UserFeedback {
        id: uuid::Uuid::new_v4().to_string(),
        email: request.email,
        name: request.name,
        feedback_type: request.feedback_type,
        feedback: request.feedback,
        time: Utc::now(),
        uid: request.uid.filter(|uid| !uid.is_empty()),
    };
    state.repo.insert_user_feedback(&feedback).await?;

    log::info!("💬 Site feedback {} received ({})", feedback.id, feedback.feedback_type);
    Ok(())
}

/// All site feedback, oldest first, grouped by month name in first-seen order.
pub async fn all_user_feedback(state: &AppState) -> AppResult<Vec<MonthlyFeedback>> {
    let mut grouped: Vec<MonthlyFeedback> = Vec::new();

    for item in state.repo.user_feedback_by_time().await? {
        let month = item.time.format("%B").to_string();
        let dto = UserFeedbackDto::from(item);
        match grouped.iter_mut().find(|group| group.month == month) {
            Some(group) => group.feedback.push(dto),
            None => grouped.push(MonthlyFeedback {
                month,
                feedback: vec![dto],
            }),
        }
    }

    Ok(grouped)
}

async fn require_engineer_and_shortlist(state: &AppState, uid: &str, engineer_id: &str) -> AppResult<()> {
    if state.repo.get_engineer(engineer_id).await?.is_none() {
        return Err(AppError::NotFound(ENGINEER_NOT_FOUND.to_string()));
    }
    if state.repo.get_shortlist(uid).await?.is_none() {
        return Err(AppError::NotFound(FAVOURITES_NOT_FOUND.to_string()));
    }
    Ok(())
}

pub async fn add_favourite(state: &AppState, uid: &str, engineer_id: &str) -> AppResult<()> {
    require_engineer_and_shortlist(state, uid, engineer_id).await?;
    if !state.repo.add_reference(RefCollection::Shortlist, uid, engineer_id).await? {
        return Err(AppError::NotFound(FAVOURITES_NOT_FOUND.to_string()));
    }
    log::info!("⭐ {} favourited {}", uid, engineer_id);
    Ok(())
}

pub async fn delete_favourite(state: &AppState, uid: &str, engineer_id: &str) -> AppResult<()> {
    require_engineer_and_shortlist(state, uid, engineer_id).await?;
    if !state.repo.remove_reference(RefCollection::Shortlist, uid, engineer_id).await? {
        return Err(AppError::NotFound(FAVOURITES_NOT_FOUND.to_string()));
    }
    log::info!("⭐ {} unfavourited {}", uid, engineer_id);
    Ok(())
}

/// Favourite engineers in shortlist order, plus the total number of favourites.
pub async fn favourites(
    state: &AppState,
    uid: &str,
    start_after: Option<&str>,
    limit: Option<i64>,
) -> AppResult<(Vec<EngineerCardDto>, usize)> {
    let shortlist = state
        .repo
        .get_shortlist(uid)
        .await?
        .ok_or_else(|| AppError::NotFound(FAVOURITES_NOT_FOUND.to_string()))?;
    let total = shortlist.engineers.len();

    let mut ids: &[String] = &shortlist.engineers;
    if let Some(start_after) = start_after.filter(|s| !s.is_empty()) {
        let position = ids
            .iter()
            .position(|id| id == start_after)
            .ok_or_else(|| AppError::InvalidRequest(INVALID_START_AFTER.to_string()))?;
        ids = &ids[position + 1..];
    }
    if let Some(limit) = limit {
        ids = &ids[..ids.len().min(limit as usize)];
    }

    let mut cards = Vec::with_capacity(ids.len());
    for id in ids {
        let engineer = state
            .repo
            .get_engineer(id)
            .await?
            .ok_or_else(|| AppError::NotFound(ENGINEER_NOT_FOUND.to_string()))?;
        let topics = topic_service::topic_display_names(state.repo.as_ref(), &engineer.topics).await?;
        cards.push(EngineerCardDto::from_engineer(&engineer, topics));
    }

    Ok((cards, total))
}

/// Mails the contact form to an engineer. The sender's name and address are
/// signed under the message so the engineer can reply.
pub async fn contact_engineer(state: &AppState, request: ContactRequest) -> AppResult<()> {
    let missing: Vec<&str> = [
        (request.email.trim().is_empty(), "Engineer email is required"),
        (request.your_email.trim().is_empty(), "Your email is required"),
        (request.email_message.trim().is_empty(), "Message is required"),
    ]
    .into_iter()
    .filter_map(|(is_missing, message)| is_missing.then_some(message))
    .collect();

    if !missing.is_empty() {
        return Err(AppError::InvalidRequest(missing.join(", ")));
    }

    let html = render_email(&EmailContent {
        title: &request.title,
        message: &request.email_message,
        sender_name: &request.name,
        sender_email: &request.your_email,
    })?;

    if let Err(e) = state.mailer.send(request.email.trim(), CONTACT_SUBJECT, html).await {
        log::error!("❌ Contact email to {} failed: {}", request.email, e);
        return Err(AppError::Internal(EMAIL_NOT_SENT.to_string()));
    }

    log::info!("✉️  Contact email sent to {} from {}", request.email, request.your_email);
    Ok(())
}

pub async fn password_reset_link(state: &AppState, email: &str) -> AppResult<String> {
    if state.identity.get_user_by_email(email).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    let link = state.identity.password_reset_link(email).await?;
    log::info!("🔑 Password reset link generated for {}", email);
    Ok(link)
}
