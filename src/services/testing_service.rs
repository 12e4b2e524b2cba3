// Helpers behind the /testing routes, mounted only when ENABLE_TESTING_ROUTES is set
use serde_json::{Map, Value};

use crate::state::AppState;
use crate::utils::{AppError, AppResult};

pub async fn user_token(state: &AppState, uid: &str) -> AppResult<String> {
    let user = state
        .identity
        .get_user(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    state.identity.create_custom_token(&user.uid).await
}

/// Replaces the user's claims with `{<userType>: true}`.
pub async fn change_user_claim(state: &AppState, uid: &str, user_type: &str) -> AppResult<()> {
    let claim = user_type.trim().to_lowercase();
    if claim.is_empty() {
        return Err(AppError::InvalidRequest("userType is required".to_string()));
    }

    let mut claims = Map::new();
    claims.insert(claim.clone(), Value::Bool(true));
    state.identity.set_custom_claims(uid, Value::Object(claims)).await?;

    log::info!("🧪 Claim of {} set to {}", uid, claim);
    Ok(())
}

pub async fn send_reset_email(state: &AppState, uid: &str) -> AppResult<()> {
    let email = state
        .identity
        .get_user(uid)
        .await?
        .and_then(|user| user.email)
        .ok_or_else(|| AppError::Internal("User does not have an email".to_string()))?;
    state.identity.send_password_reset_email(&email).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fakes::TestContext;
    use serde_json::json;

    #[tokio::test]
    async fn test_user_token_for_known_user() {
        let ctx = TestContext::new();
        ctx.identity.add_user("u1", "u1@example.com");
        assert_eq!(user_token(&ctx.state, "u1").await.unwrap(), "custom-token-u1");
        assert!(user_token(&ctx.state, "ghost").await.is_err());
    }

    #[tokio::test]
    async fn test_change_user_claim_uses_requested_type() {
        let ctx = TestContext::new();
        change_user_claim(&ctx.state, "u1", "Engineer").await.unwrap();
        assert_eq!(ctx.identity.claims_of("u1"), Some(json!({ "engineer": true })));
    }

    #[tokio::test]
    async fn test_send_reset_email() {
        let ctx = TestContext::new();
        ctx.identity.add_user("u1", "u1@example.com");
        send_reset_email(&ctx.state, "u1").await.unwrap();
        assert_eq!(*ctx.identity.reset_emails.lock().unwrap(), vec!["u1@example.com".to_string()]);

        let err = send_reset_email(&ctx.state, "ghost").await.unwrap_err();
        assert_eq!(err.message(), "User does not have an email");
    }
}
