use std::future::Future;

use crate::models::{Cursor, ListParams, PageRequest};
use crate::utils::{AppError, AppResult};

pub const INVALID_ORDER_BY: &str = "Invalid orderBy parameter";
pub const INVALID_START_AFTER: &str = "Invalid startAfter parameter";

/// Validates the admin listing query and turns `startAfter` into a cursor
/// positioned on that document.
pub async fn resolve_page<T, F, Fut>(
    params: &ListParams,
    allowed_fields: &[&str],
    lookup: F,
    sort_value: impl Fn(&T, &str) -> Option<String>,
) -> AppResult<PageRequest>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = AppResult<Option<T>>>,
{
    let order_by = match params.order_by.as_deref().filter(|f| !f.is_empty()) {
        Some(field) if allowed_fields.contains(&field) => Some(field.to_string()),
        Some(_) => return Err(AppError::InvalidRequest(INVALID_ORDER_BY.to_string())),
        None => None,
    };

    let after = match params.start_after.as_deref().filter(|s| !s.is_empty()) {
        Some(id) => {
            let document = lookup(id.to_string())
                .await?
                .ok_or_else(|| AppError::InvalidRequest(INVALID_START_AFTER.to_string()))?;
            Some(Cursor {
                sort_value: order_by.as_deref().and_then(|f| sort_value(&document, f)),
                id: id.to_string(),
            })
        }
        None => None,
    };

    Ok(PageRequest {
        order_by,
        after,
        limit: params.limit(),
    })
}
