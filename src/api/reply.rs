//! Response convention shared by every handler: status code, a human readable
//! `msg` header and an optional body.

use actix_web::{http::StatusCode, HttpResponse, HttpResponseBuilder};

use crate::utils::AppError;

/// Header values must be visible ASCII.
fn header_safe(message: &str) -> String {
    message
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
        .collect()
}

pub fn reply(status: StatusCode, msg: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder.insert_header(("msg", header_safe(msg)));
    builder
}

pub fn failure(err: &AppError) -> HttpResponse {
    if err.status().is_server_error() {
        log::error!("❌ {}", err);
    } else {
        log::warn!("⚠️  {}", err);
    }
    reply(err.status(), err.message()).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_message_header() {
        let res = failure(&AppError::NotFound("User not found".into()));
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers().get("msg").unwrap(), "User not found");
    }

    #[test]
    fn test_non_ascii_is_replaced() {
        assert_eq!(header_safe("café\nok"), "caf??ok");
    }
}
