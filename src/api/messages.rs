use crate::error::{AppError, AppResult};

/// Gmail message ids are opaque ASCII tokens; anything that could change the
/// request path is rejected before a URL is built.
pub fn message_endpoint(id: &str) -> AppResult<String> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if !valid {
        return Err(AppError::InvalidInput(format!("invalid message id `{id}`")));
    }

    Ok(format!("/gmail/v1/users/me/messages/{id}"))
}

pub fn send_endpoint() -> &'static str {
    "/gmail/v1/users/me/messages/send"
}

pub fn get_query() -> Vec<(String, String)> {
    let mut query = vec![("format".to_string(), "metadata".to_string())];

    for header in ["Subject", "Message-ID"] {
        query.push(("metadataHeaders".to_string(), header.to_string()));
    }

    query
}
