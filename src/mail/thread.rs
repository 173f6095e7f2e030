//! Reply-thread resolution.
//!
//! A requested reply is looked up once. When the lookup or header extraction
//! fails for any reason the send still goes ahead, carrying only the requested
//! id as its thread id.

use crate::api::MessageStore;
use crate::api::models::MessageHeader;
use crate::error::{AppError, AppResult};
use crate::mail::request::{ResolvedThreadContext, ThreadLink};

const SUBJECT_HEADER: &str = "Subject";
const MESSAGE_ID_HEADER: &str = "message-id";

pub async fn resolve_thread<S>(store: &S, in_reply_to: Option<&str>) -> ThreadLink
where
    S: MessageStore + ?Sized,
{
    let Some(message_id) = in_reply_to.filter(|value| !value.is_empty()) else {
        return ThreadLink::NewThread;
    };

    match lookup_context(store, message_id).await {
        Ok(context) => {
            tracing::debug!(
                message_id,
                thread_id = %context.thread_id,
                "resolved reply thread"
            );
            ThreadLink::Resolved(context)
        }
        Err(err) => {
            tracing::warn!(
                message_id,
                error = %err,
                "reply lookup failed; sending with thread id only"
            );
            ThreadLink::ThreadIdOnly(message_id.to_string())
        }
    }
}

async fn lookup_context<S>(store: &S, message_id: &str) -> AppResult<ResolvedThreadContext>
where
    S: MessageStore + ?Sized,
{
    let message = store.get_message(message_id).await?;

    let subject = subject_header(&message.headers).ok_or_else(|| {
        AppError::NotFound(format!("message {message_id} has no Subject header"))
    })?;
    let rfc_message_id = message_id_header(&message.headers).ok_or_else(|| {
        AppError::NotFound(format!("message {message_id} has no Message-ID header"))
    })?;

    Ok(ResolvedThreadContext {
        subject: format!("Re: {subject}"),
        in_reply_to: rfc_message_id.to_string(),
        references: rfc_message_id.to_string(),
        thread_id: message.thread_id,
    })
}

fn subject_header(headers: &[MessageHeader]) -> Option<&str> {
    headers
        .iter()
        .find(|header| header.name == SUBJECT_HEADER)
        .map(|header| header.value.as_str())
}

// Providers disagree on `Message-ID` vs `Message-Id`.
fn message_id_header(headers: &[MessageHeader]) -> Option<&str> {
    headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(MESSAGE_ID_HEADER))
        .map(|header| header.value.as_str())
}
