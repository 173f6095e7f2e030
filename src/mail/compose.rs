//! The compose-and-send action.

use tracing::Instrument;

use crate::api::models::UserInfo;
use crate::api::{CurrentUser, MailTransport, MessageStore};
use crate::error::{AppError, AppResult};
use crate::mail::attachments::normalize_attachments;
use crate::mail::request::{Mailbox, MessageBody, SendOutcome, SendRequest, TransportSendOptions};
use crate::mail::thread::resolve_thread;

/// Composes a message from a [`SendRequest`] and hands it to the transport.
///
/// Calls happen strictly in order: current user, optional reply lookup, send.
/// Only the reply lookup is allowed to fail quietly.
pub struct SendEmailAction<'a> {
    current_user: &'a dyn CurrentUser,
    messages: &'a dyn MessageStore,
    transport: &'a dyn MailTransport,
}

impl<'a> SendEmailAction<'a> {
    pub fn new(
        current_user: &'a dyn CurrentUser,
        messages: &'a dyn MessageStore,
        transport: &'a dyn MailTransport,
    ) -> Self {
        Self {
            current_user,
            messages,
            transport,
        }
    }

    pub async fn run(&self, request: SendRequest) -> AppResult<SendOutcome> {
        let subject = validate(&request)?;
        let span = tracing::info_span!(
            "gmail_send.send",
            to = ?request.to,
            subject = %subject,
            reply = request.in_reply_to.is_some(),
        );

        self.compose_and_send(request, subject).instrument(span).await
    }

    async fn compose_and_send(
        &self,
        request: SendRequest,
        subject: String,
    ) -> AppResult<SendOutcome> {
        tracing::debug!("resolving current user");
        let user = self.current_user.resolve().await?;
        let from = format_sender(request.from_name.as_deref(), &user);

        let thread = resolve_thread(self.messages, request.in_reply_to.as_deref()).await;

        let attachments = request
            .attachments
            .as_ref()
            .map(|map| normalize_attachments(map, request.mime_type.as_deref()))
            .unwrap_or_default();

        let summary = format!("Successfully sent email to {}", request.to.join(","));

        let mut options = TransportSendOptions {
            from,
            to: request.to,
            cc: request.cc,
            bcc: request.bcc,
            reply_to: request.reply_to.filter(|value| !value.trim().is_empty()),
            subject,
            body: MessageBody::new(request.body, request.body_type),
            attachments,
            in_reply_to: None,
            references: None,
            thread_id: None,
        };
        options.apply_thread(thread);

        let response = match self.transport.send(&options).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "email delivery failed");
                return Err(err);
            }
        };
        tracing::info!(message_id = %response.id, thread_id = ?response.thread_id, "email sent");

        Ok(SendOutcome { response, summary })
    }
}

fn validate(request: &SendRequest) -> AppResult<String> {
    if request.to.iter().all(|address| address.trim().is_empty()) {
        return Err(AppError::Validation(
            "at least one `to` recipient is required".to_string(),
        ));
    }

    request
        .subject
        .clone()
        .filter(|subject| !subject.trim().is_empty())
        .ok_or_else(|| AppError::Validation("`subject` is required".to_string()))
}

fn format_sender(from_name: Option<&str>, user: &UserInfo) -> Mailbox {
    let address = user.email.trim();
    let name = from_name
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| Some(user.name.trim()).filter(|value| !value.is_empty()));

    match name {
        Some(name) => Mailbox::named(name, address),
        None => Mailbox::bare(address),
    }
}
