//! Collaborators the send action depends on, plus their Gmail implementation.

pub mod client;
pub mod messages;
pub mod models;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::mail::request::TransportSendOptions;

use models::{MessageRecord, SendResult, UserInfo};

/// Resolves the authenticated account.
#[async_trait]
pub trait CurrentUser: Send + Sync {
    async fn resolve(&self) -> AppResult<UserInfo>;
}

/// Looks up an existing message by its provider id.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn get_message(&self, id: &str) -> AppResult<MessageRecord>;
}

/// Delivers a composed message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, options: &TransportSendOptions) -> AppResult<SendResult>;
}
