use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::api::models::SendResult;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    #[default]
    #[value(name = "plaintext")]
    #[serde(rename = "plaintext")]
    PlainText,
    Html,
}

/// Ordered filename to source mapping.
///
/// Filenames are unique. Inserting an existing filename replaces its source
/// but keeps the position it was first inserted at.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AttachmentMap {
    entries: Vec<(String, String)>,
}

impl AttachmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        filename: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<String> {
        let filename = filename.into();
        let source = source.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| *name == filename) {
            return Some(std::mem::replace(existing, source));
        }

        self.entries.push((filename, source));
        None
    }

    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, source)| source.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, source)| (name.as_str(), source.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttachmentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (filename, source) in iter {
            map.insert(filename, source);
        }
        map
    }
}

/// Caller input for one send.
#[derive(Debug, Clone, Default)]
pub struct SendRequest {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    /// Overrides the account display name in the From header.
    pub from_name: Option<String>,
    pub reply_to: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    pub body_type: BodyType,
    pub attachments: Option<AttachmentMap>,
    /// Content type applied to every attachment instead of extension lookup.
    pub mime_type: Option<String>,
    /// Gmail message id of the message being replied to.
    pub in_reply_to: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResolvedThreadContext {
    pub subject: String,
    pub in_reply_to: String,
    pub references: String,
    pub thread_id: String,
}

/// Outcome of reply-thread resolution.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ThreadLink {
    /// No reply was requested.
    NewThread,
    Resolved(ResolvedThreadContext),
    /// Lookup failed; the requested id is used as the thread id as-is.
    ThreadIdOnly(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct AttachmentDescriptor {
    pub filename: String,
    pub source: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum MessageBody {
    Text(String),
    Html(String),
}

impl MessageBody {
    pub fn new(body: String, body_type: BodyType) -> Self {
        match body_type {
            BodyType::PlainText => Self::Text(body),
            BodyType::Html => Self::Html(body),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(body) => Some(body),
            Self::Html(_) => None,
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Html(body) => Some(body),
            Self::Text(_) => None,
        }
    }
}

/// An address with an optional display name.
///
/// The name is kept as typed; quoting and encoding happen when the header is written.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            address: address.into(),
        }
    }

    pub fn bare(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }
}

/// Flattened, transport-ready message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransportSendOptions {
    pub from: Mailbox,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: MessageBody,
    pub attachments: Vec<AttachmentDescriptor>,
    pub in_reply_to: Option<String>,
    pub references: Option<String>,
    pub thread_id: Option<String>,
}

impl TransportSendOptions {
    pub fn apply_thread(&mut self, link: ThreadLink) {
        match link {
            ThreadLink::NewThread => {}
            ThreadLink::Resolved(context) => {
                self.subject = context.subject;
                self.in_reply_to = Some(context.in_reply_to);
                self.references = Some(context.references);
                self.thread_id = Some(context.thread_id);
            }
            ThreadLink::ThreadIdOnly(thread_id) => {
                self.thread_id = Some(thread_id);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub response: SendResult,
    pub summary: String,
}
