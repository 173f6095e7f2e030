use serde::Serialize;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

impl MessageHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageRecord {
    pub id: String,
    pub thread_id: String,
    /// Headers in the order the provider returned them.
    pub headers: Vec<MessageHeader>,
}

/// Attachment content ready for MIME encoding.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SendResult {
    pub id: String,
    pub thread_id: Option<String>,
    pub label_ids: Vec<String>,
}
