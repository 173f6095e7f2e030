use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::mail::mime;
use crate::mail::request::TransportSendOptions;
use crate::mail::sources;

use super::messages;
use super::models::{MessageHeader, MessageRecord, SendResult, UserInfo};
use super::{CurrentUser, MailTransport, MessageStore};

const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Gmail REST client bound to one access token.
#[derive(Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
    userinfo_url: String,
    access_token: String,
}

impl GmailClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: GMAIL_API_BASE_URL.to_string(),
            userinfo_url: GOOGLE_USERINFO_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_userinfo_url(mut self, userinfo_url: impl Into<String>) -> Self {
        self.userinfo_url = userinfo_url.into();
        self
    }

    pub async fn user_info(&self) -> AppResult<UserInfo> {
        let url = Url::parse(&self.userinfo_url)?;
        tracing::debug!(url = %url, "fetching current user");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let resource: GoogleUserInfo = parse_json_response(response).await?;
        resource.into_user_info()
    }

    pub async fn get_message(&self, id: &str) -> AppResult<MessageRecord> {
        let endpoint = messages::message_endpoint(id)?;
        let query = messages::get_query();
        tracing::debug!(message_id = id, "fetching message metadata");
        let resource: GmailMessageResource = self.get_json(&endpoint, Some(&query)).await?;
        resource.into_record()
    }

    pub async fn send_message(&self, options: &TransportSendOptions) -> AppResult<SendResult> {
        let attachments = sources::load_attachments(&self.http, &options.attachments).await?;
        let raw = mime::build_raw_message(options, &attachments);
        let request = GmailSendRequest {
            raw,
            thread_id: options.thread_id.clone(),
        };

        tracing::debug!(
            attachments = attachments.len(),
            thread_id = ?options.thread_id,
            "posting message to gmail"
        );
        let response: GmailSendResponse = self.post_json(messages::send_endpoint(), &request).await?;

        Ok(SendResult {
            id: response.id,
            thread_id: response.thread_id,
            label_ids: response.label_ids.unwrap_or_default(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&[(String, String)]>,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self.http.get(url).bearer_auth(&self.access_token);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        parse_json_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        parse_json_response(response).await
    }

    fn endpoint_url(&self, endpoint: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(endpoint.trim_start_matches('/'));
        Ok(url)
    }
}

impl fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GmailClient")
            .field("base_url", &self.base_url)
            .field("userinfo_url", &self.userinfo_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CurrentUser for GmailClient {
    async fn resolve(&self) -> AppResult<UserInfo> {
        self.user_info().await
    }
}

#[async_trait]
impl MessageStore for GmailClient {
    async fn get_message(&self, id: &str) -> AppResult<MessageRecord> {
        GmailClient::get_message(self, id).await
    }
}

#[async_trait]
impl MailTransport for GmailClient {
    async fn send(&self, options: &TransportSendOptions) -> AppResult<SendResult> {
        self.send_message(options).await
    }
}

async fn parse_json_response<T: DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(map_api_error(status, &body))
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    name: Option<String>,
    email: Option<String>,
}

impl GoogleUserInfo {
    fn into_user_info(self) -> AppResult<UserInfo> {
        let email = self
            .email
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::Auth(
                    "userinfo response has no email; the token needs the `email` scope"
                        .to_string(),
                )
            })?;

        Ok(UserInfo {
            name: self.name.unwrap_or_default(),
            email,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GmailMessageResource {
    id: String,
    #[serde(rename = "threadId")]
    thread_id: Option<String>,
    payload: Option<GmailMessagePayload>,
}

impl GmailMessageResource {
    fn into_record(self) -> AppResult<MessageRecord> {
        let Some(thread_id) = self.thread_id.filter(|value| !value.is_empty()) else {
            return Err(AppError::Transport(format!(
                "gmail api returned message {} without a threadId",
                self.id
            )));
        };

        let headers = self
            .payload
            .and_then(|payload| payload.headers)
            .unwrap_or_default()
            .into_iter()
            .map(|header| MessageHeader::new(header.name, header.value))
            .collect();

        Ok(MessageRecord {
            id: self.id,
            thread_id,
            headers,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GmailMessagePayload {
    headers: Option<Vec<GmailMessageHeader>>,
}

#[derive(Debug, Deserialize)]
struct GmailMessageHeader {
    name: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct GmailSendRequest {
    raw: String,
    #[serde(rename = "threadId", skip_serializing_if = "Option::is_none")]
    thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GmailSendResponse {
    id: String,
    #[serde(rename = "threadId")]
    thread_id: Option<String>,
    #[serde(rename = "labelIds")]
    label_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorEnvelope {
    error: GmailApiError,
}

#[derive(Debug, Deserialize)]
struct GmailApiError {
    code: Option<u16>,
    status: Option<String>,
    message: Option<String>,
    errors: Option<Vec<GmailApiErrorDetail>>,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorDetail {
    reason: Option<String>,
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(format!(
            "gmail api authorization failed ({status}): {message}. supply a fresh access token"
        )),
        StatusCode::NOT_FOUND => {
            AppError::NotFound(format!("gmail api request failed ({status}): {message}"))
        }
        _ => AppError::Transport(format!("gmail api request failed ({status}): {message}")),
    }
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<GmailApiErrorEnvelope>(body).ok()?;
    let mut parts = Vec::new();

    if let Some(message) = envelope.error.message {
        parts.push(message);
    }

    if let Some(status) = envelope.error.status {
        parts.push(format!("status={status}"));
    }

    if let Some(code) = envelope.error.code {
        parts.push(format!("code={code}"));
    }

    if let Some(reason) = envelope
        .error
        .errors
        .and_then(|errors| errors.into_iter().find_map(|detail| detail.reason))
    {
        parts.push(format!("reason={reason}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(parts.join(", "))
}
