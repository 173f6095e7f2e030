use std::time::SystemTime;

use crate::api::client::GmailClient;
use crate::auth::{FileTokenStore, TokenStore};
use crate::config::{self, AppPaths, Settings};
use crate::error::{AppError, AppResult};
use crate::mail::mime_types::MimeGuessRegistry;
use crate::output::Output;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub settings: Settings,
    pub token_store: FileTokenStore,
    pub mime_registry: MimeGuessRegistry,
    pub output: Output,
    access_token_override: Option<String>,
}

impl AppContext {
    pub fn bootstrap(profile: String, json: bool, access_token: Option<String>) -> AppResult<Self> {
        Self::with_paths(AppPaths::discover()?, &profile, json, access_token)
    }

    pub fn with_paths(
        paths: AppPaths,
        profile: &str,
        json: bool,
        access_token: Option<String>,
    ) -> AppResult<Self> {
        let profile = config::resolve_profile(profile);
        let settings = config::load_settings(&paths, &profile)?;

        tracing::debug!(profile = %profile, "loaded profile settings");

        Ok(Self {
            profile,
            settings,
            token_store: FileTokenStore::new(paths),
            mime_registry: MimeGuessRegistry::default(),
            output: Output::new(json),
            access_token_override: access_token,
        })
    }

    pub fn access_token(&self) -> AppResult<String> {
        if let Some(token) = self
            .access_token_override
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            return Ok(token.to_string());
        }

        let token = self.token_store.load(&self.profile)?.ok_or_else(|| {
            AppError::Auth(format!(
                "no access token for profile `{}`. pass --access-token or set GMAIL_ACCESS_TOKEN",
                self.profile
            ))
        })?;

        if token.is_expired(SystemTime::now()) {
            return Err(AppError::Auth(format!(
                "stored access token for profile `{}` has expired",
                self.profile
            )));
        }

        Ok(token.access_token)
    }

    pub fn gmail_client(&self) -> AppResult<GmailClient> {
        let mut client = GmailClient::new(self.access_token()?);
        if let Some(base_url) = self.settings.api_base_url.as_deref() {
            client = client.with_base_url(base_url);
        }
        if let Some(userinfo_url) = self.settings.userinfo_url.as_deref() {
            client = client.with_userinfo_url(userinfo_url);
        }
        Ok(client)
    }
}
