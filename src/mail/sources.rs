//! Resolves attachment sources into bytes at send time.
//!
//! `http://` and `https://` sources are downloaded, anything else is read
//! from the local filesystem. Unreadable sources are transport errors.

use std::fs;
use std::path::Path;

use reqwest::Client;

use crate::api::models::Attachment;
use crate::error::{AppError, AppResult};
use crate::mail::request::AttachmentDescriptor;

pub async fn load_attachments(
    http: &Client,
    descriptors: &[AttachmentDescriptor],
) -> AppResult<Vec<Attachment>> {
    let mut attachments = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        let data = if is_remote(&descriptor.source) {
            fetch_remote(http, descriptor).await?
        } else {
            read_local(descriptor)?
        };

        attachments.push(Attachment {
            filename: descriptor.filename.clone(),
            mime_type: content_type_for(descriptor),
            data,
        });
    }

    Ok(attachments)
}

pub fn content_type_for(descriptor: &AttachmentDescriptor) -> String {
    if let Some(content_type) = descriptor.content_type.as_deref() {
        return content_type.to_string();
    }

    let guess = mime_guess::from_path(&descriptor.filename);
    if guess.is_empty() {
        tracing::warn!(
            filename = %descriptor.filename,
            "no content type for attachment extension; using application/octet-stream"
        );
    }

    guess.first_or_octet_stream().essence_str().to_string()
}

fn is_remote(source: &str) -> bool {
    let lower = source.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn fetch_remote(http: &Client, descriptor: &AttachmentDescriptor) -> AppResult<Vec<u8>> {
    tracing::debug!(filename = %descriptor.filename, source = %descriptor.source, "downloading attachment");

    let response = http.get(descriptor.source.trim()).send().await.map_err(|err| {
        AppError::Transport(format!(
            "failed to download attachment `{}` from {}: {err}",
            descriptor.filename, descriptor.source
        ))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Transport(format!(
            "failed to download attachment `{}` from {} ({status})",
            descriptor.filename, descriptor.source
        )));
    }

    Ok(response.bytes().await?.to_vec())
}

fn read_local(descriptor: &AttachmentDescriptor) -> AppResult<Vec<u8>> {
    let path = Path::new(&descriptor.source);
    tracing::debug!(filename = %descriptor.filename, path = %path.display(), "reading attachment");

    fs::read(path).map_err(|err| {
        AppError::Transport(format!(
            "failed to read attachment `{}` from {}: {err}",
            descriptor.filename,
            path.display()
        ))
    })
}
