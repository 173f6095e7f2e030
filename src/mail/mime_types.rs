//! Content-type options offered for the attachment `--mime-type` override.

use std::collections::BTreeSet;

/// Source of selectable content types.
pub trait MimeRegistry {
    /// Sorted, de-duplicated content types.
    fn content_types(&self) -> Vec<String>;
}

const COMMON_EXTENSIONS: &[&str] = &[
    "7z", "aac", "avi", "bmp", "bz2", "css", "csv", "doc", "docx", "eml", "epub", "gif", "gz",
    "htm", "html", "ico", "ics", "jpeg", "jpg", "js", "json", "m4a", "md", "mid", "mov", "mp3",
    "mp4", "mpeg", "odp", "ods", "odt", "oga", "ogg", "ogv", "otf", "pdf", "png", "ppt", "pptx",
    "rar", "rtf", "svg", "tar", "tif", "tiff", "ttf", "txt", "vcf", "wav", "weba", "webm",
    "webp", "woff", "woff2", "xhtml", "xls", "xlsx", "xml", "yaml", "zip",
];

/// Registry backed by the `mime_guess` extension table.
#[derive(Debug, Clone)]
pub struct MimeGuessRegistry {
    extensions: Vec<String>,
}

impl MimeGuessRegistry {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for MimeGuessRegistry {
    fn default() -> Self {
        Self::new(COMMON_EXTENSIONS.iter().copied())
    }
}

impl MimeRegistry for MimeGuessRegistry {
    fn content_types(&self) -> Vec<String> {
        let mut types = BTreeSet::new();
        for extension in &self.extensions {
            for mime in mime_guess::from_ext(extension).iter() {
                types.insert(mime.essence_str().to_string());
            }
        }
        types.into_iter().collect()
    }
}

pub fn filter_content_types(registry: &dyn MimeRegistry, needle: Option<&str>) -> Vec<String> {
    let needle = needle
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    registry
        .content_types()
        .into_iter()
        .filter(|content_type| {
            needle
                .as_deref()
                .is_none_or(|needle| content_type.contains(needle))
        })
        .collect()
}
