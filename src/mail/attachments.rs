use crate::mail::request::{AttachmentDescriptor, AttachmentMap};

/// Turns the filename to source map into transport descriptors, in map order.
///
/// A non-blank `mime_type` is applied to every descriptor. Without one the
/// content type stays unset and the transport infers it from the extension.
pub fn normalize_attachments(
    attachments: &AttachmentMap,
    mime_type: Option<&str>,
) -> Vec<AttachmentDescriptor> {
    let content_type = mime_type.filter(|value| !value.trim().is_empty());

    attachments
        .iter()
        .map(|(filename, source)| AttachmentDescriptor {
            filename: filename.to_string(),
            source: source.to_string(),
            content_type: content_type.map(ToOwned::to_owned),
        })
        .collect()
}
