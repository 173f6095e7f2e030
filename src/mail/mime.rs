use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

use crate::api::models::Attachment;
use crate::mail::request::{Mailbox, MessageBody, TransportSendOptions};

/// Builds the base64url encoded RFC 5322 message the Gmail send endpoint expects.
pub fn build_raw_message(options: &TransportSendOptions, attachments: &[Attachment]) -> String {
    let mut headers = build_base_headers(options);
    let body_content_type = body_content_type(&options.body);

    let payload = if attachments.is_empty() {
        headers.push(body_content_type.to_string());
        format!("{}\r\n\r\n{}", headers.join("\r\n"), body_text(&options.body))
    } else {
        let boundary = random_boundary();
        headers.push(format!(
            "Content-Type: multipart/mixed; boundary=\"{boundary}\""
        ));
        format!(
            "{}\r\n\r\n{}",
            headers.join("\r\n"),
            multipart_body(options, attachments, &boundary)
        )
    };

    URL_SAFE_NO_PAD.encode(payload.as_bytes())
}

/// Strips characters that would break out of a header line or a quoted parameter value.
pub fn sanitize_header_value(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|value| *value != '\r' && *value != '\n' && *value != '"')
        .collect()
}

fn build_base_headers(options: &TransportSendOptions) -> Vec<String> {
    let mut headers = Vec::new();
    headers.push(format!("From: {}", format_mailbox(&options.from)));
    headers.push(format!("To: {}", address_list(&options.to)));

    let cc = address_list(&options.cc);
    if !cc.is_empty() {
        headers.push(format!("Cc: {cc}"));
    }

    let bcc = address_list(&options.bcc);
    if !bcc.is_empty() {
        headers.push(format!("Bcc: {bcc}"));
    }

    if let Some(reply_to) = &options.reply_to {
        headers.push(format!("Reply-To: {}", header_line(reply_to)));
    }

    headers.push(format!("Subject: {}", encode_subject(&options.subject)));
    if let Some(in_reply_to) = &options.in_reply_to {
        headers.push(format!("In-Reply-To: {}", header_line(in_reply_to)));
    }
    if let Some(references) = &options.references {
        headers.push(format!("References: {}", header_line(references)));
    }
    headers.push("MIME-Version: 1.0".to_string());

    headers
}

fn multipart_body(
    options: &TransportSendOptions,
    attachments: &[Attachment],
    boundary: &str,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str(body_content_type(&options.body));
    out.push_str("\r\n\r\n");
    out.push_str(body_text(&options.body));
    out.push_str("\r\n");

    for attachment in attachments {
        out.push_str(&format!("--{boundary}\r\n"));
        out.push_str(&format!(
            "Content-Type: {}; name=\"{}\"\r\n",
            header_line(&attachment.mime_type),
            sanitize_header_value(&attachment.filename)
        ));
        out.push_str("Content-Transfer-Encoding: base64\r\n");
        out.push_str(&format!(
            "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
            sanitize_header_value(&attachment.filename)
        ));

        let encoded = STANDARD.encode(&attachment.data);
        out.push_str(&fold_base64_lines(&encoded));
    }

    out.push_str(&format!("--{boundary}--\r\n"));
    out
}

fn body_content_type(body: &MessageBody) -> &'static str {
    match body {
        MessageBody::Text(_) => "Content-Type: text/plain; charset=utf-8",
        MessageBody::Html(_) => "Content-Type: text/html; charset=utf-8",
    }
}

fn body_text(body: &MessageBody) -> &str {
    match body {
        MessageBody::Text(body) | MessageBody::Html(body) => body,
    }
}

fn address_list(addresses: &[String]) -> String {
    addresses
        .iter()
        .map(|address| header_line(address))
        .filter(|address| !address.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_mailbox(mailbox: &Mailbox) -> String {
    let address = header_line(&mailbox.address);
    let name = mailbox
        .name
        .as_deref()
        .map(header_line)
        .filter(|name| !name.is_empty());

    match name {
        Some(name) => format!("{} <{address}>", display_name(&name)),
        None => address,
    }
}

/// Quoted-string per RFC 5322, or an RFC 2047 encoded word for non-ASCII names.
fn display_name(name: &str) -> String {
    if !name.is_ascii() {
        return encoded_word(name);
    }

    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn header_line(value: &str) -> String {
    value
        .chars()
        .filter(|value| *value != '\r' && *value != '\n')
        .collect::<String>()
        .trim()
        .to_string()
}

fn encode_subject(subject: &str) -> String {
    let subject = header_line(subject);
    if subject.is_ascii() {
        return subject;
    }

    encoded_word(&subject)
}

fn encoded_word(value: &str) -> String {
    format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
}

fn fold_base64_lines(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 76 + 8);
    let mut start = 0;
    while start < input.len() {
        let end = (start + 76).min(input.len());
        out.push_str(&input[start..end]);
        out.push_str("\r\n");
        start = end;
    }
    out
}

fn random_boundary() -> String {
    let mut bytes = [0_u8; 12];
    rand::thread_rng().fill(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    format!("gmail-send-{token}")
}
