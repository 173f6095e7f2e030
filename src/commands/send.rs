use std::fs;
use std::io::{self, Read};

use crate::cli::SendArgs;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::mail::compose::SendEmailAction;
use crate::mail::request::{AttachmentMap, SendRequest};

pub async fn run(ctx: &AppContext, args: SendArgs) -> AppResult<()> {
    let request = build_send_request(ctx, args)?;
    let client = ctx.gmail_client()?;
    let action = SendEmailAction::new(&client, &client, &client);
    let outcome = action.run(request).await?;

    ctx.output.emit(&outcome.summary, &outcome.response)
}

fn build_send_request(ctx: &AppContext, args: SendArgs) -> AppResult<SendRequest> {
    let body = read_body(&args)?;
    let from_name = args
        .from_name
        .or_else(|| ctx.settings.sender_name().map(ToOwned::to_owned));
    let attachments = collect_attachments(args.attachment);

    Ok(SendRequest {
        to: args.to,
        cc: args.cc,
        bcc: args.bcc,
        from_name,
        reply_to: args.reply_to,
        subject: args.subject,
        body,
        body_type: args.body_type,
        attachments,
        mime_type: args.mime_type,
        in_reply_to: args.in_reply_to,
    })
}

fn collect_attachments(pairs: Vec<(String, String)>) -> Option<AttachmentMap> {
    if pairs.is_empty() {
        return None;
    }

    Some(pairs.into_iter().collect())
}

fn read_body(args: &SendArgs) -> AppResult<String> {
    let selected = [
        args.body.is_some(),
        args.body_file.is_some(),
        args.stdin,
    ]
    .into_iter()
    .filter(|selected| *selected)
    .count();

    if selected > 1 {
        return Err(AppError::InvalidInput(
            "pass only one body source: --body, --body-file, or --stdin".to_string(),
        ));
    }

    if let Some(body) = &args.body {
        return Ok(body.clone());
    }

    if let Some(path) = &args.body_file {
        return Ok(fs::read_to_string(path)?);
    }

    if args.stdin {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        return Ok(body);
    }

    Ok(String::new())
}
