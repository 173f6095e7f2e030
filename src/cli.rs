use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::mail::request::BodyType;

#[derive(Debug, Parser)]
#[command(
    name = "gmail-send",
    version,
    about = "Compose and send email through the Gmail API"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "default",
        help = "Profile name to use"
    )]
    pub profile: String,
    #[arg(long, global = true, help = "Emit JSON output")]
    pub json: bool,
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Verbose logging")]
    pub verbose: u8,
    #[arg(
        long,
        global = true,
        env = "GMAIL_ACCESS_TOKEN",
        hide_env_values = true,
        help = "OAuth access token (overrides the stored profile token)"
    )]
    pub access_token: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Send(SendArgs),
    MimeTypes(MimeTypesArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "Recipient addresses")]
    pub to: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "CC addresses")]
    pub cc: Vec<String>,
    #[arg(long, value_delimiter = ',', num_args = 1.., help = "BCC addresses")]
    pub bcc: Vec<String>,
    #[arg(long, help = "Display name for the From header")]
    pub from_name: Option<String>,
    #[arg(long, help = "Reply-To address, if different from the sender")]
    pub reply_to: Option<String>,
    #[arg(long, visible_alias = "subj", help = "Email subject")]
    pub subject: Option<String>,
    #[arg(long, help = "Inline body text")]
    pub body: Option<String>,
    #[arg(long, help = "Read body from file")]
    pub body_file: Option<PathBuf>,
    #[arg(long, help = "Read body from stdin")]
    pub stdin: bool,
    #[arg(long, value_enum, default_value_t = BodyType::PlainText, help = "Send the body as plain text or HTML")]
    pub body_type: BodyType,
    #[arg(
        long,
        action = ArgAction::Append,
        value_parser = parse_attachment,
        value_name = "FILENAME=SOURCE",
        help = "Attach a file from a URL or local path (repeatable)"
    )]
    pub attachment: Vec<(String, String)>,
    #[arg(long, help = "Content type for every attachment, overriding extension lookup")]
    pub mime_type: Option<String>,
    #[arg(long, help = "Gmail message id this email replies to")]
    pub in_reply_to: Option<String>,
}

#[derive(Debug, Args)]
pub struct MimeTypesArgs {
    #[arg(long, help = "Only show content types containing this text")]
    pub filter: Option<String>,
}

fn parse_attachment(raw: &str) -> Result<(String, String), String> {
    let Some((filename, source)) = raw.split_once('=') else {
        return Err(format!("expected FILENAME=SOURCE, got `{raw}`"));
    };

    let filename = filename.trim();
    let source = source.trim();
    if filename.is_empty() || source.is_empty() {
        return Err(format!(
            "attachment filename and source must both be set in `{raw}`"
        ));
    }

    Ok((filename.to_string(), source.to_string()))
}
