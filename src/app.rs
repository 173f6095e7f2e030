use crate::cli::{Cli, Command};
use crate::commands;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::telemetry;

pub async fn run(cli: Cli) -> AppResult<()> {
    let Cli {
        profile,
        json,
        verbose,
        access_token,
        command,
    } = cli;

    telemetry::init(verbose);
    let ctx = AppContext::bootstrap(profile, json, access_token)?;

    match command {
        Command::Send(args) => commands::send::run(&ctx, args).await,
        Command::MimeTypes(args) => commands::mime_types::run(&ctx, args),
    }
}
