use crate::cli::MimeTypesArgs;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::mail::mime_types::filter_content_types;

pub fn run(ctx: &AppContext, args: MimeTypesArgs) -> AppResult<()> {
    let types = filter_content_types(&ctx.mime_registry, args.filter.as_deref());
    ctx.output.emit_lines(&types, "0 content types", &types)
}
