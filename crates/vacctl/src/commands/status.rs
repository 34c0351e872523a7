//! Read-side handlers: status and firmware version.

use vacctl_core::{Command as CoreCommand, CommandResult, Vacuum};

use crate::cli::{GlobalOpts, OutputFormat, StatusArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(vacuum: &Vacuum, args: &StatusArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let status = vacuum.status(args.force).await?;
    let rendered = output::render_status(global.output, &status, output::should_color(global.color))?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

pub async fn version(vacuum: &Vacuum, global: &GlobalOpts) -> Result<(), CliError> {
    let CommandResult::Version(release) = vacuum.execute(CoreCommand::Version).await? else {
        return Err(CliError::Internal("version query returned no version".into()));
    };

    let rendered = match global.output {
        OutputFormat::Table | OutputFormat::Plain => release,
        format => output::render_single(
            format,
            &serde_json::json!({ "version": release }),
            ToString::to_string,
            ToString::to_string,
        )?,
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}
