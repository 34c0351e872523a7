//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&vacctl_config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = vacctl_config::load_config_or_default();
            let rendered = vacctl_config::render_masked(&cfg)?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }
    }
}
