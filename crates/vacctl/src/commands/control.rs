//! Write-side handlers: every command that moves the robot or changes
//! its fan preset.

use vacctl_core::{Command as CoreCommand, Vacuum};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn run(vacuum: &Vacuum, cmd: CoreCommand, global: &GlobalOpts) -> Result<(), CliError> {
    tracing::debug!(command = ?cmd, "executing");
    vacuum.execute(cmd).await?;
    if !global.quiet {
        eprintln!("{}", done_message(cmd));
    }
    Ok(())
}

fn done_message(cmd: CoreCommand) -> &'static str {
    match cmd {
        CoreCommand::Clean { on: true } => "Cleaning started",
        CoreCommand::Clean { on: false } => "Cleaning stopped",
        CoreCommand::Stop => "Stopped",
        CoreCommand::Pause => "Paused",
        CoreCommand::Spot { .. } => "Spot cleaning started",
        CoreCommand::Home { .. } => "Returning to dock",
        CoreCommand::Locate => "Locate sound played",
        CoreCommand::HighSpeed { on: true } => "High-speed mode on",
        CoreCommand::HighSpeed { on: false } => "High-speed mode off",
        CoreCommand::Mop { on: true } => "Mop mode on",
        CoreCommand::Mop { on: false } => "Mop mode off",
        CoreCommand::Status { .. } | CoreCommand::Version => "Done",
    }
}
