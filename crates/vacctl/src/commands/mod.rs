//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod status;
pub mod watch;

use vacctl_core::{Command as CoreCommand, Vacuum};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, vacuum: &Vacuum, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::handle(vacuum, &args, global).await,
        Command::Watch => watch::handle(vacuum, global).await,
        Command::Version => status::version(vacuum, global).await,

        Command::Clean(args) => control::run(vacuum, CoreCommand::Clean { on: !args.off }, global).await,
        Command::Stop => control::run(vacuum, CoreCommand::Stop, global).await,
        Command::Pause => control::run(vacuum, CoreCommand::Pause, global).await,
        Command::Spot(args) => control::run(vacuum, CoreCommand::Spot { on: !args.off }, global).await,
        Command::Home => control::run(vacuum, CoreCommand::Home { on: true }, global).await,
        Command::Find => control::run(vacuum, CoreCommand::Locate, global).await,
        Command::HighSpeed(args) => {
            control::run(vacuum, CoreCommand::HighSpeed { on: args.state.is_on() }, global).await
        }
        Command::Mop(args) => {
            control::run(vacuum, CoreCommand::Mop { on: args.state.is_on() }, global).await
        }

        // Config and Completions are handled before a session is built.
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command reached device dispatch".into(),
        )),
    }
}
