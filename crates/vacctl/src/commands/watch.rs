//! `watch`: keep the synchronizer polling and print each status change
//! and device event until interrupted.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use vacctl_core::{CanonicalStatus, Vacuum};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(vacuum: &Vacuum, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let mut updates = vacuum.subscribe();
    let mut events = vacuum.events();
    let mut last: Option<Arc<CanonicalStatus>> = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    vacuum.start();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(status) = updates.borrow_and_update().clone() else {
                    continue;
                };
                if last.as_deref() == Some(&*status) {
                    continue;
                }
                let line = output::render_status_line(global.output, &status, chrono::Local::now(), color)?;
                output::print_output(&line, global.quiet);
                last = Some(status);
            }
            event = events.recv() => match event {
                Ok(event) => {
                    let line = output::render_event(global.output, &event, chrono::Local::now())?;
                    output::print_output(&line, global.quiet);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            signal = &mut ctrl_c => {
                signal?;
                tracing::debug!("interrupted");
                break;
            }
        }
    }

    vacuum.shutdown();
    Ok(())
}
