//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits bare values for scripting.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Local, SecondsFormat};
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use vacctl_core::{CanonicalStatus, CleanerState, LOW_BATTERY_THRESHOLD, VacuumEvent};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn paint_state(state: CleanerState, color: bool) -> String {
    let text = state.to_string();
    if !color {
        return text;
    }
    match state {
        CleanerState::Cleaning | CleanerState::SpotCleaning => text.green().to_string(),
        CleanerState::Returning | CleanerState::Moving | CleanerState::Paused => {
            text.yellow().to_string()
        }
        CleanerState::Error => text.red().bold().to_string(),
        _ => text.cyan().to_string(),
    }
}

fn paint_battery(level: u8, color: bool) -> String {
    let text = format!("{level}%");
    if color && level < LOW_BATTERY_THRESHOLD {
        text.red().to_string()
    } else {
        text
    }
}

// ── Views ────────────────────────────────────────────────────────────

/// Status plus the derived flags consumers usually want.
#[derive(Debug, Serialize)]
struct StatusView<'a> {
    #[serde(flatten)]
    status: &'a CanonicalStatus,
    battery_low: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_at: Option<String>,
}

impl<'a> StatusView<'a> {
    fn new(status: &'a CanonicalStatus, at: Option<DateTime<Local>>) -> Self {
        Self {
            status,
            battery_low: status.battery_level < LOW_BATTERY_THRESHOLD,
            observed_at: at.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, false)),
        }
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn status_rows(status: &CanonicalStatus, color: bool) -> Vec<FieldRow> {
    let row = |field, value| FieldRow { field, value };
    vec![
        row("State", paint_state(status.state, color)),
        row("Mode", status.cleaning_mode.to_string()),
        row("Battery", paint_battery(status.battery_level, color)),
        row("Charge", status.battery_charge_state.to_string()),
        row(
            "Fan power",
            status
                .fan_power
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        ),
    ]
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// `detail_fn` renders the table view, `plain_fn` the scripting view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// One-shot status view.
pub fn render_status(
    format: OutputFormat,
    status: &CanonicalStatus,
    color: bool,
) -> Result<String, CliError> {
    render_single(
        format,
        &StatusView::new(status, None),
        |v| render_table(&status_rows(v.status, color)),
        |v| plain_status(v.status),
    )
}

/// One line per observed status in `watch`. Structured formats always
/// use compact JSON so the stream stays line-delimited.
pub fn render_status_line(
    format: OutputFormat,
    status: &CanonicalStatus,
    at: DateTime<Local>,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(format!(
            "{}  {}  battery {}  {}  fan {}",
            at.format("%H:%M:%S"),
            paint_state(status.state, color),
            paint_battery(status.battery_level, color),
            status.battery_charge_state,
            status
                .fan_power
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string),
        )),
        OutputFormat::Plain => Ok(plain_status(status).replace('\n', "\t")),
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            render_json(&StatusView::new(status, Some(at)), true)
        }
    }
}

/// Out-of-band events in `watch`.
pub fn render_event(
    format: OutputFormat,
    event: &VacuumEvent,
    at: DateTime<Local>,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            render_json(event, true)
        }
        OutputFormat::Table | OutputFormat::Plain => Ok(match event {
            VacuumEvent::LocateFinished => format!("{}  locate finished", at.format("%H:%M:%S")),
            VacuumEvent::RefreshFailed { message } => {
                format!("{}  refresh failed: {message}", at.format("%H:%M:%S"))
            }
        }),
    }
}

fn plain_status(status: &CanonicalStatus) -> String {
    [
        status.state.to_string(),
        status.battery_level.to_string(),
        status.battery_charge_state.to_string(),
    ]
    .join("\n")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use vacctl_core::{BatteryChargeState, CleaningMode, FanPower};

    use super::*;

    fn status() -> CanonicalStatus {
        CanonicalStatus {
            state: CleanerState::Cleaning,
            cleaning_mode: CleaningMode::None,
            battery_level: 15,
            battery_charge_state: BatteryChargeState::Discharging,
            fan_power: Some(FanPower::Modern("high".into())),
        }
    }

    #[test]
    fn json_flattens_status_and_flags_low_battery() {
        let out = render_status(OutputFormat::JsonCompact, &status(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["state"], "cleaning");
        assert_eq!(value["battery_level"], 15);
        assert_eq!(value["battery_low"], true);
        assert_eq!(value["fan_power"], "high");
        assert!(value.get("observed_at").is_none());
    }

    #[test]
    fn table_lists_every_field() {
        let out = render_status(OutputFormat::Table, &status(), false).unwrap();
        for needle in ["State", "cleaning", "Battery", "15%", "Fan power", "high"] {
            assert!(out.contains(needle), "missing {needle} in:\n{out}");
        }
    }

    #[test]
    fn plain_is_one_value_per_line() {
        let out = render_status(OutputFormat::Plain, &status(), false).unwrap();
        assert_eq!(out, "cleaning\n15\ndischarging");
    }

    #[test]
    fn watch_json_lines_carry_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let out = render_status_line(OutputFormat::Yaml, &status(), at, false).unwrap();
        assert!(!out.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value["observed_at"].as_str().unwrap().starts_with("2024-05-01T12:30:00"));
    }

    #[test]
    fn events_render_as_tagged_json() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let out = render_event(OutputFormat::Json, &VacuumEvent::LocateFinished, at).unwrap();
        assert_eq!(out, r#"{"event":"locate_finished"}"#);

        let text = render_event(OutputFormat::Table, &VacuumEvent::LocateFinished, at).unwrap();
        assert_eq!(text, "12:30:00  locate finished");
    }
}
