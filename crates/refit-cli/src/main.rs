use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use refit_engine::{
    DependencyOverrideState, MANIPULATIONS_DISABLED_PROP, ManipulationError, ManipulationManager,
    ManipulationSession, OverrideConflict,
};
use refit_model::{DESCRIPTOR_FILE, load_project_graph, write_changed};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Sentinel written beside the root descriptor after a successful run; a
/// later run that finds it skips manipulation entirely. The engine has no
/// knowledge of this file.
const MARKER_FILE: &str = "refit-marker.txt";

#[derive(Parser, Debug)]
#[command(name = "refit")]
#[command(about = "Rewrites project descriptor metadata through the refit manipulation pipeline")]
struct Cli {
    /// Root project descriptor to operate on.
    #[arg(short = 'f', long = "file", default_value = DESCRIPTOR_FILE)]
    file: PathBuf,

    /// Settings TOML whose [properties] table seeds user properties.
    #[arg(short = 's', long = "settings")]
    settings: Option<PathBuf>,

    /// User properties as KEY=VALUE; repeatable, overrides settings.
    #[arg(short = 'D', value_name = "KEY=VALUE", action = ArgAction::Append)]
    defines: Vec<String>,

    /// Force debug-level logging.
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    debug: bool,

    /// Print the final report as JSON on stdout.
    #[arg(long = "report-json", action = ArgAction::SetTrue)]
    report_json: bool,
}

/// A fatal failure plus the exit code it maps to: 1 for usage,
/// configuration and IO problems, 2 for manipulation failures.
struct CliFailure {
    message: String,
    exit: u8,
}

impl CliFailure {
    fn usage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit: 1,
        }
    }
}

impl fmt::Display for CliFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<refit_model::ModelError> for CliFailure {
    fn from(error: refit_model::ModelError) -> Self {
        Self {
            message: error.to_string(),
            exit: 1,
        }
    }
}

impl From<ManipulationError> for CliFailure {
    fn from(error: ManipulationError) -> Self {
        let exit = match &error {
            ManipulationError::Config(_) => 1,
            ManipulationError::Scan { .. } | ManipulationError::Apply { .. } => 2,
        };
        Self {
            message: error.to_string(),
            exit,
        }
    }
}

#[derive(Serialize)]
struct RunReport {
    changed: Vec<String>,
    files_written: usize,
    conflicts: Vec<OverrideConflict>,
}

#[derive(Deserialize, Default)]
struct SettingsFile {
    #[serde(default)]
    properties: BTreeMap<String, String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(parse_error) => return usage_exit(parse_error),
    };
    init_tracing(cli.debug);
    match run(cli) {
        Ok(code) => code,
        Err(failure) => {
            eprintln!("error: {failure}");
            ExitCode::from(failure.exit)
        }
    }
}

/// Help and version requests exit 0. Any other parse failure maps to
/// exit 1, like the usage failures in [`CliFailure`].
fn usage_exit(parse_error: clap::Error) -> ExitCode {
    let code = match parse_error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(1),
    };
    let _ = parse_error.print();
    code
}

fn run(cli: Cli) -> Result<ExitCode, CliFailure> {
    let properties = aggregate_properties(cli.settings.as_deref(), &cli.defines)?;

    let marker = marker_path(&cli.file);
    if marker.exists() {
        info!(marker = %marker.display(), "previous run marker found");
        println!("skipped: marker file present");
        return Ok(ExitCode::SUCCESS);
    }

    let mut session = ManipulationSession::from_properties(properties);
    if !session.is_enabled() {
        info!("manipulation disabled via {MANIPULATIONS_DISABLED_PROP}");
        println!("skipped: manipulation disabled");
        return Ok(ExitCode::SUCCESS);
    }

    let mut projects = load_project_graph(&cli.file)?;
    info!(projects = projects.len(), "loaded project graph");

    let manager = ManipulationManager::with_default_manipulators();
    debug!(pipeline = ?manager.manipulator_names(), "running manipulation pipeline");
    manager.init(&mut session)?;
    let changed = manager.scan_and_apply(&mut projects, &session)?;
    let files_written = write_changed(&projects, &changed)?;

    fs::write(&marker, b"manipulation already performed\n").map_err(|error| {
        CliFailure::usage(format!(
            "failed writing marker '{}': {error}",
            marker.display()
        ))
    })?;

    let conflicts = session
        .state::<DependencyOverrideState>()
        .map(|state| state.conflicts().to_vec())
        .unwrap_or_default();
    let report = RunReport {
        changed: changed.iter().map(ToString::to_string).collect(),
        files_written,
        conflicts,
    };

    if cli.report_json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|error| CliFailure::usage(format!("failed encoding report: {error}")))?;
        println!("{json}");
    } else {
        print_summary(&report);
    }
    Ok(ExitCode::SUCCESS)
}

/// Settings-file properties first, then `-D` pairs on top.
fn aggregate_properties(
    settings: Option<&Path>,
    defines: &[String],
) -> Result<BTreeMap<String, String>, CliFailure> {
    let mut properties = match settings {
        Some(path) => settings_properties(path)?,
        None => BTreeMap::new(),
    };
    for define in defines {
        let Some((key, value)) = define.split_once('=') else {
            return Err(CliFailure::usage(format!(
                "invalid -D property '{define}': expected KEY=VALUE"
            )));
        };
        if key.is_empty() {
            return Err(CliFailure::usage(format!(
                "invalid -D property '{define}': empty key"
            )));
        }
        properties.insert(key.to_string(), value.to_string());
    }
    Ok(properties)
}

fn settings_properties(path: &Path) -> Result<BTreeMap<String, String>, CliFailure> {
    let raw = fs::read_to_string(path).map_err(|error| {
        CliFailure::usage(format!(
            "failed reading settings '{}': {error}",
            path.display()
        ))
    })?;
    let settings: SettingsFile = toml::from_str(&raw).map_err(|error| {
        CliFailure::usage(format!(
            "failed parsing settings '{}': {error}",
            path.display()
        ))
    })?;
    Ok(settings.properties)
}

fn marker_path(target: &Path) -> PathBuf {
    match target.parent() {
        Some(dir) => dir.join(MARKER_FILE),
        None => PathBuf::from(MARKER_FILE),
    }
}

fn print_summary(report: &RunReport) {
    println!("changed_projects: {}", report.changed.len());
    for key in &report.changed {
        println!("  {key}");
    }
    println!("files_written: {}", report.files_written);
    if !report.conflicts.is_empty() {
        println!("override_conflicts: {}", report.conflicts.len());
        for conflict in &report.conflicts {
            println!("  {conflict}");
        }
    }
}

/// Logs go to stderr so stdout stays clean for the JSON report.
fn init_tracing(debug: bool) {
    let filter = if debug {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        )
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
