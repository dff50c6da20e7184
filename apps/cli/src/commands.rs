//! CLI command definitions, routing, and tracing setup.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use advisorboard_core::pipeline::{
    ProgressReporter, UpdateConfig, UpdateOutcome, UpdateReport, update_board,
};
use advisorboard_shared::{AdvisorBoardError, AppConfig, init_config, load_config};

/// Exit status when a required input file is missing.
const EXIT_NOT_FOUND: u8 = 2;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// advisorboard: publish the advisor table into the leaderboard page.
#[derive(Parser)]
#[command(
    name = "advisorboard",
    version,
    about = "Inject advisor counts from a CSV table into the leaderboard HTML page.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./advisorboard.toml, then ~/.advisorboard/).
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Advisor table to read (overrides config).
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,

    /// HTML document to update (overrides config).
    #[arg(long, global = true)]
    pub document: Option<PathBuf>,

    /// Defaults to `update` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Read the table and rewrite the document's advisor array.
    Update,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a default advisorboard.toml into the current directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "advisorboard=warn",
        1 => "advisorboard=info",
        2 => "advisorboard=debug",
        _ => "advisorboard=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        config_file: config,
        table,
        document,
        command,
        ..
    } = cli;

    match command.unwrap_or(Command::Update) {
        Command::Update => Ok(cmd_update(
            config.as_deref(),
            table.as_deref(),
            document.as_deref(),
        )),
        Command::Config { action } => {
            match action {
                ConfigAction::Init => cmd_config_init()?,
                ConfigAction::Show => {
                    cmd_config_show(config.as_deref(), table.as_deref(), document.as_deref())?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Merge config file values with CLI path overrides.
fn resolve_config(
    config: Option<&Path>,
    table: Option<&Path>,
    document: Option<&Path>,
) -> advisorboard_shared::Result<AppConfig> {
    let mut app = load_config(config)?;
    if let Some(table) = table {
        app.paths.table = table.to_path_buf();
    }
    if let Some(document) = document {
        app.paths.document = document.to_path_buf();
    }
    Ok(app)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_update(config: Option<&Path>, table: Option<&Path>, document: Option<&Path>) -> ExitCode {
    println!("advisorboard {} - leaderboard updater", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(50));

    let result = resolve_config(config, table, document).and_then(|app| {
        let update = UpdateConfig::from(&app);
        info!(
            table = %update.table.display(),
            document = %update.document.display(),
            "updating leaderboard"
        );
        update_board(&update, &ConsoleProgress)
    });

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let _ = report_failure(&mut std::io::stderr().lock(), &err);
            ExitCode::from(exit_status(&err))
        }
    }
}

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir().wrap_err("cannot determine working directory")?;
    let path = init_config(&cwd)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(
    config: Option<&Path>,
    table: Option<&Path>,
    document: Option<&Path>,
) -> Result<()> {
    let app = resolve_config(config, table, document)?;
    let toml_str = toml::to_string_pretty(&app)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Console reporting
// ---------------------------------------------------------------------------

/// Prints pipeline phases and the final summary to stdout.
struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn phase(&self, name: &str) {
        println!("  {name}");
    }

    fn done(&self, report: &UpdateReport) {
        let _ = print_report(&mut std::io::stdout().lock(), report);
    }
}

fn print_report(out: &mut impl Write, report: &UpdateReport) -> io::Result<()> {
    writeln!(out)?;
    match report.outcome {
        UpdateOutcome::NoRecords => {
            writeln!(
                out,
                "  Warning: no advisors found in {}; document left unchanged.",
                report.table.display()
            )?;
            return writeln!(out);
        }
        UpdateOutcome::RegionMissing => {
            writeln!(
                out,
                "  Warning: no advisor array found in {}; document left unchanged.",
                report.document.display()
            )?;
        }
        UpdateOutcome::Patched => writeln!(out, "  Document updated successfully!")?,
        UpdateOutcome::Unchanged => writeln!(out, "  Document already up to date.")?,
    }

    writeln!(out, "  Advisors:    {}", report.totals.advisors)?;
    writeln!(out, "  Total count: {}", report.totals.total_count)?;
    writeln!(out, "  Time:        {:.3}s", report.elapsed.as_secs_f64())?;

    if matches!(report.outcome, UpdateOutcome::Patched | UpdateOutcome::Unchanged) {
        writeln!(out)?;
        writeln!(
            out,
            "  Done! Open {} in your browser to see the board.",
            report.document.display()
        )?;
    }
    writeln!(out)
}

fn report_failure(out: &mut impl Write, err: &AdvisorBoardError) -> io::Result<()> {
    match err.missing_path() {
        Some(path) => {
            writeln!(out, "Error: file not found - {}", path.display())?;
            writeln!(
                out,
                "Make sure both the advisor table and the HTML document are in the current directory."
            )
        }
        None => writeln!(out, "Error: {err}"),
    }
}

/// Exit status for a failed update: 2 for a missing file, 1 otherwise.
fn exit_status(err: &AdvisorBoardError) -> u8 {
    if err.missing_path().is_some() {
        EXIT_NOT_FOUND
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use advisorboard_shared::BoardTotals;
    use clap::CommandFactory;

    use super::*;

    fn report(outcome: UpdateOutcome, advisors: usize, total_count: u64) -> UpdateReport {
        UpdateReport {
            outcome,
            totals: BoardTotals {
                advisors,
                total_count,
            },
            table: PathBuf::from("datos.csv"),
            document: PathBuf::from("board.html"),
            elapsed: Duration::from_millis(3),
        }
    }

    fn render_report(report: &UpdateReport) -> String {
        let mut out = Vec::new();
        print_report(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn summary_reports_success_and_totals() {
        let text = render_report(&report(UpdateOutcome::Patched, 3, 7));
        assert!(text.contains("  Document updated successfully!\n"));
        assert!(text.contains("  Advisors:    3\n"));
        assert!(text.contains("  Total count: 7\n"));
        assert!(text.contains("Open board.html in your browser"));
    }

    #[test]
    fn summary_for_empty_table_is_a_warning_only() {
        let text = render_report(&report(UpdateOutcome::NoRecords, 0, 0));
        assert!(text.contains("  Warning: no advisors found in datos.csv; document left unchanged.\n"));
        assert!(!text.contains("Advisors:"));
        assert!(!text.contains("Done!"));
    }

    #[test]
    fn summary_for_missing_region_warns_and_counts() {
        let text = render_report(&report(UpdateOutcome::RegionMissing, 2, 5));
        assert!(text.contains(
            "  Warning: no advisor array found in board.html; document left unchanged.\n"
        ));
        assert!(text.contains("  Advisors:    2\n"));
        assert!(text.contains("  Total count: 5\n"));
        assert!(!text.contains("Done!"));
    }

    #[test]
    fn failure_message_names_missing_file() {
        let mut out = Vec::new();
        let err = AdvisorBoardError::NotFound {
            path: PathBuf::from("datos.csv"),
        };
        report_failure(&mut out, &err).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Error: file not found - datos.csv\n"));
        assert!(text.contains("Make sure both the advisor table and the HTML document"));
    }

    #[test]
    fn failure_message_for_other_errors() {
        let mut out = Vec::new();
        report_failure(&mut out, &AdvisorBoardError::config("bad value")).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Error: config error: bad value\n");
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_update_with_defaults() {
        let cli = Cli::try_parse_from(["advisorboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.table.is_none());
        assert!(cli.document.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn global_path_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "advisorboard",
            "update",
            "--table",
            "q3.csv",
            "--document",
            "site/board.html",
            "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Command::Update)));
        assert_eq!(cli.table, Some(PathBuf::from("q3.csv")));
        assert_eq!(cli.document, Some(PathBuf::from("site/board.html")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn config_subcommands_parse() {
        let cli = Cli::try_parse_from(["advisorboard", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Config {
                action: ConfigAction::Show
            })
        ));
    }

    #[test]
    fn exit_status_distinguishes_missing_files() {
        let missing = AdvisorBoardError::NotFound {
            path: PathBuf::from("datos.csv"),
        };
        assert_eq!(exit_status(&missing), EXIT_NOT_FOUND);

        let other = AdvisorBoardError::parse("datos.csv", "bad row");
        assert_eq!(exit_status(&other), 1);
    }

    #[test]
    fn path_overrides_beat_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("advisorboard.toml");
        std::fs::write(&config_path, "[paths]\ntable = \"from-file.csv\"\n").unwrap();

        let app = resolve_config(Some(&config_path), None, Some(Path::new("cli.html"))).unwrap();
        assert_eq!(app.paths.table, PathBuf::from("from-file.csv"));
        assert_eq!(app.paths.document, PathBuf::from("cli.html"));
    }
}
