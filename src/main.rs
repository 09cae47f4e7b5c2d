use build_tracker::cmd::{self, ReportOptions};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process;

/// Build artifact size tracker
///
/// build-tracker compares build artifact sizes across revisions: per-artifact
/// and total deltas, size history and regression checks for CI.
#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing .build-tracker.toml
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// Disable colored output (useful for CI/CD logs)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a base build against a previous build
    Compare {
        /// Base build: a record file, or a revision when --builds is given
        base: String,

        /// Previous build: a record file, or a revision when --builds is given
        prev: String,

        /// Record files to look revisions up in (repeatable)
        #[arg(short, long = "builds", value_name = "FILE")]
        builds: Vec<PathBuf>,

        #[command(flatten)]
        report: ReportOptions,
    },

    /// Compare each build against the one before it
    Summary {
        /// Record files, oldest build first
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Fail when the total grows beyond the regression threshold
        #[arg(long)]
        check: bool,

        #[command(flatten)]
        report: ReportOptions,
    },

    /// Show the size of an artifact, or of the totals, across builds
    History {
        /// Record files, oldest build first
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Artifact to follow (default: filtered totals)
        #[arg(short, long, value_name = "NAME")]
        artifact: Option<String>,

        #[command(flatten)]
        report: ReportOptions,
    },

    /// Validate a new build record and compare it against its parent
    Ingest {
        /// Record file holding the new build
        record: PathBuf,

        /// Record files holding previously recorded builds (repeatable)
        #[arg(long = "history", value_name = "FILE")]
        history: Vec<PathBuf>,

        #[command(flatten)]
        report: ReportOptions,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let root = cli.project_root.as_path();
    let result = match &cli.command {
        Some(Commands::Compare {
            base,
            prev,
            builds,
            report,
        }) => cmd::cmd_compare(base, prev, builds, report, root),
        Some(Commands::Summary {
            files,
            check,
            report,
        }) => cmd::cmd_summary(files, report, *check, root),
        Some(Commands::History {
            files,
            artifact,
            report,
        }) => cmd::cmd_history(files, artifact.as_deref(), report, root),
        Some(Commands::Ingest {
            record,
            history,
            report,
        }) => cmd::cmd_ingest(record, history, report, root),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell, &mut Cli::command());
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("build-tracker v{}", env!("CARGO_PKG_VERSION"));
            println!("Build artifact size tracker\n");
            println!("Usage: build-tracker <COMMAND>\n");
            println!("Commands:");
            println!("  compare      Compare a base build against a previous build");
            println!("  summary      Compare each build against the one before it");
            println!("  history      Show artifact or total size across builds");
            println!("  ingest       Validate a new build record against its parent");
            println!("  completions  Generate shell completions");
            println!("\nRun 'build-tracker <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use build_tracker::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
