//! CLI entry point for jsv.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::any::Any;
use std::io;
use std::path::PathBuf;

use jsv::config::{Config, OutputFormat};
use jsv::coordinator::{panic_message, Coordinator, ValidationRequest};
use jsv::logger::TerminalLogger;

#[derive(Parser)]
#[command(name = "jsv")]
#[command(version)]
#[command(about = "Validate data against a JSON Schema", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(
    after_help = "EXAMPLES:\n    jsv validate -d data.json -s schema.json\n    jsv validate -d settings.rhai --data-prop payload -s schema.json\n\n    Rhai files must name the binding to validate with --data-prop/--schema-prop."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data file against a JSON schema
    ///
    /// Both files may be JSON (.json) or Rhai config scripts (.rhai).
    /// A Rhai file is evaluated and its top-level bindings become an object,
    /// so a property path is mandatory for it.
    Validate {
        /// Path to a JSON or Rhai file containing the data to validate
        #[arg(short = 'd', long, value_name = "PATH")]
        data_file: String,
        /// Path to a JSON or Rhai file containing the JSON schema
        #[arg(short = 's', long, value_name = "PATH")]
        schema_file: String,
        /// Dotted property path inside the data file (e.g. config.payload)
        #[arg(long, value_name = "DOTTED.PATH")]
        data_prop: Option<String>,
        /// Dotted property path inside the schema file
        #[arg(long, value_name = "DOTTED.PATH")]
        schema_prop: Option<String>,
        /// Folder that relative paths are resolved against (default: current directory)
        #[arg(long, value_name = "DIR", env = "JSV_ROOT")]
        root: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "JSV_FORMAT")]
        format: OutputFormat,
        /// Only print errors
        #[arg(long, short, env = "JSV_QUIET")]
        quiet: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Maximum Rhai operations per script evaluation (0 = unlimited)
        #[arg(long, default_value = "0", env = "JSV_MAX_SCRIPT_OPERATIONS")]
        max_script_operations: u64,
        /// Refuse to evaluate Rhai files
        #[arg(long, env = "JSV_NO_SCRIPTS")]
        no_scripts: bool,
    },
    /// Print the manual page (roff) to stdout
    Manual,
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version and build information
    Version {
        /// Show commit and build date
        #[arg(long, short)]
        verbose: bool,
    },
}

fn main() {
    // Windows defaults to a 1MB stack, too small for deeply nested documents
    // and schemas. 8MB matches the Linux default.
    const STACK_SIZE: usize = 8 * 1024 * 1024;

    // Panics are reported as a single "Unexpected failure" message below or
    // by the coordinator, never as a raw backtrace.
    std::panic::set_hook(Box::new(|_| {}));

    let thread = std::thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(run);

    let code = match thread.map(|t| t.join()) {
        Ok(Ok(Ok(code))) => code,
        Ok(Ok(Err(e))) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            1
        }
        Ok(Err(payload)) => {
            eprintln!("{} {}", "Error:".red(), fault_message(payload.as_ref()));
            1
        }
        Err(e) => {
            eprintln!("{} failed to spawn main thread: {}", "Error:".red(), e);
            1
        }
    };

    std::process::exit(code);
}

fn fault_message(payload: &(dyn Any + Send)) -> String {
    format!("Unexpected failure: {}", panic_message(payload))
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            data_file,
            schema_file,
            data_prop,
            schema_prop,
            root,
            format,
            quiet,
            no_color,
            max_script_operations,
            no_scripts,
        } => {
            let config = match root {
                Some(dir) => Config::rooted_at(&dir)?,
                None => Config::from_current_dir()?,
            }
            .with_format(format)
            .with_quiet(quiet)
            .with_color(!no_color)
            .with_max_script_operations(max_script_operations)
            .with_scripts(!no_scripts);

            let request = ValidationRequest {
                data_file,
                schema_file,
                data_prop,
                schema_prop,
            };
            cmd_validate(config, &request)
        }
        Commands::Manual => cmd_manual().map(|_| 0),
        Commands::Completion { shell } => cmd_completion(shell).map(|_| 0),
        Commands::Version { verbose } => {
            cmd_version(verbose);
            Ok(0)
        }
    }
}

/// Run the validation and print its outcome in the configured format
fn cmd_validate(config: Config, request: &ValidationRequest) -> Result<i32> {
    config.apply_color();
    let coordinator = Coordinator::new(config);

    let outcome = match coordinator.config().format {
        OutputFormat::Text => {
            let logger = TerminalLogger::new(coordinator.config().quiet);
            coordinator.run(request, &logger)
        }
        OutputFormat::Json => {
            let outcome = coordinator.validate_schema(request);
            let report = serde_json::to_string_pretty(&outcome.to_report())
                .context("Failed to serialize report")?;
            println!("{}", report);
            outcome
        }
    };

    Ok(outcome.exit_code())
}

/// Render the manual page from the CLI definition
fn cmd_manual() -> Result<()> {
    let man = clap_mangen::Man::new(Cli::command());
    man.render(&mut io::stdout())
        .context("Failed to render manual page")
}

/// Generate shell completion script
fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "jsv", &mut io::stdout());
    Ok(())
}

fn cmd_version(verbose: bool) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("jsv {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }
}
