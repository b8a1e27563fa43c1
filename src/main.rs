use clap::{ArgAction, Args, Parser, Subcommand};
use efile::cli::{
    decrypt_paths, encrypt_paths, format_first_error, format_summary, DecryptOptions,
    EncryptOptions,
};
use efile::{Direction, EfileError, Result, TransformOptions};
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("EFILE_VERSION");
const BUILD: &str = env!("EFILE_BUILD");
const PROFILE: &str = env!("EFILE_PROFILE");
const GIT_HASH: &str = env!("EFILE_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "efile")]
#[command(author, about = "Encrypt and decrypt file and folder names and contents", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file or folder
    #[command(alias = "e")]
    Enc {
        #[command(flatten)]
        args: TransformArgs,
    },

    /// Decrypt a file or folder
    #[command(alias = "d")]
    Dec {
        #[command(flatten)]
        args: TransformArgs,
    },

    /// Print the version number of efile
    Version,
}

#[derive(Args)]
struct TransformArgs {
    /// Files or folders to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Key, must not be empty (prompted for when absent)
    #[arg(short, long, env = "EFILE_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Treat the last positional argument as the key (must not be empty)
    #[arg(long, conflicts_with = "key")]
    key_last: bool,

    /// Suppress per-entry output
    #[arg(short, long)]
    quiet: bool,

    /// Only transform names, leave contents alone
    #[arg(long, conflicts_with = "content_only")]
    names_only: bool,

    /// Only transform contents, leave names alone
    #[arg(long)]
    content_only: bool,

    /// Worker threads (defaults to one per CPU)
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,

    /// List every failed path after the tally
    #[arg(long)]
    details: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if cli.version {
        println!("efile {}", get_version());
        return ExitCode::SUCCESS;
    }

    setup_tracing(cli.verbose);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Enc { args } => run_transform(Direction::Encrypt, args),
        Commands::Dec { args } => run_transform(Direction::Decrypt, args),
        Commands::Version => {
            println!("efile version {}", VERSION);
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_transform(direction: Direction, mut args: TransformArgs) -> Result<ExitCode> {
    let secret = if args.key_last {
        take_trailing_key(&mut args.paths)?
    } else {
        acquire_key(args.key.take(), direction == Direction::Encrypt)?
    };

    // Several paths: run everything, report afterwards.
    // One path: stop at the first failure.
    let batch = args.paths.len() > 1;
    let transform = TransformOptions {
        names: !args.content_only,
        content: !args.names_only,
        quiet: args.quiet || args.json,
        jobs: args.jobs.map(NonZeroUsize::get),
        fail_fast: !batch,
    };

    let report = match direction {
        Direction::Encrypt => encrypt_paths(&args.paths, &EncryptOptions { secret, transform })?,
        Direction::Decrypt => decrypt_paths(&args.paths, &DecryptOptions { secret, transform })?,
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else if batch || report.is_success() {
        print!("{}", format_summary(direction, &report, args.details));
    } else if let Some(first) = format_first_error(&report) {
        eprintln!("Error: {}", first);
    }

    if batch || report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn take_trailing_key(paths: &mut Vec<PathBuf>) -> Result<String> {
    if paths.len() < 2 {
        return Err(EfileError::KeyRequired);
    }
    let key = paths
        .pop()
        .and_then(|p| p.into_os_string().into_string().ok())
        .ok_or(EfileError::KeyRequired)?;
    non_empty(key)
}

fn acquire_key(given: Option<String>, confirm: bool) -> Result<String> {
    if let Some(key) = given {
        return non_empty(key);
    }
    let key = non_empty(rpassword::prompt_password("Enter key: ")?)?;
    if confirm && rpassword::prompt_password("Confirm key: ")? != key {
        return Err(EfileError::KeyMismatch);
    }
    Ok(key)
}

fn non_empty(key: String) -> Result<String> {
    if key.is_empty() {
        return Err(EfileError::EmptyKey);
    }
    Ok(key)
}

/// Diagnostics go to stderr; stdout is reserved for progress and reports
fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
