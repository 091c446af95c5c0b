//! subcli - Run, parse and document subcommand CLIs described as JSON.

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use subcli::{render_context_json, App, AppConfig, Console, Handler, USAGE_EXIT_CODE};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Subcommand-style argument parsing driven by a JSON app description.
#[derive(Parser, Debug)]
#[command(name = "subcli", version, about, disable_help_subcommand = true)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Where the app description comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ConfigSource {
    /// JSON description of the application
    #[arg(long)]
    config: Option<String>,

    /// Path to a JSON file describing the application
    #[arg(long)]
    config_file: Option<PathBuf>,
}

impl ConfigSource {
    fn load(&self) -> Result<AppConfig> {
        if let Some(json) = &self.config {
            return AppConfig::from_json(json).context("failed to parse config JSON");
        }

        let Some(path) = &self.config_file else {
            anyhow::bail!("either --config or --config-file is required");
        };
        AppConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))
    }

    /// Build the described app; every command prints its parsed invocation.
    fn build_app(&self) -> Result<App> {
        self.load()?
            .into_app(|command| print_invocation(command.name.clone()))
            .context("invalid config")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch a full command line through the described app
    Run {
        #[command(flatten)]
        source: ConfigSource,

        /// Command line for the described app, starting with the subcommand
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Parse tokens against a single command's flags
    Parse {
        #[command(flatten)]
        source: ConfigSource,

        /// Name of the command whose flags apply
        #[arg(long)]
        command: String,

        /// Tokens following the command name
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print global, command or topic help of the described app
    Help {
        #[command(flatten)]
        source: ConfigSource,

        /// Command or topic to describe
        target: Option<String>,
    },
}

fn print_invocation(command: String) -> Handler {
    Box::new(move |ctx, console| {
        let written = render_context_json(&command, ctx)
            .map_err(io::Error::from)
            .and_then(|json| console.println(json));
        match written {
            Ok(()) => 0,
            Err(e) => {
                console.log(format!("failed to print invocation: {}", e));
                1
            }
        }
    })
}

fn run_app(app: &App, args: &[String]) -> Result<i32> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    app.run(args, &mut stdout.lock(), &mut stderr.lock())
        .context("failed to write output")
}

fn parse_only(app: &App, command: &str, args: &[String]) -> Result<i32> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut console = Console::new(app.name(), &mut out, &mut err);

    let code = match app.parse(command, args) {
        Ok(context) => {
            let json = render_context_json(command, &context)?;
            console.println(json)?;
            0
        }
        Err(e) => {
            console.error(e)?;
            USAGE_EXIT_CODE
        }
    };
    console.flush()?;
    Ok(code)
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let code = match cli.command {
        Commands::Run { source, args } => {
            let app = source.build_app()?;
            run_app(&app, &args)?
        }
        Commands::Parse {
            source,
            command,
            args,
        } => {
            let app = source.build_app()?;
            parse_only(&app, &command, &args)?
        }
        Commands::Help { source, target } => {
            let app = source.build_app()?;
            let mut args = vec!["help".to_string()];
            args.extend(target);
            run_app(&app, &args)?
        }
    };

    debug!(code, "exiting");
    std::process::exit(code)
}
