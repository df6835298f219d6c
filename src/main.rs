use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use courier::App;
use courier::Config;
use courier::commands::emit::EmitFormat;
use courier::ops::select::select_client;
use courier::state::PRODUCTION_MODE;

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Post-build Sentry release bookkeeping: register releases, upload sourcemaps, track deploys", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "courier.json")]
    pub config: std::path::PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the post-build release lifecycle (create, upload, finalize, deploy)
    Run {
        /// Build mode the bundle was produced with
        #[arg(short, long, env = "NODE_ENV", default_value = PRODUCTION_MODE)]
        mode: String,
    },
    /// Print release metadata for injection as build-time constants
    Emit {
        #[arg(short, long, value_enum, default_value = "json")]
        format: EmitFormat,
    },
    /// List deploys for the current release
    Deploys,
    /// Forward raw arguments to sentry-cli
    Exec {
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Dry-run observations are emitted at info; keep them visible by default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let app = App::new(config.clone(), select_client(&config));

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    let command = cli.command.unwrap_or_else(|| Commands::Run {
        mode: std::env::var("NODE_ENV").unwrap_or_else(|_| PRODUCTION_MODE.to_string()),
    });

    match command {
        Commands::Run { mode } => app.cmd_run(&mode, &mut stdout, &mut stderr).await?,
        Commands::Emit { format } => app.cmd_emit(format, &mut stdout, &mut stderr).await?,
        Commands::Deploys => app.cmd_deploys(&mut stdout, &mut stderr).await?,
        Commands::Exec { args } => app.cmd_exec(&args, &mut stdout).await?,
    }

    Ok(())
}
