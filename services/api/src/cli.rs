use crate::demo::{run_demo, run_levels, run_validate, DemoArgs, LevelsArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use puesto_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Validador de Puestos",
    about = "Validate job-position functions against salary-level hierarchy profiles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Validate positions from a CSV or JSON file and print the report
    Validate(ValidateArgs),
    /// Show expected profiles, acceptable ranges and thresholds per tier
    Levels(LevelsArgs),
    /// Run an end-to-end demo over synthetic positions
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
        Command::Levels(args) => run_levels(args),
        Command::Demo(args) => run_demo(args),
    }
}
