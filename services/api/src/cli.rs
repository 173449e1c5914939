use crate::listings::{run_jobs_query, JobsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use job_hunter::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "AI Job Hunter Gateway",
    about = "Forward job applications to Kestra and serve scraped job listings",
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
    /// Print a filtered page of the listing dataset as JSON
    Jobs(JobsArgs),
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
        Command::Jobs(args) => run_jobs_query(args).await,
    }
}
