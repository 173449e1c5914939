mod cli;
mod infra;
mod listings;
mod routes;
mod server;

use job_hunter::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
