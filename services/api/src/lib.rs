mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use lease_vault::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
