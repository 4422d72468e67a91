mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use tenant_contracts::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
