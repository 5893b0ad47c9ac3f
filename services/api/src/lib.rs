mod cli;
mod infra;
mod operator;
mod routes;
mod server;

use guardian_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
