pub mod client;
pub mod config;
pub mod error;
pub mod pages;
pub mod render;
pub mod telemetry;
pub mod view;

mod cli;

use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
