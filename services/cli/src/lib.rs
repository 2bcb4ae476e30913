mod advise;
mod cli;
mod demo;
mod infra;

use smart_agro::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
