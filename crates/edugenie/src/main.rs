//! EduGenie command-line interface.

mod cli;

use clap::Parser;
use cli::Cli;
use edugenie::{EduGenieConfig, EduGenieError, init_tracing};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is normal
    let _ = dotenvy::dotenv();
    init_tracing("warn");

    let cli = Cli::parse();
    let result = match EduGenieConfig::load(cli.config.as_deref()) {
        Ok(config) => cli::run(cli.command, &config).await,
        Err(e) => Err(EduGenieError::from(e).into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = match err.downcast_ref::<EduGenieError>() {
                Some(e) => e.user_message(),
                None => format!("{:#}", err),
            };
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}
