use std::process::ExitCode;

use clap::Parser;
use tripmate::cli::{self, Cli};
use tripmate::{TripmateConfig, logging};

/// Exit status when the user has to sign in first
const EXIT_SIGN_IN: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TripmateConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.logging, cli.verbose);

    match cli::run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_auth_failure() => {
            tracing::debug!("Command needs a session: {}", e);
            eprintln!("{}", e.user_message());
            eprintln!("Run `tripmate login --email <EMAIL>` to sign in.");
            ExitCode::from(EXIT_SIGN_IN)
        }
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            match e.form_errors() {
                Some(errors) => {
                    eprintln!("Please correct the following:");
                    for (field, message) in errors.iter() {
                        eprintln!("  {field}: {message}");
                    }
                }
                None => eprintln!("Error: {}", e.user_message()),
            }
            ExitCode::FAILURE
        }
    }
}
