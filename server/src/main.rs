use std::process::ExitCode;

use civic::{config, logging, Database};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("civic-server: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_config_from_env()?;
    logging::init(&config.logging)?;

    let db = match config.database.resolved_path() {
        Some(path) => Database::open(&path)?,
        None => {
            log::warn!("No home directory found, using an in-memory database");
            Database::open_in_memory()?
        }
    };

    let state = civic_server::build_state(&config, db)?;
    civic_server::serve(&config, state).await?;
    Ok(())
}
