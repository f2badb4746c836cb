use option_chain_dashboard::{Environment, LaunchConfig, init_logging};
use std::error::Error;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let environment = Environment::detect(|key| std::env::var(key).ok());
    let config = LaunchConfig::from_env()?;
    let command = config.select(environment);

    info!(%environment, %command, "starting analytics backend");
    let status = command.to_command().status()?;

    if !status.success() {
        warn!(%status, "analytics backend exited");
    }

    // Killed by a signal reports no code
    std::process::exit(status.code().unwrap_or(1));
}
