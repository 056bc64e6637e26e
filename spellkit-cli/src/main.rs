//! SPELLKIT command-line entry point.

use spellkit_cli::app::App;
use spellkit_cli::args::Invocation;
use spellkit_cli::config::CliConfig;
use spellkit_cli::error::CliError;
use spellkit_cli::telemetry;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!(error = %err, "Command failed");
        eprintln!("{}", err.user_message());
        std::process::exit(err.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let invocation = Invocation::from_env()?;
    let config = CliConfig::load(invocation.config_path.as_deref())?;
    telemetry::init(config.log_format)?;

    let app = App::from_config(&config)?;
    let output = app.run(invocation.command).await?;
    println!("{}", output);
    Ok(())
}
