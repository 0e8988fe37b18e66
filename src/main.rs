use clap::Parser;
use small_creational::utils::{logger, validation::Validate};
use small_creational::{CliConfig, ScenarioConfig, ScenarioEngine};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let log_format = if cli.json_logs {
        logger::LogFormat::Json
    } else {
        logger::LogFormat::Compact
    };
    logger::init_logger(cli.verbose, log_format);

    tracing::info!("Starting small-creational");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading scenario from {}", path.display());
            ScenarioConfig::from_file(path)
        }
        None => {
            tracing::info!("No --config given, running the built-in demo");
            Ok(ScenarioConfig::demo())
        }
    };

    let result = config.and_then(|config| {
        config.validate()?;
        let stdout = std::io::stdout();
        ScenarioEngine::new(stdout.lock(), cli.format).run(&config)
    });

    match result {
        Ok(summary) => {
            tracing::info!(
                "Done: {} requests, {} emails, {} sms",
                summary.requests,
                summary.emails,
                summary.sms
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Scenario failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }
}
