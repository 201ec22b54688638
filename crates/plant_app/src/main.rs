mod commands;
mod config;
mod logging;

use std::process::ExitCode;

use log::LevelFilter;
use plant_client::PlantClient;
use plant_logging::plant_error;

use logging::LogDestination;

fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let destination = if args.first().map(String::as_str) == Some("--log-file") {
        args.remove(0);
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, LevelFilter::Info);

    let cwd = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    let config = config::load_config(&cwd, std::env::var(config::API_BASE_ENV).ok());

    let command = match commands::parse(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}\n\n{}", commands::USAGE);
            return ExitCode::from(2);
        }
    };

    match run(command, &config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            plant_error!("{:#}", err);
            eprintln!("error: {err:#}");
            match err.downcast_ref::<commands::UploadUnconfirmed>() {
                Some(unconfirmed) => {
                    if let Ok(output) = serde_json::to_string_pretty(&unconfirmed.output) {
                        println!("{output}");
                    }
                    ExitCode::from(3)
                }
                None => ExitCode::FAILURE,
            }
        }
    }
}

fn run(command: commands::Command, config: &config::AppConfig) -> anyhow::Result<String> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let client = PlantClient::new(config.client_settings())?;
    let policy = config.poll_policy();
    let value = runtime.block_on(commands::run(command, &client, &policy))?;
    Ok(serde_json::to_string_pretty(&value)?)
}
