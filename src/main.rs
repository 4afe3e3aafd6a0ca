use caelundas::config::{Cli, Config};
use caelundas::driver;
use caelundas::ical::{self, CalendarMeta};
use caelundas::provider::HorizonsEphemerisProvider;
use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = run(&config).await {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(config: &Config) -> caelundas::Result<()> {
    let provider = HorizonsEphemerisProvider;
    let sink = driver::run(&provider, config).await?;
    let events = sink.all();
    let generated_at = Utc::now();

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| caelundas::CaelundasError::Sink(e.to_string()))?;

    let meta = CalendarMeta {
        calname: "caelundas".to_string(),
        caldesc: Some(format!("{} to {}", config.start_date, config.end_date)),
        tz: config.timezone,
    };
    let combined = ical::serialize(&events, &meta, generated_at);
    let combined_path = config.output_dir.join(config.combined_filename());
    std::fs::write(&combined_path, combined).map_err(|e| caelundas::CaelundasError::Sink(e.to_string()))?;
    log::info!("wrote {} events to {}", events.len(), combined_path.display());

    for (category, category_events) in driver::group_by_category(&events) {
        let category_meta = CalendarMeta {
            calname: format!("caelundas: {category}"),
            caldesc: None,
            tz: config.timezone,
        };
        let text = ical::serialize(&category_events, &category_meta, generated_at);
        let path = config.output_dir.join(config.category_filename(&category));
        std::fs::write(&path, text).map_err(|e| caelundas::CaelundasError::Sink(e.to_string()))?;
    }

    Ok(())
}
