use aqiscape::config::{RunConfig, setup_logging};
use aqiscape::error::AqiscapeError;
use aqiscape::overlay::OverlayStyle;
use aqiscape::{aqi, generate, overlay, prompt};
use clap::Parser;
use tracing::{error, info};

fn main() {
    let cli = aqiscape::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        std::process::exit(1);
    }

    let config = match RunConfig::from_cli(cli) {
        Ok(config) => config,
        Err(message) => {
            error!("{message}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&config) {
        error!("{err}");
        std::process::exit(1);
    }
}

/// The whole pipeline: resolve, compose, produce, finalize. Strictly
/// sequential; the first failing step aborts the run.
fn run(config: &RunConfig) -> Result<(), AqiscapeError> {
    let client = reqwest::blocking::Client::new();

    let (name, aqi) = if config.overlay_aqi {
        // RunConfig::from_cli guarantees the token when the overlay is on.
        let token = config.aqicn_token.as_deref().unwrap_or_default();
        let reading = aqi::resolve(&client, &config.city, token)?;
        info!("{} AQI: {}", reading.name, reading.aqi);
        (reading.name, Some(reading.aqi))
    } else {
        (aqi::sanitize_display_name(&config.city), None)
    };

    let prompt = prompt::compose(&name, aqi);
    let image_bytes = generate::produce(&client, &config.openai_token, &prompt)?;

    let style = OverlayStyle {
        font_path: config.font_path.clone(),
        font_size: config.font_size,
        custom_text: config.custom_text.clone(),
    };
    let written = overlay::finalize(&image_bytes, &name, aqi, &style, &config.output_dir)?;
    info!("Image written to {}", written.display());

    Ok(())
}
