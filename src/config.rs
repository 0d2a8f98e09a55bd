//! Config handling

use std::path::PathBuf;

use tracing::log::LevelFilter;

use crate::cli::CliOptions;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Everything one pipeline run needs, resolved once at startup and passed
/// by parameter into each step. No ambient globals.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// City identifier, or [`crate::constants::AUTO_CITY`] for IP geolocation.
    pub city: String,
    /// Whether to fetch an AQI reading and overlay it.
    pub overlay_aqi: bool,
    /// Custom caption overriding the default `{city} // {aqi}`.
    pub custom_text: Option<String>,
    /// Directory the final image is copied into.
    pub output_dir: PathBuf,
    /// TrueType font used for the caption.
    pub font_path: PathBuf,
    /// Caption font size in pixels.
    pub font_size: f32,
    /// aqicn.org API token; only needed when `overlay_aqi` is set.
    pub aqicn_token: Option<String>,
    /// OpenAI API key.
    pub openai_token: String,
}

impl RunConfig {
    /// Builds the run configuration, rejecting option combinations the
    /// pipeline cannot run with.
    pub fn from_cli(cli: CliOptions) -> Result<Self, String> {
        if cli.city.trim().is_empty() {
            return Err("--city must not be empty".to_string());
        }
        if cli.aqi && cli.aqicn_token.is_none() {
            return Err(
                "AQICN_TOKEN is not set; pass --aqicn-token or disable the overlay with --aqi false"
                    .to_string(),
            );
        }
        Ok(Self {
            city: cli.city,
            overlay_aqi: cli.aqi,
            custom_text: cli.text,
            output_dir: cli.output,
            font_path: cli.font_path,
            font_size: cli.font_size,
            aqicn_token: cli.aqicn_token,
            openai_token: cli.openai_token,
        })
    }
}
