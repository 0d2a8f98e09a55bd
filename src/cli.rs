//! CLI parser
use std::path::PathBuf;

use clap::Parser;

use crate::constants::{AUTO_CITY, DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE};

/// Accepts the bool spellings the original flag grew over time.
fn parse_bool_like(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(format!(
            "expected one of true/false/yes/no/1/0, got `{other}`"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(name = "aqiscape")]
#[command(about = "Generate a hyper-realistic landmark image of a city with an optional AQI overlay")]
/// CLI Options
pub struct CliOptions {
    #[clap(long, default_value = AUTO_CITY, env = "AQISCAPE_CITY")]
    /// City to fetch AQI data for. Defaults to `here`, which geolocates
    /// based on the requester's IP.
    /// Env: AQISCAPE_CITY
    pub city: String,

    #[clap(long, default_value = "true", value_parser = parse_bool_like, action = clap::ArgAction::Set)]
    /// Overlay the AQI on the image. Accepts true/false/yes/no/1/0.
    pub aqi: bool,

    #[clap(long)]
    /// Custom text to overlay instead of the default `{city} // {aqi}`.
    pub text: Option<String>,

    #[clap(long, default_value = ".", env = "AQISCAPE_OUTPUT_DIR")]
    /// Directory to write the final image into, defaults to the current
    /// working directory.
    /// Env: AQISCAPE_OUTPUT_DIR
    pub output: PathBuf,

    #[clap(long, default_value = DEFAULT_FONT_PATH, env = "AQISCAPE_FONT_PATH")]
    /// TrueType font file for the caption overlay.
    /// Env: AQISCAPE_FONT_PATH
    pub font_path: PathBuf,

    #[clap(long, default_value_t = DEFAULT_FONT_SIZE)]
    /// Caption font size in pixels.
    pub font_size: f32,

    #[clap(long, help = "Enable debug logging", env = "AQISCAPE_DEBUG")]
    /// Enable debug logging. Env: AQISCAPE_DEBUG
    pub debug: bool,

    #[clap(long, env = "AQICN_TOKEN", hide_env_values = true)]
    /// aqicn.org API token, required unless `--aqi false`.
    /// Env: AQICN_TOKEN
    pub aqicn_token: Option<String>,

    #[clap(long, required = true, env = "OPEN_AI_TOKEN", hide_env_values = true)]
    /// OpenAI API key.
    /// Env: OPEN_AI_TOKEN
    pub openai_token: String,
}
