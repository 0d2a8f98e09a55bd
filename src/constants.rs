//! Shared constants/setters for things
//!

/// WAQI city feed base URL, city name appended as a path segment.
pub const AQI_FEED_URL: &str = "https://api.waqi.info/feed/";

/// Reserved city identifier asking the AQI provider to geolocate by IP.
pub const AUTO_CITY: &str = "here";

/// OpenAI image generation endpoint.
pub const IMAGES_GENERATE_URL: &str = "https://api.openai.com/v1/images/generations";

/// Image model used for every run.
pub const IMAGE_MODEL: &str = "dall-e-3";

/// Landscape resolution requested from the provider.
pub const IMAGE_SIZE: &str = "1792x1024";

/// Quality tier requested from the provider.
pub const IMAGE_QUALITY: &str = "standard";

/// Distance (pixels) between the caption and the top/right image edges.
pub const CAPTION_MARGIN: u32 = 50;

/// Default caption font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 50.0;

/// Default caption font file.
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
