//! Image production via the OpenAI Images API: one generation request,
//! then one fetch of the returned time-limited URL.

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::constants::{IMAGE_MODEL, IMAGE_QUALITY, IMAGE_SIZE, IMAGES_GENERATE_URL};
use crate::error::AqiscapeError;

/// Request body for POST /v1/images/generations
/// Docs: https://platform.openai.com/docs/api-reference/images
#[derive(Serialize, Debug)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
    revised_prompt: Option<String>,
}

/// How the provider handed the image back: inline base64, or a URL to GET.
#[derive(Debug, PartialEq, Eq)]
enum ImagePayload {
    Inline(Vec<u8>),
    Fetch(Url),
}

/// Submits `prompt` for generation and returns the raw image bytes.
///
/// Fixed parameters per run: one image, landscape resolution, standard
/// quality. Generation problems surface as [`AqiscapeError::Generation`],
/// problems fetching the produced image as [`AqiscapeError::Download`].
/// Neither is retried.
pub fn produce(
    client: &reqwest::blocking::Client,
    api_key: &str,
    prompt: &str,
) -> Result<Vec<u8>, AqiscapeError> {
    info!("Requesting image generation with prompt: {prompt}");

    let req_body = ImagesGenerateRequest {
        model: IMAGE_MODEL,
        prompt,
        n: 1,
        size: IMAGE_SIZE,
        quality: IMAGE_QUALITY,
    };

    let response = client
        .post(IMAGES_GENERATE_URL)
        .bearer_auth(api_key)
        .json(&req_body)
        .send()
        .map_err(|err| AqiscapeError::Generation(format!("generation request failed: {err}")))?;

    let status = response.status();
    let body = response.bytes().map_err(|err| {
        AqiscapeError::Generation(format!("failed reading generation body: {err}"))
    })?;

    if !status.is_success() {
        return Err(AqiscapeError::Generation(format!(
            "provider returned HTTP {status}: {}",
            String::from_utf8_lossy(&body)
        )));
    }

    match extract_payload(&body)? {
        ImagePayload::Inline(bytes) => Ok(bytes),
        ImagePayload::Fetch(url) => download(client, url),
    }
}

/// Pulls the first image out of a generation response body.
fn extract_payload(body: &[u8]) -> Result<ImagePayload, AqiscapeError> {
    let parsed: ImagesGenerateResponse = serde_json::from_slice(body)
        .map_err(|err| AqiscapeError::Generation(format!("malformed generation payload: {err}")))?;

    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or_else(|| AqiscapeError::Generation("no image data returned".to_string()))?;

    if let Some(revised_prompt) = first.revised_prompt {
        info!("Revised prompt from provider: {revised_prompt}");
    }

    if let Some(b64_json) = first.b64_json {
        let bytes = general_purpose::STANDARD
            .decode(b64_json)
            .map_err(|err| AqiscapeError::Generation(format!("failed to base64-decode image: {err}")))?;
        Ok(ImagePayload::Inline(bytes))
    } else if let Some(url) = first.url {
        let url = Url::parse(&url).map_err(|err| {
            AqiscapeError::Generation(format!("provider returned an unusable URL `{url}`: {err}"))
        })?;
        Ok(ImagePayload::Fetch(url))
    } else {
        Err(AqiscapeError::Generation(
            "image response missing b64_json and url fields".to_string(),
        ))
    }
}

fn download(client: &reqwest::blocking::Client, url: Url) -> Result<Vec<u8>, AqiscapeError> {
    info!("Downloading image from URL: {url}");

    let response = client
        .get(url)
        .send()
        .map_err(|err| AqiscapeError::Download(format!("fetch failed: {err}")))?;

    let status = response.status();
    let bytes = response
        .bytes()
        .map_err(|err| AqiscapeError::Download(format!("failed reading image bytes: {err}")))?;

    if !status.is_success() {
        return Err(AqiscapeError::Download(format!(
            "fetch returned HTTP {status}"
        )));
    }

    info!("Image downloaded successfully");
    Ok(bytes.to_vec())
}
