//! AQI resolution against the WAQI city feed API.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

use crate::constants::{AQI_FEED_URL, AUTO_CITY};
use crate::error::AqiscapeError;

/// Characters allowed in display names; everything else is stripped so the
/// name is safe to embed in prompts and filenames.
#[allow(clippy::expect_used)]
static NAME_FILTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9,._\- ]+").expect("name filter pattern is static"));

/// One resolved AQI observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AqiReading {
    /// Sanitized display name for the location.
    pub name: String,
    /// Numeric AQI value reported by the provider.
    pub aqi: i64,
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    status: String,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    aqi: i64,
    city: FeedCity,
}

#[derive(Debug, Deserialize)]
struct FeedCity {
    name: String,
}

/// Strips every character outside `[A-Za-z0-9,._\- ]` and trims the ends.
/// Idempotent: filtering an already-filtered name is a no-op.
pub fn sanitize_display_name(name: &str) -> String {
    NAME_FILTER.replace_all(name, "").trim().to_string()
}

/// Fetches the AQI reading for `identifier`, which is either a city name or
/// [`AUTO_CITY`] to geolocate by the requester's IP.
///
/// A single attempt: any transport failure, non-2xx status or non-`ok`
/// payload terminates the run with [`AqiscapeError::Upstream`].
pub fn resolve(
    client: &reqwest::blocking::Client,
    identifier: &str,
    token: &str,
) -> Result<AqiReading, AqiscapeError> {
    info!("Fetching AQI data for {identifier}");

    let url = feed_url(identifier, token)?;
    let response = client
        .get(url)
        .send()
        .map_err(|err| AqiscapeError::Upstream(format!("feed request failed: {err}")))?;

    let status = response.status();
    let body = response
        .bytes()
        .map_err(|err| AqiscapeError::Upstream(format!("failed reading feed body: {err}")))?;

    if !status.is_success() {
        error!("Failed to retrieve data, status code: {status}");
        return Err(AqiscapeError::Upstream(format!(
            "feed returned HTTP {status}"
        )));
    }

    let data = parse_feed(&body)?;
    info!("Successfully retrieved AQI data: {}", data.aqi);

    Ok(AqiReading {
        name: display_name(identifier, &data.city.name),
        aqi: data.aqi,
    })
}

fn feed_url(identifier: &str, token: &str) -> Result<Url, AqiscapeError> {
    let mut url = Url::parse(AQI_FEED_URL)
        .map_err(|err| AqiscapeError::Upstream(format!("invalid feed URL: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| AqiscapeError::Upstream("feed URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .push(identifier)
        .push("");
    url.query_pairs_mut().append_pair("token", token);
    Ok(url)
}

/// The provider-reported name only wins for the geolocated sentinel; an
/// explicit `--city` stays the caption/filename subject.
fn display_name(identifier: &str, provider_name: &str) -> String {
    if identifier == AUTO_CITY {
        sanitize_display_name(provider_name)
    } else {
        sanitize_display_name(identifier)
    }
}

fn parse_feed(body: &[u8]) -> Result<FeedData, AqiscapeError> {
    let envelope: FeedEnvelope = serde_json::from_slice(body)
        .map_err(|err| AqiscapeError::Upstream(format!("malformed feed payload: {err}")))?;

    if envelope.status != "ok" {
        // Error payloads carry a human-readable string in `data`.
        let detail = envelope
            .data
            .as_str()
            .map(|reason| format!(": {reason}"))
            .unwrap_or_default();
        return Err(AqiscapeError::Upstream(format!(
            "feed status was `{}`{detail}",
            envelope.status
        )));
    }

    serde_json::from_value(envelope.data)
        .map_err(|err| AqiscapeError::Upstream(format!("malformed feed payload: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_payload_yields_exact_values() {
        let body = br#"{"status":"ok","data":{"aqi":42,"city":{"name":"Paris","geo":[48.85,2.35]}}}"#;
        let data = parse_feed(body).expect("well-formed payload should parse");
        assert_eq!(data.aqi, 42);
        assert_eq!(data.city.name, "Paris");
    }

    #[test]
    fn error_status_is_upstream() {
        let body = br#"{"status":"error","data":"Invalid key"}"#;
        let err = parse_feed(body).expect_err("error status must not resolve");
        match err {
            AqiscapeError::Upstream(message) => {
                assert!(message.contains("error"), "{message}");
                assert!(message.contains("Invalid key"), "{message}");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_upstream() {
        assert!(matches!(
            parse_feed(b"not json"),
            Err(AqiscapeError::Upstream(_))
        ));
    }

    #[test]
    fn sanitize_strips_and_trims() {
        assert_eq!(sanitize_display_name("  Paris  "), "Paris");
        assert_eq!(sanitize_display_name("St. Louis, MO"), "St. Louis, MO");
        assert_eq!(sanitize_display_name("São Paulo"), "So Paulo");
        // Pinned fixture: macron characters are removed outright.
        assert_eq!(sanitize_display_name("Tōkyō"), "Tky");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for name in ["Tōkyō", "  Paris  ", "北京", "New York_7"] {
            let once = sanitize_display_name(name);
            assert_eq!(sanitize_display_name(&once), once, "input {name:?}");
        }
    }

    #[test]
    fn provider_name_only_wins_for_the_sentinel() {
        assert_eq!(display_name("here", "Tōkyō"), "Tky");
        assert_eq!(display_name("Paris", "Shanghai (上海)"), "Paris");
    }

    #[test]
    fn feed_url_encodes_spaces() {
        let url = feed_url("New York", "secret").expect("static base URL must parse");
        assert_eq!(
            url.as_str(),
            "https://api.waqi.info/feed/New%20York/?token=secret"
        );
    }
}
