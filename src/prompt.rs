//! Prompt composition for the image provider.
//!
//! The 16:9 and hyper-realistic wording are protocol requirements of the
//! downstream provider, not style preferences; keep them intact.

/// Builds the image-generation prompt. Pure and total: identical inputs
/// always yield the identical string, and an absent AQI never mentions air
/// quality at all.
pub fn compose(name: &str, aqi: Option<i64>) -> String {
    let mut prompt = format!(
        "Create a realistic landscape image of a famous landmark or popular destination from {name}. "
    );
    if let Some(aqi) = aqi {
        prompt.push_str(&format!(
            "The image should be altered to reflect an Air Quality Index based on AQI value: {aqi}. "
        ));
    }
    prompt.push_str(
        "The artistic style should be a hyper-realistic render, closely resembling a \
         high-resolution photograph. The aspect ratio of the image should be 16:9 to provide \
         a wide landscape view",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_city_and_aqi() {
        let prompt = compose("Paris", Some(42));
        assert!(prompt.contains("Paris"));
        assert!(prompt.contains("AQI value: 42"));
        assert!(prompt.contains("16:9"));
        assert!(prompt.contains("hyper-realistic"));
    }

    #[test]
    fn absent_aqi_omits_air_quality_language() {
        let prompt = compose("Paris", None);
        assert!(prompt.contains("Paris"));
        assert!(!prompt.contains("Air Quality"));
        assert!(!prompt.contains("AQI"));
        assert!(prompt.contains("16:9"));
    }

    #[test]
    fn composition_is_deterministic() {
        assert_eq!(compose("Oslo", Some(7)), compose("Oslo", Some(7)));
        assert_eq!(compose("Oslo", None), compose("Oslo", None));
    }
}
