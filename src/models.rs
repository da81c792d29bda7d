//! Data models and structures
//!
//! Defines the form's value types (text language, aspect ratio, image
//! locators) and the provider configuration loaded from the environment.

use crate::ai::mime::detect_image_mime;
use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of any text rendered inside the generated image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextLanguage {
    NoText,
    #[default]
    Vietnamese,
    English,
    Spanish,
    Portuguese,
    Japanese,
    Korean,
    Indonesian,
}

impl TextLanguage {
    pub const ALL: [TextLanguage; 8] = [
        TextLanguage::NoText,
        TextLanguage::Vietnamese,
        TextLanguage::English,
        TextLanguage::Spanish,
        TextLanguage::Portuguese,
        TextLanguage::Japanese,
        TextLanguage::Korean,
        TextLanguage::Indonesian,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextLanguage::NoText => "No Text",
            TextLanguage::Vietnamese => "Vietnamese",
            TextLanguage::English => "English",
            TextLanguage::Spanish => "Spanish",
            TextLanguage::Portuguese => "Portuguese",
            TextLanguage::Japanese => "Japanese",
            TextLanguage::Korean => "Korean",
            TextLanguage::Indonesian => "Indonesian",
        }
    }
}

impl fmt::Display for TextLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextLanguage {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        let normalized: String = input
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        TextLanguage::ALL
            .into_iter()
            .find(|lang| lang.label().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| {
                let options: Vec<&str> = TextLanguage::ALL.iter().map(|l| l.label()).collect();
                format!(
                    "Unknown language '{}'. Expected one of: {}",
                    input,
                    options.join(", ")
                )
            })
    }
}

/// Output image shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Wide => "16:9 (Video)",
            AspectRatio::Tall => "9:16 (Shorts)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "16:9" | "wide" | "video" => Ok(AspectRatio::Wide),
            "9:16" | "tall" | "shorts" => Ok(AspectRatio::Tall),
            _ => Err(format!(
                "Unknown aspect ratio '{}'. Expected 16:9 or 9:16",
                input
            )),
        }
    }
}

/// Reference to a generated image: a `data:` URL or a remote `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageLocator(String);

impl ImageLocator {
    /// Wraps raw image bytes in a base64 data URL, sniffing the MIME type
    /// when the provider didn't report one.
    pub fn from_bytes(bytes: &[u8], mime_type: Option<&str>) -> Self {
        let mime = mime_type.unwrap_or_else(|| detect_image_mime(bytes));
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{};base64,{}", mime, payload))
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_url(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Decodes a base64 data URL into its MIME type and bytes.
    pub fn decode_data_url(&self) -> Result<(String, Vec<u8>)> {
        let rest = self
            .0
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidLocator("not a data URL".to_string()))?;
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidLocator("data URL has no payload".to_string()))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidLocator("data URL is not base64".to_string()))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidLocator(format!("bad base64 payload: {}", e)))?;

        Ok((mime.to_string(), bytes))
    }
}

impl fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URLs run to megabytes; keep log lines readable.
        if self.is_data_url() && self.0.len() > 64 {
            let cut = self
                .0
                .char_indices()
                .nth(48)
                .map_or(self.0.len(), |(i, _)| i);
            write!(f, "{}...[{} chars]", &self.0[..cut], self.0.len())
        } else {
            f.write_str(&self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    OpenAi,
}

impl AiProvider {
    fn parse(var: &str, value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => Err(Error::Config(format!(
                "{} must be 'gemini' or 'openai', got '{}'",
                var, other
            ))),
        }
    }

    fn default_enhance_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.5-flash",
            AiProvider::OpenAi => "gpt-4o-mini",
        }
    }

    fn default_image_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "imagen-4.0-generate-001",
            AiProvider::OpenAi => "gpt-image-1",
        }
    }
}

pub const DEFAULT_IMAGE_COUNT: u32 = 4;
pub const MAX_IMAGE_COUNT: u32 = 4;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub enhance_provider: AiProvider,
    pub enhance_model: String,
    pub image_provider: AiProvider,
    pub image_model: String,
    pub image_count: u32,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let enhance_provider = match var("ENHANCE_PROVIDER") {
            Some(value) => AiProvider::parse("ENHANCE_PROVIDER", &value)?,
            None => AiProvider::Gemini,
        };
        let image_provider = match var("IMAGE_PROVIDER") {
            Some(value) => AiProvider::parse("IMAGE_PROVIDER", &value)?,
            None => AiProvider::Gemini,
        };

        let image_count = match var("IMAGE_COUNT") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| {
                Error::Config(format!("IMAGE_COUNT must be a number, got '{}'", value))
            })?,
            None => DEFAULT_IMAGE_COUNT,
        }
        .clamp(1, MAX_IMAGE_COUNT);

        let config = Self {
            enhance_provider,
            enhance_model: var("ENHANCE_MODEL")
                .unwrap_or_else(|| enhance_provider.default_enhance_model().to_string()),
            image_provider,
            image_model: var("IMAGE_MODEL")
                .unwrap_or_else(|| image_provider.default_image_model().to_string()),
            image_count,
            gemini_api_key: var("GEMINI_API_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
        };

        for provider in [enhance_provider, image_provider] {
            config.api_key(provider)?;
        }

        Ok(config)
    }

    /// API key for the given provider, or a config error naming the missing variable.
    pub fn api_key(&self, provider: AiProvider) -> Result<String> {
        let (key, name) = match provider {
            AiProvider::Gemini => (&self.gemini_api_key, "GEMINI_API_KEY"),
            AiProvider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
        };
        key.clone()
            .ok_or_else(|| Error::Config(format!("{} not set", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_text_language_default_is_vietnamese() {
        assert_eq!(TextLanguage::default(), TextLanguage::Vietnamese);
    }

    #[test]
    fn test_text_language_parses_labels_loosely() {
        assert_eq!("No Text".parse::<TextLanguage>(), Ok(TextLanguage::NoText));
        assert_eq!("no-text".parse::<TextLanguage>(), Ok(TextLanguage::NoText));
        assert_eq!("KOREAN".parse::<TextLanguage>(), Ok(TextLanguage::Korean));
        assert!("Klingon".parse::<TextLanguage>().is_err());
    }

    #[test]
    fn test_aspect_ratio_parsing_and_labels() {
        assert_eq!("16:9".parse::<AspectRatio>(), Ok(AspectRatio::Wide));
        assert_eq!("shorts".parse::<AspectRatio>(), Ok(AspectRatio::Tall));
        assert_eq!(AspectRatio::default(), AspectRatio::Wide);
        assert_eq!(AspectRatio::Tall.label(), "9:16 (Shorts)");
        assert!("4:3".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_aspect_ratio_serializes_as_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::Tall).unwrap();
        assert_eq!(json, "\"9:16\"");
    }

    #[test]
    fn test_image_locator_data_url_round_trip() {
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02];
        let locator = ImageLocator::from_bytes(&bytes, None);
        assert!(locator.as_str().starts_with("data:image/jpeg;base64,"));

        let (mime, decoded) = locator.decode_data_url().unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_image_locator_rejects_remote_url_decode() {
        let locator = ImageLocator::from_url("https://example.com/a.png");
        assert!(!locator.is_data_url());
        assert!(matches!(
            locator.decode_data_url(),
            Err(Error::InvalidLocator(_))
        ));
    }

    #[test]
    fn test_image_locator_display_truncates_on_char_boundary() {
        let locator = ImageLocator::from_url(format!(
            "data:image/jpeg;base64,{}{}",
            "A".repeat(24),
            "é".repeat(30)
        ));
        let shown = locator.to_string();
        assert!(shown.starts_with("data:image/jpeg;base64,AAAA"));
        assert!(shown.ends_with(&format!("...[{} chars]", locator.as_str().len())));

        let short = ImageLocator::from_url("data:image/png;base64,AAAA");
        assert_eq!(short.to_string(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_config_defaults_to_gemini() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "g-key")])).unwrap();

        assert_eq!(config.enhance_provider, AiProvider::Gemini);
        assert_eq!(config.image_provider, AiProvider::Gemini);
        assert_eq!(config.enhance_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "imagen-4.0-generate-001");
        assert_eq!(config.image_count, DEFAULT_IMAGE_COUNT);
    }

    #[test]
    fn test_config_requires_key_for_selected_provider() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "g-key"),
            ("IMAGE_PROVIDER", "openai"),
        ]))
        .unwrap_err();

        assert!(matches!(err, Error::Config(msg) if msg.contains("OPENAI_API_KEY")));
    }

    #[test]
    fn test_config_clamps_image_count() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "g-key"),
            ("IMAGE_COUNT", "12"),
        ]))
        .unwrap();
        assert_eq!(config.image_count, MAX_IMAGE_COUNT);

        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "g-key"),
            ("IMAGE_COUNT", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_rejects_unknown_provider() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "g-key"),
            ("ENHANCE_PROVIDER", "midjourney"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
