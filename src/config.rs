use crate::encode::{PayloadFormat, DEFAULT_JPEG_QUALITY};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

pub const DEFAULT_API_BASE: &str = "https://api.siliconflow.cn";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

const KNOWN_KEYS: &[&str] = &[
    "API_Key",
    "prompt",
    "negative_prompt",
    "ModelName",
    "ApiBase",
    "PollIntervalSecs",
    "MaxPolls",
    "ImageFormat",
    "JpegQuality",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// `None` polls until a terminal status.
    pub max_polls: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "API_Key")]
    pub api_key: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
    #[serde(rename = "ModelName")]
    #[serde(default)]
    pub model: String,
    #[serde(rename = "ApiBase")]
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(skip)]
    pub poll: PollSettings,
    #[serde(skip)]
    pub image_format: PayloadFormat,
}

fn setting<'a>(map: &'a serde_json::Map<String, serde_json::Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(|v| v.as_str()).map(str::trim)
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Config {
    /// Reads a dotenv-style file; variables already set in the process environment win.
    /// A missing file is skipped, so the environment alone can configure a run.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok()).await
    }

    pub async fn load_with_env<P, F>(path: P, env: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(Error::Config(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut pairs = Vec::new();
        for item in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) =
                item.map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
            pairs.push((key, value));
        }
        for &key in KNOWN_KEYS {
            if let Some(value) = env(key) {
                pairs.push((key.to_string(), value));
            }
        }

        Self::from_pairs(pairs)
    }

    /// Later pairs override earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), serde_json::Value::String(v.into())))
            .collect();
        let mut config: Config = serde_json::from_value(serde_json::Value::Object(map.clone()))
            .map_err(|e| Error::Config(e.to_string()))?;

        if config.api_key.trim().is_empty() {
            return Err(Error::Config("API_Key missing".to_string()));
        }
        config.api_base = config.api_base.trim_end_matches('/').to_string();

        if let Some(raw) = setting(&map, "PollIntervalSecs") {
            let secs: f64 = raw
                .parse()
                .map_err(|_| Error::Config(format!("PollIntervalSecs: not a number: {raw}")))?;
            config.poll.interval = Duration::try_from_secs_f64(secs)
                .map_err(|_| Error::Config(format!("PollIntervalSecs out of range: {raw}")))?;
        }
        if let Some(raw) = setting(&map, "MaxPolls") {
            let max: u32 = raw
                .parse()
                .map_err(|_| Error::Config(format!("MaxPolls: not a count: {raw}")))?;
            config.poll.max_polls = (max > 0).then_some(max);
        }

        let quality = match setting(&map, "JpegQuality") {
            Some(raw) => match raw.parse::<u8>() {
                Ok(q) if (1..=100).contains(&q) => q,
                _ => return Err(Error::Config(format!("JpegQuality must be 1..=100: {raw}"))),
            },
            None => DEFAULT_JPEG_QUALITY,
        };
        config.image_format = match setting(&map, "ImageFormat").map(str::to_ascii_lowercase).as_deref() {
            None | Some("jpeg") | Some("jpg") => PayloadFormat::Jpeg { quality },
            Some("webp") => PayloadFormat::WebP,
            Some(other) => return Err(Error::Config(format!("unknown ImageFormat: {other}"))),
        };

        Ok(config)
    }

    /// The submit flow needs a prompt and model on top of the credential.
    pub fn ensure_submittable(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::Config("prompt missing".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config("ModelName missing".to_string()));
        }
        Ok(())
    }
}
