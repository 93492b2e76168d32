use crate::config::Config;
use crate::encode::EncodedPayload;
use crate::error::{Error, Result};
use crate::poller::StatusSource;
use crate::{logi, logw};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Fixed so identical inputs reproduce the same video.
pub const SEED: u64 = 123;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(120);
const STATUS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "requestId")]
    request_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub results: Option<StatusResults>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResults {
    #[serde(default)]
    pub videos: Vec<VideoResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoResult {
    #[serde(default)]
    pub url: Option<String>,
}

impl StatusResponse {
    pub fn first_video_url(&self) -> Option<&str> {
        self.results
            .as_ref()?
            .videos
            .first()?
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

fn endpoint(cfg: &Config, path: &str) -> String {
    format!("{}/v1/video/{}", cfg.api_base, path)
}

pub async fn submit_video_request(
    client: &Client,
    cfg: &Config,
    image: &EncodedPayload,
) -> Result<String> {
    let body = json!({
        "model": cfg.model,
        "prompt": cfg.prompt,
        "negative_prompt": cfg.negative_prompt,
        "image": image.as_str(),
        "seed": SEED,
    });

    let resp = client
        .post(endpoint(cfg, "submit"))
        .bearer_auth(&cfg.api_key)
        .json(&body)
        .timeout(SUBMIT_TIMEOUT)
        .send()
        .await?;

    let status = resp.status();
    let raw = resp.text().await?;

    if status != StatusCode::OK {
        logw(format!("Video submit HTTP {}", status.as_u16()));
        return Err(Error::Submission {
            status: status.as_u16(),
            body: raw,
        });
    }

    let parsed: SubmitResponse = serde_json::from_str(&raw).map_err(|source| Error::InvalidJson {
        endpoint: "video/submit",
        source,
    })?;
    let request_id = parsed
        .request_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or(Error::MalformedResponse {
            endpoint: "video/submit",
            missing: "requestId",
        })?;

    logi(format!("Request submitted. Request ID: {}", request_id));
    Ok(request_id)
}

/// The body is parsed whatever the HTTP status; error payloads simply lack a known status.
pub async fn check_video_status(
    client: &Client,
    cfg: &Config,
    request_id: &str,
) -> Result<StatusResponse> {
    let resp = client
        .post(endpoint(cfg, "status"))
        .bearer_auth(&cfg.api_key)
        .json(&json!({ "requestId": request_id }))
        .timeout(STATUS_TIMEOUT)
        .send()
        .await?;

    let status = resp.status();
    let raw = resp.text().await?;
    if !status.is_success() {
        logw(format!("Video status HTTP {}", status.as_u16()));
    }

    serde_json::from_str(&raw).map_err(|source| Error::InvalidJson {
        endpoint: "video/status",
        source,
    })
}

/// Status endpoint bound to one client and configuration.
pub struct ApiStatusSource<'a> {
    pub client: &'a Client,
    pub cfg: &'a Config,
}

#[async_trait]
impl StatusSource for ApiStatusSource<'_> {
    async fn check_status(&self, request_id: &str) -> Result<StatusResponse> {
        check_video_status(self.client, self.cfg, request_id).await
    }
}
