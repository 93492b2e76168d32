use crate::api::siliconflow::{self, ApiStatusSource};
use crate::config::Config;
use crate::download::download_video;
use crate::encode::encode_payload;
use crate::error::Result;
use crate::job::{self, HistoryRecord, JobStatus, JOB_ID_FILE};
use crate::normalize::normalize_image;
use crate::poller::{poll_until_terminal, StatusSource};
use crate::{logi, logok, logw};
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How a run ended when nothing went wrong along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Downloaded(PathBuf),
    /// The job succeeded but the video could not be fetched.
    NotDownloaded { url: String },
    Failed { reason: String },
    Unknown { status: Option<String> },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Downloaded(_))
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Downloaded(path) => write!(f, "Video saved as: {}", path.display()),
            JobOutcome::NotDownloaded { url } => {
                write!(f, "Video generated but not downloaded: {}", url)
            }
            JobOutcome::Failed { reason } => write!(f, "Video generation failed: {}", reason),
            JobOutcome::Unknown { status } => write!(
                f,
                "Unknown status '{}', stopped polling",
                status.as_deref().unwrap_or("")
            ),
        }
    }
}

/// Longest silence tolerated on any single read, including each chunk of a video body.
pub const READ_TIMEOUT: Duration = Duration::from_secs(60);

pub fn build_client() -> Result<Client> {
    client_with_read_timeout(READ_TIMEOUT)
}

/// The bound is per read, so a slow but steady download is never cut off by its total length.
pub(crate) fn client_with_read_timeout(read_timeout: Duration) -> Result<Client> {
    Ok(Client::builder().read_timeout(read_timeout).build()?)
}

/// Normalizes, encodes and submits `image_path`, then records the request id in `work_dir`.
pub async fn submit_image(
    client: &Client,
    cfg: &Config,
    image_path: &Path,
    work_dir: &Path,
) -> Result<String> {
    cfg.ensure_submittable()?;
    logi(format!("Using image file: {}", image_path.display()));

    let normalized = normalize_image(image_path)?;
    let payload = encode_payload(&normalized, cfg.image_format)?;
    let (width, height) = normalized.dimensions();
    logi(format!(
        "Encoded {}x{} frame ({} chars)",
        width,
        height,
        payload.as_str().len()
    ));

    logi("Submitting video generation request...");
    let request_id = siliconflow::submit_video_request(client, cfg, &payload).await?;

    job::save_request_id(work_dir, &request_id).await?;
    logok(format!("Request ID saved to {}", JOB_ID_FILE));

    job::append_history(work_dir, &HistoryRecord::now(&request_id, &cfg.prompt)).await?;
    logok("Generation history recorded");

    Ok(request_id)
}

/// Polls `request_id` to a terminal status and downloads the video on success.
pub async fn finish_job<S>(
    client: &Client,
    source: &S,
    cfg: &Config,
    request_id: &str,
    work_dir: &Path,
) -> Result<JobOutcome>
where
    S: StatusSource + Sync + ?Sized,
{
    let job = poll_until_terminal(source, request_id, &cfg.poll).await?;

    let outcome = match (job.status, job.result_url) {
        (JobStatus::Succeeded, Some(url)) => {
            match download_video(client, &url, request_id, work_dir).await? {
                Some(path) => {
                    logok(format!("Video saved as: {}", path.display()));
                    JobOutcome::Downloaded(path)
                }
                None => {
                    logw(format!("Video was generated but not saved; fetch it manually: {}", url));
                    JobOutcome::NotDownloaded { url }
                }
            }
        }
        (JobStatus::Failed, _) => JobOutcome::Failed {
            reason: job.failure_reason.unwrap_or_else(|| "unknown".to_string()),
        },
        _ => JobOutcome::Unknown {
            status: job.raw_status,
        },
    };
    Ok(outcome)
}

pub async fn run_submit_flow(cfg: &Config, image_path: &Path, work_dir: &Path) -> Result<JobOutcome> {
    let client = build_client()?;
    let request_id = submit_image(&client, cfg, image_path, work_dir).await?;

    let source = ApiStatusSource { client: &client, cfg };
    finish_job(&client, &source, cfg, &request_id, work_dir).await
}

/// Resumes the job whose id a previous submit left in `work_dir`.
pub async fn run_status_flow(cfg: &Config, work_dir: &Path) -> Result<JobOutcome> {
    let request_id = job::load_request_id(work_dir).await?;
    logi(format!("Checking video status, request ID: {}", request_id));

    let client = build_client()?;
    let source = ApiStatusSource { client: &client, cfg };
    finish_job(&client, &source, cfg, &request_id, work_dir).await
}
