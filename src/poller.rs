use crate::api::siliconflow::StatusResponse;
use crate::config::PollSettings;
use crate::error::{Error, Result};
use crate::job::{GenerationJob, JobStatus};
use crate::{logi, logok, logw};
use async_trait::async_trait;

#[async_trait]
pub trait StatusSource {
    async fn check_status(&self, request_id: &str) -> Result<StatusResponse>;
}

/// Polls until the job reaches a terminal status.
///
/// Queued and in-progress answers sleep `settings.interval` and ask again. Any error
/// from `source` ends the loop immediately; the failed call is not retried.
pub async fn poll_until_terminal<S>(
    source: &S,
    request_id: &str,
    settings: &PollSettings,
) -> Result<GenerationJob>
where
    S: StatusSource + Sync + ?Sized,
{
    let mut job = GenerationJob::new(request_id);

    loop {
        let resp = source.check_status(request_id).await?;
        job.polls += 1;
        job.status = JobStatus::from_wire(resp.status.as_deref());
        job.raw_status = resp.status.clone();
        logi(format!(
            "Current status: {}",
            resp.status.as_deref().unwrap_or("<none>")
        ));

        if job.status.is_terminal() {
            match job.status {
                JobStatus::Succeeded => {
                    let url = resp.first_video_url().ok_or(Error::MalformedResponse {
                        endpoint: "video/status",
                        missing: "results.videos[0].url",
                    })?;
                    logok(format!("Video generated successfully! URL: {}", url));
                    job.result_url = Some(url.to_string());
                }
                JobStatus::Failed => {
                    let reason = resp.reason.unwrap_or_else(|| "unknown".to_string());
                    logw(format!("Video generation failed: {}", reason));
                    job.failure_reason = Some(reason);
                }
                _ => logw("Unknown status, stopping..."),
            }
            return Ok(job);
        }

        if let Some(max) = settings.max_polls {
            if job.polls >= max {
                return Err(Error::PollLimitExceeded {
                    request_id: request_id.to_string(),
                    polls: job.polls,
                });
            }
        }

        logi("Waiting for video generation to complete...");
        tokio::time::sleep(settings.interval).await;
    }
}
