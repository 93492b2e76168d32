use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const JOB_ID_FILE: &str = "post.txt";
pub const HISTORY_FILE: &str = "PostHistory.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Succeeded,
    Failed,
    Unknown,
}

impl JobStatus {
    /// Maps the status string reported by the API; anything unrecognized is `Unknown`.
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("InQueue") => JobStatus::Queued,
            Some("InProgress") => JobStatus::InProgress,
            Some("Succeed") => JobStatus::Succeeded,
            Some("Failed") => JobStatus::Failed,
            _ => JobStatus::Unknown,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Unknown
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub request_id: String,
    pub status: JobStatus,
    /// Status string exactly as last reported, for diagnostics.
    pub raw_status: Option<String>,
    pub result_url: Option<String>,
    pub failure_reason: Option<String>,
    pub polls: u32,
}

impl GenerationJob {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: JobStatus::Queued,
            raw_status: None,
            result_url: None,
            failure_reason: None,
            polls: 0,
        }
    }
}

pub async fn save_request_id(dir: &Path, request_id: &str) -> Result<()> {
    fs::write(dir.join(JOB_ID_FILE), request_id.trim()).await?;
    Ok(())
}

/// Reads the id left by a previous submit; a missing or blank file is `InputNotFound`.
pub async fn load_request_id(dir: &Path) -> Result<String> {
    let path = dir.join(JOB_ID_FILE);
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::InputNotFound(format!(
                "{} not found; submit a video request first",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let request_id = content.trim();
    if request_id.is_empty() {
        return Err(Error::InputNotFound(format!(
            "{} is empty; submit a video request first",
            path.display()
        )));
    }
    Ok(request_id.to_string())
}

#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Local>,
    pub request_id: String,
    pub prompt: String,
}

impl HistoryRecord {
    pub fn now(request_id: &str, prompt: &str) -> Self {
        Self {
            timestamp: Local::now(),
            request_id: request_id.to_string(),
            prompt: prompt.to_string(),
        }
    }
}

impl fmt::Display for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] RequestID: {} | Prompt: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.request_id,
            self.prompt
        )
    }
}

pub async fn append_history(dir: &Path, record: &HistoryRecord) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(HISTORY_FILE))
        .await?;
    file.write_all(format!("{}\n", record).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wire_status_mapping() {
        assert_eq!(JobStatus::from_wire(Some("InQueue")), JobStatus::Queued);
        assert_eq!(JobStatus::from_wire(Some("InProgress")), JobStatus::InProgress);
        assert_eq!(JobStatus::from_wire(Some("Succeed")), JobStatus::Succeeded);
        assert_eq!(JobStatus::from_wire(Some("Failed")), JobStatus::Failed);
        assert_eq!(JobStatus::from_wire(Some("Weird")), JobStatus::Unknown);
        assert_eq!(JobStatus::from_wire(Some("succeed")), JobStatus::Unknown);
        assert_eq!(JobStatus::from_wire(None), JobStatus::Unknown);

        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Unknown.is_terminal());
    }

    #[tokio::test]
    async fn request_id_round_trips_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        save_request_id(dir.path(), "  req-42\n").await.unwrap();
        assert_eq!(load_request_id(dir.path()).await.unwrap(), "req-42");

        // overwritten, not appended
        save_request_id(dir.path(), "req-43").await.unwrap();
        assert_eq!(load_request_id(dir.path()).await.unwrap(), "req-43");
    }

    #[tokio::test]
    async fn missing_or_blank_id_file_is_input_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_request_id(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));

        std::fs::write(dir.path().join(JOB_ID_FILE), " \n\t").unwrap();
        let err = load_request_id(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }

    #[tokio::test]
    async fn history_lines_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let at = Local.with_ymd_and_hms(2025, 3, 1, 9, 5, 7).unwrap();
        for (id, prompt) in [("a1", "first"), ("b2", "second")] {
            let record = HistoryRecord {
                timestamp: at,
                request_id: id.to_string(),
                prompt: prompt.to_string(),
            };
            append_history(dir.path(), &record).await.unwrap();
        }

        let text = std::fs::read_to_string(dir.path().join(HISTORY_FILE)).unwrap();
        assert_eq!(
            text,
            "[2025-03-01 09:05:07] RequestID: a1 | Prompt: first\n\
             [2025-03-01 09:05:07] RequestID: b2 | Prompt: second\n"
        );
    }
}
