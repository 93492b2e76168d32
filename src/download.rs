use crate::error::Result;
use crate::{logi, logok, logw};
use reqwest::{Client, Response, StatusCode};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufWriter};

pub const VIDEO_EXT: &str = "mp4";
const CHUNK_SIZE: usize = 8192;

/// `<request_id>.mp4`, with path separators in the id flattened.
pub fn video_file_name(request_id: &str) -> String {
    let stem: String = request_id
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", stem, VIDEO_EXT)
}

/// Streams `url` into `out_dir`. A non-200 answer is logged and yields `Ok(None)`.
///
/// No whole-request deadline is applied; stalls are bounded by the client's read timeout.
pub async fn download_video(
    client: &Client,
    url: &str,
    request_id: &str,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    let resp = client.get(url).send().await?;
    if resp.status() != StatusCode::OK {
        logw(format!("Failed to download video: HTTP {}", resp.status().as_u16()));
        return Ok(None);
    }

    let path = out_dir.join(video_file_name(request_id));
    logi(format!("Downloading video -> {}", path.display()));
    match stream_to_file(resp, &path).await {
        Ok(bytes) => {
            logok(format!("Video downloaded successfully as {} ({} bytes)", path.display(), bytes));
            Ok(Some(path))
        }
        Err(e) => {
            let _ = fs::remove_file(&path).await;
            Err(e)
        }
    }
}

async fn stream_to_file(mut resp: Response, path: &Path) -> Result<u64> {
    let file = fs::File::create(path).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut written = 0u64;

    while let Some(chunk) = resp.chunk().await? {
        if chunk.is_empty() {
            continue;
        }
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    writer.flush().await?;
    Ok(written)
}
