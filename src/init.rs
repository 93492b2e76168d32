use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const IMAGE_PREFIX: &str = "image.";

/// First regular file in `dir` (by name) whose name starts with `image.`, any case.
pub async fn find_input_image(dir: &Path) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if name.starts_with(IMAGE_PREFIX) && entry.file_type().await?.is_file() {
            candidates.push(entry.path());
        }
    }

    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| {
        Error::InputNotFound(format!(
            "no image file found in {}; add a file named like 'image.png'",
            dir.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn matches_prefix_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("my_image.png"), b"x").unwrap();
        std::fs::write(dir.path().join("IMAGE.JPG"), b"x").unwrap();

        let found = find_input_image(dir.path()).await.unwrap();
        assert_eq!(found, dir.path().join("IMAGE.JPG"));
    }

    #[tokio::test]
    async fn ignores_directories_and_bare_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("image.d")).unwrap();
        std::fs::write(dir.path().join("image"), b"x").unwrap();

        let err = find_input_image(dir.path()).await.unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
