//! Fetcher: pulls PDFs from a set of `s3://` URIs into a local input
//! directory, and the writer's optional whole-directory output upload.
//! A missing object or credentials failure here is a preconditional
//! error — fatal for the whole run, never per-document, since downstream
//! stages cannot classify a phantom document.

use crate::object_storage::S3Config;
use crate::uri::S3Uri;
use crate::{ObjectStorage, S3ObjectStorage, StorageResult};
use std::path::{Path, PathBuf};
use tracing::info;
use walk::walk_files;

/// Downloads every PDF reachable from `uris` into `dest_dir`, preserving
/// base names. A URI whose key is empty or ends in `/` is treated as a
/// prefix and listed; a URI with a specific key is fetched directly.
pub async fn download_pdfs(uris: &[String], dest_dir: &Path, s3_config: S3Config) -> StorageResult<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dest_dir).await?;

    let mut downloaded = Vec::new();
    for raw in uris {
        let parsed = S3Uri::parse(raw)?;
        let storage = S3ObjectStorage::new(S3Config {
            bucket: parsed.bucket.clone(),
            ..s3_config.clone()
        })
        .await?;

        let is_prefix = parsed.key.is_empty() || parsed.key.ends_with('/');
        let keys = if is_prefix {
            storage.list_files(&parsed.key).await?
        } else {
            vec![parsed.key.clone()]
        };

        for key in keys {
            if !key.to_lowercase().ends_with(".pdf") {
                continue;
            }
            let base_name = key.rsplit('/').next().unwrap_or(&key);
            let dest = dest_dir.join(base_name);
            info!(uri = %raw, key = %key, dest = %dest.display(), "fetching input PDF");
            storage.retrieve_file_to_path(&key, &dest).await?;
            downloaded.push(dest);
        }
    }

    Ok(downloaded)
}

/// Uploads every file under `local_dir` to `dest_uri`, preserving the
/// directory's relative structure under the URI's key prefix.
pub async fn upload_directory(local_dir: &Path, dest_uri: &str, s3_config: S3Config) -> StorageResult<usize> {
    let parsed = S3Uri::parse(dest_uri)?;
    let storage = S3ObjectStorage::new(S3Config {
        bucket: parsed.bucket.clone(),
        ..s3_config
    })
    .await?;

    let files = walk_files(local_dir)?;
    let prefix = parsed.key.trim_end_matches('/');

    let mut uploaded = 0;
    for file in files {
        let rel = file
            .strip_prefix(local_dir)
            .unwrap_or(&file)
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");
        let key = if prefix.is_empty() {
            rel
        } else {
            format!("{prefix}/{rel}")
        };
        info!(file = %file.display(), key = %key, "uploading output file");
        storage.store_file_from_path(&key, &file).await?;
        uploaded += 1;
    }

    Ok(uploaded)
}

mod walk {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    pub fn walk_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        if !dir.exists() {
            return Ok(out);
        }
        let mut stack = vec![dir.to_path_buf()];
        while let Some(d) = stack.pop() {
            for entry in fs::read_dir(&d)? {
                let entry = entry?;
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    out.push(path);
                }
            }
        }
        out.sort();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::walk::walk_files;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn walk_files_finds_nested_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/c.txt"), b"x").unwrap();
        fs::write(dir.path().join("top.txt"), b"y").unwrap();

        let files = walk_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn walk_files_on_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        assert!(walk_files(&missing).unwrap().is_empty());
    }
}
