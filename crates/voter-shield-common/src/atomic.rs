//! Crash-safe file writes: write to a sibling temp file, then rename.
//!
//! Every writer in this pipeline (per-doc CSV/XLSX, combined output,
//! report.json, progress.csv) uses this exact pattern so a crash never
//! leaves a consumer observing a partial file.

use crate::VoterShieldError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes `contents` atomically to `path`: creates a temp file in the same
/// directory (so the final rename is same-filesystem), writes and flushes
/// it, then renames it into place.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), VoterShieldError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tmp");
    let tmp_path = dir.join(format!("{stem}.{}.tmp", std::process::id()));

    {
        let mut f = fs::File::create(&tmp_path)?;
        f.write_all(contents)?;
        f.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Like [`write_atomic`] but takes a closure that writes directly into the
/// temp file, for writers (XLSX) that need a `Write` sink rather than a
/// pre-built byte buffer.
pub fn write_atomic_with<F>(path: &Path, write_fn: F) -> Result<(), VoterShieldError>
where
    F: FnOnce(&Path) -> Result<(), VoterShieldError>,
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tmp");
    let tmp_path = dir.join(format!("{stem}.{}.tmp", std::process::id()));

    write_fn(&tmp_path)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_atomic(&path, b"hello").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().and_then(|e| e.to_str()) == Some("tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
