//! Autosave snapshots.
//!
//! Modified buffers are periodically copied into the autosave directory.
//! The user's own files are never written behind their back; a clean
//! save removes the snapshot.

use crate::buffer::Buffer;
use std::io;
use std::path::{Path, PathBuf};

/// Write one buffer's snapshot, creating the directory as needed.
pub fn snapshot(dir: &Path, buffer: &Buffer) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(buffer.autosave_name());
    std::fs::write(&path, &buffer.text)?;
    Ok(path)
}

/// Snapshot every modified buffer. Returns how many were written;
/// individual failures are reported and skipped.
pub fn snapshot_modified<'a>(dir: &Path, buffers: impl Iterator<Item = &'a Buffer>) -> usize {
    let mut written = 0;
    for buffer in buffers {
        match snapshot(dir, buffer) {
            Ok(_) => written += 1,
            Err(e) => eprintln!("autosave failed: {}", e),
        }
    }
    written
}

/// Drop a buffer's snapshot after a clean save. Missing snapshots are
/// not an error.
pub fn remove_snapshot(dir: &Path, buffer: &Buffer) {
    let _ = std::fs::remove_file(dir.join(buffer.autosave_name()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("autosave");

        let mut buffer = Buffer::new();
        buffer.text = "draft words".to_string();
        buffer.path = Some(PathBuf::from("/home/w/novel.txt"));
        buffer.modified = true;

        let path = snapshot(&dir, &buffer).unwrap();
        assert_eq!(path.file_name().unwrap(), "novel.txt.autosave");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "draft words");

        remove_snapshot(&dir, &buffer);
        assert!(!path.exists());
        // removing again is harmless
        remove_snapshot(&dir, &buffer);
    }

    #[test]
    fn test_snapshot_modified_counts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut a = Buffer::new();
        a.text = "a".to_string();
        a.modified = true;
        let mut b = Buffer::new();
        b.path = Some(PathBuf::from("b.txt"));
        b.text = "b".to_string();
        b.modified = true;

        let buffers = vec![a, b];
        let written = snapshot_modified(tmp.path(), buffers.iter());
        assert_eq!(written, 2);
        assert!(tmp.path().join("untitled.autosave").exists());
        assert!(tmp.path().join("b.txt.autosave").exists());
    }
}
