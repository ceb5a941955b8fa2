//! Modification stamps for detecting changes made by other programs.

use std::path::Path;
use std::time::SystemTime;

/// Size and modification time of a file at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub size: u64,
    pub mtime: SystemTime,
}

impl FileStamp {
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileStamp {
            size: metadata.len(),
            mtime: metadata.modified()?,
        })
    }

    /// Whether `current` was written after this stamp was taken.
    pub fn is_modified(&self, current: &FileStamp) -> bool {
        current.mtime > self.mtime
    }

    /// Compare against the file on disk. Missing or unreadable files count
    /// as unmodified.
    pub fn is_modified_on_disk<P: AsRef<Path>>(&self, path: P) -> bool {
        match FileStamp::from_path(path) {
            Ok(current) => self.is_modified(&current),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stamp_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"12345").unwrap();

        let stamp = FileStamp::from_path(&path).unwrap();
        assert_eq!(stamp.size, 5);
        assert!(!stamp.is_modified_on_disk(&path));
    }

    #[test]
    fn test_newer_mtime_is_modified() {
        let now = SystemTime::now();
        let old = FileStamp { size: 1, mtime: now };
        let new = FileStamp { size: 1, mtime: now + Duration::from_secs(2) };
        assert!(old.is_modified(&new));
        assert!(!new.is_modified(&old));
    }

    #[test]
    fn test_missing_file_is_not_modified() {
        let dir = tempfile::tempdir().unwrap();
        let stamp = FileStamp { size: 0, mtime: SystemTime::now() };
        assert!(!stamp.is_modified_on_disk(dir.path().join("gone.txt")));
    }
}
