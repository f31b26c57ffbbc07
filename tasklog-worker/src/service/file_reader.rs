//! Whole-file readers
//!
//! Both readers degrade to an empty result on I/O failure and log the error
//! locally. Callers cannot tell an empty file from a failed read on this path.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::error;

use super::lines::LogLines;

/// Reads a file's raw bytes for download
pub fn read_all_bytes(path: &Path) -> Vec<u8> {
    let result = File::open(path).and_then(|mut file| {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(bytes)
    });

    match result {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Get file bytes error, path: {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Reads a file as text, terminating every line with `\r\n`
pub fn read_whole_file(path: &Path) -> String {
    let result = File::open(path).and_then(|file| {
        let mut content = String::new();
        for line in LogLines::new(BufReader::new(file)) {
            content.push_str(&line?);
            content.push_str("\r\n");
        }
        Ok(content)
    });

    match result {
        Ok(content) => content,
        Err(e) => {
            error!("Read whole file error, path: {}: {}", path.display(), e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_all_bytes_returns_exact_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("task.log");
        let content = b"line one\r\nline two\n\x00\xff";
        fs::write(&path, content).unwrap();

        assert_eq!(read_all_bytes(&path), content.to_vec());
    }

    #[test]
    fn test_read_all_bytes_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(read_all_bytes(&dir.path().join("missing.log")).is_empty());
    }

    #[test]
    fn test_read_whole_file_uses_crlf() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("task.log");
        fs::write(&path, "first\nsecond\r\nthird").unwrap();

        assert_eq!(read_whole_file(&path), "first\r\nsecond\r\nthird\r\n");
    }

    #[test]
    fn test_read_whole_file_failure_is_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(read_whole_file(&dir.path().join("missing.log")), "");
        // A directory opens on some platforms but cannot be read
        assert_eq!(read_whole_file(dir.path()), "");
    }
}
