//! Line iteration over log files
//!
//! Log files are appended to by another process while we read them, so the
//! last line may be cut in the middle of a multi-byte character. Lines are
//! therefore split on raw `\n` bytes and decoded lossily instead of failing.

use std::io::{self, BufRead};

/// Lazy iterator over the lines of a reader
///
/// Mirrors [`BufRead::lines`]: the terminator (`\n` or `\r\n`) is stripped and
/// a final line without terminator is still yielded.
pub struct LogLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let line = strip_terminator(&self.buf);
                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Counts lines without decoding them
pub fn count_lines<R: BufRead>(mut reader: R) -> io::Result<u64> {
    let mut buf = Vec::new();
    let mut count = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(count);
        }
        count += 1;
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
