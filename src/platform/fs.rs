// LogQuery - platform/fs.rs
//
// File reading helpers for log corpora.
// Large files are memory-mapped; small files are read with retries on
// transient I/O errors. Invalid UTF-8 is replaced, never rejected.

use crate::util::constants;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;

/// Read the full content of a file as a string, replacing invalid UTF-8.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a file, choosing the strategy by size.
///
/// Files at or above `large_file_threshold` bytes are memory-mapped, which
/// avoids a second full-size buffer. Smaller files go through
/// `read_small_file_with_retry`.
pub fn read_file_content(path: &Path, large_file_threshold: u64) -> io::Result<String> {
    let size = std::fs::metadata(path)?.len();
    if size >= large_file_threshold {
        tracing::debug!(file = %path.display(), size, "Memory-mapping large file");
        read_large_file(path)
    } else {
        read_small_file_with_retry(path)
    }
}

/// Read using `memmap2` for large files.
fn read_large_file(path: &Path) -> io::Result<String> {
    let file = std::fs::File::open(path)?;
    // SAFETY: the map is read-only and dropped before returning. External
    // truncation of the file while mapped is accepted as undefined for a
    // tool that reads already-written logs.
    let mmap = unsafe { memmap2::Mmap::map(&file)? };
    Ok(String::from_utf8_lossy(&mmap).into_owned())
}

/// Read a small file, retrying transient errors with capped backoff.
fn read_small_file_with_retry(path: &Path) -> io::Result<String> {
    let delays = constants::READ_RETRY_DELAYS_MS;
    let mut attempt = 0;

    loop {
        match read_file_lossy(path) {
            Ok(content) => return Ok(content),
            Err(e) if is_transient_error(&e) && attempt < delays.len() => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(delays[attempt]));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}

/// Read everything from `reader` (e.g. standard input), replacing invalid UTF-8.
pub fn read_all_lossy<R: Read>(mut reader: R) -> io::Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
