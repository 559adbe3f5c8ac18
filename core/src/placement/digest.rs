use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Computes a content digest of a file, streaming in 64 KiB chunks
///
/// Used only to distinguish true duplicates from distinct same-named files;
/// acquisition files run to hundreds of megabytes, so the whole file is
/// never held in memory.
pub fn file_digest(path: &Path) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut hasher = Xxh3::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.digest())
}
