use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::common::config::DEFAULT_CHUNK_SIZE;
use crate::common::errors::{DupError, Result};

/// Compute the SHA-256 digest of a file as lowercase hex
pub fn full_hash(path: &Path) -> Result<String> {
    hash_file(path, DEFAULT_CHUNK_SIZE)
}

/// Compute the SHA-256 digest of a file, reading `chunk_size` bytes at a time.
///
/// Memory use is bounded by one chunk regardless of file size. Any open or
/// read failure is returned as [`DupError::Unreadable`].
pub fn hash_file(path: &Path, chunk_size: usize) -> Result<String> {
    let unreadable = |source| DupError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(unreadable(e)),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_size_does_not_change_digest() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("data.bin");
        let content: Vec<u8> = (0..20_000).map(|i| (i % 251) as u8).collect();
        std::fs::write(&file, &content).unwrap();

        let small = hash_file(&file, 7).unwrap();
        let default = hash_file(&file, DEFAULT_CHUNK_SIZE).unwrap();
        let large = hash_file(&file, 1 << 20).unwrap();
        assert_eq!(small, default);
        assert_eq!(default, large);
    }

    #[test]
    fn test_known_sha256_of_empty_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("empty");
        std::fs::write(&file, b"").unwrap();

        assert_eq!(
            full_hash(&file).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
