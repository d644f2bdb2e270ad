//! Content hashing for upload verification.

use md5::{Digest, Md5};
use sp_error::{Result, StorageError};
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Lowercase hex MD5 of a file's content.
pub async fn md5_hex(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;

    let mut hasher = Md5::new();
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|e| StorageError::Io(format!("{}: {e}", path.display())))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// MD5 hex of an in-memory buffer.
pub fn md5_hex_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// ETag S3 reports for a single-part upload with this MD5, quotes included.
pub fn quoted_etag(md5_hex: &str) -> String {
    format!("\"{md5_hex}\"")
}

/// Whether a stored object's ETag proves its content matches `md5_hex`.
pub fn etag_matches(etag: &str, md5_hex: &str) -> bool {
    etag == quoted_etag(md5_hex)
}
