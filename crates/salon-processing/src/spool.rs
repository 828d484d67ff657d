//! Bounded reader: stream an untrusted upload to a uniquely-named temp file
//! in the upload directory, enforcing a byte ceiling as it goes.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWriteExt};
use uuid::Uuid;

use crate::error::MediaError;

const CHUNK_SIZE: usize = 1024 * 1024;

/// MIME type always accepted as a wildcard, regardless of the allow-set.
const OCTET_STREAM: &str = "application/octet-stream";

/// A spooled upload awaiting finalization. Deletes its file on drop unless
/// consumed, so an aborted upload leaves nothing behind.
#[derive(Debug)]
pub struct SpooledUpload {
    path: PathBuf,
    bytes: u64,
    armed: bool,
}

impl SpooledUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Take ownership of the temp file, disarming the drop cleanup.
    pub(crate) fn into_path(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for SpooledUpload {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %err, "Failed to remove spooled upload");
        }
    }
}

fn remove_partial(path: &Path) {
    // Best effort: the caller is already reporting a more useful error.
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %err, "Failed to remove partial temp file");
    }
}

/// Stream `source` into a `tmp_{uuid}` file under `upload_dir`, in 1 MiB
/// chunks, enforcing `max_bytes`.
///
/// The declared MIME type is checked against `allowed_mimes` (with
/// `application/octet-stream` as a wildcard) before a single byte is read.
/// On overflow the partial file is removed (best-effort) and the upload
/// fails with [`MediaError::FileTooLarge`]. On success the source is rewound
/// to its start so callers may inspect it again.
pub async fn spool_to_temp<R>(
    source: &mut R,
    declared_mime: &str,
    allowed_mimes: &[String],
    max_bytes: u64,
    upload_dir: &Path,
) -> Result<SpooledUpload, MediaError>
where
    R: AsyncRead + AsyncSeek + Unpin,
{
    if declared_mime != OCTET_STREAM && !allowed_mimes.iter().any(|m| m == declared_mime) {
        return Err(MediaError::UnsupportedMediaType);
    }

    let temp_path = upload_dir.join(format!("tmp_{}", Uuid::new_v4().simple()));
    let mut out = File::create(&temp_path).await?;

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = match source.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) => {
                drop(out);
                remove_partial(&temp_path);
                return Err(err.into());
            }
        };
        total += n as u64;
        if total > max_bytes {
            drop(out);
            remove_partial(&temp_path);
            return Err(MediaError::FileTooLarge { max_bytes });
        }
        if let Err(err) = out.write_all(&buf[..n]).await {
            drop(out);
            remove_partial(&temp_path);
            return Err(err.into());
        }
    }
    out.flush().await?;
    drop(out);

    source.rewind().await?;

    Ok(SpooledUpload {
        path: temp_path,
        bytes: total,
        armed: true,
    })
}
