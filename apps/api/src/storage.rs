//! Local-disk storage for generated CV PDFs.
//!
//! Paths handed out (and persisted in `cvs.pdf_path`) are relative to the
//! storage root so the data directory can be moved without rewriting rows.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Directory under the storage root that holds CV PDFs.
pub const CV_UPLOADS_DIR: &str = "uploads/cvs";

const MAX_NAME_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone)]
pub struct PdfStore {
    root: PathBuf,
}

impl PdfStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the uploads directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        let dir = self.root.join(CV_UPLOADS_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        debug!("CV uploads directory ready at {}", dir.display());
        Ok(())
    }

    /// Writes a PDF for `profile_id` and returns its path relative to the root.
    pub async fn save(&self, profile_id: i32, bytes: &[u8]) -> std::io::Result<String> {
        self.save_at(profile_id, Utc::now().timestamp_millis(), bytes).await
    }

    /// Never overwrites an existing file: a taken name moves the timestamp
    /// forward by one millisecond and tries again.
    async fn save_at(
        &self,
        profile_id: i32,
        timestamp_millis: i64,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        self.ensure_dir().await?;

        let mut millis = timestamp_millis;
        for _ in 0..MAX_NAME_ATTEMPTS {
            let relative = cv_relative_path(profile_id, millis);
            let opened = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.resolve(&relative))
                .await;

            let mut file = match opened {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{relative} already exists, trying the next timestamp");
                    millis += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            file.write_all(bytes).await?;
            file.flush().await?;

            info!("Stored CV PDF at {relative} ({} bytes)", bytes.len());
            return Ok(relative);
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free CV file name for profile {profile_id}"),
        ))
    }

    /// Reads a stored PDF. `Ok(None)` when the file no longer exists.
    pub async fn read(&self, relative: &str) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.resolve(relative)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Deletes a stored PDF. Returns `false` if it was already gone.
    pub async fn remove(&self, relative: &str) -> std::io::Result<bool> {
        match tokio::fs::remove_file(self.resolve(relative)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(Path::new(relative))
    }
}

/// `uploads/cvs/cv_<profile>_<unix millis>.pdf`
pub fn cv_relative_path(profile_id: i32, timestamp_millis: i64) -> String {
    format!("{CV_UPLOADS_DIR}/cv_{profile_id}_{timestamp_millis}.pdf")
}
