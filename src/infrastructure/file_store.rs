// Upload directory management for raw route files
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stores raw CSV payloads under a flat upload directory.
///
/// Stored names carry an upload timestamp plus a process-wide sequence
/// number, so repeated uploads of the same client filename never
/// collide.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    sequence: AtomicU64,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Write the payload and return the stored filename.
    pub async fn store(&self, client_filename: &str, bytes: &[u8]) -> io::Result<String> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let stored = format!(
            "{}_{:04}_{}",
            chrono::Utc::now().format("%Y%m%d%H%M%S"),
            sequence,
            sanitize_filename(client_filename)
        );
        tokio::fs::write(self.root.join(&stored), bytes).await?;
        Ok(stored)
    }

    pub async fn read(&self, stored_filename: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(stored_filename)).await
    }

    pub async fn remove(&self, stored_filename: &str) -> io::Result<()> {
        tokio::fs::remove_file(self.root.join(stored_filename)).await
    }
}

/// Flatten a client-supplied filename to one safe path component.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(['.', '_']);
    if trimmed.is_empty() {
        "route.csv".to_string()
    } else {
        trimmed.to_string()
    }
}
