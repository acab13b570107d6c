//! Avatar files on the local filesystem.
//!
//! Layout: one `{id}.jpg` per peer directly under the cache directory. Writes
//! go to `{id}.jpg.tmp` and are renamed into place, so a file under the final
//! name is always complete.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, warn};

use rosterwatch_core::error::{AppError, ErrorKind};
use rosterwatch_core::result::AppResult;
use rosterwatch_core::types::PeerId;

/// Image file extension.
pub const AVATAR_EXTENSION: &str = "jpg";
/// Suffix appended to the final name while a write is in progress.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Avatar directory accessor.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Final path of a peer's avatar.
    pub fn path_for(&self, id: PeerId) -> PathBuf {
        self.root.join(format!("{id}.{AVATAR_EXTENSION}"))
    }

    fn temp_path_for(&self, id: PeerId) -> PathBuf {
        self.root.join(format!("{id}.{AVATAR_EXTENSION}{TEMP_SUFFIX}"))
    }

    /// Whether a complete avatar is cached for `id`.
    pub async fn exists(&self, id: PeerId) -> bool {
        fs::metadata(self.path_for(id))
            .await
            .is_ok_and(|m| m.is_file())
    }

    /// `file://` URI of the cached avatar, if present.
    pub async fn local_ref(&self, id: PeerId) -> Option<String> {
        if !self.exists(id).await {
            return None;
        }
        let absolute = fs::canonicalize(self.path_for(id)).await.ok()?;
        Some(format!("file://{}", absolute.display()))
    }

    /// Write an avatar through a temporary file and rename it into place.
    ///
    /// On failure the temporary file is removed and no final file appears.
    pub async fn write_atomic(&self, id: PeerId, data: &[u8]) -> AppResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create avatar directory: {}", self.root.display()),
                e,
            )
        })?;

        let temp = self.temp_path_for(id);
        let result = async {
            fs::write(&temp, data).await?;
            fs::rename(&temp, self.path_for(id)).await
        }
        .await;

        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %temp.display(), error = %cleanup, "Failed to remove temp avatar");
                }
            }
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write avatar for {id}"),
                e,
            ));
        }

        debug!(id = %id, bytes = data.len(), "Cached avatar");
        Ok(())
    }

    /// Delete avatars last modified more than `max_age` before `now`.
    ///
    /// Only final `.jpg` files are considered. Returns the number removed.
    pub async fn sweep(&self, max_age: Duration, now: SystemTime) -> AppResult<usize> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list avatar directory: {}", self.root.display()),
                    e,
                ));
            }
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(AVATAR_EXTENSION) {
                continue;
            }

            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot read avatar age");
                    continue;
                }
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age <= max_age {
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete old avatar"),
            }
        }

        debug!(removed, "Avatar sweep finished");
        Ok(removed)
    }
}
