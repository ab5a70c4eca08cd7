// Frame files on disk - written atomically, read by the button handler
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::bitmap;
use crate::domain::slot::Slot;
use crate::presentation::frame::Frame;

#[derive(Debug, Clone)]
pub struct FrameStore {
    dir: PathBuf,
}

impl FrameStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    /// Write every frame, each through a temp file and a rename
    pub async fn save_all(&self, frames: &[(Slot, Frame)]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create frame directory {}", self.dir.display()))?;

        for (slot, frame) in frames {
            let target = self.path(*slot);
            let tmp = self.dir.join(format!(".{}.tmp", slot.file_name()));
            tokio::fs::write(&tmp, bitmap::encode(frame))
                .await
                .with_context(|| format!("Failed to write {}", tmp.display()))?;
            tokio::fs::rename(&tmp, &target)
                .await
                .with_context(|| format!("Failed to replace {}", target.display()))?;
            tracing::debug!(path = %target.display(), "Saved frame");
        }
        Ok(())
    }

    pub async fn load(&self, slot: Slot) -> Result<Frame> {
        let path = self.path(slot);
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        bitmap::decode(&bytes).with_context(|| format!("Failed to decode {}", path.display()))
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("weather-station-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
