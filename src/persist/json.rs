//! JSON document store: three pretty-printed files under a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::entry::XpLogEntry;
use crate::quest::Quest;
use crate::streak::StreakMap;

use super::{DocKind, StateStore, StorageResult};

/// File-backed implementation of [`StateStore`].
///
/// Each document is rewritten in full on save, through a temp file in the
/// same directory renamed into place, so a save is atomic from the caller's
/// perspective. There is no cross-process locking; serialize writers through
/// the runtime (see [`crate::runtime`]).
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn doc_path(&self, kind: DocKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    fn load_doc<T: DeserializeOwned + Default>(&self, kind: DocKind) -> T {
        let path = self.doc_path(kind);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "document absent, starting empty");
                return T::default();
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "document unreadable, treating as empty");
                return T::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %path.display(), %err, "document unparsable, treating as empty");
                T::default()
            }
        }
    }

    fn save_doc<T: Serialize + ?Sized>(&self, kind: DocKind, value: &T) -> StorageResult<()> {
        let path = self.doc_path(kind);
        let tmp = path.with_extension("json.tmp");
        let payload = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn load_logs(&self) -> Vec<XpLogEntry> {
        self.load_doc(DocKind::Logs)
    }

    fn load_quests(&self) -> Vec<Quest> {
        self.load_doc(DocKind::Quests)
    }

    fn load_streaks(&self) -> StreakMap {
        self.load_doc(DocKind::Streaks)
    }

    fn save_logs(&mut self, logs: &[XpLogEntry]) -> StorageResult<()> {
        self.save_doc(DocKind::Logs, logs)
    }

    fn save_quests(&mut self, quests: &[Quest]) -> StorageResult<()> {
        self.save_doc(DocKind::Quests, quests)
    }

    fn save_streaks(&mut self, streaks: &StreakMap) -> StorageResult<()> {
        self.save_doc(DocKind::Streaks, streaks)
    }
}
