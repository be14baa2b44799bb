use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use aeon_types::{StoreKey, Value, ValueKind};

use crate::error::{StoreError, StoreResult};
use crate::traits::TypedStore;

/// One persisted write.
///
/// On-disk format per entry:
/// ```text
/// [4 bytes: entry length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized LogEntry)]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct LogEntry {
    key_hash: [u8; 32],
    kind: ValueKind,
    value: Value,
}

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Configuration for the log-backed store.
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// `fsync` after every write. On by default; turning it off trades
    /// durability of the latest writes for throughput.
    pub sync_every_write: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            sync_every_write: true,
        }
    }
}

/// Internal mutable state for the log writer.
struct LogWriter {
    writer: BufWriter<File>,
    /// Current write offset in the log file.
    offset: u64,
}

/// Append-only, crash-recoverable file-backed typed store.
///
/// Every write is serialized with bincode, framed with a length prefix and
/// a CRC32 checksum, and appended to a single log file before the in-memory
/// view is updated. On open the log is replayed front-to-back with
/// last-write-wins; a CRC or length failure is treated as a torn tail write
/// from a crash — replay warns and stops there, keeping every entry that
/// committed before it.
pub struct LogStore {
    path: PathBuf,
    entries: RwLock<HashMap<StoreKey, Value>>,
    writer: Mutex<LogWriter>,
    config: LogConfig,
}

impl LogStore {
    /// Open (or create) a log-backed store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::open_with_config(path, LogConfig::default())
    }

    /// Open with explicit configuration.
    pub fn open_with_config(path: &Path, config: LogConfig) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let entries = Self::replay(path)?;
        let offset = file.metadata()?.len();
        let writer = BufWriter::new(file);

        debug!(
            path = %path.display(),
            entries = entries.len(),
            offset,
            "opened log store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            writer: Mutex::new(LogWriter { writer, offset }),
            config,
        })
    }

    /// Number of distinct keys that have been written at least once.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no entry has ever been written.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replay the log front-to-back, building the last-write-wins view.
    fn replay(path: &Path) -> StoreResult<HashMap<StoreKey, Value>> {
        let mut file = BufReader::new(File::open(path)?);
        let file_len = file.get_ref().metadata()?.len();
        let mut entries = HashMap::new();
        let mut offset: u64 = 0;
        let mut replayed: u64 = 0;

        while offset + HEADER_SIZE as u64 <= file_len {
            file.seek(SeekFrom::Start(offset))?;

            let mut header_buf = [0u8; HEADER_SIZE];
            match file.read_exact(&mut header_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            }

            let length =
                u32::from_le_bytes([header_buf[0], header_buf[1], header_buf[2], header_buf[3]]);
            let expected_crc =
                u32::from_le_bytes([header_buf[4], header_buf[5], header_buf[6], header_buf[7]]);

            if length == 0 || (offset + HEADER_SIZE as u64 + length as u64) > file_len {
                warn!(offset, length, file_len, "torn log entry; stopping replay");
                break;
            }

            let mut payload = vec![0u8; length as usize];
            match file.read_exact(&mut payload) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    warn!(offset, "truncated log entry; stopping replay");
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let actual_crc = crc32fast::hash(&payload);
            if actual_crc != expected_crc {
                warn!(
                    offset,
                    expected = expected_crc,
                    actual = actual_crc,
                    "CRC mismatch; stopping replay at torn tail"
                );
                break;
            }

            let entry: LogEntry = bincode::deserialize(&payload).map_err(|e| {
                StoreError::CorruptEntry {
                    offset,
                    reason: e.to_string(),
                }
            })?;

            let key = StoreKey::from_raw(entry.key_hash, entry.kind);
            entries.insert(key, entry.value);
            replayed += 1;

            offset += HEADER_SIZE as u64 + length as u64;
        }

        debug!(replayed, keys = entries.len(), "log replay complete");
        Ok(entries)
    }

    /// Append one entry to the log file.
    fn append(&self, entry: &LogEntry) -> StoreResult<()> {
        let payload = bincode::serialize(entry)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let length = payload.len() as u32;
        let crc = crc32fast::hash(&payload);

        let mut w = self.writer.lock().expect("log mutex poisoned");
        let entry_offset = w.offset;

        w.writer.write_all(&length.to_le_bytes())?;
        w.writer.write_all(&crc.to_le_bytes())?;
        w.writer.write_all(&payload)?;
        w.writer.flush()?;
        if self.config.sync_every_write {
            w.writer.get_ref().sync_all()?;
        }

        w.offset += HEADER_SIZE as u64 + payload.len() as u64;

        debug!(offset = entry_offset, len = payload.len(), "log append");
        Ok(())
    }
}

impl TypedStore for LogStore {
    fn write(&self, key: &StoreKey, value: Value) -> StoreResult<()> {
        self.check_kind(key, &value)?;

        // Write-ahead: the entry hits the log before the in-memory view.
        // Holding the map's write lock across the append keeps the pair
        // atomic with respect to other writers.
        let mut map = self.entries.write().expect("lock poisoned");
        self.append(&LogEntry {
            key_hash: *key.as_bytes(),
            kind: key.kind(),
            value: value.clone(),
        })?;
        map.insert(*key, value);
        Ok(())
    }

    fn read(&self, key: &StoreKey) -> StoreResult<Value> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map
            .get(key)
            .cloned()
            .unwrap_or_else(|| Value::zero(key.kind())))
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("path", &self.path)
            .field("entry_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.log");
        (dir, path)
    }

    #[test]
    fn write_then_read() {
        let (_dir, path) = temp_log();
        let store = LogStore::open(&path).unwrap();
        store.write_uint("counter", "n", 41).unwrap();
        assert_eq!(store.read_uint("counter", "n").unwrap(), 41);
    }

    #[test]
    fn reopen_replays_to_identical_state() {
        let (_dir, path) = temp_log();
        {
            let store = LogStore::open(&path).unwrap();
            store.write_uint("counter", "n", 1).unwrap();
            store.write_uint("counter", "n", 2).unwrap();
            store.write_text("labels", "title", "eternal").unwrap();
            store.write_bool("flags", "paused", true).unwrap();
        }
        let store = LogStore::open(&path).unwrap();
        assert_eq!(store.read_uint("counter", "n").unwrap(), 2);
        assert_eq!(store.read_text("labels", "title").unwrap(), "eternal");
        assert!(store.read_bool("flags", "paused").unwrap());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn absent_key_is_zero_after_reopen() {
        let (_dir, path) = temp_log();
        {
            let store = LogStore::open(&path).unwrap();
            store.write_uint("counter", "n", 5).unwrap();
        }
        let store = LogStore::open(&path).unwrap();
        assert_eq!(store.read_uint("other", "m").unwrap(), 0);
    }

    #[test]
    fn torn_tail_is_skipped_on_replay() {
        let (_dir, path) = temp_log();
        {
            let store = LogStore::open(&path).unwrap();
            store.write_uint("counter", "n", 9).unwrap();
        }
        // Simulate a torn write: append garbage that looks like a header
        // plus a payload whose CRC cannot match.
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(&8u32.to_le_bytes()).unwrap();
            file.write_all(&0xDEAD_BEEFu32.to_le_bytes()).unwrap();
            file.write_all(b"garbage!").unwrap();
        }
        let store = LogStore::open(&path).unwrap();
        assert_eq!(store.read_uint("counter", "n").unwrap(), 9);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn truncated_header_is_tolerated() {
        let (_dir, path) = temp_log();
        {
            let store = LogStore::open(&path).unwrap();
            store.write_bool("flags", "live", true).unwrap();
        }
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(&[0x01, 0x02, 0x03]).unwrap(); // partial header
        }
        let store = LogStore::open(&path).unwrap();
        assert!(store.read_bool("flags", "live").unwrap());
    }

    #[test]
    fn kind_mismatch_leaves_log_untouched() {
        let (_dir, path) = temp_log();
        let store = LogStore::open(&path).unwrap();
        let key = aeon_types::StoreKey::derive("counter", "n", ValueKind::Uint);
        let err = store.write(&key, Value::Bool(true)).unwrap_err();
        assert!(matches!(err, StoreError::KindMismatch { .. }));

        drop(store);
        let store = LogStore::open(&path).unwrap();
        assert!(store.is_empty());
    }
}
