// Debug logging module for asynchronous move logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the request/response cycle. Every applied move is written as one line
// of a JSONL file that the replay tool can read back.

use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{Player, Position};

/// Who chose a logged move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    Human,
    Ai,
}

/// A single line of the move log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogEntry {
    /// 1-based count of moves applied in the current game; reused after an undo or a restart
    pub ply: usize,
    pub player: Player,
    pub house: u8,
    pub source: MoveSource,
    /// Search depth, AI moves only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    pub before: Position,
    pub after: Position,
    pub timestamp: String,
}

impl MoveLogEntry {
    /// Builds an entry stamped with the current UTC time
    pub fn new(
        ply: usize,
        player: Player,
        house: u8,
        source: MoveSource,
        depth: Option<u8>,
        before: Position,
        after: Position,
    ) -> Self {
        MoveLogEntry {
            ply,
            player,
            house,
            source,
            depth,
            before,
            after,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs an applied move asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_move(&self, entry: MoveLogEntry) {
        if !self.enabled {
            return;
        }

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("Debug log entry for ply {} dropped: no async runtime", entry.ply);
                return;
            }
        };

        let file_handle = self.file.clone();
        handle.spawn(async move {
            Self::log_move_internal(file_handle, entry).await;
        });
    }

    /// Internal async function that performs the actual file write
    async fn log_move_internal(file_handle: Arc<Mutex<Option<File>>>, entry: MoveLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_json_shape() {
        let entry = MoveLogEntry {
            ply: 1,
            player: Player::Bottom,
            house: 3,
            source: MoveSource::Human,
            depth: None,
            before: Position::initial(),
            after: Position::initial(),
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["player"], "B");
        assert_eq!(json["source"], "human");
        assert!(json.get("depth").is_none());

        let back: MoveLogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[tokio::test]
    async fn test_enabled_logger_writes_lines() {
        let path = std::env::temp_dir().join(format!("oware_debug_test_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let logger = DebugLogger::new(true, &path_str).await;
        assert!(logger.is_enabled());

        let entry = MoveLogEntry::new(
            1,
            Player::Top,
            2,
            MoveSource::Ai,
            Some(4),
            Position::initial(),
            Position::initial(),
        );
        DebugLogger::log_move_internal(logger.file.clone(), entry).await;

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("\"source\":\"ai\""));
        let _ = std::fs::remove_file(&path);
    }
}
