//! Test fixtures for integration tests
//!
//! Builds a throwaway metadata directory the way the recorder lays it out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use crate::config::{IndexConfig, ServerConfig};
use crate::http::create_router;
use crate::state::AppState;

/// A temporary directory of `.meta` sidecars
pub struct MetaDir {
    dir: TempDir,
}

impl MetaDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<name>.meta` with a raw body
    pub fn write_raw(&self, name: &str, body: &str) -> &Self {
        fs::write(self.path().join(format!("{}.meta", name)), body).expect("write meta file");
        self
    }

    /// Write `<name>.meta` with the three required fields
    pub fn write_record(&self, name: &str, timestamp: i64, did: &str, stream_type: &str) -> &Self {
        let body = serde_json::json!({
            "timestamp": timestamp,
            "did": did,
            "stream_type": stream_type,
        });
        self.write_raw(name, &body.to_string())
    }

    /// Write a sidecar exactly as the recorder does, media file included
    pub fn write_recording(&self, prefix: &str, timestamp: i64, did: &str, stream_type: &str) -> &Self {
        let video_name = format!("detection_{}.mp4", prefix);
        fs::write(self.path().join(&video_name), b"").expect("write media file");

        let body = serde_json::json!({
            "did": did,
            "stream_type": stream_type,
            "datetime": "2025-01-01T12:00:00+00:00",
            "timestamp": timestamp,
            "date": "2025-01-01",
            "time": "12:00:00",
        });
        fs::write(
            self.path().join(format!("{}.meta", video_name)),
            serde_json::to_string_pretty(&body).expect("encode meta"),
        )
        .expect("write meta file");
        self
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            index: IndexConfig {
                meta_dir: self.path().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn router(&self) -> Router {
        router_for(self.path().to_path_buf())
    }
}

/// Router serving an arbitrary (possibly missing) metadata directory
pub fn router_for(meta_dir: PathBuf) -> Router {
    let config = ServerConfig {
        index: IndexConfig {
            meta_dir,
            ..Default::default()
        },
        ..Default::default()
    };
    create_router(Arc::new(AppState::new(config)))
}

/// The two-file directory used by most scenarios
pub fn two_devices() -> MetaDir {
    let dir = MetaDir::new();
    dir.write_record("a", 100, "dev1", "main")
        .write_record("b", 200, "dev2", "sub");
    dir
}
