//! Mount configuration: CLI flags plus an optional config file (ambient
//! stack the core ships so a gateway binary has somewhere to start).

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{FsError, FsResult};

/// CLI surface for a demo/gateway binary mounting this core.
///
/// Mirrors spec §6's "Mount CLI ... no flags beyond the mount point and
/// standard gateway options" while adding the config knobs this crate's
/// demo binary actually needs (database path, owning uid/gid).
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "basic-mount", about = "Demo mount of the embedded-KV filesystem core")]
pub struct MountConfig {
    /// Path to the KV database file. The real store is out of scope for
    /// this crate; the demo binary's in-memory store only uses this to
    /// decide whether to report "fresh" vs "existing" on startup.
    #[arg(long, default_value = "myfs.db")]
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// uid seeded onto the root sentinel at first mount.
    #[arg(long)]
    #[serde(default)]
    pub uid: Option<u32>,

    /// gid seeded onto the root sentinel at first mount.
    #[arg(long)]
    #[serde(default)]
    pub gid: Option<u32>,

    /// Optional TOML file overriding the flags above.
    #[arg(long)]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("myfs.db")
}

impl MountConfig {
    /// Load overrides from `path` (TOML), replacing fields not already set
    /// by the CLI invocation.
    pub fn merge_file(mut self, path: &Path) -> FsResult<Self> {
        let contents = fs::read_to_string(path).map_err(|_| FsError::Io)?;
        let from_file: MountConfig = toml::from_str(&contents).map_err(|_| FsError::Io)?;
        if self.uid.is_none() {
            self.uid = from_file.uid;
        }
        if self.gid.is_none() {
            self.gid = from_file.gid;
        }
        Ok(self)
    }
}
