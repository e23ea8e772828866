use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use serde::Deserialize;

use crate::db;
use crate::invalidation::ListInvalidation;
use crate::store::StudentStore;
use crate::students;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub list: ListInvalidation,
    pub busy_timeout: Duration,
    pub seed_on_open: bool,
}

impl AppState {
    pub fn new(busy_timeout: Duration, seed_on_open: bool) -> Self {
        let mut list = ListInvalidation::new();
        list.subscribe(|generation| tracing::debug!(generation, "student list is stale"));
        Self {
            workspace: None,
            db: None,
            list,
            busy_timeout,
            seed_on_open,
        }
    }

    /// Opens (creating and migrating as needed) the workspace database and
    /// makes it the active store.
    pub fn open_workspace(&mut self, path: &Path) -> anyhow::Result<()> {
        let conn = db::open_db(path, self.busy_timeout)?;
        if self.seed_on_open && conn.count()? == 0 {
            // Seeding is best-effort here; the workspace still opens.
            if let Err(e) = students::seed_if_empty(&conn, &mut self.list) {
                tracing::warn!(error = %e, "seed on open failed");
            }
        }
        tracing::info!(workspace = %path.display(), "workspace opened");
        self.workspace = Some(path.to_path_buf());
        self.db = Some(conn);
        Ok(())
    }
}
