use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Student records sidecar: JSON requests on stdin, one response per line on stdout.
#[derive(Debug, Parser)]
#[command(name = "rosterd", version, about)]
pub struct Config {
    /// Workspace directory to open at startup (otherwise use `workspace.select`).
    #[arg(long, env = "ROSTERD_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Log filter directive, e.g. `info` or `rosterd=debug`. Logs go to stderr.
    #[arg(long = "log", env = "ROSTERD_LOG", default_value = "info")]
    pub log_filter: String,

    /// How long SQLite waits on a locked database before failing.
    #[arg(long, env = "ROSTERD_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,

    /// Seed the bootstrap records whenever an opened workspace has no students.
    #[arg(long, env = "ROSTERD_SEED_ON_OPEN")]
    pub seed_on_open: bool,
}

impl Config {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}
