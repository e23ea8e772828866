mod config;
mod db;
mod invalidation;
mod ipc;
mod model;
mod seed;
mod store;
mod students;
mod validation;

use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the protocol; logs must stay on stderr.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() {
    let config = config::Config::parse();
    init_tracing(&config.log_filter);

    let mut state = ipc::AppState::new(config.busy_timeout(), config.seed_on_open);
    if let Some(path) = config.workspace.as_deref() {
        // The client can still pick a workspace later; don't exit.
        if let Err(e) = state.open_workspace(path) {
            tracing::error!(error = ?e, workspace = %path.display(), "failed to open startup workspace");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let resp = match serde_json::from_str::<ipc::Request>(&line) {
            Ok(req) => {
                tracing::debug!(id = %req.id, method = %req.method, "request");
                ipc::handle_request(&mut state, req)
            }
            // No id to echo back; reply with an empty one.
            Err(e) => ipc::err("", "bad_json", e.to_string(), None),
        };

        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    tracing::info!("stdin closed, shutting down");
}
