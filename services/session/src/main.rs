//! `session-inspect`: print the declassified view of a stored session
//!
//! Usage: `session-inspect [PATH|-]`. Reads the session record as JSON
//! from `PATH`, or from stdin when no path (or `-`) is given.

use std::io::Read;

use anyhow::{Context, Result};
use chrono::Utc;
use session::{Session, view::SessionResponse};
use tracing::{Level, info};

fn main() -> Result<()> {
    common::telemetry::init_tracing(Level::INFO);

    let input = match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session record from {}", path))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read session record from stdin")?;
            buffer
        }
    };

    let session: Session =
        serde_json::from_str(&input).context("Input is not a valid session record")?;
    info!("Inspecting session {}", session.id());

    let response = SessionResponse::new(&session, Utc::now());
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
