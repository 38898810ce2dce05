//! # grabscene viewer
//!
//! Opens a window with a randomly populated shape pool. Move the mouse to
//! aim both emulated devices; hold the left button to grab with device 0
//! and the right button to grab with device 1. Escape quits.
//!
//! ## Usage:
//! ```bash
//! cargo run -- [session.toml]
//! RUST_LOG=debug cargo run
//! ```

use std::path::PathBuf;

use anyhow::Context;
use grabscene::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => SessionConfig::load(&path)
            .with_context(|| format!("loading session config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let app = GrabApp::new(config).context("creating viewer")?;
    app.run().context("running viewer")?;
    Ok(())
}
