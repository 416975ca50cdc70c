//! phosphor - terminal X/Y oscilloscope with a morphing filter
//!
//! Run with: cargo run -- [file.wav]

mod app;
mod ui;

use std::fs::File;
use std::path::PathBuf;

use app::Phosphor;
use color_eyre::eyre::WrapErr;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // the terminal belongs to the UI, so logs go to a file
    let log_path = std::env::temp_dir().join("phosphor.log");
    let log_file = File::create(&log_path)
        .wrap_err_with(|| format!("failed to create {}", log_path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    Phosphor::new()
        .clip(std::env::args_os().nth(1).map(PathBuf::from))
        .run()
}
