//! # Card Table Viewer
//!
//! Opens a window and draws a textured table with four legs and a playing
//! card, lit by a single point light. The camera is driven by the keyboard
//! and mouse.
//!
//! ## Controls
//! - Arrow keys / left drag: rotate
//! - W A S D / right drag: move
//! - Page Up/Down, `+`/`-`, mouse wheel: zoom
//! - Shift: larger key steps
//! - R: reset camera
//! - Escape: quit

pub mod app;
pub mod config;

pub use app::{run, CardTableApp, InputRouter};
pub use config::AppConfig;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Card table viewer
#[derive(Parser, Debug)]
#[command(name = "cardtable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the WGSL shaders
    #[arg(long)]
    pub shader_dir: Option<PathBuf>,

    /// Target frames per second
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(cardtable_platform::MAX_FPS)))]
    pub fps: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the configuration: file (or defaults), then command line overrides
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(dir) = &self.shader_dir {
            config.shaders.dir = dir.clone();
        }
        if let Some(fps) = self.fps {
            config.window.target_fps = fps;
        }
        Ok(config)
    }
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let config = cli.app_config()?;
    log::debug!("Configuration: {:?}", config);
    run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["cardtable"]);
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.app_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["cardtable", "--shader-dir", "shaders", "--fps", "30", "-v"]);
        assert!(cli.verbose);

        let config = cli.app_config().unwrap();
        assert_eq!(config.shaders.dir, PathBuf::from("shaders"));
        assert_eq!(config.window.target_fps, 30);
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn test_cli_rejects_zero_fps() {
        assert!(Cli::try_parse_from(["cardtable", "--fps", "0"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["cardtable", "--config", "/definitely/not/here.json"]);
        let err = cli.app_config().unwrap_err();
        assert!(format!("{:#}", err).contains("loading configuration"));
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let path = std::env::temp_dir().join(format!("cardtable-cli-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "window": { "target_fps": 24, "title": "Cards" } }"#).unwrap();

        let cli = Cli::parse_from(["cardtable", "-c", path.to_str().unwrap(), "--fps", "90"]);
        let config = cli.app_config().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.window.title, "Cards");
        assert_eq!(config.window.target_fps, 90);
    }
}
