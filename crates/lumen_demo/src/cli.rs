use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log verbosity accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Which demo arrangement to trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Two blocks and a triangle that light up when the beam touches them
    Blocks,
    /// A glass prism that fans the beam into a rainbow
    Prism,
}

#[derive(Parser, Debug)]
#[command(name = "lumen_demo")]
#[command(about = "Headless driver for the lumen ray-bounce engine")]
pub struct Args {
    /// Scene to trace
    #[arg(long, value_enum, default_value = "blocks")]
    pub scene: SceneKind,

    /// Number of frames to simulate (overrides the config file)
    #[arg(short, long)]
    pub frames: Option<u32>,

    /// JSON file overriding the scene's beam settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Print one JSON line per frame to stdout
    #[arg(long)]
    pub dump: bool,
}
