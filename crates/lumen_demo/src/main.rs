use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod config;
mod logger;
mod scenes;

use cli::Args;
use config::DemoConfig;
use scenes::Demo;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    log::info!("Starting lumen demo");

    let mut config = match &args.config {
        Some(path) => DemoConfig::load(args.scene, path)?,
        None => DemoConfig::for_scene(args.scene),
    };
    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    log::debug!("Config: {:?}", config);

    let mut demo = Demo::new(args.scene, &config)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut longest = 0;
    let mut lit_frames = 0;
    for frame in 0..config.frames {
        let report = demo.step(frame);
        longest = longest.max(report.count);
        if !report.lit.is_empty() {
            lit_frames += 1;
        }

        if args.dump {
            serde_json::to_writer(&mut out, &report).context("Failed to encode frame report")?;
            writeln!(out).context("Failed to write frame report")?;
        }
    }
    out.flush()?;

    log::info!(
        "Traced {} frame(s): longest beam {} of {} vertices, lit on {} frame(s)",
        config.frames,
        longest,
        demo.reflector().bounce_limit() + 1,
        lit_frames
    );

    Ok(())
}
