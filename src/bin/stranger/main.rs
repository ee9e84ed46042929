//! stranger - terminal front end for the arpeggiator
//!
//! Run with: cargo run -- --cutoff 600 --resonance 8

mod cli;
mod ui;

use std::fs::File;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use simplelog::{Config, LevelFilter, WriteLogger};
use stranger_synth::synth::{CpalHost, SynthController};

use cli::Args;
use ui::{UiApp, AUDIO_TAP_CAPACITY};

fn init_logging(args: &Args) -> EyreResult<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let path = args.log_path();
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    WriteLogger::init(level, Config::default(), file).wrap_err("failed to install logger")?;
    log::info!("stranger starting (log level: {level:?})");
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args)?;

    let synth = SynthController::new(CpalHost, args.filter_settings())
        .with_audio_tap(AUDIO_TAP_CAPACITY);
    let mut app = UiApp::new(synth);

    let mut terminal = ratatui::init();
    let res = app.run(&mut terminal);
    ratatui::restore();

    log::info!("stranger exiting");
    res
}
