//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;
use stranger_synth::graph::filter::FilterSettings;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "stranger")]
#[command(about = "Two-voice sawtooth arpeggiator with a sweepable resonant low-pass", long_about = None)]
pub struct Args {
    /// Initial cutoff slider value (Hz)
    #[arg(long, value_name = "HZ", default_value_t = 800.0)]
    pub cutoff: f32,

    /// Initial resonance slider value (Q)
    #[arg(long, value_name = "Q", default_value_t = 5.0)]
    pub resonance: f32,

    /// Where to write the log (the terminal belongs to the UI)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            cutoff_hz: self.cutoff,
            q: self.resonance,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("stranger_synth.log"))
    }
}
