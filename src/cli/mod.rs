//! CLI interface for Tabletone

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Real-time wavetable synthesizer
#[derive(Parser)]
#[command(name = "tabletone")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a tone in real time (Ctrl-C to stop)
    Play {
        /// Configuration file path
        #[arg(short, long, default_value = "tabletone.yaml")]
        config: PathBuf,

        /// Stop automatically after this many seconds
        #[arg(short, long)]
        duration: Option<u64>,

        /// Override the configured frequency in Hz
        #[arg(short, long)]
        frequency: Option<f32>,

        /// Override the configured volume in dB
        #[arg(short, long)]
        volume: Option<f32>,

        /// Override the configured waveform (sine, triangle, square, saw)
        #[arg(short, long)]
        wave: Option<String>,
    },

    /// List available audio output devices
    Devices,

    /// Validate a configuration file
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "tabletone.yaml")]
        config: PathBuf,
    },

    /// Generate an example configuration file
    Init,
}
