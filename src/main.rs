//! Tabletone - real-time wavetable tone synthesizer

use anyhow::{bail, Result};
use clap::Parser;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tabletone::config;
use tabletone::engine::{self, Player, SynthRegistry};
use tabletone::synth::{Waveform, WavetableBank};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config,
            duration,
            frequency,
            volume,
            wave,
        } => play(&config, duration, frequency, volume, wave.as_deref()),
        Commands::Devices => devices(),
        Commands::Check { config } => check(&config),
        Commands::Init => init(),
    }
}

fn play(
    config_path: &Path,
    duration: Option<u64>,
    frequency: Option<f32>,
    volume: Option<f32>,
    wave: Option<&str>,
) -> Result<()> {
    let cfg = config::load_config(config_path)?;

    // Prefer the device's native rate over the configured one
    let sample_rate = engine::default_output_rate().unwrap_or(cfg.audio.sample_rate);

    let bank = Arc::new(WavetableBank::build());
    let registry = Arc::new(SynthRegistry::new());
    let handle = registry.create(bank, sample_rate as f32, cfg.synth.initial_parameters());
    let synth = registry.get(handle)?;

    // CLI overrides go through the validated control API
    if let Some(hz) = frequency {
        synth.set_frequency(hz)?;
    }
    if let Some(db) = volume {
        synth.set_volume(db)?;
    }
    if let Some(name) = wave {
        synth.set_wavetable(parse_waveform(name)?)?;
    }

    let device = engine::default_device_name().unwrap_or_else(|| "unknown".to_string());
    println!("Tabletone");
    println!("  Device: {device} @ {sample_rate} Hz");

    let mut player = Player::new();
    player.start(synth.render_state())?;
    synth.play()?;

    let stop_flag = Arc::new(AtomicBool::new(false));
    {
        let stop_flag = Arc::clone(&stop_flag);
        ctrlc::set_handler(move || {
            stop_flag.store(true, Ordering::SeqCst);
        })?;
    }

    match duration {
        Some(secs) => println!("Playing for {secs}s (Ctrl-C to stop early)..."),
        None => println!("Playing... press Ctrl-C to stop"),
    }

    let started = Instant::now();
    loop {
        if stop_flag.load(Ordering::SeqCst) {
            break;
        }
        if let Some(secs) = duration {
            if started.elapsed() >= Duration::from_secs(secs) {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    println!("\nStopping...");
    synth.stop()?;
    // Give the fade-out time to land before the stream goes away
    std::thread::sleep(Duration::from_millis(100));
    player.stop();
    registry.destroy(handle)?;

    Ok(())
}

fn devices() -> Result<()> {
    let devices = engine::list_output_devices();
    if devices.is_empty() {
        println!("No audio output devices found");
        return Ok(());
    }

    println!("Audio output devices:");
    let default = engine::default_device_name();
    for (name, config) in devices {
        let marker = if Some(&name) == default.as_ref() {
            " (default)"
        } else {
            ""
        };
        println!(
            "  {name}: {} ch @ {} Hz{marker}",
            config.channels,
            config.sample_rate.0
        );
    }
    Ok(())
}

fn check(config_path: &Path) -> Result<()> {
    match config::load_config(config_path) {
        Ok(cfg) => {
            println!("Configuration OK");
            println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
            println!("  Buffer size: {} frames", cfg.audio.buffer_size);
            println!("  Frequency:   {} Hz", cfg.synth.frequency_hz);
            println!("  Volume:      {} dB", cfg.synth.volume_db);
            println!("  Wavetable:   {:?}", cfg.synth.wavetable);
            Ok(())
        }
        Err(e) => {
            bail!("Configuration invalid: {e}");
        }
    }
}

fn init() -> Result<()> {
    let path = Path::new("tabletone.yaml");
    if path.exists() {
        bail!("tabletone.yaml already exists, refusing to overwrite");
    }
    std::fs::write(path, include_str!("../tabletone.example.yaml"))?;
    println!("Wrote tabletone.yaml");
    Ok(())
}

fn parse_waveform(name: &str) -> Result<Waveform> {
    match name {
        "sine" => Ok(Waveform::Sine),
        "triangle" => Ok(Waveform::Triangle),
        "square" => Ok(Waveform::Square),
        "saw" => Ok(Waveform::Saw),
        other => bail!("unknown waveform '{other}' (expected sine, triangle, square, or saw)"),
    }
}
