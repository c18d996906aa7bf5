//! Real-time audio output using cpal
//!
//! The external audio I/O subsystem from the render engine's point of view:
//! it owns the output stream and invokes the render path from the device
//! callback. The callback never blocks on the control role; if the render
//! lock is held (a destroy in progress), it writes silence instead.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::synth::RenderEngine;

/// Largest mono block rendered per callback chunk. Pre-sized at stream
/// start so the callback never allocates.
const BLOCK_FRAMES: usize = 2048;

/// Real-time audio player
pub struct Player {
    stream: Option<Stream>,
    running: Arc<AtomicBool>,
}

impl Player {
    /// Create a player with no active stream
    pub fn new() -> Self {
        Self {
            stream: None,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open the default output device and start pulling buffers from the
    /// render engine.
    ///
    /// The stream runs at the device's default rate; build the render
    /// engine for the rate reported by [`default_output_rate`].
    pub fn start(&mut self, renderer: Arc<Mutex<RenderEngine>>) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;

        let config = device.default_output_config()?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        self.running.store(true, Ordering::SeqCst);
        let running = self.running.clone();

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &stream_config, renderer, running)?,
            SampleFormat::I16 => self.build_stream::<i16>(&device, &stream_config, renderer, running)?,
            SampleFormat::U16 => self.build_stream::<u16>(&device, &stream_config, renderer, running)?,
            _ => return Err(anyhow!("Unsupported sample format")),
        };

        stream.play()?;
        self.stream = Some(stream);

        Ok(())
    }

    /// Stop the stream. No render callback for this player starts after
    /// this returns, which is what makes a following destroy safe.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.stream = None;
    }

    /// Check if a stream is active
    pub fn is_playing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
        &self,
        device: &Device,
        config: &StreamConfig,
        renderer: Arc<Mutex<RenderEngine>>,
        running: Arc<AtomicBool>,
    ) -> Result<Stream> {
        let channels = config.channels as usize;
        let mut scratch = vec![0.0f32; BLOCK_FRAMES];

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if !running.load(Ordering::SeqCst) {
                    // Fill with silence when stopped
                    for sample in data.iter_mut() {
                        *sample = T::from_sample(0.0f32);
                    }
                    return;
                }

                if let Ok(mut engine) = renderer.try_lock() {
                    for chunk in data.chunks_mut(BLOCK_FRAMES * channels) {
                        let frames = chunk.len() / channels;
                        let block = &mut scratch[..frames];
                        engine.render(block);

                        for (frame, &sample) in chunk.chunks_mut(channels).zip(block.iter()) {
                            for channel_sample in frame.iter_mut() {
                                *channel_sample = T::from_sample(sample);
                            }
                        }
                    }
                } else {
                    // Control side holds the render lock, fill with silence
                    for sample in data.iter_mut() {
                        *sample = T::from_sample(0.0f32);
                    }
                }
            },
            |err| {
                eprintln!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device()
        .and_then(|d| d.name().ok())
}

/// Get the default output device's sample rate, used to size the render
/// engine before the stream opens
pub fn default_output_rate() -> Option<u32> {
    let host = cpal::default_host();
    host.default_output_device()
        .and_then(|d| d.default_output_config().ok())
        .map(|c| c.sample_rate().0)
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
