use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};

/// A continuously running output stream that emits a tone while gated on and
/// silence otherwise. Gating happens once per frame from the sound timer.
pub struct Sound {
    _stream: cpal::Stream,
    gate: Arc<AtomicBool>,
}

impl Sound {
    pub fn new(tone_hz: f32) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output device available"))?;
        let supported_config = device
            .default_output_config()
            .context("querying output config")?;
        let format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        let gate = Arc::new(AtomicBool::new(false));

        let stream = match format {
            cpal::SampleFormat::I8 => build::<i8>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::I16 => build::<i16>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::I32 => build::<i32>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::I64 => build::<i64>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::U8 => build::<u8>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::U16 => build::<u16>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::U32 => build::<u32>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::U64 => build::<u64>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::F32 => build::<f32>(&device, &config, tone_hz, gate.clone()),
            cpal::SampleFormat::F64 => build::<f64>(&device, &config, tone_hz, gate.clone()),
            sample_format => Err(anyhow!("unsupported sample format '{sample_format}'")),
        }?;
        stream.play().context("starting audio stream")?;

        Ok(Self {
            _stream: stream,
            gate,
        })
    }

    pub fn set_active(&self, on: bool) {
        self.gate.store(on, Ordering::Relaxed);
    }
}

fn build<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tone_hz: f32,
    gate: Arc<AtomicBool>,
) -> anyhow::Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;

    let mut tone = Tone::new(tone_hz, sample_rate);
    let err_fn = |err| log::error!("audio stream error: {err}");

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let on = gate.load(Ordering::Relaxed);
                write_data(data, channels, &mut || if on { tone.next_sample() } else { 0.0 })
            },
            err_fn,
            None,
        )
        .context("building output stream")
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}

/// Sine oscillator at a fixed pitch, kept quiet to spare ears.
struct Tone {
    sample_clock: f32,
    sample_rate: f32,
    hz: f32,
}

impl Tone {
    const AMPLITUDE: f32 = 0.2;

    fn new(hz: f32, sample_rate: f32) -> Self {
        Self {
            sample_clock: 0.0,
            sample_rate,
            hz,
        }
    }

    fn next_sample(&mut self) -> f32 {
        self.sample_clock = (self.sample_clock + 1.0) % self.sample_rate;
        Self::AMPLITUDE
            * (self.sample_clock * self.hz * 2.0 * std::f32::consts::PI / self.sample_rate).sin()
    }
}
