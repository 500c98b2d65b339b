// ---------------- Native polyphonic synth (cpal) ----------------

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use orbit_core::{AudioTrigger, NoteRequest};
use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum WaveKind {
    Sine,
    Triangle,
}

/// Voice settings that are not knob-controlled.
///
/// - `wave`: oscillator shape for every voice
/// - `attack_sec`: fixed attack ramp before the sustain stage
/// - `max_voices`: polyphony limit; the oldest voice is dropped beyond it
/// - `master_gain`: output level applied before the soft clipper
#[derive(Clone, Debug)]
pub struct SynthConfig {
    pub wave: WaveKind,
    pub attack_sec: f32,
    pub max_voices: usize,
    pub master_gain: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            wave: WaveKind::Triangle,
            attack_sec: 0.02,
            max_voices: 8,
            master_gain: 0.35,
        }
    }
}

#[derive(Clone)]
struct ActiveOscillator {
    amplitude: f32,
    phase: f32,     // radians
    phase_inc: f32, // radians per sample
    attack_samples: u32,
    sustain_samples: u32,
    release_samples: u32,
    samples_emitted: u32,
}

impl ActiveOscillator {
    fn total_samples(&self) -> u32 {
        self.attack_samples + self.sustain_samples + self.release_samples
    }

    fn envelope(&self) -> f32 {
        let n = self.samples_emitted;
        let release_start = self.attack_samples + self.sustain_samples;
        if n < self.attack_samples {
            n as f32 / self.attack_samples.max(1) as f32
        } else if n < release_start {
            1.0
        } else {
            let rel_n = n - release_start;
            1.0 - (rel_n as f32 / self.release_samples.max(1) as f32)
        }
    }
}

struct AudioState {
    sample_rate: f32,
    config: SynthConfig,
    oscillators: Vec<ActiveOscillator>,
}

/// Output stream plus the shared voice list it mixes.
pub struct Synth {
    state: Arc<Mutex<AudioState>>,
    _stream: cpal::Stream,
}

impl Synth {
    pub fn start(config: SynthConfig) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no audio output device"))?;
        let supported = device.default_output_config()?;
        let sample_rate = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        log::info!(
            "[audio] {} @ {} Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "unknown device".into()),
            sample_rate,
            channels,
            supported.sample_format()
        );

        let state = Arc::new(Mutex::new(AudioState {
            sample_rate,
            config,
            oscillators: Vec::new(),
        }));

        let stream_config: cpal::StreamConfig = supported.clone().into();
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, Arc::clone(&state))?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, Arc::clone(&state))?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, Arc::clone(&state))?
            }
            other => anyhow::bail!("unsupported sample format {:?}", other),
        };
        stream.play()?;

        Ok(Self {
            state,
            _stream: stream,
        })
    }
}

impl AudioTrigger for Synth {
    fn play_note(&mut self, note: &NoteRequest) {
        let Ok(mut guard) = self.state.lock() else {
            log::error!("[audio] voice list poisoned; dropping {}", note.pitch);
            return;
        };
        let sr = guard.sample_rate;
        let attack_samples = (guard.config.attack_sec * sr) as u32;
        let max_voices = guard.config.max_voices.max(1);
        if guard.oscillators.len() >= max_voices {
            // Steal the oldest voice.
            guard.oscillators.remove(0);
        }
        guard.oscillators.push(ActiveOscillator {
            amplitude: note.volume.clamp(0.0, 1.0),
            phase: 0.0,
            phase_inc: TAU * note.frequency_hz / sr,
            attack_samples,
            sustain_samples: (note.sustain.max(0.0) * sr) as u32,
            release_samples: (note.release.max(0.0) * sr) as u32,
            samples_emitted: 0,
        });
    }
}

fn render_wave_sample(phase: f32, wave: WaveKind) -> f32 {
    match wave {
        WaveKind::Sine => phase.sin(),
        WaveKind::Triangle => {
            // Map phase 0..TAU to a -1..1 triangle
            let t = phase / TAU;
            let saw = 2.0 * (t - t.floor()) - 1.0;
            2.0 * saw.abs() - 1.0
        }
    }
}

fn mix_sample(state: &mut AudioState) -> f32 {
    let wave = state.config.wave;
    let gain = state.config.master_gain;
    let oscillators = &mut state.oscillators;
    let mut out = 0.0f32;
    let mut i = 0usize;
    while i < oscillators.len() {
        let osc = &mut oscillators[i];
        out += render_wave_sample(osc.phase, wave) * osc.amplitude * osc.envelope();
        osc.phase += osc.phase_inc;
        if osc.phase > TAU {
            osc.phase -= TAU;
        }
        osc.samples_emitted += 1;
        if osc.samples_emitted >= osc.total_samples() {
            // Keep voice order stable so stealing always drops the oldest.
            oscillators.remove(i);
            continue;
        }
        i += 1;
    }
    (out * gain).tanh()
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    state: Arc<Mutex<AudioState>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let Ok(mut guard) = state.lock() else {
                return;
            };
            for frame in data.chunks_mut(channels.max(1)) {
                let value = T::from_sample(mix_sample(&mut guard));
                for sample in frame.iter_mut() {
                    *sample = value;
                }
            }
        },
        |err| log::error!("[audio] stream error: {err}"),
        None,
    )
}
