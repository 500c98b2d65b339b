use clap::Parser;
use orbit_core::{AudioTrigger, ControllerMap, Instrument, Mode, SilentTrigger, CANVAS_SIZE};
use std::time::Instant;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

mod keyboard;
mod midi;
mod render;
mod synth;

use render::{GpuState, SceneBatch};
use synth::{Synth, SynthConfig, WaveKind};

#[derive(Parser, Debug)]
#[command(name = "orbit", version, about = "Play falling, orbiting points from a MIDI controller")]
struct Cli {
    /// List MIDI input ports and exit
    #[arg(long)]
    list_ports: bool,

    /// MIDI input port index (defaults to the first port)
    #[arg(long)]
    port: Option<usize>,

    /// MIDI channel the controller sends on (1-16)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    channel: u8,

    /// Accept messages on every MIDI channel
    #[arg(long, conflicts_with = "channel")]
    all_channels: bool,

    /// Skip MIDI and play from the computer keyboard only
    #[arg(long)]
    no_midi: bool,

    /// Window scale relative to the 600x600 canvas
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Oscillator shape
    #[arg(long, value_enum, default_value_t = WaveKind::Triangle)]
    wave: WaveKind,
}

fn mode_title(mode: Mode) -> &'static str {
    match mode {
        Mode::Idle => "Orbit",
        Mode::Recording => "Orbit [recording]",
        Mode::Playing => "Orbit [playing]",
    }
}

fn open_midi(cli: &Cli) -> Option<midi::MidiConnection> {
    if cli.no_midi {
        log::info!("[midi] disabled; using the computer keyboard");
        return None;
    }
    let ports = match midi::MidiPorts::new() {
        Ok(p) => p,
        Err(e) => {
            log::warn!("[midi] unavailable ({e}); using the computer keyboard");
            return None;
        }
    };
    if ports.is_empty() {
        log::warn!("[midi] no input devices found; using the computer keyboard");
        return None;
    }
    let map = ControllerMap {
        channel: (!cli.all_channels).then(|| cli.channel - 1),
        ..ControllerMap::default()
    };
    match ports.connect(cli.port, map) {
        Ok(conn) => Some(conn),
        Err(e) => {
            log::warn!("[midi] {e}; using the computer keyboard");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.list_ports {
        let ports = midi::MidiPorts::new()?;
        for (i, name) in ports.enumerate_port_names() {
            println!("{i}: {name}");
        }
        return Ok(());
    }

    let midi = open_midi(&cli);
    let mut audio: Box<dyn AudioTrigger> = match Synth::start(SynthConfig {
        wave: cli.wave,
        ..SynthConfig::default()
    }) {
        Ok(s) => Box::new(s),
        Err(e) => {
            log::warn!("[audio] {e}; notes will be silent");
            Box::new(SilentTrigger)
        }
    };

    let event_loop = EventLoop::new()?;
    let side = CANVAS_SIZE as f64 * cli.scale.max(0.25);
    let window = WindowBuilder::new()
        .with_title(mode_title(Mode::Idle))
        .with_inner_size(LogicalSize::new(side, side))
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(GpuState::new(&window))?;
    let mut instrument = Instrument::new();
    let mut batch = SceneBatch::default();
    let mut shown_mode = instrument.mode();
    let start = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event: key_event, ..
            } if key_event.state == ElementState::Pressed && !key_event.repeat => {
                if let Some(ev) = keyboard::event_for_key(&key_event.logical_key) {
                    instrument.handle_event(ev, start.elapsed(), &mut audio);
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = start.elapsed();
            if let Some(conn) = &midi {
                // Stamp with arrival time so recorded gaps are not snapped to frames.
                for (at, ev) in conn.drain() {
                    instrument.handle_event(ev, at.saturating_duration_since(start), &mut audio);
                }
            }
            instrument.poll_timers(now, &mut audio);
            instrument.frame(now);

            if instrument.mode() != shown_mode {
                shown_mode = instrument.mode();
                gpu.window.set_title(mode_title(shown_mode));
            }

            batch.clear();
            instrument.draw(&mut batch, now);
            match gpu.render(&batch) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::error!("render error: {:?}", e),
            }
            // Wake for the next playback timer even if no frame is presented.
            if let Some(due) = instrument.next_timer_due() {
                elwt.set_control_flow(ControlFlow::WaitUntil(start + due));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    })?;
    Ok(())
}
