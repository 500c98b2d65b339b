//! Live MIDI input: decode on the driver's callback thread, hand typed
//! events to the main loop over a channel.

use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use orbit_core::{ControllerEvent, ControllerMap};
use std::sync::mpsc;
use std::time::Instant;

const CLIENT_NAME: &str = "orbit";

pub struct MidiPorts {
    midi_input: MidiInput,
    ports: Vec<MidiInputPort>,
}

impl MidiPorts {
    pub fn new() -> anyhow::Result<Self> {
        let mut midi_input = MidiInput::new(CLIENT_NAME)?;
        midi_input.ignore(Ignore::All);
        let ports = midi_input.ports();
        Ok(Self { midi_input, ports })
    }

    pub fn enumerate_port_names(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.ports
            .iter()
            .enumerate()
            .filter_map(|(i, port)| self.midi_input.port_name(port).ok().map(|name| (i, name)))
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Connect to the port at `index` (or the first port) and start decoding with `map`.
    pub fn connect(self, index: Option<usize>, map: ControllerMap) -> anyhow::Result<MidiConnection> {
        let index = index.unwrap_or(0);
        let port = self
            .ports
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no midi input port at index {}", index))?
            .clone();
        let port_name = self.midi_input.port_name(&port)?;
        let (sender, receiver) = mpsc::channel::<(Instant, ControllerEvent)>();
        let connection = self
            .midi_input
            .connect(
                &port,
                &format!("{} {}", CLIENT_NAME, port_name),
                move |_timestamp_us, message, _: &mut ()| {
                    if let Some(event) = map.decode(message) {
                        if sender.send((Instant::now(), event)).is_err() {
                            log::error!("failed to send event from live midi thread");
                        }
                    }
                },
                (),
            )
            .map_err(|e| connect_error(&port_name, e))?;
        log::info!("[midi] connected to {}", port_name);
        Ok(MidiConnection {
            _connection: connection,
            receiver,
        })
    }
}

pub struct MidiConnection {
    _connection: MidiInputConnection<()>,
    receiver: mpsc::Receiver<(Instant, ControllerEvent)>,
}

impl MidiConnection {
    /// Every event received since the last call with its arrival time, in arrival order.
    pub fn drain(&self) -> impl Iterator<Item = (Instant, ControllerEvent)> + '_ {
        self.receiver.try_iter()
    }
}

fn connect_error(port_name: &str, cause: impl std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!("failed to connect to midi port {}: {}", port_name, cause)
}
