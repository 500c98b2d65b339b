pub mod audio;
pub mod constants;
pub mod controller;
pub mod error;
pub mod notes;
pub mod params;
pub mod recorder;
pub mod scene;
pub mod session;
pub mod simulation;
pub mod timer;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use audio::{AudioTrigger, NoteRequest, SilentTrigger};
pub use constants::*;
pub use controller::{Button, ControllerEvent, ControllerMap};
pub use error::{Error, Result};
pub use params::{KnobIndicators, Param, ParameterStore};
pub use recorder::{Mode, RecordedEvent, Recorder};
pub use scene::{Rgba, Surface};
pub use session::Instrument;
pub use simulation::{Point, PointState, Simulation};
