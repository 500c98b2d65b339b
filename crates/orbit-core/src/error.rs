use thiserror::Error;

/// Errors raised by the few fallible parsers in the core crate.
///
/// Every state-machine operation (spawn, tick, record, playback) is total and
/// never returns one of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown knob id `{0}` (expected g1..g4 or a1..a4)")]
    UnknownKnob(String),
    #[error("invalid pitch name `{0}`")]
    InvalidPitch(String),
    #[error("key index {0} is outside 0..25")]
    KeyOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
