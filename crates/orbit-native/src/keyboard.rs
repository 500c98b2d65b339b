use orbit_core::controller::event_for_char;
use orbit_core::ControllerEvent;
use winit::keyboard::{Key, NamedKey};

/// Computer-keyboard fallback so the instrument is playable without a controller.
pub fn event_for_key(key: &Key) -> Option<ControllerEvent> {
    match key {
        Key::Named(NamedKey::Space) => event_for_char(' '),
        Key::Named(NamedKey::Backspace) => event_for_char('\u{8}'),
        Key::Character(s) => s.chars().next().and_then(event_for_char),
        _ => None,
    }
}
