use std::fmt::Display;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held while a key or button event happened. Bit values
    /// follow the usual desktop windowing convention so platform layers can
    /// pass them through.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const SHIFT     = 0b_0000_0001;
        const CONTROL   = 0b_0000_0010;
        const ALT       = 0b_0000_0100;
        const SUPER     = 0b_0000_1000;
        const CAPS_LOCK = 0b_0001_0000;
        const NUM_LOCK  = 0b_0010_0000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyboardData {
    pub key: i32,
    pub scancode: i32,
    pub mods: Modifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseButtonData {
    pub button: i32,
    pub mods: Modifiers,
}

/// What happened, together with the data that only makes sense for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventKind {
    WindowResize { width: u32, height: u32 },
    WindowClose,
    KeyPress(KeyboardData),
    KeyRelease(KeyboardData),
    MousePress(MouseButtonData),
    MouseRelease(MouseButtonData),
    MouseMove { x: f64, y: f64 },
    MouseScroll { x_offset: f64, y_offset: f64 },
    EngineShutdown,
}

/// Payload-free tag of an [`EventKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    WindowResize,
    WindowClose,
    KeyPress,
    KeyRelease,
    MousePress,
    MouseRelease,
    MouseMove,
    MouseScroll,
    EngineShutdown,
}

impl Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    /// Seconds since the engine started.
    pub timestamp: f64,
}

impl Event {
    pub fn new(kind: EventKind, timestamp: f64) -> Self {
        Self { kind, timestamp }
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn key_press(key: i32, scancode: i32, mods: Modifiers, timestamp: f64) -> Self {
        Self::new(
            EventKind::KeyPress(KeyboardData {
                key,
                scancode,
                mods,
            }),
            timestamp,
        )
    }

    pub fn key_release(key: i32, scancode: i32, mods: Modifiers, timestamp: f64) -> Self {
        Self::new(
            EventKind::KeyRelease(KeyboardData {
                key,
                scancode,
                mods,
            }),
            timestamp,
        )
    }

    pub fn mouse_press(button: i32, mods: Modifiers, timestamp: f64) -> Self {
        Self::new(EventKind::MousePress(MouseButtonData { button, mods }), timestamp)
    }

    pub fn mouse_release(button: i32, mods: Modifiers, timestamp: f64) -> Self {
        Self::new(
            EventKind::MouseRelease(MouseButtonData { button, mods }),
            timestamp,
        )
    }

    pub fn mouse_move(x: f64, y: f64, timestamp: f64) -> Self {
        Self::new(EventKind::MouseMove { x, y }, timestamp)
    }

    pub fn mouse_scroll(x_offset: f64, y_offset: f64, timestamp: f64) -> Self {
        Self::new(EventKind::MouseScroll { x_offset, y_offset }, timestamp)
    }

    pub fn window_resize(width: u32, height: u32, timestamp: f64) -> Self {
        Self::new(EventKind::WindowResize { width, height }, timestamp)
    }

    /// Key code for keyboard events.
    pub fn key(&self) -> Option<i32> {
        match self.kind {
            EventKind::KeyPress(data) | EventKind::KeyRelease(data) => Some(data.key),
            _ => None,
        }
    }
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::WindowResize { .. } => EventType::WindowResize,
            EventKind::WindowClose => EventType::WindowClose,
            EventKind::KeyPress(_) => EventType::KeyPress,
            EventKind::KeyRelease(_) => EventType::KeyRelease,
            EventKind::MousePress(_) => EventType::MousePress,
            EventKind::MouseRelease(_) => EventType::MouseRelease,
            EventKind::MouseMove { .. } => EventType::MouseMove,
            EventKind::MouseScroll { .. } => EventType::MouseScroll,
            EventKind::EngineShutdown => EventType::EngineShutdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_follows_payload() {
        let event = Event::key_press(87, 17, Modifiers::SHIFT, 0.5);
        assert_eq!(event.event_type(), EventType::KeyPress);
        assert_eq!(event.key(), Some(87));

        let event = Event::mouse_scroll(0.0, -1.0, 0.5);
        assert_eq!(event.event_type(), EventType::MouseScroll);
        assert_eq!(event.key(), None);
    }
}
