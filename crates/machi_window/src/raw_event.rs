use machi_event::Modifiers;

/// State transition reported for a key or a mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Press,
    Release,
    Repeat,
}

/// Event as reported by a window backend, before it is turned into an
/// engine event by the installed callbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawWindowEvent {
    Resized {
        width: u32,
        height: u32,
    },
    CloseRequested,
    Key {
        key: i32,
        scancode: i32,
        action: Action,
        mods: Modifiers,
    },
    MouseButton {
        button: i32,
        action: Action,
        mods: Modifiers,
    },
    CursorMoved {
        x: f64,
        y: f64,
    },
    Scrolled {
        x_offset: f64,
        y_offset: f64,
    },
}
