use machi_input::{Key, MouseButton};
use sdl2::{keyboard::Scancode, mouse::MouseButton as SdlButton};

/// Maps a physical SDL key to the engine key code. Keys the engine has no
/// name for keep their scancode, offset past the named range.
pub(super) fn key_code(scancode: Scancode) -> i32 {
    let key = match scancode {
        Scancode::Space => Key::Space,
        Scancode::Apostrophe => Key::Apostrophe,
        Scancode::Comma => Key::Comma,
        Scancode::Minus => Key::Minus,
        Scancode::Period => Key::Period,
        Scancode::Slash => Key::Slash,
        Scancode::Num0 => Key::Digit0,
        Scancode::Num1 => Key::Digit1,
        Scancode::Num2 => Key::Digit2,
        Scancode::Num3 => Key::Digit3,
        Scancode::Num4 => Key::Digit4,
        Scancode::Num5 => Key::Digit5,
        Scancode::Num6 => Key::Digit6,
        Scancode::Num7 => Key::Digit7,
        Scancode::Num8 => Key::Digit8,
        Scancode::Num9 => Key::Digit9,
        Scancode::Semicolon => Key::Semicolon,
        Scancode::Equals => Key::Equal,
        Scancode::A => Key::A,
        Scancode::B => Key::B,
        Scancode::C => Key::C,
        Scancode::D => Key::D,
        Scancode::E => Key::E,
        Scancode::F => Key::F,
        Scancode::G => Key::G,
        Scancode::H => Key::H,
        Scancode::I => Key::I,
        Scancode::J => Key::J,
        Scancode::K => Key::K,
        Scancode::L => Key::L,
        Scancode::M => Key::M,
        Scancode::N => Key::N,
        Scancode::O => Key::O,
        Scancode::P => Key::P,
        Scancode::Q => Key::Q,
        Scancode::R => Key::R,
        Scancode::S => Key::S,
        Scancode::T => Key::T,
        Scancode::U => Key::U,
        Scancode::V => Key::V,
        Scancode::W => Key::W,
        Scancode::X => Key::X,
        Scancode::Y => Key::Y,
        Scancode::Z => Key::Z,
        Scancode::LeftBracket => Key::LBracket,
        Scancode::Backslash => Key::Backslash,
        Scancode::RightBracket => Key::RBracket,
        Scancode::Grave => Key::Grave,
        Scancode::Escape => Key::Escape,
        Scancode::Return => Key::Enter,
        Scancode::Tab => Key::Tab,
        Scancode::Backspace => Key::Backspace,
        Scancode::Insert => Key::Insert,
        Scancode::Delete => Key::Delete,
        Scancode::Right => Key::Right,
        Scancode::Left => Key::Left,
        Scancode::Down => Key::Down,
        Scancode::Up => Key::Up,
        Scancode::PageUp => Key::PageUp,
        Scancode::PageDown => Key::PageDown,
        Scancode::Home => Key::Home,
        Scancode::End => Key::End,
        Scancode::CapsLock => Key::CapsLock,
        Scancode::ScrollLock => Key::ScrollLock,
        Scancode::NumLockClear => Key::NumLock,
        Scancode::PrintScreen => Key::PrintScreen,
        Scancode::Pause => Key::Pause,
        Scancode::F1 => Key::F1,
        Scancode::F2 => Key::F2,
        Scancode::F3 => Key::F3,
        Scancode::F4 => Key::F4,
        Scancode::F5 => Key::F5,
        Scancode::F6 => Key::F6,
        Scancode::F7 => Key::F7,
        Scancode::F8 => Key::F8,
        Scancode::F9 => Key::F9,
        Scancode::F10 => Key::F10,
        Scancode::F11 => Key::F11,
        Scancode::F12 => Key::F12,
        Scancode::Kp0 => Key::Num0,
        Scancode::Kp1 => Key::Num1,
        Scancode::Kp2 => Key::Num2,
        Scancode::Kp3 => Key::Num3,
        Scancode::Kp4 => Key::Num4,
        Scancode::Kp5 => Key::Num5,
        Scancode::Kp6 => Key::Num6,
        Scancode::Kp7 => Key::Num7,
        Scancode::Kp8 => Key::Num8,
        Scancode::Kp9 => Key::Num9,
        Scancode::LShift => Key::LShift,
        Scancode::LCtrl => Key::LCtrl,
        Scancode::LAlt => Key::LAlt,
        Scancode::LGui => Key::LSuper,
        Scancode::RShift => Key::RShift,
        Scancode::RCtrl => Key::RCtrl,
        Scancode::RAlt => Key::RAlt,
        Scancode::RGui => Key::RSuper,
        Scancode::Application => Key::Menu,
        other => Key::Unknown(UNNAMED_KEY_BASE + other as i32),
    };

    key.into_raw()
}

const UNNAMED_KEY_BASE: i32 = 512;

pub(super) fn button_code(button: SdlButton) -> i32 {
    let button = match button {
        SdlButton::Left => MouseButton::Left,
        SdlButton::Right => MouseButton::Right,
        SdlButton::Middle => MouseButton::Middle,
        SdlButton::X1 => MouseButton::Back,
        SdlButton::X2 => MouseButton::Forward,
        SdlButton::Unknown => MouseButton::Unknown(-1),
    };

    button.into_raw()
}
