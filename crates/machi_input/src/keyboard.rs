use machi_input_macros::define_codes;

// Numbering follows the common desktop layout codes (printable keys use
// their ASCII value), so codes coming from a platform layer map directly.
define_codes! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub Key: i32 {
        32 => Space,
        39 => Apostrophe,
        44 => Comma,
        45 => Minus,
        46 => Period,
        47 => Slash,

        48 => Digit0,
        49 => Digit1,
        50 => Digit2,
        51 => Digit3,
        52 => Digit4,
        53 => Digit5,
        54 => Digit6,
        55 => Digit7,
        56 => Digit8,
        57 => Digit9,

        59 => Semicolon,
        61 => Equal,

        65 => A,
        66 => B,
        67 => C,
        68 => D,
        69 => E,
        70 => F,
        71 => G,
        72 => H,
        73 => I,
        74 => J,
        75 => K,
        76 => L,
        77 => M,
        78 => N,
        79 => O,
        80 => P,
        81 => Q,
        82 => R,
        83 => S,
        84 => T,
        85 => U,
        86 => V,
        87 => W,
        88 => X,
        89 => Y,
        90 => Z,

        91 => LBracket,
        92 => Backslash,
        93 => RBracket,
        96 => Grave,

        256 => Escape,
        257 => Enter,
        258 => Tab,
        259 => Backspace,
        260 => Insert,
        261 => Delete,
        262 => Right,
        263 => Left,
        264 => Down,
        265 => Up,
        266 => PageUp,
        267 => PageDown,
        268 => Home,
        269 => End,

        280 => CapsLock,
        281 => ScrollLock,
        282 => NumLock,
        283 => PrintScreen,
        284 => Pause,

        290 => F1,
        291 => F2,
        292 => F3,
        293 => F4,
        294 => F5,
        295 => F6,
        296 => F7,
        297 => F8,
        298 => F9,
        299 => F10,
        300 => F11,
        301 => F12,

        320 => Num0,
        321 => Num1,
        322 => Num2,
        323 => Num3,
        324 => Num4,
        325 => Num5,
        326 => Num6,
        327 => Num7,
        328 => Num8,
        329 => Num9,

        340 => LShift,
        341 => LCtrl,
        342 => LAlt,
        343 => LSuper,
        344 => RShift,
        345 => RCtrl,
        346 => RAlt,
        347 => RSuper,
        348 => Menu,
    }
}

impl Key {
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LShift
                | Key::RShift
                | Key::LCtrl
                | Key::RCtrl
                | Key::LAlt
                | Key::RAlt
                | Key::LSuper
                | Key::RSuper
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_codes() {
        assert_eq!(Key::from_raw(256), Key::Escape);
        assert_eq!(i32::from(Key::F2), 291);
        assert_eq!(Key::from(9999), Key::Unknown(9999));
        assert_eq!(Key::Unknown(-1).into_raw(), -1);
        assert!(Key::LShift.is_modifier());
        assert!(!Key::W.is_modifier());
    }
}
