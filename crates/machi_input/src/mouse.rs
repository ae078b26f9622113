use machi_input_macros::define_codes;

define_codes! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub MouseButton: i32 {
        0 => Left,
        1 => Right,
        2 => Middle,
        3 => Back,
        4 => Forward,
    }
}
