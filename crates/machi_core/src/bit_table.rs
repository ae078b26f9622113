/// Fixed-width table of flags.
///
/// The accessors themselves enforce the valid range: reading outside of it
/// yields `false` and writing outside of it is a no-op. Indices are taken as
/// `i64` so negative codes coming from platform layers need no casting
/// gymnastics at call sites.
#[derive(Clone, PartialEq, Eq)]
pub struct BitTable {
    width: usize,
    data: Box<[u8]>,
}

impl BitTable {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            data: vec![0u8; width_to_size(width)].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, at: i64) -> bool {
        at >= 0 && (at as u64) < self.width as u64
    }

    pub fn get(&self, at: i64) -> bool {
        if !self.contains(at) {
            return false;
        }

        let (byte, bit) = byte_bit_index(at as usize);
        self.data[byte] & (1 << bit) != 0
    }

    /// Returns `false` when `at` is out of range and nothing was written.
    pub fn set(&mut self, at: i64, value: bool) -> bool {
        if !self.contains(at) {
            return false;
        }

        let (byte, bit) = byte_bit_index(at as usize);

        if value {
            self.data[byte] |= 1 << bit;
        } else {
            self.data[byte] &= !(1 << bit);
        }

        true
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn all_zeroes(&self) -> bool {
        self.data.iter().all(|val| *val == 0)
    }

    /// Indices of all set flags, ascending.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width).filter(|&i| self.get(i as i64))
    }
}

impl std::fmt::Debug for BitTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitTable")
            .field("width", &self.width)
            .field("set", &self.iter_set().collect::<Vec<_>>())
            .finish()
    }
}

#[inline]
fn byte_bit_index(at: usize) -> (usize, usize) {
    (at / 8, at % 8)
}

#[inline]
fn width_to_size(width: usize) -> usize {
    width.div_ceil(8)
}
