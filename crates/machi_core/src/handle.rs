use std::{fmt::Debug, hash::Hash, marker::PhantomData};

/// Typed opaque id. `T` only tags what the id refers to.
pub struct Handle<T> {
    handle: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub const fn new(raw: usize) -> Self {
        Self {
            handle: raw,
            _marker: PhantomData,
        }
    }

    pub fn as_raw(&self) -> usize {
        self.handle
    }

    pub fn from_raw<U>(raw: U) -> Self
    where
        U: Into<Self>,
    {
        raw.into()
    }

    /// Handle with the reserved raw value `0`, never produced by an allocator.
    pub const fn null() -> Self {
        Self::new(0)
    }

    pub fn is_null(&self) -> bool {
        self.handle == 0
    }
}

macro_rules! impl_from_for_handle {
    ($($from_ty:ty),+ $(,)?) => {
        $(
            impl<T> From<$from_ty> for Handle<T> {
                fn from(value: $from_ty) -> Self {
                    Self::new(value as usize)
                }
            }
        )+
    };
}

impl_from_for_handle!(u16, u32, usize);

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.handle.eq(&other.handle)
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.handle.cmp(&other.handle)
    }
}

impl<T> Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.handle.hash(state)
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let type_name = std::any::type_name::<T>();
        let short_name = type_name.rsplit("::").next().unwrap_or(type_name);
        write!(f, "Handle<{short_name}>({})", self.handle)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

/// Hands out monotonically increasing handles starting at `1`.
pub struct HandleAllocator<T> {
    next: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HandleAllocator<T> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _marker: PhantomData,
        }
    }

    pub fn allocate(&mut self) -> Handle<T> {
        let handle = Handle::new(self.next);
        self.next += 1;
        handle
    }

    /// Whether `handle` could have come from this allocator.
    pub fn issued(&self, handle: Handle<T>) -> bool {
        !handle.is_null() && handle.as_raw() < self.next
    }
}

impl<T> Default for HandleAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for HandleAllocator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleAllocator")
            .field("next", &self.next)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Program;

    #[test]
    fn allocator_starts_at_one_and_increments() {
        let mut allocator = HandleAllocator::<Program>::new();
        let first = allocator.allocate();
        let second = allocator.allocate();

        assert_eq!(first.as_raw(), 1);
        assert_eq!(second.as_raw(), 2);
        assert!(allocator.issued(second));
        assert!(!allocator.issued(Handle::new(3)));
        assert!(!allocator.issued(Handle::null()));
    }

    #[test]
    fn debug_uses_short_type_name() {
        let handle = Handle::<Program>::from_raw(7u32);
        assert_eq!(format!("{handle:?}"), "Handle<Program>(7)");
    }
}
