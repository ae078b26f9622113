pub mod bit_table;
pub mod builder;
pub mod handle;
pub mod utils;

pub use bit_table::BitTable;
pub use handle::{Handle, HandleAllocator};
