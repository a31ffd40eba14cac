pub mod grouped;
pub mod single;

pub use grouped::{GroupedFilter, GroupedFilterCompiler, compile_grouped};
pub use single::{FilterCompiler, compile};
